//! Recursive discovery of spec documents under a root directory.
//!
//! # Examples
//!
//! ```no_run
//! use webswags_core::discover;
//!
//! let specs = discover("..")?;
//! for spec in &specs {
//!     println!("{} ({}) -> {}", spec.service, spec.format, spec.path.display());
//! }
//! # Ok::<(), webswags_core::Error>(())
//! ```

// Internal imports (std, crate)
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::format::{is_candidate, Format};
use crate::spec::SpecDocument;
use crate::Error;

// External imports (alphabetized)
use log::{debug, info};
use walkdir::WalkDir;

/// Walk `root` and return every spec document found, sorted by service.
///
/// Siblings are visited in file-name order, so records sharing a service key
/// keep a stable relative order. Unreadable entries and files that are not spec documents are skipped.
///
/// # Errors
///
/// Returns [`Error::Walk`] only when `root` itself cannot be traversed.
pub fn discover<P: AsRef<Path>>(root: P) -> crate::Result<Vec<SpecDocument>> {
    let root = root.as_ref();
    let mut specs = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(Error::Walk {
                    root: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_candidate(entry.path()) {
            continue;
        }

        match SpecDocument::from_file(entry.path()) {
            Ok(spec) => {
                debug!(
                    "Found {} {} document at {}",
                    spec.schema_kind(),
                    spec.version_string(),
                    spec.path.display()
                );
                specs.push(spec);
            }
            Err(e) if e.is_expected_skip() => debug!("{}", e),
            Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    specs.sort_by(|a, b| a.service.cmp(&b.service));
    info!(
        "Discovered {} spec document(s) under {}",
        specs.len(),
        root.display()
    );
    Ok(specs)
}

/// Run [`discover`] on tokio's blocking pool
pub async fn discover_async<P: Into<PathBuf>>(root: P) -> crate::Result<Vec<SpecDocument>> {
    let root = root.into();
    let walk_root = root.clone();
    tokio::task::spawn_blocking(move || discover(walk_root))
        .await
        .map_err(|source| Error::DiscoveryTask { root, source })?
}

/// Read-only lookups over a finished discovery pass
#[derive(Clone, Debug, Default)]
pub struct Discovery {
    specs: Vec<SpecDocument>,
}

impl Discovery {
    /// Wrap a result list, restoring the service ordering if needed
    pub fn new(mut specs: Vec<SpecDocument>) -> Self {
        specs.sort_by(|a, b| a.service.cmp(&b.service));
        Self { specs }
    }

    pub fn specs(&self) -> &[SpecDocument] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// First record with this service key and format
    pub fn find(&self, service: &str, format: Format) -> Option<&SpecDocument> {
        self.specs
            .iter()
            .find(|s| s.service == service && s.format == format)
    }

    /// First record with this service key, whatever its format
    pub fn find_service(&self, service: &str) -> Option<&SpecDocument> {
        self.specs.iter().find(|s| s.service == service)
    }

    /// Records grouped by service key
    pub fn services(&self) -> BTreeMap<&str, Vec<&SpecDocument>> {
        let mut grouped: BTreeMap<&str, Vec<&SpecDocument>> = BTreeMap::new();
        for spec in &self.specs {
            grouped.entry(spec.service.as_str()).or_default().push(spec);
        }
        grouped
    }

    /// Service keys shared by more than one record, with the colliding paths
    pub fn duplicate_services(&self) -> BTreeMap<&str, Vec<&Path>> {
        self.services()
            .into_iter()
            .filter(|(_, specs)| specs.len() > 1)
            .map(|(service, specs)| {
                let paths = specs.iter().map(|s| s.path.as_path()).collect();
                (service, paths)
            })
            .collect()
    }
}

impl From<Vec<SpecDocument>> for Discovery {
    fn from(specs: Vec<SpecDocument>) -> Self {
        Self::new(specs)
    }
}
