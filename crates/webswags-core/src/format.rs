//! Serialization format detection for candidate spec files.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// On-disk serialization of a spec document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from the file extension, falling back to the content.
    ///
    /// `.json` is JSON, `.yaml`/`.yml` is YAML (case-insensitive). Any other
    /// extension is JSON when the first non-whitespace byte opens an object
    /// or array, and YAML otherwise.
    pub fn detect<P: AsRef<Path>>(path: P, content: &[u8]) -> Self {
        match extension_format(path.as_ref()) {
            Some(format) => format,
            None if looks_like_json(content) => Self::Json,
            None => Self::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Extension used by the raw spec endpoints (`swagger.json` / `swagger.yaml`)
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Content type used when re-serving the raw file
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "text/yaml",
        }
    }

    /// Parse a format from a file extension such as `json` or `yml`
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether the content starts with `{` or `[` once leading whitespace is skipped
pub fn looks_like_json(content: &[u8]) -> bool {
    content
        .iter()
        .find(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .is_some_and(|b| matches!(b, b'{' | b'['))
}

/// Whether the walker should try to parse this path: `.json`, `.yaml` or `.yml`
pub fn is_candidate<P: AsRef<Path>>(path: P) -> bool {
    extension_format(path.as_ref()).is_some()
}

fn extension_format(path: &Path) -> Option<Format> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(Format::from_extension)
}
