//! Display-name derivation for discovered services.
//!
//! A name comes from the first strategy that produces one:
//!
//! 1. the document title, if it is not blank;
//! 2. the directory just before the deepest API marker directory
//!    (`spec`, `api`, `openapi`, ...) whose predecessor is not generic;
//! 3. the file's parent directory, unless it is generic (`docs`, ...);
//! 4. the file name without its extension.
//!
//! Every candidate goes through [`format_service_name`] before it is
//! returned. The casing is a plain per-word transform, so `UserAPI` becomes
//! `Userapi` rather than `User Api`.

// Internal imports (std, crate)
use std::path::{is_separator, Path};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;

/// Directory names that mark a folder holding API descriptions
const MARKER_SEGMENTS: &[&str] = &["spec", "specs", "api", "apis", "swagger", "openapi", "oas"];

/// Directory names too generic to name a service after
const GENERIC_SEGMENTS: &[&str] = &[
    "docs",
    "doc",
    "documentation",
    "specifications",
    "specs",
    "",
    ".",
    "/",
];

/// Returned when nothing in the title or path yields a name
pub const FALLBACK_NAME: &str = "Unnamed Service";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Inputs shared by every naming strategy
#[derive(Debug)]
pub struct NameInput<'a> {
    pub title: &'a str,
    /// Path split on the platform separator(s); empty segments are kept
    pub segments: Vec<&'a str>,
}

impl<'a> NameInput<'a> {
    pub fn new(title: &'a str, path: &'a str) -> Self {
        Self {
            title,
            segments: path.split(is_separator).collect(),
        }
    }
}

/// A single naming rule; `None` hands over to the next one
pub type NameStrategy = fn(&NameInput<'_>) -> Option<String>;

/// Strategies in precedence order
pub const STRATEGIES: &[NameStrategy] = &[
    from_title,
    from_marker_directory,
    from_parent_directory,
    from_file_stem,
];

/// Derive a display name from a (possibly blank) title and a file path.
///
/// Never returns an empty string.
pub fn derive_name<P: AsRef<Path>>(title: &str, path: P) -> String {
    let path = path.as_ref().to_string_lossy();
    let input = NameInput::new(title, &path);
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&input))
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Strategy 1: a non-blank title
pub fn from_title(input: &NameInput<'_>) -> Option<String> {
    formatted(input.title)
}

/// Strategy 2: the segment before the right-most marker directory with a
/// non-generic predecessor
pub fn from_marker_directory(input: &NameInput<'_>) -> Option<String> {
    input
        .segments
        .windows(2)
        .rev()
        .filter(|pair| is_marker(pair[1]) && !is_generic(pair[0]))
        .find_map(|pair| formatted(pair[0]))
}

/// Strategy 3: the immediate parent directory, unless generic
pub fn from_parent_directory(input: &NameInput<'_>) -> Option<String> {
    let [.., parent, _file] = input.segments.as_slice() else {
        return None;
    };
    if is_generic(parent) {
        return None;
    }
    formatted(parent)
}

/// Strategy 4: the file name with its extension stripped
pub fn from_file_stem(input: &NameInput<'_>) -> Option<String> {
    let file = input.segments.last()?;
    let stem = Path::new(file)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    formatted(&stem)
}

/// Turn a raw title or directory name into a display name.
///
/// Dashes and underscores become spaces, whitespace runs collapse to one
/// space, and every word is capitalised with the rest lowercased.
pub fn format_service_name(raw: &str) -> String {
    let spaced = raw.replace(['-', '_'], " ");
    WHITESPACE_RE
        .replace_all(spaced.trim(), " ")
        .split(' ')
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn formatted(raw: &str) -> Option<String> {
    let name = format_service_name(raw);
    (!name.is_empty()).then_some(name)
}

fn is_marker(segment: &str) -> bool {
    MARKER_SEGMENTS.contains(&segment.to_lowercase().as_str())
}

fn is_generic(segment: &str) -> bool {
    GENERIC_SEGMENTS.contains(&segment.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_wins_over_path() {
        assert_eq!(
            derive_name("  loyalty  ", "connector/loyalty/spec/loyalty.yaml"),
            "Loyalty"
        );
        assert_eq!(derive_name("pet store_API", "x/y.yaml"), "Pet Store Api");
    }

    #[test]
    fn test_segment_before_marker() {
        assert_eq!(derive_name("", "connector/loyalty/spec/loyalty.yaml"), "Loyalty");
        assert_eq!(derive_name("   ", "foo/bar/spec/x.yaml"), "Bar");
        assert_eq!(derive_name("", "shop/Payment_Gateway/OpenAPI/v1.json"), "Payment Gateway");
    }

    #[test]
    fn test_parent_directory_when_marker_is_first() {
        assert_eq!(derive_name("", "apis/user-service/openapi.yaml"), "User Service");
    }

    #[test]
    fn test_generic_parent_is_skipped_before_marker() {
        // "docs" precedes no marker; strategy 3 picks the parent
        assert_eq!(derive_name("", "docs/petstore/swagger.json"), "Petstore");
        // marker preceded by a generic segment is ignored
        assert_eq!(derive_name("", "billing/docs/api/openapi.yaml"), "Api");
    }

    #[test]
    fn test_deepest_marker_preferred() {
        assert_eq!(
            derive_name("", "platform/api/orders/spec/orders-v2.yaml"),
            "Orders"
        );
    }

    #[test]
    fn test_file_stem_fallback() {
        assert_eq!(derive_name("", "docs/user_accounts.yaml"), "User Accounts");
        assert_eq!(derive_name("", "payments.json"), "Payments");
        assert_eq!(derive_name("", "./specs/orders.yml"), "Orders");
    }

    #[test]
    fn test_never_empty() {
        assert_eq!(derive_name("", ""), FALLBACK_NAME);
        assert_eq!(derive_name("", "/"), FALLBACK_NAME);
        assert_eq!(derive_name("-", "docs/__.yaml"), FALLBACK_NAME);
        for path in ["a", "a/b", "docs/docs/docs.json", "spec/spec", "x/.yaml"] {
            assert!(!derive_name("", path).is_empty(), "empty name for {path}");
        }
    }

    #[test]
    fn test_format_service_name() {
        assert_eq!(format_service_name("user-service"), "User Service");
        assert_eq!(format_service_name("  my__cool--api  "), "My Cool Api");
        assert_eq!(format_service_name("UserAPI"), "Userapi");
        assert_eq!(format_service_name("hELLO\tworld"), "Hello World");
        assert_eq!(format_service_name(""), "");
    }

    #[test]
    fn test_strategies_in_isolation() {
        let input = NameInput::new("", "team/docs/openapi/service.yaml");
        assert_eq!(from_title(&input), None);
        assert_eq!(from_marker_directory(&input), None);
        assert_eq!(from_parent_directory(&input), Some("Openapi".to_string()));
        assert_eq!(from_file_stem(&input), Some("Service".to_string()));
    }
}
