use std::fmt;
use url::Url;

/// Maximum SEO-friendly path length in characters
const MAX_PATH_LENGTH: usize = 100;

/// Issue code for a URL that could not be parsed
pub const CODE_PARSE: u16 = 500;

/// Issue code for a scheme other than http/https
pub const CODE_SCHEME: u16 = 400;

/// Issue code for advisory SEO-policy violations
pub const CODE_SEO: u16 = 199;

/// A single diagnostic attached to an input URL
///
/// Issues are purely informational: they are reported to the user but never
/// abort the pipeline for that URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub message: String,
    pub code: u16,
}

impl ValidationIssue {
    fn new(message: &str, code: u16) -> Self {
        ValidationIssue {
            message: message.to_string(),
            code,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {} (Code: {})", self.message, self.code)
    }
}

/// Lints a URL for structure and SEO-friendliness
///
/// All applicable checks run regardless of earlier failures; the result is
/// the full list of issues (possibly empty). If the string cannot be parsed
/// at all, the structural checks have nothing to inspect, so the parse issue
/// is the only one produced.
///
/// # Checks
///
/// * Parse failure -> "parsing error" (500)
/// * Scheme not http/https -> "unsupported scheme" (400)
/// * Path longer than 100 characters -> "path too long (SEO)" (199)
/// * Non-empty query string or fragment -> "query/fragment present (SEO)" (199)
/// * Uppercase letters or underscores in the path -> "non-SEO-friendly characters" (199)
///
/// # Examples
///
/// ```
/// use seedwave::url::validate_url;
///
/// assert!(validate_url("https://example.com/clean-path").is_empty());
/// assert_eq!(validate_url("ftp://example.com/").len(), 1);
/// ```
pub fn validate_url(input: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let url = match Url::parse(input) {
        Ok(u) => u,
        Err(_) => {
            // Scheme and path are unavailable, so the remaining checks
            // are inapplicable.
            issues.push(ValidationIssue::new("parsing error", CODE_PARSE));
            return issues;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        issues.push(ValidationIssue::new("unsupported scheme", CODE_SCHEME));
    }

    let path = url.path();

    if path.len() > MAX_PATH_LENGTH {
        issues.push(ValidationIssue::new("path too long (SEO)", CODE_SEO));
    }

    let has_query = url.query().map_or(false, |q| !q.is_empty());
    let has_fragment = url.fragment().map_or(false, |f| !f.is_empty());
    if has_query || has_fragment {
        issues.push(ValidationIssue::new(
            "query/fragment present (SEO)",
            CODE_SEO,
        ));
    }

    if path.chars().any(|c| c.is_ascii_uppercase()) || path.contains('_') {
        issues.push(ValidationIssue::new(
            "non-SEO-friendly characters",
            CODE_SEO,
        ));
    }

    issues
}
