//! URL handling module for Seedwave
//!
//! This module provides SEO-oriented URL validation and canonical-form
//! normalization. The canonical form (scheme + bare host) is the identity
//! used by the dedup registry: two URLs differing only in path, query,
//! fragment, port, or a leading "www." collapse to the same key because
//! the dispatcher dedups by site, not by page.

mod normalize;
mod validate;

use std::fmt;

// Re-export main functions
pub use normalize::canonical_key;
pub use validate::{validate_url, ValidationIssue};

/// URL scheme accepted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Returns the opposite scheme (http <-> https)
    pub fn toggled(self) -> Self {
        match self {
            Scheme::Http => Scheme::Https,
            Scheme::Https => Scheme::Http,
        }
    }

    /// Returns the scheme as it appears in a URL
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical identity of a site: scheme plus bare host
///
/// The host is lowercased with any leading "www." stripped. Port, path,
/// query, and fragment are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
    pub scheme: Scheme,
    pub host: String,
}

impl CanonicalKey {
    /// Returns the same host under the opposite scheme
    ///
    /// Used to pre-mark the mirrored scheme as visited so `http://x` and
    /// `https://x` are treated as one visitation unit.
    pub fn toggled(&self) -> Self {
        CanonicalKey {
            scheme: self.scheme.toggled(),
            host: self.host.clone(),
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_toggle() {
        assert_eq!(Scheme::Http.toggled(), Scheme::Https);
        assert_eq!(Scheme::Https.toggled(), Scheme::Http);
    }

    #[test]
    fn test_key_display() {
        let key = CanonicalKey {
            scheme: Scheme::Https,
            host: "example.com".to_string(),
        };
        assert_eq!(key.to_string(), "https://example.com");
    }

    #[test]
    fn test_key_toggled_keeps_host() {
        let key = CanonicalKey {
            scheme: Scheme::Http,
            host: "example.com".to_string(),
        };
        let mirror = key.toggled();
        assert_eq!(mirror.scheme, Scheme::Https);
        assert_eq!(mirror.host, "example.com");
        assert_ne!(key, mirror);
    }
}
