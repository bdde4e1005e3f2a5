use crate::url::{CanonicalKey, Scheme};
use crate::UrlError;
use url::Url;

/// Derives the canonical dedup key for a URL
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme
/// 3. Lowercase the host
/// 4. Remove any leading "www." from the host
/// 5. Drop port, path, query, and fragment
///
/// Two URLs differing only in those dropped components normalize to the
/// same key. This is intentional: the dispatcher dedups by site, not page.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(CanonicalKey)` - The canonical scheme + bare-host identity
/// * `Err(UrlError)` - Failed to parse, unsupported scheme, or no host
///
/// # Examples
///
/// ```
/// use seedwave::url::canonical_key;
///
/// let key = canonical_key("https://www.example.com/a/b").unwrap();
/// assert_eq!(key.to_string(), "https://example.com");
/// ```
pub fn canonical_key(url_str: &str) -> Result<CanonicalKey, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    let scheme = match url.scheme() {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        other => {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                other
            )))
        }
    };

    let host = url.host_str().ok_or(UrlError::MissingHost)?;
    let mut host = host.to_lowercase();

    if let Some(stripped) = host.strip_prefix("www.") {
        host = stripped.to_string();
    }

    Ok(CanonicalKey { scheme, host })
}
