//! URL helpers for outbound redirects and inbound image links.

use url::Url;

/// Errors that can occur while building URLs.
#[derive(Debug, thiserror::Error)]
pub enum UrlBuildError {
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBase {
        url: String,
        source: url::ParseError,
    },
}

/// Whether `candidate` starts with an `http://` or `https://` scheme.
///
/// Only the prefix is checked; the remote host decides whether the rest is
/// reachable.
pub fn has_http_scheme(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}

/// Appends URL-encoded query parameters to `base`.
///
/// # Errors
///
/// Returns [`UrlBuildError::InvalidBase`] if `base` is not an absolute URL.
///
/// # Examples
///
/// ```ignore
/// let url = with_query("https://shop.example.com/done", &[("order", "A 1")]).unwrap();
/// assert_eq!(url, "https://shop.example.com/done?order=A+1");
/// ```
pub fn with_query(base: &str, params: &[(&str, &str)]) -> Result<String, UrlBuildError> {
    let url = Url::parse_with_params(base, params).map_err(|source| UrlBuildError::InvalidBase {
        url: base.to_string(),
        source,
    })?;

    Ok(url.into())
}
