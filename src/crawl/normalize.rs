// src/crawl/normalize.rs
// =============================================================================
// Turns a raw href found on a page into an absolute URL on the same host.
//
// Steps, in order:
// 1. Trim whitespace; empty and fragment-only hrefs are dropped
// 2. "/path" and "//host/path" are completed with the page's origin/scheme
// 3. Parse; document-relative references are joined onto the page URL
// 4. Links to another host (or port) are dropped silently
//
// "/docs/" and "/docs" share one path key, but the URL keeps its trailing
// slash: it is what gets fetched, and "setup" found on "/docs/" must resolve
// to "/docs/setup".
//
// Dropping a link is not an error. Only an href that can't be turned into
// a URL at all is reported, and even then the crawl carries on.
// =============================================================================

use url::{ParseError, Url};

use crate::error::CrawlError;

/// An internal link ready to be recorded and possibly crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLink {
    /// Path key of the page the link was found on
    pub source_path: String,
    /// Path key of the link target
    pub dest_path: String,
    /// Absolute URL of the link target as written (trailing slash kept), without fragment
    pub url: Url,
}

/// Resolves `href` against `base`.
///
/// Returns `Ok(None)` for links that should be skipped (empty, fragment-only,
/// other host) and `Err(CrawlError::MalformedLink)` when the href can't be parsed.
pub fn normalize(base: &Url, href: &str) -> Result<Option<NormalizedLink>, CrawlError> {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let candidate = if trimmed.starts_with("//") {
        format!("{}:{}", base.scheme(), trimmed)
    } else if trimmed.starts_with('/') {
        format!("{}{}", base.origin().ascii_serialization(), trimmed)
    } else {
        trimmed.to_string()
    };

    let mut url = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => base
            .join(&candidate)
            .map_err(|e| CrawlError::malformed_link(trimmed, e))?,
        Err(e) => return Err(CrawlError::malformed_link(trimmed, e)),
    };

    if !same_host(base, &url) {
        tracing::trace!(href = trimmed, "skipping link to another host");
        return Ok(None);
    }

    url.set_fragment(None);

    Ok(Some(NormalizedLink {
        source_path: path_key(base),
        dest_path: path_key(&url),
        url,
    }))
}

/// The key a page is tracked under: its path, "/" when empty, without a trailing slash.
pub fn path_key(url: &Url) -> String {
    let path = url.path();
    if path.is_empty() {
        return "/".to_string();
    }

    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => path.to_string(),
    }
}

// Sub-domains and other ports count as another website
fn same_host(base: &Url, other: &Url) -> bool {
    base.host_str() == other.host_str()
        && base.port_or_known_default() == other.port_or_known_default()
}
