// src/parser/html.rs
// =============================================================================
// This module extracts anchor targets from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so broken markup is
//   repaired the way a browser would repair it instead of failing
//
// The only content we refuse is content that isn't text at all: a body
// that isn't valid UTF-8 is reported as a parse error.
// =============================================================================

use scraper::{Html, Selector};

use crate::error::CrawlError;

// Extracts the href value of every <a> element, in document order
//
// Parameters:
//   url: the page the content came from (only used in error messages)
//   content: the raw response body
//
// Returns: the raw href strings; an empty Vec when the page has no anchors
//
// Example:
//   content = "<a href='/docs'>Docs</a><a>no href</a>"
//   result = ["/docs"]
pub fn extract_hrefs(url: &str, content: &[u8]) -> Result<Vec<String>, CrawlError> {
    let html = std::str::from_utf8(content).map_err(|e| CrawlError::parse(url, e))?;

    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, so parsing it can only fail on a
    // programming mistake; we still surface it as an error instead of panicking
    let selector = Selector::parse("a[href]").map_err(|e| CrawlError::parse(url, e))?;

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(hrefs)
}
