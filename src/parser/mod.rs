// src/parser/mod.rs
// =============================================================================
// This module pulls raw link targets out of fetched content.
//
// Submodules:
// - html: finds the href of every <a> element in an HTML document
//
// The values come back exactly as written in the page. Turning them into
// absolute same-host URLs is the crawler's job (src/crawl/normalize.rs).
// =============================================================================

mod html;

pub use html::extract_hrefs;
