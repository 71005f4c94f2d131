// src/report.rs
// =============================================================================
// Prints the result of a crawl.
//
// Two formats:
// - A tree: one "> /path" header per page, one "  |- /dest" line per link
// - JSON (--json): the same map plus the error list and crawl statistics
//
// Errors always go to a separate writer (stderr in practice) so the sitemap
// on stdout stays machine-readable.
//
// Every function takes `impl Write` instead of printing directly, which lets
// the tests render into a Vec<u8> and compare the exact output.
// =============================================================================

use std::io::{self, Write};

use anyhow::Result;
use serde::Serialize;

use crate::crawl::{CrawlResult, CrawlStats, SiteMap};
use crate::error::CrawlError;

// Shape of the --json output
#[derive(Serialize)]
struct JsonReport<'a> {
    sitemap: &'a SiteMap,
    errors: Vec<String>,
    stats: &'a CrawlStats,
}

/// Writes the sitemap as a tree. The map is already sorted, so output is deterministic.
pub fn write_tree(w: &mut impl Write, site_map: &SiteMap) -> io::Result<()> {
    for (path, links) in site_map {
        writeln!(w, "> {}", path)?;
        for link in links {
            writeln!(w, "  |- {}", link)?;
        }
    }
    Ok(())
}

pub fn write_json(w: &mut impl Write, result: &CrawlResult) -> Result<()> {
    let report = JsonReport {
        sitemap: &result.site_map,
        errors: result.errors.iter().map(|e| e.to_string()).collect(),
        stats: &result.stats,
    };

    serde_json::to_writer_pretty(&mut *w, &report)?;
    writeln!(w)?;
    Ok(())
}

/// Lists errors one per line; writes nothing when there are none.
pub fn write_errors(w: &mut impl Write, errors: &[CrawlError]) -> io::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    writeln!(w, "Errors while building sitemap:")?;
    for err in errors {
        writeln!(w, "* {}", err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> SiteMap {
        let mut map = SiteMap::new();
        map.insert(
            "/".to_string(),
            vec!["/".to_string(), "/page-1".to_string(), "/page-2".to_string()],
        );
        map.insert("/page-2a".to_string(), vec!["/a-deep-page".to_string()]);
        map
    }

    // Fails after `limit` bytes, like a closed pipe would
    struct FailingWriter {
        limit: usize,
        written: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_tree() {
        let mut out = Vec::new();
        write_tree(&mut out, &sample_map()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "> /\n  |- /\n  |- /page-1\n  |- /page-2\n> /page-2a\n  |- /a-deep-page\n"
        );
    }

    #[test]
    fn test_write_tree_empty_map() {
        let mut out = Vec::new();
        write_tree(&mut out, &SiteMap::new()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_tree_propagates_write_failure() {
        let mut out = FailingWriter {
            limit: 8,
            written: 0,
        };
        let err = write_tree(&mut out, &sample_map()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_write_errors() {
        let errors = vec![
            CrawlError::fetch("http://example.com/x", "invalid status code, got 404"),
            CrawlError::malformed_link("http://[::1]:namedport", "invalid port number"),
        ];

        let mut out = Vec::new();
        write_errors(&mut out, &errors).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Errors while building sitemap:");
        assert!(lines[1].starts_with("* could not fetch"));
        assert!(lines[2].starts_with("* could not parse new URL"));
    }

    #[test]
    fn test_write_errors_silent_when_empty() {
        let mut out = Vec::new();
        write_errors(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_json() {
        let result = CrawlResult {
            site_map: sample_map(),
            errors: vec![CrawlError::fetch("http://example.com/x", "boom")],
            stats: CrawlStats {
                pages_fetched: 2,
                ..Default::default()
            },
        };

        let mut out = Vec::new();
        write_json(&mut out, &result).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["sitemap"]["/page-2a"][0], "/a-deep-page");
        assert_eq!(value["errors"].as_array().unwrap().len(), 1);
        assert_eq!(value["stats"]["pages_fetched"], 2);
    }
}
