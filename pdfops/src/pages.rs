//! Page-range parsing and resolution.
//!
//! Page-oriented commands accept a compact range expression selecting a
//! subset of a document's pages:
//!
//! - `"5"` - single page
//! - `"1-5"` - inclusive range
//! - `"1-3,5,7-9"` - comma-separated combination
//!
//! Parsing is purely syntactic; bounds are checked against a concrete page
//! count at resolution time, once the document has been opened.
//!
//! # Examples
//!
//! ```
//! use pdfops::pages::PageRange;
//!
//! let range = PageRange::parse("1-3,5,7-9").unwrap();
//! assert_eq!(range.resolve(10).unwrap(), vec![1, 2, 3, 5, 7, 8, 9]);
//! ```

use crate::error::{PdfOpsError, Result};
use std::str::FromStr;

/// A parsed page-range expression.
///
/// Tokens are kept in parse order; [`resolve`](Self::resolve) produces the
/// final deduplicated, ascending page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    tokens: Vec<RangeToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RangeToken {
    Single(u32),
    Span(u32, u32),
}

impl PageRange {
    /// Parse a page-range expression.
    ///
    /// Each comma-separated token must be a single integer or a
    /// `start-end` pair. Whitespace around tokens is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::MalformedPageRange`] naming the first token
    /// that is not an integer or an integer pair. The empty expression is
    /// malformed.
    pub fn parse(s: &str) -> Result<Self> {
        let mut tokens = Vec::new();

        for part in s.split(',') {
            let part = part.trim();

            if part.contains('-') {
                let pieces: Vec<&str> = part.split('-').collect();
                if pieces.len() != 2 {
                    return Err(malformed(part));
                }

                let start: u32 = pieces[0].trim().parse().map_err(|_| malformed(part))?;
                let end: u32 = pieces[1].trim().parse().map_err(|_| malformed(part))?;

                tokens.push(RangeToken::Span(start, end));
            } else {
                let page: u32 = part.parse().map_err(|_| malformed(part))?;
                tokens.push(RangeToken::Single(page));
            }
        }

        Ok(Self { tokens })
    }

    /// Resolve the expression against a concrete page count.
    ///
    /// Produces the selected page numbers, deduplicated and sorted
    /// ascending. Every returned number lies in `1..=page_count`.
    ///
    /// A span whose start exceeds its end contributes no pages and is not
    /// an error; `"2-1"` resolves to the empty selection. Callers that
    /// treat an empty selection as meaningless should check for it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::PageOutOfBounds`] for a single page outside
    /// `1..=page_count`, or [`PdfOpsError::RangeOutOfBounds`] for a span
    /// with `start < 1` or `end > page_count`.
    pub fn resolve(&self, page_count: u32) -> Result<Vec<u32>> {
        let mut pages = Vec::new();

        for token in &self.tokens {
            match *token {
                RangeToken::Single(page) => {
                    if page < 1 || page > page_count {
                        return Err(PdfOpsError::PageOutOfBounds {
                            page,
                            total: page_count,
                        });
                    }
                    pages.push(page);
                }
                RangeToken::Span(start, end) => {
                    if start < 1 || end > page_count {
                        return Err(PdfOpsError::RangeOutOfBounds {
                            start,
                            end,
                            total: page_count,
                        });
                    }
                    // start > end yields nothing here.
                    pages.extend(start..=end);
                }
            }
        }

        pages.sort_unstable();
        pages.dedup();

        Ok(pages)
    }

    /// The default selection when no expression is supplied: every page.
    pub fn full(page_count: u32) -> Vec<u32> {
        (1..=page_count).collect()
    }
}

impl FromStr for PageRange {
    type Err = PdfOpsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Resolve an optional expression against a page count.
///
/// `None` selects every page; `Some(expr)` is parsed and resolved.
pub fn resolve_selection(expression: Option<&str>, page_count: u32) -> Result<Vec<u32>> {
    match expression {
        Some(expr) => PageRange::parse(expr)?.resolve(page_count),
        None => Ok(PageRange::full(page_count)),
    }
}

fn malformed(token: &str) -> PdfOpsError {
    PdfOpsError::MalformedPageRange {
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_single_page() {
        let range = PageRange::parse("5").unwrap();
        assert_eq!(range.resolve(10).unwrap(), vec![5]);
    }

    #[test]
    fn test_span() {
        let range = PageRange::parse("2-4").unwrap();
        assert_eq!(range.resolve(10).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn test_combined_expression() {
        let range = PageRange::parse("1-3,5,7-9").unwrap();
        assert_eq!(range.resolve(10).unwrap(), vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_overlap_dedup_and_order() {
        let range = PageRange::parse("7-9,1-3,2,8").unwrap();
        let pages = range.resolve(10).unwrap();
        assert_eq!(pages, vec![1, 2, 3, 7, 8, 9]);

        // Resolved sets are always ascending with no duplicates.
        assert!(pages.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_page_out_of_bounds() {
        let range = PageRange::parse("5").unwrap();
        let err = range.resolve(3).unwrap_err();
        assert!(matches!(
            err,
            PdfOpsError::PageOutOfBounds { page: 5, total: 3 }
        ));
    }

    #[test]
    fn test_zero_page_out_of_bounds() {
        let range = PageRange::parse("0").unwrap();
        assert!(matches!(
            range.resolve(5).unwrap_err(),
            PdfOpsError::PageOutOfBounds { page: 0, .. }
        ));
    }

    #[test]
    fn test_span_out_of_bounds() {
        let range = PageRange::parse("7-12").unwrap();
        let err = range.resolve(10).unwrap_err();
        assert!(matches!(
            err,
            PdfOpsError::RangeOutOfBounds {
                start: 7,
                end: 12,
                total: 10
            }
        ));

        let range = PageRange::parse("0-2").unwrap();
        assert!(matches!(
            range.resolve(10).unwrap_err(),
            PdfOpsError::RangeOutOfBounds { start: 0, .. }
        ));
    }

    // A reversed span contributes nothing rather than failing; the original
    // tooling behaved this way and callers rely on it staying silent.
    #[test]
    fn test_degenerate_span_is_empty() {
        let range = PageRange::parse("2-1").unwrap();
        assert_eq!(range.resolve(5).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_degenerate_span_mixed_with_valid_tokens() {
        let range = PageRange::parse("5-4,2").unwrap();
        assert_eq!(range.resolve(5).unwrap(), vec![2]);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1-2-3")]
    #[case("1-")]
    #[case("-3")]
    #[case("1,,2")]
    #[case("1.5")]
    fn test_malformed_tokens(#[case] expr: &str) {
        let err = PageRange::parse(expr).unwrap_err();
        assert!(
            matches!(err, PdfOpsError::MalformedPageRange { .. }),
            "expected parse failure for {expr:?}, got {err:?}"
        );
    }

    #[test]
    fn test_malformed_token_is_named() {
        let err = PageRange::parse("1-3,xyz,7").unwrap_err();
        assert!(format!("{err}").contains("xyz"));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let range = PageRange::parse(" 1 - 3 , 5 ").unwrap();
        assert_eq!(range.resolve(10).unwrap(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_full_selection() {
        assert_eq!(PageRange::full(4), vec![1, 2, 3, 4]);
        assert_eq!(PageRange::full(1), vec![1]);
    }

    #[test]
    fn test_resolve_selection_default() {
        assert_eq!(resolve_selection(None, 4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(
            resolve_selection(Some("2-3"), 4).unwrap(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_from_str() {
        let range: PageRange = "1-2".parse().unwrap();
        assert_eq!(range.resolve(5).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_bounds_invariant_holds() {
        let range = PageRange::parse("1-10,3,9-10").unwrap();
        for count in 10..20 {
            let pages = range.resolve(count).unwrap();
            assert!(pages.iter().all(|&p| p >= 1 && p <= count));
        }
    }
}
