//! Footnote collection for citation-mode links.
//!
//! External links rendered while citations are enabled register here and
//! receive a stable index; the reference list is built once at document end.

use std::fmt::Write;

use crate::style::{styled, styled_as};

/// A single collected footnote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footnote {
    /// 1-based index shown in the superscript marker.
    pub index: u32,
    /// Display text of the originating link.
    pub title: String,
    /// Link target; the deduplication key.
    pub link: String,
}

/// Accumulates footnotes during one render pass.
///
/// Deduplication is by exact `link` equality: repeated links reuse the first
/// entry's index, and the first title wins.
#[derive(Debug, Default)]
pub struct FootnoteRegistry {
    entries: Vec<Footnote>,
    counter: u32,
}

impl FootnoteRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a link and return its footnote index.
    ///
    /// An existing entry with the same `link` keeps its index and title.
    pub fn add(&mut self, title: &str, link: &str) -> u32 {
        if let Some(existing) = self.entries.iter().find(|f| f.link == link) {
            return existing.index;
        }
        self.counter += 1;
        self.entries.push(Footnote {
            index: self.counter,
            title: title.to_owned(),
            link: link.to_owned(),
        });
        self.counter
    }

    /// Collected entries in first-seen order.
    #[must_use]
    pub fn entries(&self) -> &[Footnote] {
        &self.entries
    }

    /// Whether any footnotes were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear entries and restart numbering at 1.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.counter = 0;
    }

    /// Take the collected entries, leaving the registry empty.
    #[must_use]
    pub fn take(&mut self) -> Vec<Footnote> {
        self.counter = 0;
        std::mem::take(&mut self.entries)
    }
}

/// Build the trailing reference block, or an empty string without entries.
#[must_use]
pub fn build_footnotes(footnotes: &[Footnote]) -> String {
    if footnotes.is_empty() {
        return String::new();
    }

    let mut lines = String::new();
    for Footnote { index, title, link } in footnotes {
        let badge = format!(r#"<code style="font-size: 90%; opacity: 0.6;">[{index}]</code>"#);
        if title == link {
            // A bare URL footnote shows the link once, not "url: url".
            write!(
                lines,
                r#"{badge}: <i style="word-break: break-all">{title}</i><br/>"#
            )
            .unwrap();
        } else {
            write!(
                lines,
                r#"{badge} {title}: <i style="word-break: break-all">{link}</i><br/>"#
            )
            .unwrap();
        }
        lines.push('\n');
    }

    let mut block = styled("h4", "引用链接");
    block.push_str(&styled_as("footnotes", "p", lines.trim_end()));
    block
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_indices_increase_from_one() {
        let mut registry = FootnoteRegistry::new();
        assert_eq!(registry.add("A", "https://x"), 1);
        assert_eq!(registry.add("B", "https://y"), 2);
        assert_eq!(registry.add("C", "https://z"), 3);
    }

    #[test]
    fn test_repeated_link_reuses_index() {
        let mut registry = FootnoteRegistry::new();
        assert_eq!(registry.add("A", "https://x"), 1);
        assert_eq!(registry.add("B", "https://y"), 2);
        assert_eq!(registry.add("C", "https://x"), 1);
        assert_eq!(registry.entries().len(), 2);
    }

    #[test]
    fn test_first_title_wins() {
        let mut registry = FootnoteRegistry::new();
        registry.add("first", "https://x");
        registry.add("second", "https://x");
        assert_eq!(registry.entries()[0].title, "first");
    }

    #[test]
    fn test_reset_restarts_numbering() {
        let mut registry = FootnoteRegistry::new();
        registry.add("A", "https://x");
        registry.reset();
        assert!(registry.is_empty());
        assert_eq!(registry.add("B", "https://y"), 1);
    }

    #[test]
    fn test_build_footnotes_empty() {
        assert_eq!(build_footnotes(&[]), "");
    }

    #[test]
    fn test_build_footnotes_title_and_link() {
        let notes = vec![Footnote {
            index: 1,
            title: "Example".to_owned(),
            link: "https://example.com".to_owned(),
        }];
        let html = build_footnotes(&notes);
        assert!(html.contains(r#"<h4 class="md-h4""#));
        assert!(html.contains("引用链接"));
        assert!(html.contains("[1]</code> Example: "));
        assert!(html.contains(r#"<i style="word-break: break-all">https://example.com</i>"#));
    }

    #[test]
    fn test_build_footnotes_bare_url() {
        let notes = vec![Footnote {
            index: 1,
            title: "https://example.com".to_owned(),
            link: "https://example.com".to_owned(),
        }];
        let html = build_footnotes(&notes);
        // Link shown once, separated from the badge by a colon.
        assert!(html.contains("[1]</code>: <i"));
        assert_eq!(html.matches("https://example.com").count(), 1);
    }
}
