//! Syntax highlighting seam.
//!
//! The renderer never highlights code itself; it asks a [`SyntaxHighlighter`]
//! for an HTML fragment and records enough data on the element for a later
//! out-of-band pass to re-highlight languages that were not loaded yet.

use std::fmt::Write;

use crate::style::escape_html;

/// Languages the default highlighter accepts without falling back.
///
/// Matches the set of grammars bundled with the preview's highlighter build.
const REGISTERED_LANGUAGES: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "csharp",
    "css",
    "diff",
    "go",
    "java",
    "javascript",
    "json",
    "kotlin",
    "markdown",
    "php",
    "plaintext",
    "python",
    "ruby",
    "rust",
    "shell",
    "sql",
    "swift",
    "typescript",
    "xml",
    "yaml",
];

/// Pluggable code highlighter.
pub trait SyntaxHighlighter {
    /// Highlight `code` for `language`, returning an HTML fragment.
    fn highlight(&self, code: &str, language: &str) -> String;

    /// Whether `language` has a registered grammar.
    fn is_registered(&self, language: &str) -> bool;
}

/// Default highlighter emitting escaped code under `language-*` classes.
///
/// Token-level coloring is applied by the highlighter stylesheet on the
/// destination side; this implementation only guarantees safe markup and a
/// correct registered-language check.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassHighlighter;

impl SyntaxHighlighter for ClassHighlighter {
    fn highlight(&self, code: &str, _language: &str) -> String {
        escape_html(code.trim_end_matches('\n'))
    }

    fn is_registered(&self, language: &str) -> bool {
        REGISTERED_LANGUAGES.contains(&language)
    }
}

/// Wrap each line of a highlighted fragment in a numbered row.
///
/// Operates on the already-highlighted fragment, so it must not split inside
/// a tag; highlight fragments keep one source line per output line.
#[must_use]
pub fn format_line_numbers(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len() * 2);
    for (i, line) in fragment.lines().enumerate() {
        write!(
            out,
            r#"<span class="code-line"><span class="code-line-number">{}</span>{line}</span>"#,
            i + 1
        )
        .unwrap();
        out.push('\n');
    }
    if out.ends_with('\n') {
        out.pop();
    }
    out
}
