//! Markdown renderer producing class-annotated HTML for the WeChat editor.
//!
//! Every generated element carries an `md-*` class targeted by the theme
//! stylesheets, so the same markup restyles by swapping CSS only. The
//! renderer tracks cross-cutting state (footnotes, list counters, deferred
//! diagram scheduling) in a per-render context and exposes the footnote and
//! reading-time blocks as separate builders so callers control placement.
//!
//! # Example
//!
//! ```
//! use wepaste_renderer::{RenderOptions, Renderer};
//!
//! let renderer = Renderer::new(RenderOptions::default());
//! let result = renderer.render("# Hello\n\n**Bold** text");
//! assert!(result.html.contains("md-strong"));
//! ```

mod diagram;
mod footnote;
mod front_matter;
mod highlight;
mod list;
mod renderer;
mod style;

pub use diagram::{DiagramRunner, DiagramScheduler};
pub use footnote::{Footnote, FootnoteRegistry, build_footnotes};
pub use front_matter::{ParsedDocument, ReadingStats, parse_document, reading_stats};
pub use highlight::{ClassHighlighter, SyntaxHighlighter, format_line_numbers};
pub use list::{ListFrame, ListStack};
pub use renderer::{RenderOptions, Rendered, Renderer, build_addition, wrap_container};
pub use style::{escape_html, styled, styled_as};
