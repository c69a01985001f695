//! Paste-compatibility transform pipeline for rendered preview HTML.
//!
//! The destination editor's paste sanitizer strips `<style>` blocks,
//! classes, bare size attributes and `calc()`/`var()` constructs, and
//! re-flows nested lists unpredictably. This crate takes the rendered
//! fragment plus the composed theme CSS and rewrites both into markup that
//! survives the sanitizer with the same visual result: CSS inlined onto
//! elements, lists flattened into indented line records, variables replaced
//! by literals, image sizes moved into style, sentinel paragraphs padding
//! the edges, and diagram-renderer artifacts patched.
//!
//! See [`process_clipboard`] for the fixed step order.

mod compat;
mod dom;
mod error;
mod flatten;
mod hljs;
mod images;
mod inline;
mod pipeline;
mod substitute;

pub use compat::{compat_styles, normalize_list_inline};
pub use dom::{TreeNode, convert_html_entities, parse_fragment, serialize_children};
pub use error::ClipboardError;
pub use flatten::{flatten_lists, relocate_nested_lists};
pub use hljs::fetch_highlight_css;
pub use images::normalize_images;
pub use inline::inline_styles;
pub use pipeline::{PipelineOptions, process_clipboard};
pub use substitute::{fix_tspan_colors, substitute_literals};
