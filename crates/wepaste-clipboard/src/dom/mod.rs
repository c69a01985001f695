//! Owned HTML tree for the transform pipeline.
//!
//! The pipeline operates on a plain owned tree (nodes own their children,
//! text placement follows the text/tail convention) so every step is an
//! auditable whole-tree rewrite instead of an ad hoc in-place patch.

mod entities;
mod parser;
mod serializer;
mod tree;

pub use entities::convert_html_entities;
pub use parser::parse_fragment;
pub use serializer::{is_void_element, serialize_children, serialize_node};
pub use tree::{TreeNode, join_style_declarations, parse_style_declarations};
