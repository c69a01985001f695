//! The paste-compatibility pipeline.
//!
//! Takes the rendered preview fragment plus the composed theme CSS and
//! produces paste-ready markup. Steps run in a fixed order; each step
//! assumes the previous one's postcondition, and a step with nothing to do
//! is a no-op, never an error.

use crate::compat::{compat_styles, normalize_list_inline};
use crate::dom::{TreeNode, parse_fragment, serialize_children};
use crate::error::ClipboardError;
use crate::flatten::{flatten_lists, relocate_nested_lists};
use crate::images::normalize_images;
use crate::inline::inline_styles;
use crate::substitute::{fix_tspan_colors, substitute_literals};
use wepaste_theme::strip_scope;

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineOptions {
    /// Literal color replacing the primary-color variable everywhere.
    pub primary_color: String,
    /// Highlighter stylesheet text (may be empty, see [`crate::fetch_highlight_css`]).
    pub highlight_css: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            primary_color: "#0F4C81".to_owned(),
            highlight_css: String::new(),
        }
    }
}

/// Transform a rendered preview fragment into paste-ready markup.
///
/// `theme_css` is the composed (scoped) theme stylesheet; the scope is
/// stripped here because the copied markup no longer lives inside the
/// preview container.
pub fn process_clipboard(
    html: &str,
    theme_css: &str,
    options: &PipelineOptions,
) -> Result<String, ClipboardError> {
    // Step 1: style prelude, so the inliner can see every rule.
    let mut input = String::with_capacity(html.len() + theme_css.len());
    let theme = strip_scope(theme_css);
    if !theme.trim().is_empty() {
        input.push_str("<style>");
        input.push_str(&theme);
        input.push_str("</style>");
    }
    if !options.highlight_css.trim().is_empty() {
        input.push_str("<style>");
        input.push_str(&options.highlight_css);
        input.push_str("</style>");
    }
    input.push_str("<style>");
    input.push_str(compat_styles());
    input.push_str("</style>");
    input.push_str(html);

    let mut tree = parse_fragment(&input)?;

    // Step 2: write every applicable rule onto elements as inline style.
    inline_styles(&mut tree);

    // Step 3: li-wrapped sublists become siblings of their item.
    relocate_nested_lists(&mut tree);

    // Step 4: root lists become flat indented line records.
    flatten_lists(&mut tree);

    // Step 5: literal rewrites over the serialized markup.
    let serialized = serialize_children(&tree);
    let substituted = substitute_literals(&serialized, &options.primary_color);
    let mut tree = parse_fragment(&substituted)?;

    // Step 6: keep emphasis inline inside list-derived content.
    normalize_list_inline(&mut tree);

    // Step 7: image dimensions move into inline style.
    normalize_images(&mut tree);

    // Step 8: sentinel padding so edge-adjacent vector graphics survive.
    insert_sentinels(&mut tree);

    // Step 9: collapse the diagram label wrapper structure.
    unwrap_diagram_labels(&mut tree);

    let output = serialize_children(&tree);
    Ok(fix_tspan_colors(&output))
}

/// Zero-size paragraph accepted by the destination paste handler.
fn sentinel_node() -> TreeNode {
    TreeNode::new("p")
        .with_attr("style", "font-size: 0; line-height: 0; margin: 0;")
        .with_text("\u{00a0}")
}

fn insert_sentinels(root: &mut TreeNode) {
    let mut leading = sentinel_node();
    // Any text before the first element must stay after the sentinel.
    leading.tail = std::mem::take(&mut root.text);
    root.children.insert(0, leading);
    root.children.push(sentinel_node());
}

/// Replace the diagram renderer's label wrapper (a foreign-namespace element
/// holding the label span) with a plain `<section>` carrying the same
/// namespace and style attributes.
fn unwrap_diagram_labels(root: &mut TreeNode) {
    let holds_label = |candidate: &TreeNode| {
        candidate
            .children
            .iter()
            .any(|child| child.has_class("nodeLabel"))
    };

    let position = root.children.iter().position(|child| holds_label(child));
    if let Some(index) = position {
        let wrapper = &root.children[index];
        let mut section = TreeNode::new("section");
        if let Some(xmlns) = wrapper.attr("xmlns") {
            section.set_attr("xmlns", xmlns);
        }
        if let Some(style) = wrapper.attr("style") {
            section.set_attr("style", style);
        }
        section.text = wrapper.text.clone();
        section.children = wrapper.children.clone();

        root.text.clear();
        root.children = vec![section];
        return;
    }

    for child in &mut root.children {
        unwrap_diagram_labels(child);
    }
}
