//! Inline-compatibility fixes for list-derived content.
//!
//! The destination editor forces a line break at `strong`/`em` boundaries
//! inside list content. Two layers of defense: a compatibility stylesheet
//! injected into the prelude (inlined onto elements in the CSS pass), and a
//! structural pass that unwraps leftover paragraph wrappers and drops
//! redundant `<br>` inside list-derived content.

use crate::dom::TreeNode;

/// Compatibility rules injected into the style prelude.
///
/// Keeps emphasis inline inside list items and flattened line records, and
/// degrades the prefix badge layout for editors without inline-flex. The
/// `data-wx-line` selectors only matter on the standalone-export path where
/// the stylesheet ships with the document; the inliner skips them.
#[must_use]
pub fn compat_styles() -> &'static str {
    "ul li strong, ol li strong, ul li b, ol li b,\n\
     div[data-wx-line] strong, div[data-wx-line] b { display: inline; font-weight: 700; }\n\
     ul li em, ol li em, ul li i, ol li i,\n\
     div[data-wx-line] em, div[data-wx-line] i { display: inline; font-style: italic; }\n\
     ul li > p, ol li > p, div[data-wx-line] > p { display: inline; margin: 0; padding: 0; }\n\
     .md-list-prefix { display: inline-block !important; text-align: center; vertical-align: top; }"
}

/// Unwrap paragraph wrappers and drop line breaks inside list-derived
/// content, leaving code blocks alone.
pub fn normalize_list_inline(root: &mut TreeNode) {
    walk(root);
}

fn walk(node: &mut TreeNode) {
    if node.tag == "li" || node.attr("data-wx-line").is_some() {
        unwrap_inline_paragraphs(node);
        remove_breaks(node);
    }
    for child in &mut node.children {
        walk(child);
    }
}

/// Unwrap direct `p` children that carry no block-level content.
fn unwrap_inline_paragraphs(node: &mut TreeNode) {
    let mut i = 0;
    while i < node.children.len() {
        if node.children[i].tag == "p" && !has_block_content(&node.children[i]) {
            node.unwrap_child(i);
        } else {
            i += 1;
        }
    }
}

fn has_block_content(node: &TreeNode) -> bool {
    node.any_descendant(&|n: &TreeNode| {
        matches!(
            n.tag.as_str(),
            "p" | "div" | "ul" | "ol" | "pre" | "table" | "blockquote"
        )
    })
}

/// Remove `<br>` descendants outside code blocks.
fn remove_breaks(node: &mut TreeNode) {
    if node.tag == "pre" || node.tag == "code" {
        return;
    }
    let mut i = 0;
    while i < node.children.len() {
        if node.children[i].tag == "br" {
            node.remove_child(i);
        } else {
            remove_breaks(&mut node.children[i]);
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    fn run(html: &str) -> String {
        let mut tree = parse_fragment(html).unwrap();
        normalize_list_inline(&mut tree);
        serialize_children(&tree)
    }

    #[test]
    fn test_li_paragraph_unwrapped() {
        let out = run("<ul><li><p>a <strong>b</strong></p></li></ul>");
        assert_eq!(out, "<ul><li>a <strong>b</strong></li></ul>");
    }

    #[test]
    fn test_paragraph_with_block_content_kept() {
        let html = "<ul><li><p>a<div>block</div></p></li></ul>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_line_record_paragraph_unwrapped() {
        let out = run(r#"<div data-wx-line="">• <p>x</p></div>"#);
        assert_eq!(out, r#"<div data-wx-line="">• x</div>"#);
    }

    #[test]
    fn test_br_removed_inside_li() {
        let out = run("<ul><li>a<br/>b</li></ul>");
        assert_eq!(out, "<ul><li>ab</li></ul>");
    }

    #[test]
    fn test_br_in_code_kept() {
        let html = "<ul><li><pre><code>x<br/>y</code></pre></li></ul>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_content_outside_lists_untouched() {
        let html = "<p>a<br/>b</p>";
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_compat_styles_force_inline() {
        let styles = compat_styles();
        assert!(styles.contains("display: inline;"));
        assert!(styles.contains("!important"));
    }
}
