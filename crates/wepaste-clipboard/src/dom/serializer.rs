//! Tree to HTML serialization.

use std::fmt::Write;

use super::tree::TreeNode;

/// HTML void elements, serialized self-closing and never given children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Whether `tag` is an HTML void element.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Serialize the children of `node` (its inner HTML).
#[must_use]
pub fn serialize_children(node: &TreeNode) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(&escape_text(&node.text));
    for child in &node.children {
        serialize_node(child, &mut out);
    }
    out
}

/// Serialize a single node and its tail.
pub fn serialize_node(node: &TreeNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag);

    for (key, value) in &node.attrs {
        write!(out, r#" {key}="{}""#, escape_attr(value)).unwrap();
    }

    if is_void_element(&node.tag) {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&escape_text(&node.text));
        for child in &node.children {
            serialize_node(child, out);
        }
        write!(out, "</{}>", node.tag).unwrap();
    }

    if !node.tail.is_empty() {
        out.push_str(&escape_text(&node.tail));
    }
}

/// Escape text content, keeping non-breaking spaces visible as entities.
fn escape_text(text: &str) -> String {
    escape(text, false)
}

/// Escape attribute values.
fn escape_attr(text: &str) -> String {
    escape(text, true)
}

fn escape(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{00a0}' => result.push_str("&nbsp;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::parser::parse_fragment;
    use super::*;
    use crate::dom::TreeNode;

    #[test]
    fn test_serialize_simple() {
        let tree = TreeNode::new("root")
            .with_children(vec![TreeNode::new("p").with_text("Hello")]);
        assert_eq!(serialize_children(&tree), "<p>Hello</p>");
    }

    #[test]
    fn test_serialize_nested_with_tail() {
        let strong = TreeNode::new("strong").with_text("Bold").with_tail(" text");
        let p = TreeNode::new("p").with_children(vec![strong]);
        let root = TreeNode::new("root").with_children(vec![p]);
        assert_eq!(serialize_children(&root), "<p><strong>Bold</strong> text</p>");
    }

    #[test]
    fn test_serialize_void_element() {
        let img = TreeNode::new("img")
            .with_attr("src", "x.png")
            .with_attr("alt", "x");
        let root = TreeNode::new("root").with_children(vec![img]);
        assert_eq!(serialize_children(&root), r#"<img src="x.png" alt="x"/>"#);
    }

    #[test]
    fn test_serialize_empty_non_void_keeps_close_tag() {
        let root = TreeNode::new("root").with_children(vec![TreeNode::new("figcaption")]);
        assert_eq!(serialize_children(&root), "<figcaption></figcaption>");
    }

    #[test]
    fn test_escapes_special_chars() {
        let root = TreeNode::new("root")
            .with_children(vec![TreeNode::new("p").with_text("a < b & c")]);
        assert_eq!(serialize_children(&root), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_nbsp_round_trip() {
        let tree = parse_fragment("<p>&nbsp;&nbsp;x</p>").unwrap();
        assert_eq!(serialize_children(&tree), "<p>&nbsp;&nbsp;x</p>");
    }

    #[test]
    fn test_attribute_escaping() {
        let root = TreeNode::new("root").with_children(vec![
            TreeNode::new("code").with_attr("data-raw-code", r#"say "hi""#),
        ]);
        assert_eq!(
            serialize_children(&root),
            r#"<code data-raw-code="say &quot;hi&quot;"></code>"#
        );
    }

    #[test]
    fn test_full_round_trip() {
        let html = r#"<ul class="md-ul"><li class="md-listitem"><span class="md-list-prefix">✓</span>a</li></ul>"#;
        let tree = parse_fragment(html).unwrap();
        assert_eq!(serialize_children(&tree), html);
    }
}
