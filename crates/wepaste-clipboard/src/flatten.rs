//! List structure rewrites.
//!
//! The destination editor renders nested `<ul>`/`<ol>` unpredictably, so
//! lists are rewritten twice: first accidental `li > ul` wrapping is
//! normalized into sibling position, then every root list is flattened into
//! a sequence of indented, glyph-prefixed lines with no structural nesting
//! left at all.

use crate::dom::{TreeNode, join_style_declarations, parse_style_declarations};

fn is_list_tag(tag: &str) -> bool {
    tag == "ul" || tag == "ol"
}

/// Move any `ul`/`ol` that is a direct child of an `li` to be a following
/// sibling of that `li`. Content is untouched; document order is preserved.
pub fn relocate_nested_lists(root: &mut TreeNode) {
    relocate(root);
}

fn relocate(node: &mut TreeNode) {
    let mut i = 0;
    while i < node.children.len() {
        if node.children[i].tag == "li" {
            let mut moved = Vec::new();
            {
                let li = &mut node.children[i];
                let mut j = 0;
                while j < li.children.len() {
                    if is_list_tag(&li.children[j].tag) {
                        moved.push(li.remove_child(j));
                    } else {
                        j += 1;
                    }
                }
            }
            for (offset, list) in moved.into_iter().enumerate() {
                node.children.insert(i + 1 + offset, list);
            }
        }
        relocate(&mut node.children[i]);
        i += 1;
    }
}

/// Flatten every root list into a wrapper of one-line records.
///
/// A root list is a `ul`/`ol` that is not nested inside another list and
/// not inside a code block. Each item becomes one line: `4 × level`
/// non-breaking spaces, a bullet glyph (`•` / `◦` by depth for unordered,
/// `n.` for ordered), then the item's inline content with nested list
/// markup and prefix badges stripped. An item's line always precedes the
/// lines of its descendants.
pub fn flatten_lists(root: &mut TreeNode) {
    flatten_walk(root, false);
}

fn flatten_walk(node: &mut TreeNode, in_code: bool) {
    let mut i = 0;
    while i < node.children.len() {
        let tag = node.children[i].tag.clone();
        let child_in_code = in_code || tag == "pre" || tag == "code";
        if !child_in_code && is_list_tag(&tag) {
            // Taking the list out consumes all nested lists with it, so
            // every list reached by this walk is a root list.
            let list = std::mem::take(&mut node.children[i]);
            let mut lines = Vec::new();
            collect_lines(&list, 0, &mut lines);
            let mut wrapper = build_wrapper(&list, lines);
            wrapper.tail = list.tail;
            node.children[i] = wrapper;
        } else {
            flatten_walk(&mut node.children[i], child_in_code);
        }
        i += 1;
    }
}

/// Emit the line records for one list, depth-first, content before children.
fn collect_lines(list: &TreeNode, level: usize, out: &mut Vec<TreeNode>) {
    let ordered = list.tag == "ol";
    let mut index: u64 = list
        .attr("start")
        .and_then(|start| start.parse().ok())
        .unwrap_or(1);

    for child in &list.children {
        match child.tag.as_str() {
            "li" => {
                let bullet = if ordered {
                    let b = format!("{index}.");
                    index += 1;
                    b
                } else if level == 0 {
                    "•".to_owned()
                } else {
                    "◦".to_owned()
                };
                out.push(build_line(child, level, &bullet));

                // Child lists follow their parent item's line.
                for sublist in child.children.iter().filter(|c| is_list_tag(&c.tag)) {
                    collect_lines(sublist, level + 1, out);
                }
            }
            // A sublist already relocated out of its item.
            "ul" | "ol" => collect_lines(child, level + 1, out),
            _ => {}
        }
    }
}

fn build_line(item: &TreeNode, level: usize, bullet: &str) -> TreeNode {
    let mut clone = item.clone();
    clone.tail.clear();
    strip_list_markup(&mut clone);

    // A lone paragraph wrapper would force an extra line break.
    if clone.children.len() == 1 && clone.children[0].tag == "p" && clone.text.trim().is_empty() {
        let paragraph = clone.children.remove(0);
        clone.text = paragraph.text;
        clone.children = paragraph.children;
    }

    let indent = "\u{00a0}".repeat(level * 4);
    let mut line = TreeNode::new("div")
        .with_attr("data-wx-line", "")
        .with_attr("style", "margin:5px 0;");
    line.text = format!("{indent}{bullet} {}", clone.text);
    line.children = clone.children;
    line
}

/// Remove nested list markup and prefix badges from a cloned item.
fn strip_list_markup(node: &mut TreeNode) {
    let mut i = 0;
    while i < node.children.len() {
        let child = &node.children[i];
        if is_list_tag(&child.tag) || child.has_class("md-list-prefix") {
            node.remove_child(i);
        } else {
            strip_list_markup(&mut node.children[i]);
            i += 1;
        }
    }
}

/// Wrapper replacing the original list; inherits spacing but never the
/// boxed look (background, border, radius are dropped).
fn build_wrapper(list: &TreeNode, lines: Vec<TreeNode>) -> TreeNode {
    let mut wrapper = TreeNode::new("div").with_attr("data-wx-list", "");
    if let Some(style) = list.style() {
        let kept: Vec<(String, String)> = parse_style_declarations(style)
            .into_iter()
            .filter(|(prop, _)| {
                let prop = prop.to_ascii_lowercase();
                prop.starts_with("margin") || prop.starts_with("padding")
            })
            .collect();
        if !kept.is_empty() {
            wrapper.set_attr("style", join_style_declarations(&kept));
        }
    }
    wrapper.children = lines;
    wrapper
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    fn flatten(html: &str) -> String {
        let mut tree = parse_fragment(html).unwrap();
        relocate_nested_lists(&mut tree);
        flatten_lists(&mut tree);
        serialize_children(&tree)
    }

    fn lines_of(html: &str) -> Vec<String> {
        let out = flatten(html);
        let tree = parse_fragment(&out).unwrap();
        let mut lines = Vec::new();
        tree.walk(&mut |node| {
            if node.attr("data-wx-line").is_some() {
                lines.push(node.text_content());
            }
        });
        lines
    }

    #[test]
    fn test_relocate_li_wrapped_list() {
        let mut tree =
            parse_fragment("<ul><li>a<ul><li>b</li></ul></li></ul>").unwrap();
        relocate_nested_lists(&mut tree);
        let out = serialize_children(&tree);
        assert_eq!(out, "<ul><li>a</li><ul><li>b</li></ul></ul>");
    }

    #[test]
    fn test_flat_list_one_line_per_item() {
        let lines = lines_of("<ul><li>a</li><li>b</li></ul>");
        assert_eq!(lines, vec!["• a", "• b"]);
    }

    #[test]
    fn test_nested_unordered_glyphs_and_indent() {
        let lines = lines_of("<ul><li>a<ul><li>b</li><li>c</li></ul></li><li>d</li></ul>");
        let nbsp4 = "\u{00a0}".repeat(4);
        assert_eq!(
            lines,
            vec![
                "• a".to_owned(),
                format!("{nbsp4}◦ b"),
                format!("{nbsp4}◦ c"),
                "• d".to_owned(),
            ]
        );
    }

    #[test]
    fn test_ordered_counters_and_start() {
        let lines = lines_of(r#"<ol start="5"><li>x</li><li>y</li><li>z</li></ol>"#);
        assert_eq!(lines, vec!["5. x", "6. y", "7. z"]);
    }

    #[test]
    fn test_nested_ordered_restarts() {
        let lines = lines_of("<ol><li>a<ol><li>i</li><li>ii</li></ol></li><li>b</li></ol>");
        let nbsp4 = "\u{00a0}".repeat(4);
        assert_eq!(
            lines,
            vec![
                "1. a".to_owned(),
                format!("{nbsp4}1. i"),
                format!("{nbsp4}2. ii"),
                "2. b".to_owned(),
            ]
        );
    }

    #[test]
    fn test_item_count_preserved() {
        let html = "<ul><li>1</li><li>2<ul><li>3</li><li>4<ul><li>5</li></ul></li></ul></li><li>6</li></ul>";
        let lines = lines_of(html);
        assert_eq!(lines.len(), 6);
        // Pre-order: content before children.
        let texts: Vec<String> = lines
            .iter()
            .map(|l| l.trim_start_matches(['\u{00a0}', '•', '◦', ' ']).to_owned())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_prefix_badges_stripped() {
        let out = flatten(
            r#"<ul><li><span class="md-list-prefix">✓</span>item</li></ul>"#,
        );
        assert!(!out.contains("md-list-prefix"));
        assert!(out.contains("• item"));
    }

    #[test]
    fn test_lone_paragraph_unwrapped() {
        let out = flatten("<ul><li><p>wrapped</p></li></ul>");
        assert!(!out.contains("<p"));
        assert!(out.contains("• wrapped"));
    }

    #[test]
    fn test_inline_formatting_preserved() {
        let out = flatten("<ul><li>a <strong>bold</strong> tail</li></ul>");
        assert!(out.contains("<strong>bold</strong> tail"));
    }

    #[test]
    fn test_list_in_code_block_untouched() {
        let html = "<pre><code><ul><li>a</li></ul></code></pre>";
        assert_eq!(flatten(html), html);
    }

    #[test]
    fn test_wrapper_inherits_spacing_only() {
        let out = flatten(
            r#"<ul style="margin: 8px 0; padding-left: 1em; background: red; border-radius: 4px"><li>a</li></ul>"#,
        );
        assert!(out.contains(r#"data-wx-list"#));
        assert!(out.contains("margin: 8px 0"));
        assert!(out.contains("padding-left: 1em"));
        assert!(!out.contains("background"));
        assert!(!out.contains("border-radius"));
    }

    #[test]
    fn test_no_lists_noop() {
        let html = "<p>nothing here</p>";
        assert_eq!(flatten(html), html);
    }

    #[test]
    fn test_relocated_sibling_list_still_indents() {
        // Shape produced by the relocation pass.
        let lines = lines_of("<ul><li>a</li><ul><li>b</li></ul><li>c</li></ul>");
        let nbsp4 = "\u{00a0}".repeat(4);
        assert_eq!(
            lines,
            vec!["• a".to_owned(), format!("{nbsp4}◦ b"), "• c".to_owned()]
        );
    }
}
