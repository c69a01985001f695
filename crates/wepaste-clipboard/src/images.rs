//! Image sizing normalization.
//!
//! The destination strips bare `width`/`height` attributes but respects
//! inline style, so sizes move onto the style attribute. Numeric values
//! gain a pixel unit; anything else (percentages, `auto`) passes through
//! unchanged.

use crate::dom::TreeNode;

/// Rewrite `width`/`height` attributes on every image into inline style.
pub fn normalize_images(root: &mut TreeNode) {
    root.walk_mut(&mut |node| {
        if node.tag != "img" {
            return;
        }
        for dimension in ["width", "height"] {
            if let Some(value) = node.remove_attr(dimension) {
                let css_value = if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
                    format!("{value}px")
                } else {
                    value
                };
                node.set_style_property(dimension, &css_value);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    fn run(html: &str) -> String {
        let mut tree = parse_fragment(html).unwrap();
        normalize_images(&mut tree);
        serialize_children(&tree)
    }

    #[test]
    fn test_numeric_dimensions_become_pixel_style() {
        let out = run(r#"<img src="x.png" width="300" height="200"/>"#);
        assert_eq!(
            out,
            r#"<img src="x.png" style="width: 300px; height: 200px"/>"#
        );
    }

    #[test]
    fn test_non_numeric_value_passes_through() {
        let out = run(r#"<img src="x.png" width="50%"/>"#);
        assert_eq!(out, r#"<img src="x.png" style="width: 50%"/>"#);
    }

    #[test]
    fn test_existing_style_extended() {
        let out = run(r#"<img src="x.png" style="border: none" width="10"/>"#);
        assert_eq!(
            out,
            r#"<img src="x.png" style="border: none; width: 10px"/>"#
        );
    }

    #[test]
    fn test_image_without_dimensions_untouched() {
        let html = r#"<img src="x.png"/>"#;
        assert_eq!(run(html), html);
    }

    #[test]
    fn test_non_images_untouched() {
        let html = r#"<td width="100">x</td>"#;
        assert_eq!(run(html), html);
    }
}
