//! Selector scoping.
//!
//! Theme stylesheets are written against bare element selectors; before
//! injection every top-level selector is prefixed with the preview container
//! selector so themes cannot leak into the surrounding page. This is a pure
//! text transform over the stylesheet, not a browser mechanism, so the same
//! code also strips the prefix again for the clipboard phase.

use std::sync::LazyLock;

use regex::Regex;

static SCOPE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#output\s+").expect("invalid scope prefix regex"));
static SCOPE_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#output\s*").expect("invalid bare scope regex"));
static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid comment regex"));

/// Prefix every top-level selector in `css` with `scope`.
///
/// Comments are dropped first so they cannot stick to a selector. Comma
/// separated selector lists are prefixed per selector. Conditional at-rules
/// (`@media`, `@supports`) are recursed into; other at-rules (`@import`,
/// `@font-face`, `@keyframes`) pass through untouched. Selectors already
/// carrying the scope are left alone, and `:root` collapses onto the scope
/// element itself.
#[must_use]
pub fn wrap_with_scope(css: &str, scope: &str) -> String {
    let css = CSS_COMMENT.replace_all(css, "").into_owned();
    let mut out = String::with_capacity(css.len() + css.len() / 4);
    let mut rest = css.as_str();

    while let Some(brace) = rest.find('{') {
        let prelude = &rest[..brace];
        let Some(block_len) = matching_block_len(&rest[brace..]) else {
            // Unbalanced braces; emit the remainder untouched.
            out.push_str(rest);
            return out;
        };
        let body = &rest[brace + 1..brace + block_len - 1];
        rest = &rest[brace + block_len..];

        let trimmed = prelude.trim_start();
        if let Some(at_rule) = trimmed.strip_prefix('@') {
            out.push_str(prelude);
            out.push('{');
            if at_rule.starts_with("media") || at_rule.starts_with("supports") {
                out.push_str(&wrap_with_scope(body, scope));
            } else {
                out.push_str(body);
            }
            out.push('}');
        } else {
            out.push_str(&scope_selector_list(prelude, scope));
            out.push('{');
            out.push_str(body);
            out.push('}');
        }
    }

    // Trailing text after the last block (comments, stray declarations).
    out.push_str(rest);
    out
}

/// Byte length of the block starting at a `{`, braces balanced, including
/// both delimiters. `None` when unbalanced.
fn matching_block_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn scope_selector_list(prelude: &str, scope: &str) -> String {
    let leading_len = prelude.len() - prelude.trim_start().len();
    let leading = &prelude[..leading_len];
    let selectors = prelude.trim();

    let scoped = selectors
        .split(',')
        .map(|selector| {
            let selector = selector.trim();
            if selector.is_empty() || selector.starts_with(scope) {
                selector.to_owned()
            } else if selector == ":root" {
                scope.to_owned()
            } else {
                format!("{scope} {selector}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{leading}{scoped} ")
}

/// Remove the container scope again for markup copied out of the preview.
#[must_use]
pub fn strip_scope(css: &str) -> String {
    let without_descendants = SCOPE_PREFIX.replace_all(css, "");
    SCOPE_BARE.replace_all(&without_descendants, "").into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_simple_selector() {
        let scoped = wrap_with_scope("h1 { color: red; }", "#output");
        assert_eq!(scoped, "#output h1 { color: red; }");
    }

    #[test]
    fn test_selector_list() {
        let scoped = wrap_with_scope("h1, h2 { margin: 0; }", "#output");
        assert_eq!(scoped, "#output h1, #output h2 { margin: 0; }");
    }

    #[test]
    fn test_already_scoped_untouched() {
        let scoped = wrap_with_scope("#output .md-p { margin: 0; }", "#output");
        assert_eq!(scoped, "#output .md-p { margin: 0; }");
    }

    #[test]
    fn test_root_collapses_to_scope() {
        let scoped = wrap_with_scope(":root { --x: 1; }", "#output");
        assert_eq!(scoped, "#output { --x: 1; }");
    }

    #[test]
    fn test_media_query_recursed() {
        let scoped = wrap_with_scope("@media (max-width: 600px) { p { margin: 0; } }", "#output");
        assert!(scoped.starts_with("@media (max-width: 600px) {"));
        assert!(scoped.contains("#output p { margin: 0; }"));
    }

    #[test]
    fn test_keyframes_untouched() {
        let css = "@keyframes spin { from { transform: none; } }";
        assert_eq!(wrap_with_scope(css, "#output"), css);
    }

    #[test]
    fn test_every_top_level_rule_scoped() {
        let scoped = wrap_with_scope("p { a: 1; }\n.x > .y { b: 2; }\n", "#output");
        assert!(scoped.contains("#output p "));
        assert!(scoped.contains("#output .x > .y "));
    }

    #[test]
    fn test_comment_before_selector_dropped() {
        let scoped = wrap_with_scope("/* theme */\n.md-p { margin: 0; }", "#output");
        assert!(!scoped.contains("/*"));
        assert!(scoped.contains("#output .md-p { margin: 0; }"));
    }

    #[test]
    fn test_strip_scope_roundtrip() {
        let scoped = wrap_with_scope("h1 { color: red; }\nh2, p { margin: 0; }", "#output");
        let stripped = strip_scope(&scoped);
        assert!(!stripped.contains("#output"));
        assert!(stripped.contains("h1 "));
    }
}
