//! Class-annotated element construction.
//!
//! Every element the renderer emits goes through [`styled`] or [`styled_as`]
//! so the whole document shares one `md-*` class naming scheme that the
//! theme stylesheets target.

/// Wrap `inner` in an element whose tag equals the style label.
///
/// The label doubles as the tag name for plain HTML constructs
/// (`p`, `blockquote`, `h1`...).
#[must_use]
pub fn styled(label: &str, inner: &str) -> String {
    styled_as(label, label, inner)
}

/// Wrap `inner` in `tag`, annotated with the `md-<label>` class.
///
/// Underscores in the label become hyphens in the class name. Heading tags
/// additionally carry `data-heading="true"` so the clipboard phase can find
/// them after classes are inlined away.
#[must_use]
pub fn styled_as(label: &str, tag: &str, inner: &str) -> String {
    let class_name = format!("md-{}", label.replace('_', "-"));
    let heading_attr = if is_heading_tag(tag) {
        r#" data-heading="true""#
    } else {
        ""
    };
    format!(r#"<{tag} class="{class_name}"{heading_attr}>{inner}</{tag}>"#)
}

fn is_heading_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    chars.next() == Some('h')
        && chars.next().is_some_and(|c| c.is_ascii_digit())
        && chars.next().is_none()
}

/// Escape HTML special characters.
///
/// Escapes the backtick as well so escaped code spans cannot terminate a
/// surrounding template fragment in the destination editor.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            '`' => result.push_str("&#96;"),
            _ => result.push(c),
        }
    }
    result
}
