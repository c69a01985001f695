//! CSS custom property generation.

use std::fmt::Write;

use serde::Deserialize;

/// Variable configuration chosen by the user.
///
/// Only variables the clipboard pipeline knows how to collapse into
/// literals belong here; any other custom property would leak a `var()`
/// reference into the pasted markup.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VariableConfig {
    /// Accent color driving headings, borders and list prefixes.
    pub primary_color: String,
    /// Foreground text color as an `H S% L%` triple for `hsl()` wrapping.
    pub foreground: String,
    /// Blockquote fill color.
    pub blockquote_background: String,
}

impl Default for VariableConfig {
    fn default() -> Self {
        Self {
            primary_color: "#0F4C81".to_owned(),
            foreground: "0 0% 25%".to_owned(),
            blockquote_background: "#f7f7f7".to_owned(),
        }
    }
}

impl VariableConfig {
    /// Render the `:root` declaration block consumed by the theme CSS.
    #[must_use]
    pub fn declarations(&self) -> String {
        let mut out = String::from(":root {\n");
        writeln!(out, "  --md-primary-color: {};", self.primary_color).unwrap();
        writeln!(out, "  --foreground: {};", self.foreground).unwrap();
        writeln!(
            out,
            "  --blockquote-background: {};",
            self.blockquote_background
        )
        .unwrap();
        out.push('}');
        out
    }
}
