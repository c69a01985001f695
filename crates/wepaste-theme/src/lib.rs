//! Theme registry and CSS composition for the preview container.
//!
//! A theme is an opaque stylesheet text targeting the renderer's `md-*`
//! classes. Composition always starts from the default theme, layers the
//! selected theme and user CSS on top (later rules win on the cascade),
//! scopes the merged result to the preview container, and runs a small
//! `calc()` simplifier last.

mod scope;
mod simplify;
mod variables;

use std::collections::HashMap;

pub use scope::{strip_scope, wrap_with_scope};
pub use simplify::simplify_css;
pub use variables::VariableConfig;

/// Selector of the preview container all theme rules are scoped under.
pub const OUTPUT_SCOPE: &str = "#output";

/// Base styles applied globally, outside the theme scope.
const BASE_CSS: &str = include_str!("themes/base.css");
/// The default theme every composition starts from.
const DEFAULT_CSS: &str = include_str!("themes/default.css");
const GRACE_CSS: &str = include_str!("themes/grace.css");
const SIMPLE_CSS: &str = include_str!("themes/simple.css");

/// Maps theme identifiers to stylesheet text.
#[derive(Clone, Debug)]
pub struct ThemeRegistry {
    themes: HashMap<String, String>,
}

impl ThemeRegistry {
    /// Registry preloaded with the built-in themes.
    #[must_use]
    pub fn new() -> Self {
        let mut themes = HashMap::new();
        themes.insert("default".to_owned(), DEFAULT_CSS.to_owned());
        themes.insert("grace".to_owned(), GRACE_CSS.to_owned());
        themes.insert("simple".to_owned(), SIMPLE_CSS.to_owned());
        Self { themes }
    }

    /// Stylesheet text for `id`, if registered.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&str> {
        self.themes.get(id).map(String::as_str)
    }

    /// Unscoped base stylesheet text.
    #[must_use]
    pub fn base(&self) -> &str {
        BASE_CSS
    }

    /// Register or replace a theme.
    pub fn insert(&mut self, id: impl Into<String>, css: impl Into<String>) {
        self.themes.insert(id.into(), css.into());
    }

    /// Registered theme identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.themes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Compose the full stylesheet for a theme selection.
    ///
    /// Order is fixed: generated variables, base styles (both unscoped),
    /// then the scoped merge of default theme, selected theme and custom
    /// CSS. The selected theme is appended *after* the default so its rules
    /// win specificity ties; user CSS is appended last for the same reason.
    #[must_use]
    pub fn compose(
        &self,
        theme_id: &str,
        custom_css: Option<&str>,
        vars: &VariableConfig,
    ) -> String {
        let mut theme_css = DEFAULT_CSS.to_owned();
        if theme_id != "default" {
            if let Some(css) = self.resolve(theme_id) {
                theme_css.push_str("\n\n");
                theme_css.push_str(css);
            }
        }
        if let Some(custom) = custom_css {
            if !custom.trim().is_empty() {
                theme_css.push_str("\n\n");
                theme_css.push_str(custom);
            }
        }

        let merged = [
            vars.declarations(),
            BASE_CSS.to_owned(),
            wrap_with_scope(&theme_css, OUTPUT_SCOPE),
        ]
        .join("\n\n");

        simplify_css(&merged)
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_builtin() {
        let registry = ThemeRegistry::new();
        assert!(registry.resolve("default").is_some());
        assert!(registry.resolve("grace").is_some());
        assert!(registry.resolve("nope").is_none());
    }

    #[test]
    fn test_insert_user_theme() {
        let mut registry = ThemeRegistry::new();
        registry.insert("mine", ".md-p { color: pink; }");
        assert_eq!(registry.resolve("mine"), Some(".md-p { color: pink; }"));
    }

    #[test]
    fn test_compose_order() {
        let registry = ThemeRegistry::new();
        let css = registry.compose("grace", Some(".md-p { color: blue; }"), &VariableConfig::default());

        let vars_at = css.find("--md-primary-color").unwrap();
        let custom_at = css.find("color: blue").unwrap();
        assert!(vars_at < custom_at);
        // Custom CSS is scoped to the container.
        assert!(css.contains("#output .md-p { color: blue; }"));
    }

    #[test]
    fn test_compose_unknown_theme_falls_back_to_default() {
        let registry = ThemeRegistry::new();
        let with_unknown = registry.compose("missing", None, &VariableConfig::default());
        let with_default = registry.compose("default", None, &VariableConfig::default());
        assert_eq!(with_unknown, with_default);
    }

    #[test]
    fn test_compose_simplifies_calc() {
        let registry = ThemeRegistry::new();
        let css = registry.compose(
            "default",
            Some(".md-h2 { margin: calc(8px + 8px); }"),
            &VariableConfig::default(),
        );
        assert!(css.contains("margin: 16px;"));
    }

    #[test]
    fn test_variables_unscoped() {
        let registry = ThemeRegistry::new();
        let css = registry.compose("default", None, &VariableConfig::default());
        assert!(css.contains(":root {"));
        assert!(!css.contains("#output :root"));
    }
}
