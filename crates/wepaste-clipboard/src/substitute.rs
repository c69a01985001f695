//! Literal substitution over serialized markup.
//!
//! After CSS inlining the markup still carries constructs the destination
//! editor mangles: `top:` offsets (re-flowed), CSS custom property
//! references (collapsed to nothing), and the extra paragraph the diagram
//! renderer puts inside label spans. These are textual rewrites over the
//! serialized tree, applied between the structural passes.

use std::sync::LazyLock;

use regex::Regex;

/// Relative `top:` offsets, excluding `margin-top:` and friends.
static TOP_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^-])top:(.*?)em").expect("invalid top offset regex"));

static FOREGROUND_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hsl\(var\(--foreground\)\)").expect("invalid foreground regex")
});

static BLOCKQUOTE_BG_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\(--blockquote-background\)").expect("invalid blockquote background regex")
});

static PRIMARY_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"var\(--md-primary-color\)").expect("invalid primary var regex"));

static PRIMARY_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--md-primary-color:.+?;").expect("invalid primary decl regex"));

static NODE_LABEL_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="nodeLabel"([^>]*)><p[^>]*>(.*?)</p></span>"#)
        .expect("invalid node label regex")
});

static EDGE_LABEL_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="edgeLabel"([^>]*)><p[^>]*>(.*?)</p></span>"#)
        .expect("invalid edge label regex")
});

static TSPAN_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<tspan([^>]*)>").expect("invalid tspan regex"));

/// Default foreground color substituted for the foreground variable.
const FOREGROUND_LITERAL: &str = "#3f3f3f";
/// Default blockquote fill substituted for its variable.
const BLOCKQUOTE_BG_LITERAL: &str = "#f7f7f7";

/// Apply the literal rewrites. `primary_color` replaces every reference to
/// the primary-color variable; the variable's own declarations are removed
/// entirely.
#[must_use]
pub fn substitute_literals(html: &str, primary_color: &str) -> String {
    let html = TOP_OFFSET.replace_all(html, "${1}transform: translateY(${2}em)");
    let html = FOREGROUND_VAR.replace_all(&html, FOREGROUND_LITERAL);
    let html = BLOCKQUOTE_BG_VAR.replace_all(&html, BLOCKQUOTE_BG_LITERAL);
    let html = PRIMARY_VAR.replace_all(&html, |_: &regex::Captures| primary_color.to_owned());
    let html = PRIMARY_DECL.replace_all(&html, "");
    let html = NODE_LABEL_PARAGRAPH.replace_all(&html, r#"<span class="nodeLabel"${1}>${2}</span>"#);
    let html = EDGE_LABEL_PARAGRAPH.replace_all(&html, r#"<span class="edgeLabel"${1}>${2}</span>"#);
    html.into_owned()
}

/// Force text color on diagram text runs whose fill is overridden by a
/// stroke artifact.
#[must_use]
pub fn fix_tspan_colors(html: &str) -> String {
    TSPAN_OPEN
        .replace_all(
            html,
            r#"<tspan${1} style="fill: #333333 !important; color: #333333 !important; stroke: none !important;">"#,
        )
        .into_owned()
}
