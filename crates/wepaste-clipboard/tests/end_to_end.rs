//! End-to-end: markdown → rendered preview → paste-ready clipboard markup.

use pretty_assertions::assert_eq;
use wepaste_clipboard::{PipelineOptions, parse_fragment, process_clipboard};
use wepaste_renderer::{RenderOptions, Renderer};
use wepaste_theme::{ThemeRegistry, VariableConfig};

fn render(markdown: &str) -> String {
    Renderer::new(RenderOptions::default()).render(markdown).html
}

fn process(html: &str) -> String {
    process_clipboard(html, "", &PipelineOptions::default()).unwrap()
}

/// Collect the text of every flattened line record, in document order.
fn flattened_lines(output: &str) -> Vec<String> {
    let tree = parse_fragment(output).unwrap();
    let mut lines = Vec::new();
    tree.walk(&mut |node| {
        if node.attr("data-wx-line").is_some() {
            lines.push(node.text_content());
        }
    });
    lines
}

#[test]
fn nested_unordered_list_flattens_in_order() {
    let html = render("- a\n  - b\n  - c\n- d");
    let out = process(&html);
    let lines = flattened_lines(&out);

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
    assert!(!out.contains("<ul"));
    assert!(!out.contains("<li"));
}

#[test]
fn ordered_list_prefixes_live_and_flattened() {
    let html = render("1. x\n2. y");
    // Live render shows the renderer's own numeral badges.
    assert!(html.contains(r#"<span class="md-list-prefix">1</span>x"#));
    assert!(html.contains(r#"<span class="md-list-prefix">2</span>y"#));

    let lines = flattened_lines(&process(&html));
    assert_eq!(lines, vec!["1. x", "2. y"]);
}

#[test]
fn item_count_is_preserved() {
    let markdown = "- one\n- two\n  - three\n    - four\n- five";
    let html = render(markdown);
    let rendered_items = html.matches("<li").count();
    let lines = flattened_lines(&process(&html));
    assert_eq!(rendered_items, 5);
    assert_eq!(lines.len(), 5);
}

#[test]
fn primary_color_variable_fully_substituted() {
    let registry = ThemeRegistry::new();
    let theme_css = registry.compose("default", None, &VariableConfig::default());
    assert!(theme_css.contains("--md-primary-color"));

    let html = render("# Title\n\n**bold** and *em*\n\n> quote");
    let options = PipelineOptions {
        primary_color: "#e91e63".to_owned(),
        ..PipelineOptions::default()
    };
    let out = process_clipboard(&html, &theme_css, &options).unwrap();

    assert!(!out.contains("--md-primary-color"));
    assert!(!out.contains("var(--md-primary-color)"));
    assert!(out.contains("#e91e63"));
}

#[test]
fn theme_styles_arrive_as_inline_styles() {
    let registry = ThemeRegistry::new();
    let theme_css = registry.compose("default", None, &VariableConfig::default());
    let html = render("**important**");
    let out = process_clipboard(&html, &theme_css, &PipelineOptions::default()).unwrap();

    assert!(!out.contains("<style>"));
    // The strong element picked up the theme's weight rule.
    let tree = parse_fragment(&out).unwrap();
    let mut strong_style = None;
    tree.walk(&mut |node| {
        if node.tag == "strong" {
            strong_style = node.attr("style").map(str::to_owned);
        }
    });
    let style = strong_style.expect("strong element present");
    assert!(style.contains("font-weight: 700"));
}

#[test]
fn emphasis_inside_flattened_lines_is_inline() {
    let registry = ThemeRegistry::new();
    let theme_css = registry.compose("default", None, &VariableConfig::default());
    let html = render("- plain **bold** tail");
    let out = process_clipboard(&html, &theme_css, &PipelineOptions::default()).unwrap();

    let tree = parse_fragment(&out).unwrap();
    let mut found = false;
    tree.walk(&mut |node| {
        if node.tag == "strong" {
            found = true;
            let style = node.attr("style").unwrap_or_default();
            assert!(style.contains("display: inline"));
        }
    });
    assert!(found);
}

#[test]
fn sentinels_padding_full_document() {
    let html = render("# Doc\n\nBody");
    let out = process(&html);
    assert!(out.starts_with(r#"<p style="font-size: 0; line-height: 0; margin: 0;">&nbsp;</p>"#));
    assert!(out.ends_with(r#"<p style="font-size: 0; line-height: 0; margin: 0;">&nbsp;</p>"#));
}

#[test]
fn code_blocks_pass_through_flattening() {
    let html = render("```rust\nlet x = vec![1, 2];\n```\n\n- item");
    let out = process(&html);
    assert!(out.contains("let x = vec![1, 2];"));
    assert!(out.contains("• item"));
}

#[test]
fn footnote_block_survives_pipeline() {
    let options = RenderOptions {
        cite_links: true,
        ..RenderOptions::default()
    };
    let renderer = Renderer::new(options);
    let result = renderer.render("See [docs](https://docs.example).");
    let full = format!("{}{}", result.html, result.footnotes_block());
    let out = process(&full);
    assert!(out.contains("引用链接"));
    assert!(out.contains("https://docs.example"));
}
