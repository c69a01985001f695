//! Markdown to class-annotated HTML.
//!
//! The renderer walks pulldown-cmark events with a stack of capture buffers:
//! constructs that need their finished inner HTML before they can be wrapped
//! (headings, paragraphs, list items, links, table cells...) push a scope on
//! start and wrap the captured buffer on end. Cross-cutting state (footnotes,
//! list counters) lives in a [`RenderContext`] constructed fresh for every
//! `render` call, so a previous document can never leak numbering into the
//! next one.

use std::fmt::Write;
use std::sync::{Arc, LazyLock};

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::diagram::DiagramScheduler;
use crate::footnote::{Footnote, FootnoteRegistry, build_footnotes};
use crate::front_matter::{ReadingStats, parse_document};
use crate::highlight::{ClassHighlighter, SyntaxHighlighter, format_line_numbers};
use crate::list::ListStack;
use crate::style::{escape_html, styled, styled_as};

/// Decorative backdrop prefixed into depth-1 headings.
const H1_BACKDROP_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 180" style="position: absolute; top: 0; left: 0; width: 100%; height: 100%; z-index: -1;"><path d="m458.3 27.2-5.7-.4c-14.7-1.6-29.2-3.5-45.8-5-27.2-3.2-52 1-93.8-4.1-4.8-.5-1.6 1.1-22 1.1-40-.1-108-6-151.2-10.5-27.7-3.1-57.2-4.7-83.4 4.8l-4.2 2.1q-10.6-.3-21.1 1.7c-1.5.3-2.5 1.4-3.6 2.4-1.9 2 1 4.9-2.4 5.9-1.7.6-3.6.9-4.9 2.2-1 1-.9 2.7-1.9 3.8-.5.7-1.5 1.3-1.3 2.2s1.8.6 2.4 1q.4.4.8 1.1 1 .9 1.8 2.1.7 1.3 2.4 1.5c.5.3 6.6.8 4.1 1.3-11.2 2.1-7.1.6-16.6 1-.9 0-2 .3-2.4 1.2-.9 2.1 1.7 5-.8 6.5-2 .6-1.6 2.8-1.6 4.4 0 2-.5 3.3-.5 5.2 0 1.4.5 2.7.6 4 .3 3 .5 4.3 5.2 5.9q2.1.4 2.9 1.9c.4 1.1.2 2.2.4 3.3.6 4.6 4.9 1.4 5.3 5.6q.4 1.7-.5 2.2-1.1.3-1.6 1.2c-.6 1.3.4 3.3 0 4.6s-1.4 2.7 0 3.8c.7.7 2.3 1 2.5 1.4.2.9-3.5.9-2.9 3.7.2 1.7-1.1 2.3-2.8 3-1.3.6-2.5 1-2.7 2.1 0 1.3 0 2.9.8 4 2.5 2 6.1 2.9 9.1 4 1.8 1.5 6.4 2.6-.4 6.4-9.1.1-9.6-.5-11.6 2.7-1.2 2-.6 4.6-.6 6.9 0 1.9.7 3.8.9 5.7.6 3.5 2.3 2.5 4.1 3.5 1.2.7 1.9 1.9 0 1.5s-4.1.2-4 2.4q.2 1.3.2 2.5c-.4 1.6-2.2 1.8-.7 6.1.7 1.6 1.3 3.5 2.8 4.2 1.3.6 3 .2 4.2.9 1.1.5 2.1 2.4 1.5 3.6-.4.6-1.4.6-2.1.8-2 .6-2.2 2.5-4.5 2-2.6-.2-2.5 1.2-1.3 3.2q1 1.7 2.9 1.9c7.2 1.1 14.6 2.7 21.9 2.1q3.6.4 7.1.6c63 5.4 59.3 5.3 71.2 5.5 2.1-.9-1.2-6.7 2.7-8.1 7.5-2.4 13.4 7.6 20.8 6.5 3.4-.5.9-6.5 4.3-5 5.5 2.4 11.1 5.6 16.9 8.1q1.4.5 2.9.5 17.2 0 34.6-.9c3-.3.7-4.4 4.2-4.8 6.8-1 19.1 5 22.5 1.8 1.4-1.2.7-3.6 3.3-3.3 3.3.3 6.1 2.1 9.3 1.6 5.3-.8 10.6-2.4 16-2.7 24.2-.3 45.9-6.1 70.1-9 25.8-.6 34.1-.5 59.4-5h1.4c.8.2 1.6.1 4.8 0 18.5-.3 17.4 1.2 20.2-.3.8-.6 1.1-1.2 1.9-1.2 3.2 0 8.1.6 15.4.6 1.6 0 3.4.2 4.8-.7 1.2-1 .9-2 3.2-2 10.2.1 11.6 0 12.5-.6s.5-1.8-.5-2.1c-9.5-1-22.9-.2-28.3-.8-1.1 0-1.6-1.7-.8-2.4 3.5-3.6 7.1-3.8 12.5-4.1q2.8-.2 5.3-.9c4-1.4 1.7-2.9-1.6-3-3.8-.3-8.4.4-12-1.4q-.7-.6-.3-1.7 19.8-1.5 39.8-.9 3.5-.1 4.9-2.5h1c3.3 0 5.1-2.2 5.6-4.6q.7-.2.8-.9v-4.4c.4-.5.4-1.5-1-1.6-.8-.4-3.3-.4-4.2-.4-1.3-.1-1.3-.2-1.5 0l-9-.4c.3-.9.4-1.7 1.4-1.9 1.3-.3 3.5 0 4.5-1 .7-.7 1.2-1.7 2.3-1.8 5.2-.5 6.8-.1 8.1-1.5.8-.9 1.9-2.2 1.7-3.2q-.2-.6.3-.4c3.4-.3 9.5 0 10.9-.8 1-.5.8-1.7 0-2.1l-.3-.1h-.2c-1.4-.4-3.1 0-4.5-.3q-.6-.2-.2-1.1.5-1.5-1-2c-3.5-.4-6.8.5-10.4.4-3.3 0-7.1.8-10.3-.2-.2 0-.8-.2-.7-.4 0-.3.9-.3 1.9-.3 1.4 0 3.4-1.1 1.9-2.4q-.7-.4-1.5-.4h-4.6q1 0 1.1-.3h1c.7 0 1.2-.9.9-1.5l.2-.5q0-.4-.3-.7l-.6-.3c-.9-.5-9.5.8-16.8-.2l1.8-.2c1-.1 3-.4 3.2-1.3 0-2.9 0-1.7-.3-3.8.4-.4 1.4-1.1.9-1.5-.6-.5-3.4-1.5-4.2-1.5 1.5-.5 2.9 0 4.4-.4q4.9-.5 9.8-.6c1.3 0 1.2-1.8 0-2h-.4c7.9-.6 10.5-.2 11-1.8.3-2-2.3-1.6-3.4-1.9q-.2-.2 0-.5 1.8-2.2-.2-3c-5.1-1-10.4-.8-15.5-1.6l.1-.1 1.5-.1q5.2-.3 10.3-1c.9-.2 2.1-.5 2.2-1.5 0-.8-.7-1.3-1.2-1.8-.7-.8 0-2.7-1-3.4q-.9-.7-2.1-.7l-9.1-.5q0-.4-.3-.8 3.2-.1 6.4-.6l10.1-.2c1.5.4 3.4.4 6.5 0 2 0 4.2.6 6-.1 2.7-1.2-1.4-6.1 2.3-5.9l7.7-.1q2.2-.1 3.2-2c.5-.9 1-2.2 0-3q-1-.7-2.6-.9-1.6-.4-.4-.6c1.2-.2 3.1-.1 3.4-1.7q.3-1.6.5-3.1c.4-1.9 1.4-3.4 1.3-5.3-.4-2.8 0-5.9-1.7-8.1-1-1-2.8-.9-4.4-1.1l-7.1-.7c-8.3-.6-13.6-.5-21.8-1.2Z" fill="rgb(0, 0, 0)" class="md-h1-svg-path"></path></svg>"##;

/// Mac-style window dots shown in the code block header.
const MAC_CODE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" x="0px" y="0px" width="45px" height="13px" viewBox="0 0 450 130"><ellipse cx="50" cy="65" rx="50" ry="52" stroke="rgb(220,60,54)" stroke-width="2" fill="rgb(237,108,96)" /><ellipse cx="225" cy="65" rx="50" ry="52" stroke="rgb(218,151,33)" stroke-width="2" fill="rgb(247,193,81)" /><ellipse cx="400" cy="65" rx="50" ry="52" stroke="rgb(27,161,37)" stroke-width="2" fill="rgb(100,200,86)" /></svg>"#;

/// Matches one leading paragraph wrapper on block-rendered item content.
static LEADING_PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^<p(?:\s[^>]*)?>(.*?)</p>").expect("invalid leading paragraph regex")
});

/// Rendering configuration.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Show the word-count / reading-time block builder output.
    pub show_word_count: bool,
    /// Collect external links as numbered footnotes.
    pub cite_links: bool,
    /// Caption preference for images: dash-joined subset of `alt`, `title`.
    pub legend: Option<String>,
    /// Number code block lines.
    pub line_numbers: bool,
}

/// Result of one render pass.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// Class-annotated HTML body.
    pub html: String,
    /// Parsed front-matter metadata (empty when absent or invalid).
    pub metadata: serde_yaml::Mapping,
    /// Word count and reading time over the body.
    pub reading: ReadingStats,
    /// Footnotes collected while citation mode was on.
    pub footnotes: Vec<Footnote>,
    options: RenderOptions,
}

impl Rendered {
    /// Trailing reference block, empty without footnotes.
    #[must_use]
    pub fn footnotes_block(&self) -> String {
        build_footnotes(&self.footnotes)
    }

    /// Word-count blockquote, empty unless enabled and non-trivial.
    #[must_use]
    pub fn reading_time_block(&self) -> String {
        if !self.options.show_word_count || self.reading.words == 0 {
            return String::new();
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let minutes = self.reading.minutes.ceil() as u64;
        format!(
            r#"<blockquote class="md-blockquote"><p class="md-blockquote-p">字数 {}，阅读大约需 {minutes} 分钟</p></blockquote>"#,
            self.reading.words
        )
    }
}

/// Style block for the code block language badge pseudo-element.
#[must_use]
pub fn build_addition() -> String {
    "<style>.preview-wrapper pre::before { position: absolute; top: 0; right: 0; color: #ccc; \
     text-align: center; font-size: 0.8em; padding: 5px 10px 0; line-height: 15px; height: 15px; \
     font-weight: 600; }</style>"
        .to_owned()
}

/// Wrap a rendered body in the output container section.
#[must_use]
pub fn wrap_container(content: &str) -> String {
    styled_as("container", "section", content)
}

/// Caption text chosen by the legend mode.
///
/// Without a mode the first non-empty of alt/title wins; with a mode only
/// the listed sources are considered, in the order given.
fn legend_caption(legend: Option<&str>, alt: &str, title: &str) -> String {
    let Some(legend) = legend else {
        if !alt.is_empty() {
            return alt.to_owned();
        }
        return title.to_owned();
    };
    for option in legend.split('-') {
        if option == "alt" && !alt.is_empty() {
            return alt.to_owned();
        }
        if option == "title" && !title.is_empty() {
            return title.to_owned();
        }
    }
    String::new()
}

/// Links into the destination platform itself are kept as-is.
fn is_platform_link(href: &str) -> bool {
    href.strip_prefix("http://")
        .or_else(|| href.strip_prefix("https://"))
        .is_some_and(|rest| rest.starts_with("mp.weixin.qq.com"))
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Open construct awaiting its captured inner HTML.
#[derive(Debug)]
enum Scope {
    Paragraph,
    Heading { depth: u8 },
    Blockquote,
    List { ordered: bool },
    Item,
    Strong,
    Emphasis,
    Strikethrough,
    Link { href: String, title: String },
    Image { src: String, title: String },
    Table,
    TableHead,
    TableRow,
    TableCell,
}

/// Code fence capture buffer.
struct CodeCapture {
    lang: Option<String>,
    buffer: String,
}

/// Per-render mutable state.
struct RenderContext {
    out: String,
    scopes: Vec<(Scope, String)>,
    footnotes: FootnoteRegistry,
    lists: ListStack,
    code: Option<CodeCapture>,
    table_head: String,
    in_table_head: bool,
}

impl RenderContext {
    fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
            scopes: Vec::new(),
            footnotes: FootnoteRegistry::new(),
            lists: ListStack::new(),
            code: None,
            table_head: String::new(),
            in_table_head: false,
        }
    }

    /// Buffer currently receiving output.
    fn sink(&mut self) -> &mut String {
        match self.scopes.last_mut() {
            Some((_, buf)) => buf,
            None => &mut self.out,
        }
    }

    fn open(&mut self, scope: Scope) {
        self.scopes.push((scope, String::new()));
    }

    fn close(&mut self) -> (Scope, String) {
        self.scopes.pop().expect("event stream is balanced")
    }
}

/// Markdown renderer.
///
/// Holds configuration and collaborators only; all per-document state lives
/// in the context created by [`render`](Self::render).
pub struct Renderer<H: SyntaxHighlighter = ClassHighlighter> {
    options: RenderOptions,
    highlighter: H,
    diagrams: Option<Arc<DiagramScheduler>>,
}

impl Renderer<ClassHighlighter> {
    /// Create a renderer with the default class-emitting highlighter.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            highlighter: ClassHighlighter,
            diagrams: None,
        }
    }
}

impl<H: SyntaxHighlighter> Renderer<H> {
    /// Create a renderer with a custom highlighter.
    pub fn with_highlighter(options: RenderOptions, highlighter: H) -> Self {
        Self {
            options,
            highlighter,
            diagrams: None,
        }
    }

    /// Attach a diagram scheduler armed by every mermaid fence.
    #[must_use]
    pub fn with_diagram_scheduler(mut self, scheduler: Arc<DiagramScheduler>) -> Self {
        self.diagrams = Some(scheduler);
        self
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a Markdown document (front matter included) to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> Rendered {
        let doc = parse_document(markdown);
        let mut ctx = RenderContext::new();

        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        for event in Parser::new_ext(&doc.body, options) {
            self.process_event(&mut ctx, event);
        }

        Rendered {
            html: ctx.out,
            metadata: doc.metadata,
            reading: doc.reading,
            footnotes: ctx.footnotes.take(),
            options: self.options.clone(),
        }
    }

    fn process_event(&self, ctx: &mut RenderContext, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(ctx, tag),
            Event::End(tag) => self.end_tag(ctx, tag),
            Event::Text(text) => {
                if let Some(code) = &mut ctx.code {
                    code.buffer.push_str(&text);
                } else {
                    let escaped = escape_html(&text);
                    ctx.sink().push_str(&escaped);
                }
            }
            Event::Code(code) => {
                let html = styled_as("codespan", "code", &escape_html(&code));
                ctx.sink().push_str(&html);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                ctx.sink().push_str(&html);
            }
            Event::SoftBreak => {
                if let Some(code) = &mut ctx.code {
                    code.buffer.push('\n');
                } else {
                    // The source renderer runs with breaks enabled; single
                    // newlines are visible line breaks.
                    ctx.sink().push_str("<br/>");
                }
            }
            Event::HardBreak => {
                ctx.sink().push_str("<br/>");
            }
            Event::Rule => {
                let html = styled("hr", "");
                ctx.sink().push_str(&html);
            }
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&self, ctx: &mut RenderContext, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => ctx.open(Scope::Paragraph),
            Tag::Heading { level, .. } => ctx.open(Scope::Heading {
                depth: heading_depth(level),
            }),
            Tag::BlockQuote(_) => ctx.open(Scope::Blockquote),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => Some(info.to_string()),
                    _ => None,
                };
                ctx.code = Some(CodeCapture {
                    lang,
                    buffer: String::new(),
                });
            }
            Tag::List(start) => {
                ctx.lists.push(start.is_some(), start);
                ctx.open(Scope::List {
                    ordered: start.is_some(),
                });
            }
            Tag::Item => ctx.open(Scope::Item),
            Tag::Table(_) => ctx.open(Scope::Table),
            Tag::TableHead => {
                ctx.in_table_head = true;
                ctx.open(Scope::TableHead);
            }
            Tag::TableRow => ctx.open(Scope::TableRow),
            Tag::TableCell => ctx.open(Scope::TableCell),
            Tag::Emphasis => ctx.open(Scope::Emphasis),
            Tag::Strong => ctx.open(Scope::Strong),
            Tag::Strikethrough => ctx.open(Scope::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => ctx.open(Scope::Link {
                href: dest_url.to_string(),
                title: title.to_string(),
            }),
            Tag::Image {
                dest_url, title, ..
            } => ctx.open(Scope::Image {
                src: dest_url.to_string(),
                title: title.to_string(),
            }),
            Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::Superscript
            | Tag::Subscript => {}
        }
    }

    #[allow(clippy::too_many_lines)]
    fn end_tag(&self, ctx: &mut RenderContext, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let (_, buf) = ctx.close();
                let is_empty = buf.trim().is_empty();
                let is_figure = buf.contains("<figure") && buf.contains("<img");
                // Floated figures and empty paragraphs stay unwrapped.
                if is_empty || is_figure {
                    ctx.sink().push_str(&buf);
                } else {
                    let html = styled("p", &buf);
                    ctx.sink().push_str(&html);
                }
            }
            TagEnd::Heading(_) => {
                let (scope, buf) = ctx.close();
                let Scope::Heading { depth } = scope else {
                    return;
                };
                let tag_name = format!("h{depth}");
                let html = if depth == 1 {
                    styled(&tag_name, &format!("{H1_BACKDROP_SVG}{buf}"))
                } else {
                    styled(&tag_name, &buf)
                };
                ctx.sink().push_str(&html);
            }
            TagEnd::BlockQuote(_) => {
                let (_, buf) = ctx.close();
                let html = styled("blockquote", &buf);
                ctx.sink().push_str(&html);
            }
            TagEnd::CodeBlock => {
                if let Some(code) = ctx.code.take() {
                    self.code_block(ctx, code.lang.as_deref(), &code.buffer);
                }
            }
            TagEnd::List(_) => {
                let (scope, buf) = ctx.close();
                ctx.lists.pop();
                let Scope::List { ordered } = scope else {
                    return;
                };
                let html = styled(if ordered { "ol" } else { "ul" }, &buf);
                ctx.sink().push_str(&html);
            }
            TagEnd::Item => {
                let (_, buf) = ctx.close();
                let prefix = ctx.lists.next_prefix();
                // Block-rendered items lose their first paragraph wrapper so
                // simple items stay on one line.
                let content = if buf.starts_with("<p") {
                    LEADING_PARAGRAPH.replace(&buf, "$1").into_owned()
                } else {
                    buf
                };
                let inner = format!(
                    "{}{content}",
                    styled_as("list_prefix", "span", &prefix)
                );
                let html = styled_as("listitem", "li", &inner);
                ctx.sink().push_str(&html);
            }
            TagEnd::Table => {
                let (_, rows) = ctx.close();
                let head = std::mem::take(&mut ctx.table_head);
                let html = format!(
                    r#"<section style="max-width: 100%; overflow: auto"><table class="preview-table"><thead>{head}</thead><tbody>{rows}</tbody></table></section>"#
                );
                ctx.sink().push_str(&html);
            }
            TagEnd::TableHead => {
                let (_, buf) = ctx.close();
                ctx.table_head = buf;
                ctx.in_table_head = false;
            }
            TagEnd::TableRow => {
                let (_, buf) = ctx.close();
                let html = styled("tr", &buf);
                ctx.sink().push_str(&html);
            }
            TagEnd::TableCell => {
                let (_, buf) = ctx.close();
                let html = if ctx.in_table_head {
                    styled("th", &buf)
                } else {
                    styled("td", &buf)
                };
                ctx.sink().push_str(&html);
            }
            TagEnd::Emphasis => {
                let (_, buf) = ctx.close();
                let html = styled("em", &buf);
                ctx.sink().push_str(&html);
            }
            TagEnd::Strong => {
                let (_, buf) = ctx.close();
                let html = styled("strong", &buf);
                ctx.sink().push_str(&html);
            }
            TagEnd::Strikethrough => {
                let (_, buf) = ctx.close();
                let html = styled("del", &buf);
                ctx.sink().push_str(&html);
            }
            TagEnd::Link => {
                let (scope, text) = ctx.close();
                let Scope::Link { href, title } = scope else {
                    return;
                };
                let html = self.link(ctx, &href, &title, &text);
                ctx.sink().push_str(&html);
            }
            TagEnd::Image => {
                let (scope, alt) = ctx.close();
                let Scope::Image { src, title } = scope else {
                    return;
                };
                let caption = legend_caption(self.options.legend.as_deref(), &alt, &title);
                let figcaption = styled("figcaption", &caption);
                let html = format!(
                    r#"<figure><img src="{src}" title="{title}" alt="{alt}"/>{figcaption}</figure>"#
                );
                ctx.sink().push_str(&html);
            }
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::Superscript
            | TagEnd::Subscript => {}
        }
    }

    fn link(&self, ctx: &mut RenderContext, href: &str, title: &str, text: &str) -> String {
        let title_attr = if title.is_empty() { text } else { title };
        if is_platform_link(href) {
            return format!(r#"<a href="{href}" title="{title_attr}">{text}</a>"#);
        }
        // A link whose visible text is the URL itself reads better as text.
        if text == href {
            return text.to_owned();
        }
        if self.options.cite_links {
            let index = ctx.footnotes.add(title_attr, href);
            return format!(
                r#"<a href="{href}" title="{title_attr}">{text}<sup>[{index}]</sup></a>"#
            );
        }
        format!(r#"<a href="{href}" title="{title_attr}">{text}</a>"#)
    }

    fn code_block(&self, ctx: &mut RenderContext, lang: Option<&str>, text: &str) {
        let lang = lang.unwrap_or_default();
        if lang.starts_with("mermaid") {
            if let Some(scheduler) = &self.diagrams {
                scheduler.schedule();
            }
            let html = format!(r#"<pre class="mermaid">{}</pre>"#, escape_html(text));
            ctx.sink().push_str(&html);
            return;
        }

        let lang_token = lang.split_whitespace().next().unwrap_or("plaintext");
        let lang_token = if lang_token.is_empty() {
            "plaintext"
        } else {
            lang_token
        };
        let registered = self.highlighter.is_registered(lang_token);
        let language = if registered { lang_token } else { "plaintext" };

        let mut highlighted = self.highlighter.highlight(text, language);
        if self.options.line_numbers {
            highlighted = format_line_numbers(&highlighted);
        }

        // Unregistered languages keep the raw source on the element so a
        // dynamic grammar loader can re-highlight without re-parsing.
        let mut pending_attr = String::new();
        if !registered && lang_token != "plaintext" {
            write!(
                pending_attr,
                r#" data-language-pending="{lang_token}" data-raw-code="{}" data-show-line-number="{}""#,
                escape_html(text),
                self.options.line_numbers
            )
            .unwrap();
        }

        let html = format!(
            r#"<pre class="hljs code__pre"><span class="mac-sign" style="padding: 10px 14px 0;">{MAC_CODE_SVG}</span><code class="language-{lang_token}"{pending_attr}>{highlighted}</code></pre>"#
        );
        ctx.sink().push_str(&html);
    }
}
