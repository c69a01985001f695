//! Preview HTML parser.
//!
//! Parses the rendered fragment into [`TreeNode`]s. Input comes from our own
//! renderer (which self-closes void elements) plus whatever the diagram
//! renderer injected, so the parser is lenient: mismatched end tags are
//! skipped, void elements never capture content, and named HTML entities are
//! converted to Unicode before parsing.

use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use super::entities::convert_html_entities;
use super::serializer::is_void_element;
use super::tree::TreeNode;
use crate::error::ClipboardError;

/// Void element start tags in HTML form (no closing slash).
static VOID_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(area|base|br|col|embed|hr|img|input|link|meta|source|track|wbr)\b([^>]*?)\s*/?>")
        .expect("invalid void tag regex")
});

/// Parse an HTML fragment into a tree rooted at a synthetic wrapper node.
pub fn parse_fragment(html: &str) -> Result<TreeNode, ClipboardError> {
    let html = convert_html_entities(html);
    // Raw HTML passed through from markdown may use bare void tags.
    let html = VOID_TAG.replace_all(&html, "<$1$2/>");
    let wrapped = format!("<root>{html}</root>");

    let mut reader = Reader::from_str(&wrapped);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let mut root = TreeNode::new("root");
    // Consume the wrapper's start event, then its children.
    loop {
        match reader.read_event()? {
            Event::Start(e) if decode_tag(&e) == "root" => break,
            Event::Eof => return Ok(root),
            _ => {}
        }
    }
    parse_children(&mut reader, "root", &mut root)?;
    Ok(root)
}

fn parse_children(
    reader: &mut Reader<&[u8]>,
    parent_tag: &str,
    node: &mut TreeNode,
) -> Result<(), ClipboardError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = decode_tag(&e);
                let attrs = decode_attrs(&e);
                let mut child = TreeNode::new(tag.clone());
                child.attrs = attrs;
                if !is_void_element(&tag) {
                    parse_children(reader, &tag, &mut child)?;
                }
                node.children.push(child);
            }
            Event::Empty(e) => {
                let mut child = TreeNode::new(decode_tag(&e));
                child.attrs = decode_attrs(&e);
                node.children.push(child);
            }
            Event::Text(e) => {
                let text = reader.decoder().decode(&e)?.into_owned();
                append_text(node, &text);
            }
            Event::GeneralRef(e) => {
                let entity = reader.decoder().decode(&e)?.into_owned();
                append_text(node, &decode_entity(&entity));
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_text(node, &text);
            }
            Event::End(e) => {
                let end_tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if end_tag == parent_tag {
                    return Ok(());
                }
                // Stray end tag (unclosed void or sloppy input): skip it.
            }
            Event::Eof => return Ok(()),
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }
}

fn decode_tag(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn decode_attrs(e: &BytesStart<'_>) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        attrs.push((key, value));
    }
    attrs
}

/// Append text to the node's text or the last child's tail.
fn append_text(node: &mut TreeNode, text: &str) {
    if let Some(last_child) = node.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        node.text.push_str(text);
    }
}

/// Decode XML entity references to their character values.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}
