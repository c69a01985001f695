//! CSS inlining.
//!
//! The destination editor strips `<style>` blocks and class-based CSS on
//! paste, so every applicable rule must be written onto its elements as
//! inline style. Rules are collected from the `<style>` blocks inside the
//! container, matched against the tree (tag/class/id compounds, descendant
//! and child combinators), and merged per element in cascade order:
//! source order, then specificity, then `!important`, with pre-existing
//! inline declarations beating non-important rules.
//!
//! Selectors this matcher cannot express (pseudo-classes, attribute
//! selectors, sibling combinators) and conditional at-rules are skipped;
//! they could never survive the destination sanitizer anyway.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{TreeNode, join_style_declarations, parse_style_declarations};

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("invalid comment regex"));

/// A parsed declaration.
#[derive(Clone, Debug)]
struct Declaration {
    property: String,
    value: String,
    important: bool,
}

/// Combinator to the left of a compound selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One compound selector: `tag.class#id`.
#[derive(Clone, Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

/// A matchable rule.
#[derive(Clone, Debug)]
struct Rule {
    /// Compounds left to right; combinator applies between a compound and
    /// its predecessor.
    parts: Vec<(Combinator, Compound)>,
    declarations: Vec<Declaration>,
    specificity: (u32, u32, u32),
    order: usize,
}

/// Element identity snapshot used for ancestor matching.
struct ElementKey {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
}

impl ElementKey {
    fn of(node: &TreeNode) -> Self {
        Self {
            tag: node.tag.clone(),
            id: node.attr("id").map(str::to_owned),
            classes: node
                .attr("class")
                .map(|c| c.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
        }
    }
}

/// Inline every applicable `<style>` rule onto the matching elements and
/// remove the style blocks from the tree.
pub fn inline_styles(root: &mut TreeNode) {
    let css = collect_style_blocks(root);
    let rules = parse_rules(&css);
    if rules.is_empty() {
        return;
    }
    let mut ancestors = Vec::new();
    for child in &mut root.children {
        apply_rules(child, &mut ancestors, &rules);
    }
}

/// Extract and remove all `<style>` elements, returning their joined text.
fn collect_style_blocks(node: &mut TreeNode) -> String {
    let mut css = String::new();
    let mut index = 0;
    while index < node.children.len() {
        if node.children[index].tag == "style" {
            let style = node.remove_child(index);
            css.push_str(&style.text_content());
            css.push('\n');
        } else {
            css.push_str(&collect_style_blocks(&mut node.children[index]));
            index += 1;
        }
    }
    css
}

fn parse_rules(css: &str) -> Vec<Rule> {
    let css = CSS_COMMENT.replace_all(css, "");
    let mut rules = Vec::new();
    let mut order = 0;
    let mut rest = css.as_ref();

    while let Some(brace) = rest.find('{') {
        let prelude = rest[..brace].trim();
        let Some(block_len) = matching_block_len(&rest[brace..]) else {
            break;
        };
        let body = &rest[brace + 1..brace + block_len - 1];
        rest = &rest[brace + block_len..];

        // Conditional and other at-rules cannot be inlined.
        if prelude.starts_with('@') {
            continue;
        }

        let declarations = parse_declarations(body);
        if declarations.is_empty() {
            continue;
        }

        for selector in prelude.split(',') {
            if let Some((parts, specificity)) = parse_selector(selector.trim()) {
                rules.push(Rule {
                    parts,
                    declarations: declarations.clone(),
                    specificity,
                    order,
                });
                order += 1;
            }
        }
    }
    rules
}

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

fn parse_declarations(body: &str) -> Vec<Declaration> {
    parse_style_declarations(body)
        .into_iter()
        .map(|(property, value)| {
            let (value, important) = match value.strip_suffix("!important") {
                Some(stripped) => (stripped.trim_end().to_owned(), true),
                None => (value, false),
            };
            Declaration {
                property,
                value,
                important,
            }
        })
        .collect()
}

/// Parse a selector into compounds, or `None` when it uses syntax the
/// matcher does not support.
fn parse_selector(selector: &str) -> Option<(Vec<(Combinator, Compound)>, (u32, u32, u32))> {
    if selector.is_empty()
        || selector.contains(':')
        || selector.contains('[')
        || selector.contains('+')
        || selector.contains('~')
    {
        return None;
    }

    let mut parts = Vec::new();
    let mut specificity = (0u32, 0u32, 0u32);
    let mut next_combinator = Combinator::Descendant;

    for token in selector.split_whitespace() {
        if token == ">" {
            next_combinator = Combinator::Child;
            continue;
        }
        // Tight child syntax: a>b
        for (i, piece) in token.split('>').enumerate() {
            if piece.is_empty() {
                continue;
            }
            let combinator = if i == 0 {
                next_combinator
            } else {
                Combinator::Child
            };
            let compound = parse_compound(piece)?;
            if compound.id.is_some() {
                specificity.0 += 1;
            }
            specificity.1 += u32::try_from(compound.classes.len()).unwrap_or(u32::MAX);
            if compound.tag.is_some() {
                specificity.2 += 1;
            }
            parts.push((combinator, compound));
            next_combinator = Combinator::Descendant;
        }
    }

    if parts.is_empty() {
        return None;
    }
    Some((parts, specificity))
}

fn parse_compound(piece: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let tag_end = piece.find(['.', '#']).unwrap_or(piece.len());
    let tag = &piece[..tag_end];
    if !tag.is_empty() && tag != "*" {
        compound.tag = Some(tag.to_ascii_lowercase());
    }

    let mut current = &piece[tag_end..];
    while !current.is_empty() {
        let marker = current.chars().next()?;
        if marker != '.' && marker != '#' {
            return None;
        }
        let name_part = &current[1..];
        let end = name_part.find(['.', '#']).unwrap_or(name_part.len());
        let name = &name_part[..end];
        if name.is_empty() {
            return None;
        }
        if marker == '.' {
            compound.classes.push(name.to_owned());
        } else {
            compound.id = Some(name.to_owned());
        }
        current = &name_part[end..];
    }
    Some(compound)
}

fn compound_matches(compound: &Compound, key: &ElementKey) -> bool {
    if let Some(tag) = &compound.tag {
        if !key.tag.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if key.id.as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    compound
        .classes
        .iter()
        .all(|class| key.classes.iter().any(|c| c == class))
}

/// Match `parts[..=part_index]` with the rightmost compound anchored at
/// `path[element_index]`.
fn matches_at(
    parts: &[(Combinator, Compound)],
    part_index: usize,
    path: &[ElementKey],
    element_index: usize,
) -> bool {
    if !compound_matches(&parts[part_index].1, &path[element_index]) {
        return false;
    }
    if part_index == 0 {
        return true;
    }
    match parts[part_index].0 {
        Combinator::Child => {
            element_index > 0 && matches_at(parts, part_index - 1, path, element_index - 1)
        }
        Combinator::Descendant => (0..element_index)
            .rev()
            .any(|ancestor| matches_at(parts, part_index - 1, path, ancestor)),
    }
}

fn apply_rules(node: &mut TreeNode, ancestors: &mut Vec<ElementKey>, rules: &[Rule]) {
    ancestors.push(ElementKey::of(node));

    let mut matched: Vec<&Rule> = rules
        .iter()
        .filter(|rule| matches_at(&rule.parts, rule.parts.len() - 1, ancestors, ancestors.len() - 1))
        .collect();
    matched.sort_by_key(|rule| (rule.specificity, rule.order));

    if !matched.is_empty() {
        merge_into_style(node, &matched);
    }

    for child in &mut node.children {
        apply_rules(child, ancestors, rules);
    }
    ancestors.pop();
}

fn merge_into_style(node: &mut TreeNode, matched: &[&Rule]) {
    // (property, value, important), insertion-ordered.
    let mut result: Vec<(String, String, bool)> = Vec::new();

    let mut set = |result: &mut Vec<(String, String, bool)>,
                   property: &str,
                   value: &str,
                   important: bool| {
        if let Some(entry) = result
            .iter_mut()
            .find(|(prop, _, _)| prop.eq_ignore_ascii_case(property))
        {
            // Important declarations only lose to later important ones.
            if entry.2 && !important {
                return;
            }
            entry.1 = value.to_owned();
            entry.2 = important;
        } else {
            result.push((property.to_owned(), value.to_owned(), important));
        }
    };

    // Ascending cascade priority; later writes win.
    for rule in matched {
        for declaration in &rule.declarations {
            if !declaration.important {
                set(
                    &mut result,
                    &declaration.property,
                    &declaration.value,
                    false,
                );
            }
        }
    }
    // The element's own inline style beats non-important rules.
    if let Some(style) = node.style() {
        for (property, value) in parse_style_declarations(style) {
            set(&mut result, &property, &value, false);
        }
    }
    // Important rules beat everything, preserved as written.
    for rule in matched {
        for declaration in &rule.declarations {
            if declaration.important {
                set(&mut result, &declaration.property, &declaration.value, true);
            }
        }
    }

    let declarations: Vec<(String, String)> = result
        .into_iter()
        .map(|(property, value, important)| {
            let value = if important {
                format!("{value} !important")
            } else {
                value
            };
            (property, value)
        })
        .collect();
    node.set_attr("style", join_style_declarations(&declarations));
}
