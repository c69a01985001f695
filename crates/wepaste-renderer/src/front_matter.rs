//! Front-matter extraction and reading-time estimation.
//!
//! A document may open with a YAML metadata block delimited by `---` lines.
//! Parsing is strictly best-effort: any failure degrades to "no metadata,
//! whole input is body" so a half-typed front matter never breaks preview.

use serde_yaml::Mapping;
use tracing::debug;

/// Words per minute used for the reading-time estimate.
const WORDS_PER_MINUTE: f64 = 200.0;

/// Outcome of splitting a document into metadata and body.
#[derive(Clone, Debug, Default)]
pub struct ParsedDocument {
    /// Parsed YAML front-matter mapping; empty when absent or invalid.
    pub metadata: Mapping,
    /// Markdown body with the front-matter block removed.
    pub body: String,
    /// Reading-time estimate over the body.
    pub reading: ReadingStats,
}

/// Word count and reading-time estimate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReadingStats {
    /// Number of words; CJK ideographs count one word each.
    pub words: usize,
    /// Estimated reading time in minutes (fractional).
    pub minutes: f64,
}

/// Split optional YAML front matter from `text` and estimate reading time.
#[must_use]
pub fn parse_document(text: &str) -> ParsedDocument {
    let (metadata, body) = match split_front_matter(text) {
        Some((yaml, body)) => match serde_yaml::from_str::<Mapping>(yaml) {
            Ok(mapping) => (mapping, body.to_owned()),
            Err(err) => {
                debug!("front matter ignored: {err}");
                (Mapping::new(), text.to_owned())
            }
        },
        None => (Mapping::new(), text.to_owned()),
    };

    let reading = reading_stats(&body);
    ParsedDocument {
        metadata,
        body,
        reading,
    }
}

/// Return `(yaml, body)` when `text` opens with a `---` delimited block.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---")?;
    let rest = rest.strip_prefix('\n').or_else(|| {
        rest.strip_prefix("\r\n")
    })?;

    for (offset, line) in line_spans(rest) {
        if line.trim_end_matches('\r') == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let body = body.strip_prefix('\n').unwrap_or(body);
            return Some((yaml, body));
        }
    }
    None
}

/// Iterate lines with their byte offsets, newline excluded from the span.
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        (start, raw.trim_end_matches('\n'))
    })
}

/// Estimate reading time for `body`.
///
/// CJK text has no spaces to split on, so each CJK codepoint counts as one
/// word; remaining runs split on whitespace.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reading_stats(body: &str) -> ReadingStats {
    let mut words = 0usize;
    let mut in_latin_word = false;

    for c in body.chars() {
        if is_cjk(c) {
            words += 1;
            in_latin_word = false;
        } else if c.is_whitespace() {
            in_latin_word = false;
        } else if !in_latin_word {
            words += 1;
            in_latin_word = true;
        }
    }

    ReadingStats {
        words,
        minutes: words as f64 / WORDS_PER_MINUTE,
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF        // CJK Unified Ideographs
        | 0x3400..=0x4DBF      // Extension A
        | 0xF900..=0xFAFF      // Compatibility Ideographs
        | 0x3040..=0x30FF      // Hiragana + Katakana
        | 0xAC00..=0xD7AF      // Hangul Syllables
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_front_matter() {
        let doc = parse_document("# Title\n\nBody text.");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "# Title\n\nBody text.");
    }

    #[test]
    fn test_front_matter_extracted() {
        let doc = parse_document("---\ntitle: Hello\ntags:\n  - a\n---\n# Body");
        assert_eq!(
            doc.metadata.get("title"),
            Some(&serde_yaml::Value::String("Hello".to_owned()))
        );
        assert_eq!(doc.body, "# Body");
    }

    #[test]
    fn test_invalid_yaml_degrades_to_full_body() {
        let input = "---\n: : not yaml [\n---\nBody";
        let doc = parse_document(input);
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, input);
    }

    #[test]
    fn test_unterminated_block_is_body() {
        let input = "--- \ntitle: x\nno terminator";
        let doc = parse_document(input);
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, input);
    }

    #[test]
    fn test_latin_word_count() {
        let stats = reading_stats("one two  three\nfour");
        assert_eq!(stats.words, 4);
    }

    #[test]
    fn test_cjk_word_count() {
        // Each ideograph counts, mixed with one latin word.
        let stats = reading_stats("微信编辑器 rocks");
        assert_eq!(stats.words, 6);
    }

    #[test]
    fn test_minutes_scale() {
        let body = "word ".repeat(400);
        let stats = reading_stats(&body);
        assert_eq!(stats.words, 400);
        assert!((stats.minutes - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_crlf_front_matter() {
        let doc = parse_document("---\r\ntitle: x\r\n---\r\nBody");
        assert_eq!(
            doc.metadata.get("title"),
            Some(&serde_yaml::Value::String("x".to_owned()))
        );
        assert_eq!(doc.body.trim_start_matches('\r').trim_start(), "Body");
    }
}
