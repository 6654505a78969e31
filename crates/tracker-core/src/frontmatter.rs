//! Markdown parsing and serialization with frontmatter support.
//!
//! Handles the conversion between raw markdown files and structured data
//! (frontmatter YAML + body text). Frontmatter is kept as a
//! `serde_yaml::Mapping` so that rewriting a note preserves the order of
//! keys the user put there.

use serde_yaml::Mapping;
use thiserror::Error;

/// Frontmatter as an insertion-ordered key-value mapping.
pub type Frontmatter = Mapping;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Failed to serialize frontmatter: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Parsed markdown document
#[derive(Debug, Clone)]
pub struct ParsedNote {
    /// Frontmatter mapping (None if absent, empty, or unparseable)
    pub frontmatter: Option<Frontmatter>,
    /// Markdown body (everything after the frontmatter block)
    pub body: String,
}

/// Parse a markdown file into frontmatter and body.
///
/// Frontmatter must be delimited by `---` at the start of the file:
/// ```markdown
/// ---
/// title: My Note
/// Modified: [2024-01-01]
/// ---
///
/// # Content here
/// ```
///
/// When the block is missing, empty, or not valid YAML, the whole input
/// becomes the body so nothing the user wrote is dropped on rewrite.
pub fn parse(raw: &str) -> ParsedNote {
    let Some((yaml, body)) = split_frontmatter(raw) else {
        return ParsedNote {
            frontmatter: None,
            body: raw.to_string(),
        };
    };

    match serde_yaml::from_str::<Mapping>(yaml) {
        Ok(fm) if !fm.is_empty() => ParsedNote {
            frontmatter: Some(fm),
            body: body.to_string(),
        },
        _ => ParsedNote {
            frontmatter: None,
            body: raw.to_string(),
        },
    }
}

/// Serialize frontmatter and body back to markdown.
///
/// An empty mapping produces the body alone, with no `---` fences.
///
/// The fences and the YAML block are emitted with `\n` line endings, so a
/// CRLF note has its frontmatter block normalized to LF on the first
/// rewrite; the body keeps whatever endings it had.
pub fn build(frontmatter: &Frontmatter, body: &str) -> Result<String, FrontmatterError> {
    if frontmatter.is_empty() {
        return Ok(body.to_string());
    }

    let yaml = serde_yaml::to_string(frontmatter)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

/// Split a note into its frontmatter YAML string and body, without parsing
/// the YAML. Returns None if no complete frontmatter block was found.
fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    // Frontmatter must start at the very beginning with ---
    let after_opening = raw.strip_prefix("---")?;

    // Skip the newline after the opening ---
    let content_start = if let Some(rest) = after_opening.strip_prefix("\r\n") {
        rest
    } else if let Some(rest) = after_opening.strip_prefix('\n') {
        rest
    } else {
        return None;
    };

    let close_pos = find_closing_delimiter(content_start)?;
    let yaml = &content_start[..close_pos];
    let after_close = &content_start[close_pos + 3..];

    // Skip newline after the closing ---
    let body = if let Some(rest) = after_close.strip_prefix("\r\n") {
        rest
    } else if let Some(rest) = after_close.strip_prefix('\n') {
        rest
    } else {
        after_close
    };

    Some((yaml, body))
}

/// Find the position of the closing --- delimiter (must be at start of line)
fn find_closing_delimiter(s: &str) -> Option<usize> {
    // split_inclusive keeps each line's terminator, so `pos` advances by the
    // true byte length whether the line ends in \n or \r\n
    let mut pos = 0;
    for line in s.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return Some(pos);
        }
        pos += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_parse_with_frontmatter() {
        let content = r#"---
title: Test Note
Modified:
  - 2024-01-01
---

# Hello World

This is the body."#;

        let parsed = parse(content);
        let fm = parsed.frontmatter.expect("should have frontmatter");
        assert_eq!(
            fm.get(&Value::String("title".into())),
            Some(&Value::String("Test Note".into()))
        );
        assert!(parsed.body.starts_with("\n# Hello World"));
    }

    #[test]
    fn test_parse_without_frontmatter() {
        let content = "# Just a heading\n\nSome content.";
        let parsed = parse(content);
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_parse_unterminated_block_is_body() {
        let content = "---\ntitle: Dangling\n\nNo closing fence.";
        let parsed = parse(content);
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_parse_invalid_yaml_keeps_whole_input() {
        let content = "---\n[not: valid: yaml\n---\nBody text.";
        let parsed = parse(content);
        assert!(parsed.frontmatter.is_none());
        // The broken block survives in the body instead of being discarded
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_parse_empty_frontmatter_keeps_whole_input() {
        let content = "---\n---\nBody.";
        let parsed = parse(content);
        assert!(parsed.frontmatter.is_none());
        assert_eq!(parsed.body, content);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let content = "---\r\ntitle: CRLF Note\r\n---\r\nBody here.";
        let parsed = parse(content);
        let fm = parsed.frontmatter.expect("should have frontmatter");
        assert_eq!(
            fm.get(&Value::String("title".into())),
            Some(&Value::String("CRLF Note".into()))
        );
        assert_eq!(parsed.body, "Body here.");
    }

    #[test]
    fn test_parse_crlf_multiline_block_keeps_body_clean() {
        let content = "---\r\ntitle: A\r\ntags: b\r\n---\r\nBody here.";
        let parsed = parse(content);

        let fm = parsed.frontmatter.expect("should have frontmatter");
        assert_eq!(
            fm.get(&Value::String("title".into())),
            Some(&Value::String("A".into()))
        );
        assert_eq!(
            fm.get(&Value::String("tags".into())),
            Some(&Value::String("b".into()))
        );

        // No fence bytes may leak into the body
        assert_eq!(parsed.body, "Body here.");
    }

    #[test]
    fn test_build_empty_mapping_is_body_only() {
        let fm = Frontmatter::new();
        let result = build(&fm, "Just the body.").unwrap();
        assert_eq!(result, "Just the body.");
    }

    #[test]
    fn test_roundtrip_preserves_body() {
        let mut fm = Frontmatter::new();
        fm.insert(
            Value::String("title".into()),
            Value::String("My Note".into()),
        );
        let body = "# Content\n\nParagraph.";

        let serialized = build(&fm, body).unwrap();
        let parsed = parse(&serialized);

        assert_eq!(parsed.frontmatter, Some(fm));
        assert_eq!(parsed.body, body);
    }

    #[test]
    fn test_rewrite_preserves_key_order() {
        let content = "---\nzebra: 1\nalpha: 2\n---\nBody.";
        let parsed = parse(content);
        let mut fm = parsed.frontmatter.unwrap();
        fm.insert(
            Value::String("Modified".into()),
            Value::Sequence(vec![Value::String("2024-01-01".into())]),
        );

        let rebuilt = build(&fm, &parsed.body).unwrap();
        let zebra = rebuilt.find("zebra").unwrap();
        let alpha = rebuilt.find("alpha").unwrap();
        let modified = rebuilt.find("Modified").unwrap();
        assert!(zebra < alpha, "existing keys keep their order");
        assert!(alpha < modified, "new key is appended at the end");
    }
}
