//! Frontmatter codec: an optional `---` delimited YAML block, then the body.

use halosync_core::Metadata;

const FENCE: &str = "---";

/// A document split into its metadata record and body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

/// Split `text` into metadata and body.
///
/// The block must open on the first line and close on a line of its own;
/// otherwise the whole text is body. `\r\n` line endings are accepted.
pub fn parse(text: &str) -> Result<Document, serde_yaml::Error> {
    let Some((yaml, body)) = split_frontmatter(text) else {
        return Ok(Document {
            metadata: Metadata::default(),
            body: text.to_string(),
        });
    };
    let metadata = if yaml.trim().is_empty() {
        Metadata::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    Ok(Document {
        metadata,
        body: body.to_string(),
    })
}

/// Serialize `document`; an empty metadata record renders no block.
pub fn render(document: &Document) -> Result<String, serde_yaml::Error> {
    if document.metadata.is_empty() {
        return Ok(document.body.clone());
    }
    let yaml = serde_yaml::to_string(&document.metadata)?;
    let mut out = String::with_capacity(yaml.len() + document.body.len() + 8);
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&document.body);
    Ok(out)
}

/// `(yaml, body)` when `text` starts with a closed frontmatter block.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end_matches(['\r', '\n']) != FENCE {
        return None;
    }
    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end_matches(['\r', '\n']) == FENCE {
            return Some((&text[yaml_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use halosync_core::PostName;

    #[test]
    fn text_without_block_is_all_body() {
        let doc = parse("# Title\n\nbody\n").expect("parse");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "# Title\n\nbody\n");
    }

    #[test]
    fn block_is_split_from_body() {
        let doc = parse("---\ntitle: Hi\nhalo:\n  site: https://x\n  name: abc\n---\nbody\n")
            .expect("parse");
        assert_eq!(doc.metadata.title.as_deref(), Some("Hi"));
        assert_eq!(doc.metadata.linked_name(), Some(&PostName::from("abc")));
        assert_eq!(doc.body, "body\n");
    }

    #[test]
    fn link_without_site_still_parses() {
        let doc = parse("---\ntitle: T\nhalo:\n  name: abc123\n---\nbody\n").expect("parse");
        assert_eq!(doc.metadata.linked_name(), Some(&PostName::from("abc123")));
        assert_eq!(doc.metadata.linked_site(), None);
        assert_eq!(doc.body, "body\n");
    }

    #[test]
    fn crlf_is_tolerated() {
        let doc = parse("---\r\ntitle: Hi\r\n---\r\nbody\r\n").expect("parse");
        assert_eq!(doc.metadata.title.as_deref(), Some("Hi"));
        assert_eq!(doc.body, "body\r\n");
    }

    #[test]
    fn unclosed_block_is_body() {
        let text = "---\ntitle: Hi\nno closing fence\n";
        assert_eq!(parse(text).expect("parse").body, text);
    }

    #[test]
    fn empty_block_is_empty_metadata() {
        let doc = parse("---\n---\nbody").expect("parse");
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn non_mapping_block_is_an_error() {
        assert!(parse("---\n- a\n- b\n---\nbody").is_err());
    }

    #[test]
    fn render_then_parse_keeps_unknown_keys_and_body() {
        let original = "---\ntitle: Hi\nauthor: me\n---\n\nbody\n";
        let doc = parse(original).expect("parse");
        let text = render(&doc).expect("render");
        assert!(text.starts_with("---\ntitle: Hi\n"));
        assert_eq!(parse(&text).expect("reparse"), doc);
    }

    #[test]
    fn empty_metadata_renders_body_only() {
        let doc = Document {
            metadata: Metadata::default(),
            body: "just text".into(),
        };
        assert_eq!(render(&doc).expect("render"), "just text");
    }
}
