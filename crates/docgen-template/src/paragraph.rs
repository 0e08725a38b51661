//! Structural view of the paragraphs in one XML part.
//!
//! Parts are parsed with `roxmltree`, but rewrites are applied as byte-range
//! splices on the original text: anything outside an edited text element is
//! written back exactly as it was read.

use std::collections::HashMap;
use std::ops::Range;

use roxmltree::{Document, Node, NodeId, ParsingOptions};

use crate::dialect::Dialect;

/// One text element (`w:t` / `a:t`) inside a run.
#[derive(Debug)]
pub(crate) struct Segment {
    /// Unescaped text content.
    pub text: String,
    /// Source range of the start tag, `<` through `>`.
    pub open_tag: Range<usize>,
    /// Source range between the start and end tags. Empty for `<w:t/>`.
    pub content: Range<usize>,
}

/// The text segments of a paragraph in document order.
#[derive(Debug, Default)]
pub(crate) struct Paragraph {
    pub segments: Vec<Segment>,
}

impl Paragraph {
    pub fn texts(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

pub(crate) fn parse(xml: &str) -> Result<Document<'_>, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(xml, options)
}

/// Collect every paragraph that owns at least one run text element.
///
/// A text element belongs to its nearest paragraph ancestor, so paragraphs
/// nested in text boxes are reported separately from the paragraph that
/// anchors the box. Text elements outside a run (field results, for example)
/// are ignored.
pub(crate) fn paragraphs(doc: &Document, xml: &str, dialect: Dialect) -> Vec<Paragraph> {
    let mut found: Vec<Paragraph> = Vec::new();
    let mut index: HashMap<NodeId, usize> = HashMap::new();

    for node in doc.descendants() {
        if !dialect.is_element(&node, "t") {
            continue;
        }
        if !node.parent().is_some_and(|p| dialect.is_element(&p, "r")) {
            continue;
        }
        let Some(paragraph) = node.ancestors().skip(1).find(|a| dialect.is_element(a, "p"))
        else {
            continue;
        };
        let Some(segment) = segment(&node, xml) else {
            continue;
        };

        let slot = *index.entry(paragraph.id()).or_insert_with(|| {
            found.push(Paragraph::default());
            found.len() - 1
        });
        found[slot].segments.push(segment);
    }

    found
}

/// Logical text of every paragraph in a part.
pub fn paragraph_texts(xml: &str, dialect: Dialect) -> Result<Vec<String>, roxmltree::Error> {
    let doc = parse(xml)?;
    Ok(paragraphs(&doc, xml, dialect)
        .iter()
        .map(Paragraph::text)
        .collect())
}

fn segment(node: &Node, xml: &str) -> Option<Segment> {
    let range = node.range();
    let open_end = tag_end(xml, range.start)?;
    let open_tag = range.start..open_end + 1;
    let self_closing = xml[..open_end].ends_with('/');

    let content = if self_closing {
        open_tag.end..open_tag.end
    } else {
        let close_start = xml[..range.end].rfind("</")?;
        if close_start < open_tag.end {
            return None;
        }
        open_tag.end..close_start
    };

    let text = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();

    Some(Segment {
        text,
        open_tag,
        content,
    })
}

/// Position of the `>` closing the tag that starts at `lt`, skipping quoted
/// attribute values.
fn tag_end(xml: &str, lt: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in xml.as_bytes().iter().enumerate().skip(lt) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Qualified name of a start tag, e.g. `w:t` for `<w:t xml:space="preserve">`.
fn tag_name(open_tag: &str) -> &str {
    let name = &open_tag[1..];
    let end = name
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(name.len());
    &name[..end]
}

/// Escape text content. Characters XML 1.0 cannot carry at all are dropped.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if !is_xml_char(c) => {}
            _ => out.push(c),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// A replacement of one source range.
#[derive(Debug)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Queue the edits that make `segment` hold `text`.
///
/// With `line_breaks` set, newlines in WordprocessingML text become `<w:br/>`
/// elements inside the same run.
pub(crate) fn rewrite_segment(
    xml: &str,
    segment: &Segment,
    text: &str,
    dialect: Dialect,
    line_breaks: bool,
    edits: &mut Vec<Edit>,
) {
    let open = &xml[segment.open_tag.clone()];
    let qname = tag_name(open);
    let preserve = dialect.needs_space_preserve() && !open.contains("xml:space");

    let body = if line_breaks && dialect == Dialect::Wordprocessing && text.contains('\n') {
        let prefix = qname
            .split_once(':')
            .map(|(p, _)| format!("{p}:"))
            .unwrap_or_default();
        let separator = format!("</{qname}><{prefix}br/><{qname} xml:space=\"preserve\">");
        text.split('\n')
            .map(|line| escape_text(line.trim_end_matches('\r')))
            .collect::<Vec<_>>()
            .join(&separator)
    } else {
        escape_text(text)
    };

    if preserve {
        edits.push(Edit {
            range: segment.open_tag.clone(),
            replacement: format!("<{qname} xml:space=\"preserve\"{}", &open[1 + qname.len()..]),
        });
    }
    edits.push(Edit {
        range: segment.content.clone(),
        replacement: body,
    });
}

/// Splice non-overlapping edits into `xml`.
pub(crate) fn apply_edits(xml: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|e| e.range.start);
    let mut out = String::with_capacity(xml.len() + 64);
    let mut cursor = 0;
    for edit in edits {
        debug_assert!(edit.range.start >= cursor, "overlapping edits");
        out.push_str(&xml[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(&xml[cursor..]);
    out
}
