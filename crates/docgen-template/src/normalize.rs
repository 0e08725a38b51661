use std::borrow::Cow;

use crate::dialect::Dialect;
use crate::paragraph::{self, Edit};
use crate::scan::TOKEN;

/// Reassemble placeholder tokens that a word processor split across runs.
///
/// Every byte of a paragraph's logical text is owned by the text element it
/// came from. For each complete `{{...}}` match, the whole match is handed to
/// the element holding its first byte; elements that lose all their text stay
/// in place with empty content, so run properties are kept. Text around a
/// token stays where it was, and the paragraph's concatenated text does not
/// change.
///
/// Returns the input unchanged (borrowed) when no token crosses an element
/// boundary. Tokens never span paragraphs.
pub fn normalize_part(xml: &str, dialect: Dialect) -> Result<Cow<'_, str>, roxmltree::Error> {
    let doc = paragraph::parse(xml)?;
    let mut edits: Vec<Edit> = Vec::new();

    for para in paragraph::paragraphs(&doc, xml, dialect) {
        let Some(merged) = merge_segments(&para.texts()) else {
            continue;
        };
        for (segment, text) in para.segments.iter().zip(&merged) {
            if *text != segment.text {
                paragraph::rewrite_segment(xml, segment, text, dialect, false, &mut edits);
            }
        }
    }

    if edits.is_empty() {
        return Ok(Cow::Borrowed(xml));
    }
    Ok(Cow::Owned(paragraph::apply_edits(xml, edits)))
}

/// Redistribute segment texts so that no token crosses a segment boundary.
///
/// Returns `None` when every token already sits inside one segment.
pub(crate) fn merge_segments(texts: &[&str]) -> Option<Vec<String>> {
    let combined = texts.concat();
    let mut owner: Vec<usize> = Vec::with_capacity(combined.len());
    for (i, text) in texts.iter().enumerate() {
        owner.extend(std::iter::repeat(i).take(text.len()));
    }

    let mut moved = false;
    for m in TOKEN.find_iter(&combined) {
        let first = owner[m.start()];
        if owner[m.end() - 1] != first {
            owner[m.range()].fill(first);
            moved = true;
        }
    }
    if !moved {
        return None;
    }

    // Owners stay non-decreasing, so each segment gets one contiguous slice.
    let mut merged = vec![String::new(); texts.len()];
    let mut start = 0;
    while start < combined.len() {
        let who = owner[start];
        let end = owner[start..]
            .iter()
            .position(|&o| o != who)
            .map_or(combined.len(), |len| start + len);
        merged[who].push_str(&combined[start..end]);
        start = end;
    }
    Some(merged)
}
