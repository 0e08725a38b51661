use std::borrow::Cow;

use regex::Captures;

use crate::dialect::Dialect;
use crate::normalize::merge_segments;
use crate::paragraph::{self, Edit};
use crate::resolve::Resolver;
use crate::scan::TOKEN;

/// Normalize a part and replace every known placeholder with its value.
///
/// Unknown keys keep their original `{{ key }}` text. Returns the input
/// unchanged (borrowed) when nothing was replaced or merged.
pub fn substitute_part<'x>(
    xml: &'x str,
    dialect: Dialect,
    resolver: &Resolver<'_>,
) -> Result<Cow<'x, str>, roxmltree::Error> {
    let doc = paragraph::parse(xml)?;
    let mut edits: Vec<Edit> = Vec::new();

    for para in paragraph::paragraphs(&doc, xml, dialect) {
        let merged = merge_segments(&para.texts());
        for (i, segment) in para.segments.iter().enumerate() {
            let text = merged
                .as_ref()
                .map_or(segment.text.as_str(), |m| m[i].as_str());
            let replaced = replace_tokens(text, resolver);
            if replaced != segment.text {
                paragraph::rewrite_segment(xml, segment, &replaced, dialect, true, &mut edits);
            }
        }
    }

    if edits.is_empty() {
        return Ok(Cow::Borrowed(xml));
    }
    Ok(Cow::Owned(paragraph::apply_edits(xml, edits)))
}

fn replace_tokens<'t>(text: &'t str, resolver: &Resolver<'_>) -> Cow<'t, str> {
    TOKEN.replace_all(text, |caps: &Captures| match resolver.lookup(&caps[1]) {
        Some(value) => value.into_owned(),
        None => caps[0].to_string(),
    })
}
