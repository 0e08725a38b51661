use std::collections::BTreeSet;
use std::sync::LazyLock;

use docgen_core::TemplateFormat;
use regex::Regex;
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::TemplateError;
use crate::package::OoxmlPackage;
use crate::paragraph::paragraph_texts;

/// `{{key}}` where the key holds no braces. Unterminated or nested braces
/// never match as a whole.
pub(crate) static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid placeholder pattern"));

/// Distinct placeholder keys in `text`, whitespace-trimmed.
pub fn scan_placeholders(text: &str) -> BTreeSet<String> {
    TOKEN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str().trim())
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Placeholder keys used anywhere in a template package.
///
/// Scans the same parts generation rewrites, paragraph by paragraph, so a
/// token split across runs is found while one split across paragraphs is not.
pub fn discover(data: &[u8], format: TemplateFormat) -> Result<BTreeSet<String>, TemplateError> {
    let dialect = Dialect::for_format(format);
    let mut package = OoxmlPackage::open(data, dialect)?;

    let mut keys = BTreeSet::new();
    for (part, xml) in package.read_parts()? {
        let texts = paragraph_texts(&xml, dialect).map_err(|source| TemplateError::Xml {
            part: part.clone(),
            source,
        })?;
        let before = keys.len();
        for text in &texts {
            keys.extend(scan_placeholders(text));
        }
        debug!("Scanned {} ({} new placeholders)", part, keys.len() - before);
    }

    Ok(keys)
}
