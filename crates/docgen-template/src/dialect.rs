use std::sync::LazyLock;

use docgen_core::TemplateFormat;
use regex::Regex;
use roxmltree::Node;

use crate::error::TemplateError;

const WORDPROCESSING_NS: [&str; 2] = [
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main",
    "http://purl.oclc.org/ooxml/wordprocessingml/main",
];

const DRAWING_NS: [&str; 2] = [
    "http://schemas.openxmlformats.org/drawingml/2006/main",
    "http://purl.oclc.org/ooxml/drawingml/main",
];

const DOCX_BODY_PART: &str = "word/document.xml";

static DOCX_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^word/(?:document|header\d+|footer\d+)\.xml$").expect("valid docx part pattern")
});

static PPTX_SLIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ppt/slides/slide\d+\.xml$").expect("valid slide pattern")
});

static PPTX_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ppt/(?:slides/slide|slideLayouts/slideLayout|slideMasters/slideMaster)\d+\.xml$")
        .expect("valid pptx part pattern")
});

/// Markup vocabulary of a package format.
///
/// Word documents keep their text in `w:p`/`w:r`/`w:t` (WordprocessingML);
/// presentations use DrawingML's `a:p`/`a:r`/`a:t`. Elements are matched by
/// namespace URI, so custom prefixes and strict OOXML both work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Wordprocessing,
    Presentation,
}

impl Dialect {
    pub fn for_format(format: TemplateFormat) -> Self {
        match format {
            TemplateFormat::Docx => Self::Wordprocessing,
            TemplateFormat::Pptx => Self::Presentation,
        }
    }

    fn namespaces(&self) -> &'static [&'static str] {
        match self {
            Self::Wordprocessing => &WORDPROCESSING_NS,
            Self::Presentation => &DRAWING_NS,
        }
    }

    /// Whether `node` is the element `local` of this dialect's namespace.
    pub(crate) fn is_element(&self, node: &Node, local: &str) -> bool {
        if !node.is_element() || node.tag_name().name() != local {
            return false;
        }
        node.tag_name()
            .namespace()
            .is_some_and(|ns| self.namespaces().contains(&ns))
    }

    /// WordprocessingML drops leading/trailing spaces unless the text element
    /// carries `xml:space="preserve"`; DrawingML always keeps them.
    pub(crate) fn needs_space_preserve(&self) -> bool {
        matches!(self, Self::Wordprocessing)
    }

    /// Whether a zip entry holds text this dialect rewrites.
    pub fn is_rewritable_part(&self, name: &str) -> bool {
        match self {
            Self::Wordprocessing => DOCX_PARTS.is_match(name),
            Self::Presentation => PPTX_PARTS.is_match(name),
        }
    }

    /// Fail unless the package contains the part(s) a document cannot do without.
    pub(crate) fn check_required_parts<'a>(
        &self,
        mut names: impl Iterator<Item = &'a str>,
    ) -> Result<(), TemplateError> {
        let found = match self {
            Self::Wordprocessing => names.any(|name| name == DOCX_BODY_PART),
            Self::Presentation => names.any(|name| PPTX_SLIDE.is_match(name)),
        };
        if found {
            return Ok(());
        }
        let missing = match self {
            Self::Wordprocessing => DOCX_BODY_PART,
            Self::Presentation => "ppt/slides/slide*.xml",
        };
        Err(TemplateError::MissingPart(missing.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docx_part_selection() {
        let d = Dialect::Wordprocessing;
        assert!(d.is_rewritable_part("word/document.xml"));
        assert!(d.is_rewritable_part("word/header1.xml"));
        assert!(d.is_rewritable_part("word/footer12.xml"));
        assert!(!d.is_rewritable_part("word/styles.xml"));
        assert!(!d.is_rewritable_part("word/_rels/document.xml.rels"));
        assert!(!d.is_rewritable_part("word/headerA.xml"));
    }

    #[test]
    fn test_pptx_part_selection() {
        let d = Dialect::Presentation;
        assert!(d.is_rewritable_part("ppt/slides/slide1.xml"));
        assert!(d.is_rewritable_part("ppt/slideLayouts/slideLayout3.xml"));
        assert!(d.is_rewritable_part("ppt/slideMasters/slideMaster1.xml"));
        assert!(!d.is_rewritable_part("ppt/slides/_rels/slide1.xml.rels"));
        assert!(!d.is_rewritable_part("ppt/theme/theme1.xml"));
    }

    #[test]
    fn test_required_parts() {
        let d = Dialect::Wordprocessing;
        assert!(d.check_required_parts(["word/document.xml"].into_iter()).is_ok());
        let err = d
            .check_required_parts(["word/styles.xml"].into_iter())
            .unwrap_err();
        assert!(matches!(err, TemplateError::MissingPart(ref p) if p == "word/document.xml"));

        let p = Dialect::Presentation;
        assert!(p.check_required_parts(["ppt/slides/slide2.xml"].into_iter()).is_ok());
        assert!(p
            .check_required_parts(["ppt/slideLayouts/slideLayout1.xml"].into_iter())
            .is_err());
    }
}
