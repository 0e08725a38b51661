use std::borrow::Cow;
use std::fmt;

use docgen_core::{Project, TemplateFormat};
use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::error::TemplateError;
use crate::package::OoxmlPackage;
use crate::resolve::{PlaceholderDictionary, Resolver};
use crate::substitute::substitute_part;

/// Progress of one generation request.
///
/// A request moves forward through these stages in order; any failure ends
/// it with a [`GenerationError`] naming the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GenerationStage {
    Received,
    TemplateLoaded,
    PartsRewritten,
    Packaged,
    Delivered,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::TemplateLoaded => "template-loaded",
            Self::PartsRewritten => "parts-rewritten",
            Self::Packaged => "packaged",
            Self::Delivered => "delivered",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("generation failed at {stage}: {source}")]
pub struct GenerationError {
    /// Last stage the request reached.
    pub stage: GenerationStage,
    #[source]
    pub source: TemplateError,
}

impl GenerationError {
    fn after(stage: GenerationStage) -> impl FnOnce(TemplateError) -> Self {
        move |source| Self { stage, source }
    }
}

/// A populated document, ready to be written or streamed.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub format: TemplateFormat,
    /// Parts whose content changed.
    pub rewritten_parts: Vec<String>,
}

/// Fill a template package with a project's values.
///
/// Rewrites the text parts of the package (body, headers and footers for
/// `docx`; slides, layouts and masters for `pptx`) and copies every other
/// entry byte for byte. Either a complete document comes back or an error;
/// there is no partial output.
pub fn generate(
    project: &Project,
    template: &[u8],
    format: TemplateFormat,
    dictionary: &PlaceholderDictionary,
) -> Result<GeneratedDocument, GenerationError> {
    let mut stage = GenerationStage::Received;
    debug!("Generating {} for project {} ({})", format, project.id, stage);

    let dialect = Dialect::for_format(format);
    let package = OoxmlPackage::open(template, dialect).map_err(GenerationError::after(stage))?;
    stage = GenerationStage::TemplateLoaded;
    debug!("Template opened, {} bytes ({})", template.len(), stage);

    let resolver = Resolver::new(project, dictionary);
    let rewritten = package
        .rewrite(|part, xml| {
            match substitute_part(xml, dialect, &resolver) {
                Ok(Cow::Borrowed(_)) => Ok(None),
                Ok(Cow::Owned(new_xml)) => Ok(Some(new_xml)),
                Err(source) => Err(TemplateError::Xml {
                    part: part.to_string(),
                    source,
                }),
            }
        })
        .map_err(GenerationError::after(stage))?;
    stage = GenerationStage::PartsRewritten;
    let rewritten_parts = rewritten.rewritten_parts().to_vec();
    debug!("Rewrote {} part(s) ({})", rewritten_parts.len(), stage);

    let bytes = rewritten.finish().map_err(GenerationError::after(stage))?;
    stage = GenerationStage::Packaged;
    debug!("Finished package, {} bytes ({})", bytes.len(), stage);

    stage = GenerationStage::Delivered;
    info!(
        "Generated {} for project {}: {} part(s) rewritten, {} bytes ({})",
        format,
        project.id,
        rewritten_parts.len(),
        bytes.len(),
        stage
    );

    Ok(GeneratedDocument {
        bytes,
        format,
        rewritten_parts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(GenerationStage::Received < GenerationStage::TemplateLoaded);
        assert!(GenerationStage::Packaged < GenerationStage::Delivered);
        assert_eq!(GenerationStage::PartsRewritten.to_string(), "parts-rewritten");
    }

    #[test]
    fn test_corrupt_template_fails_at_received() {
        let project = Project::from_draft("p", Default::default(), chrono::Utc::now());
        let err = generate(
            &project,
            b"PK\x03\x04 truncated",
            TemplateFormat::Docx,
            &PlaceholderDictionary::korean(),
        )
        .unwrap_err();
        assert_eq!(err.stage, GenerationStage::Received);
        assert!(err.to_string().starts_with("generation failed at received"));
    }
}
