//! Document compositor
//!
//! The orchestration layer: resolve the template file, run the text and
//! checkbox injection passes, serialize. Load failures (template missing or
//! not parseable) are the only raised errors; everything else degrades to a
//! diagnostic and a partially-populated document. Payload shaping belongs to
//! upstream adapters, never here.

use crate::checkbox::inject_checkboxes;
use crate::config::TemplateConfig;
use crate::diagnostics::Diagnostics;
use crate::fallback::GenericDocument;
use crate::injector::inject_text;
use crate::payload::{CheckboxData, TextData};
use crate::schema::TemplateMapping;
use crate::{Result, TemplateError};
use pdf_core::{DocumentInfo, PdfDocument};

/// One generated document plus everything that was skipped along the way.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub diagnostics: Diagnostics,
}

/// Template-driven document generator.
///
/// Stateless across calls: every generation loads its own template bytes and
/// builds its own document object.
#[derive(Debug, Clone)]
pub struct Compositor {
    config: TemplateConfig,
}

impl Compositor {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Resolve and parse a template into a document ready for injection.
    pub fn load_template(&self, template_id: &str) -> Result<PdfDocument> {
        let path = self.config.resolve(template_id)?;
        tracing::debug!(target: "template", "template '{template_id}' -> {}", path.display());

        let bytes = std::fs::read(&path).map_err(|e| {
            TemplateError::TemplateLoad(format!("{}: {e}", path.display()))
        })?;
        PdfDocument::from_bytes(&bytes)
            .map_err(|e| TemplateError::TemplateLoad(format!("{}: {e}", path.display())))
    }

    /// Generate a document from a template and a coordinate mapping.
    pub fn generate(
        &self,
        template_id: &str,
        mapping: &TemplateMapping,
        text_data: &TextData,
        checkbox_data: &CheckboxData,
    ) -> Result<GeneratedDocument> {
        let mut doc = self.load_template(template_id)?;
        let mut diagnostics = Diagnostics::new();

        if !mapping.text.is_empty() {
            inject_text(&mut doc, &mapping.text, text_data, &mut diagnostics)?;
        }
        if !mapping.checkboxes.is_empty() {
            inject_checkboxes(&mut doc, &mapping.checkboxes, checkbox_data, &mut diagnostics)?;
        }

        let bytes = doc.to_bytes()?;
        Ok(GeneratedDocument { bytes, diagnostics })
    }

    /// Generate from a template, substituting the generic layout when the
    /// template cannot be located or parsed.
    ///
    /// End users never see a "template not found" failure: the document is
    /// produced either way and the substitution is surfaced as a warning.
    pub fn generate_with_fallback(
        &self,
        template_id: &str,
        mapping: &TemplateMapping,
        doc_type: &str,
        text_data: &TextData,
        checkbox_data: &CheckboxData,
    ) -> Result<GeneratedDocument> {
        match self.generate(template_id, mapping, text_data, checkbox_data) {
            Ok(document) => Ok(document),
            Err(TemplateError::TemplateNotFound { .. }) | Err(TemplateError::TemplateLoad(_)) => {
                let mut diagnostics = Diagnostics::new();
                diagnostics.warn(format!(
                    "could not use template '{template_id}', generated standard document"
                ));

                let mut generic = GenericDocument::new();
                if let Some(logo) = self.config.load_logo() {
                    generic = generic.with_logo(logo);
                }
                let bytes = generic.build(doc_type, text_data)?;
                Ok(GeneratedDocument { bytes, diagnostics })
            }
            Err(error) => Err(error),
        }
    }
}

/// Probe a PDF byte stream for its page count and Info-dictionary metadata.
///
/// Used by upstream listing endpoints to describe stored documents.
pub fn pdf_info(bytes: &[u8]) -> Result<DocumentInfo> {
    let doc = PdfDocument::from_bytes(bytes)
        .map_err(|e| TemplateError::TemplateLoad(e.to_string()))?;
    Ok(doc.info())
}
