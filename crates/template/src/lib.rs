//! Template Engine - coordinate-driven document generation
//!
//! This crate turns a base PDF template, a declarative coordinate mapping and
//! a flat key-value payload into a finished document:
//!
//! - Field mappings place text (optionally word-wrapped) at fixed positions
//! - Checkbox mappings resolve a runtime value to one of several mark points
//! - The compositor resolves the template file through the configured search
//!   directories and orchestrates the injection passes
//! - A template-free generic layout serves as the always-works fallback
//! - Validator and preview tooling keep coordinate maps honest during
//!   template authoring
//!
//! # Example
//!
//! ```ignore
//! use template::{Compositor, TemplateConfig, TemplateRegistry};
//!
//! let registry = TemplateRegistry::with_builtin();
//! let mapping = registry.get("pabellon/bupa.pdf").unwrap();
//! let compositor = Compositor::new(TemplateConfig::from_env());
//! let document = compositor.generate("pabellon/bupa.pdf", mapping, &text, &checks)?;
//! std::fs::write("solicitud.pdf", document.bytes)?;
//! ```

mod checkbox;
mod compositor;
mod config;
mod diagnostics;
mod fallback;
mod format;
mod injector;
mod payload;
mod preview;
mod registry;
mod schema;
mod validator;

pub use checkbox::inject_checkboxes;
pub use compositor::{pdf_info, Compositor, GeneratedDocument};
pub use pdf_core::DocumentInfo;
pub use config::{TemplateConfig, TEMPLATES_DIR_ENV};
pub use diagnostics::Diagnostics;
pub use fallback::GenericDocument;
pub use format::{format_date_cl, format_phone_cl, format_rut};
pub use injector::inject_text;
pub use payload::{CheckValue, CheckboxData, TextData, UnifiedPatientData};
pub use preview::{coordinate_grid, coordinate_grid_a4, mapping_preview};
pub use registry::{
    consentimiento_general_mapping, solicitud_pabellon_mapping, TemplateRegistry,
};
pub use schema::{CheckPoint, CheckboxSlot, FieldMapping, TemplateMapping};
pub use validator::{
    from_top, to_top, validate_mapping, validate_mapping_a4, validate_point, CoordinateReport,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during document generation
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{template}' not found in any configured directory")]
    TemplateNotFound {
        template: String,
        candidates: Vec<PathBuf>,
    },

    #[error("failed to load template: {0}")]
    TemplateLoad(String),

    #[error("failed to parse mapping: {0}")]
    MappingParse(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
