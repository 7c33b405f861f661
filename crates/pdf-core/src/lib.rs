//! PDF Core - Low-level PDF manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Creating blank documents and appending pages
//! - Drawing text with the built-in Helvetica family
//! - Inserting images (JPEG, PNG)
//! - Line and rectangle primitives
//!
//! All coordinates are PDF user space: the origin is the bottom-left corner
//! of the page, x grows to the right and y grows upward. Pages are 0-indexed.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{BuiltinFont, Color, PdfDocument};
//!
//! let mut doc = PdfDocument::open("plantilla.pdf")?;
//! doc.draw_text("Hola", 0, 100.0, 700.0, BuiltinFont::Helvetica, 12.0, Color::black())?;
//! doc.save("salida.pdf")?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{Color, DocumentInfo, PdfDocument, A4_HEIGHT, A4_WIDTH};
pub use font::BuiltinFont;
pub use image::{image_dimensions, ImageXObject};
pub use text::wrap_text;

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    Open(String),

    #[error("Failed to save PDF: {0}")]
    Save(String),

    #[error("PDF parsing error: {0}")]
    Parse(String),

    #[error("Invalid page index: {page} (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
