//! Shared PDF handling utilities
//!
//! This crate provides PDF loading, page resolution, coordinate
//! transformation and content-stream plumbing used by the field embedder.

pub mod content;
pub mod coords;
pub mod error;
pub mod parser;

pub use content::StandardFont;
pub use coords::{
    pdf_point_to_ui, ui_point_to_pdf, ui_rect_to_pdf, PageGeometry, PdfRect, Placement,
    UI_REFERENCE_WIDTH,
};
pub use error::PdfError;
pub use parser::{page_count, PagePolicy, PdfDocument, ResolvedPage};
