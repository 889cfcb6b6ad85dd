//! Field embedding core
//!
//! Burns field values (signature and image rasters, text, dates, checkbox
//! and radio marks) into PDF pages. Field rectangles arrive in editor
//! coordinates (612px reference width, top-left origin) and are mapped onto
//! each page's native box with one uniform scale.
//!
//! Every one-shot function takes a whole PDF buffer and returns a new one.
//! To fill several fields, chain the calls so each output feeds the next,
//! or use [`FieldStamper`] to parse once, draw many times and save once.

pub mod config;
pub mod date;
pub mod error;
pub mod field;
pub mod image;
pub mod mark;
mod paint;
pub mod stamper;
pub mod text;

pub use config::{EmbedConfig, MarkStyle, Rgb, TextLayout};
pub use date::{parse_date_value, DateFormatPolicy};
pub use error::{EmbedError, EmbedFailure};
pub use field::{parse_checked, FieldContent};
pub use image::{ImageBlob, ImageFormat};
pub use mark::{mark_box, MarkShape};
pub use stamper::{operation_name, FieldStamper};
pub use text::encode_win_ansi;

pub use shared_pdf::{ui_rect_to_pdf, PagePolicy, PdfRect, Placement};
pub use shared_types::{FieldKind, FieldPosition, FieldSpec};

use chrono::NaiveDate;

/// One-shot embedder carrying a configuration
#[derive(Debug, Clone, Default)]
pub struct Embedder {
    config: EmbedConfig,
}

impl Embedder {
    pub fn new(config: EmbedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Embed decoded content of any kind
    pub fn embed(
        &self,
        pdf: &[u8],
        kind: FieldKind,
        content: &FieldContent,
        position: &FieldPosition,
    ) -> Result<Vec<u8>, EmbedError> {
        self.one_shot(pdf, |stamper| stamper.draw(kind, content, position))
    }

    /// Embed a signature, initials or image field
    pub fn embed_image(
        &self,
        pdf: &[u8],
        kind: FieldKind,
        image: &ImageBlob,
        position: &FieldPosition,
    ) -> Result<Vec<u8>, EmbedError> {
        self.one_shot(pdf, |stamper| stamper.draw_image(kind, image, position))
    }

    /// Embed a text, name or hyperlink field
    pub fn embed_text(
        &self,
        pdf: &[u8],
        kind: FieldKind,
        text: &str,
        position: &FieldPosition,
    ) -> Result<Vec<u8>, EmbedError> {
        self.one_shot(pdf, |stamper| stamper.draw_text(kind, text, position))
    }

    pub fn embed_date(
        &self,
        pdf: &[u8],
        date: NaiveDate,
        position: &FieldPosition,
    ) -> Result<Vec<u8>, EmbedError> {
        self.one_shot(pdf, |stamper| stamper.draw_date(date, position))
    }

    /// Embed a checkbox or radio field
    pub fn embed_mark(
        &self,
        pdf: &[u8],
        kind: FieldKind,
        checked: bool,
        position: &FieldPosition,
    ) -> Result<Vec<u8>, EmbedError> {
        self.one_shot(pdf, |stamper| stamper.draw_mark(kind, checked, position))
    }

    fn one_shot<F>(&self, pdf: &[u8], draw: F) -> Result<Vec<u8>, EmbedError>
    where
        F: FnOnce(&mut FieldStamper) -> Result<(), EmbedError>,
    {
        let mut stamper = FieldStamper::open(pdf, self.config.clone())?;
        draw(&mut stamper)?;
        stamper.finish()
    }
}

/// Embed a signature image with the default configuration
pub fn embed_signature(
    pdf: &[u8],
    image: &ImageBlob,
    position: &FieldPosition,
) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_image(pdf, FieldKind::Signature, image, position)
}

pub fn embed_initials(
    pdf: &[u8],
    image: &ImageBlob,
    position: &FieldPosition,
) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_image(pdf, FieldKind::Initials, image, position)
}

pub fn embed_image(
    pdf: &[u8],
    image: &ImageBlob,
    position: &FieldPosition,
) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_image(pdf, FieldKind::Image, image, position)
}

/// Embed plain text with the default configuration
pub fn embed_text(pdf: &[u8], text: &str, position: &FieldPosition) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_text(pdf, FieldKind::Text, text, position)
}

/// Embed a date as long-form Indonesian ("17 Januari 2025")
pub fn embed_date(
    pdf: &[u8],
    date: NaiveDate,
    position: &FieldPosition,
) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_date(pdf, date, position)
}

pub fn embed_checkbox(
    pdf: &[u8],
    checked: bool,
    position: &FieldPosition,
) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_mark(pdf, FieldKind::Checkbox, checked, position)
}

pub fn embed_radio(
    pdf: &[u8],
    checked: bool,
    position: &FieldPosition,
) -> Result<Vec<u8>, EmbedError> {
    Embedder::default().embed_mark(pdf, FieldKind::Radio, checked, position)
}

/// Number of pages in a PDF buffer
pub fn page_count(pdf: &[u8]) -> Result<u32, EmbedError> {
    shared_pdf::page_count(pdf).map_err(|e| EmbedError::document("page_count", e))
}
