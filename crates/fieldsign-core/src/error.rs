use crate::image::ImageFormat;
use shared_pdf::PdfError;
use shared_types::FieldKind;
use thiserror::Error;

/// What went wrong while embedding one value
#[derive(Error, Debug)]
pub enum EmbedFailure {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Failed to decode {format} image: {reason}")]
    ImageDecode { format: ImageFormat, reason: String },

    #[error("Failed to encode image stream: {0}")]
    ImageEncode(String),

    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("Date formatting failed: {0}")]
    DateFormat(String),

    #[error("Invalid {kind} value: {value:?}")]
    InvalidValue { kind: FieldKind, value: String },

    #[error("A {kind} field cannot hold {content} content")]
    ContentMismatch {
        kind: FieldKind,
        content: &'static str,
    },

    #[error("Failed to build content stream: {0}")]
    Content(String),
}

/// Failure of a core operation, with enough context to attribute it
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("{operation} failed: {source}")]
    Document {
        operation: &'static str,
        #[source]
        source: EmbedFailure,
    },

    #[error("{operation} failed for {kind} field on page {page}: {source}")]
    Field {
        operation: &'static str,
        kind: FieldKind,
        page: u32,
        #[source]
        source: EmbedFailure,
    },
}

impl EmbedError {
    pub(crate) fn document(operation: &'static str, source: impl Into<EmbedFailure>) -> Self {
        EmbedError::Document {
            operation,
            source: source.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            EmbedError::Document { operation, .. } | EmbedError::Field { operation, .. } => {
                operation
            }
        }
    }

    pub fn failure(&self) -> &EmbedFailure {
        match self {
            EmbedError::Document { source, .. } | EmbedError::Field { source, .. } => source,
        }
    }
}
