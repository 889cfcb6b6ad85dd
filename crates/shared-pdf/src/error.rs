use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF has no pages")]
    NoPages,

    #[error("Page {requested} is out of range (document has {page_count} pages)")]
    PageOutOfRange { requested: u32, page_count: u32 },

    #[error("Malformed PDF structure: {0}")]
    Structure(String),

    #[error("Failed to serialize PDF: {0}")]
    Serialize(String),
}

impl PdfError {
    pub(crate) fn structure(context: &str, err: impl std::fmt::Display) -> Self {
        PdfError::Structure(format!("{}: {}", context, err))
    }
}
