//! Field model shared between the document layer and the PDF embedder

pub mod types;

pub use types::{FieldKind, FieldPosition, FieldSpec, UnknownFieldKind};
