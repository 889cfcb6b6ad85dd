//! Batch field filling for the `fieldsign` binary
//!
//! Applies a manifest of stored fields to one PDF, in order, isolating
//! per-field failures so one bad value never loses the rest of the batch.

pub mod fill;
pub mod manifest;

pub use fill::{fill_document, FieldFailure, FillReport};
pub use manifest::FieldManifest;
