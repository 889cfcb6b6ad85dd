use fieldsign_core::{
    operation_name, EmbedConfig, EmbedError, FieldContent, FieldStamper, FieldSpec,
};
use serde::{Deserialize, Serialize};

/// Outcome of one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillReport {
    pub embedded: usize,
    pub skipped: usize,
    pub failed: Vec<FieldFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFailure {
    pub id: String,
    pub error: String,
}

/// Apply `fields` to `pdf` in order.
///
/// Fields without a value are skipped, except checkbox and radio fields
/// where no value means unchecked. A field that fails is recorded and the
/// remaining fields still apply. Only a document that cannot be loaded or
/// saved fails the whole batch.
pub fn fill_document(
    pdf: &[u8],
    fields: &[FieldSpec],
    config: EmbedConfig,
) -> Result<(Vec<u8>, FillReport), EmbedError> {
    let mut stamper = FieldStamper::open(pdf, config)?;
    let mut report = FillReport::default();

    for field in fields {
        let raw = field.value.as_deref().unwrap_or("");
        if raw.trim().is_empty() && !field.kind.is_mark() {
            tracing::debug!("Skipping {} field {} with no value", field.kind, field.id);
            report.skipped += 1;
            continue;
        }

        let outcome = FieldContent::from_raw(field.kind, raw)
            .map_err(|source| EmbedError::Field {
                operation: operation_name(field.kind),
                kind: field.kind,
                page: field.position.page,
                source,
            })
            .and_then(|content| stamper.draw(field.kind, &content, &field.position));

        match outcome {
            Ok(()) => report.embedded += 1,
            Err(e) => {
                tracing::warn!("Field {} not embedded: {}", field.id, e);
                report.failed.push(FieldFailure {
                    id: field.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Embedded {} field(s), skipped {}, failed {}",
        report.embedded,
        report.skipped,
        report.failed.len()
    );
    Ok((stamper.finish()?, report))
}
