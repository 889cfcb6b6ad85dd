use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_types::FieldSpec;
use std::fs;
use std::path::Path;

/// Fields to apply, in the order they should be drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldManifest {
    pub fields: Vec<FieldSpec>,
}

impl FieldManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read field manifest: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid field manifest: {}", path.display()))
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s).context("Failed to parse field manifest JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{FieldKind, FieldPosition};

    #[test]
    fn test_parse_manifest_keeps_order() {
        let manifest = FieldManifest::from_json(
            r#"{"fields": [
                {"id": "sig", "type": "signature", "x": 10, "y": 20, "width": 100, "height": 40, "page": 1, "value": "data:image/png;base64,AAAA"},
                {"id": "agree", "type": "checkbox", "x": 5.5, "y": 6, "width": 12, "height": 12, "page": 2}
            ]}"#,
        )
        .unwrap();

        let ids: Vec<_> = manifest.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["sig", "agree"]);
        assert_eq!(manifest.fields[1].kind, FieldKind::Checkbox);
        assert_eq!(
            manifest.fields[1].position,
            FieldPosition::new(5.5, 6.0, 12.0, 12.0, 2)
        );
        assert_eq!(manifest.fields[1].value, None);
    }

    #[test]
    fn test_unknown_field_type_is_rejected() {
        let err = FieldManifest::from_json(
            r#"{"fields": [{"id": "a", "type": "stamp", "x": 0, "y": 0, "width": 1, "height": 1, "page": 1}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("manifest"));
    }
}
