use std::fmt;
use std::str::FromStr;

/// Kind of a user-placed field, as stored alongside its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Signature,
    Initials,
    Text,
    Name,
    Hyperlink,
    Date,
    Checkbox,
    Radio,
    Image,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Signature => "signature",
            FieldKind::Initials => "initials",
            FieldKind::Text => "text",
            FieldKind::Name => "name",
            FieldKind::Hyperlink => "hyperlink",
            FieldKind::Date => "date",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Image => "image",
        }
    }

    /// Fields whose value is a raster image
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            FieldKind::Signature | FieldKind::Initials | FieldKind::Image
        )
    }

    /// Fields whose value is a boolean mark
    pub fn is_mark(&self) -> bool {
        matches!(self, FieldKind::Checkbox | FieldKind::Radio)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field type: {0}")]
pub struct UnknownFieldKind(pub String);

impl FromStr for FieldKind {
    type Err = UnknownFieldKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signature" => Ok(FieldKind::Signature),
            "initials" => Ok(FieldKind::Initials),
            "text" => Ok(FieldKind::Text),
            "name" => Ok(FieldKind::Name),
            "hyperlink" => Ok(FieldKind::Hyperlink),
            "date" => Ok(FieldKind::Date),
            "checkbox" => Ok(FieldKind::Checkbox),
            "radio" => Ok(FieldKind::Radio),
            "image" => Ok(FieldKind::Image),
            other => Err(UnknownFieldKind(other.to_string())),
        }
    }
}

/// Field rectangle in editor (UI) space.
///
/// Values are pixels at the editor's fixed 612px reference width with a
/// top-left origin. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page: u32,
}

impl FieldPosition {
    pub fn new(x: f64, y: f64, width: f64, height: f64, page: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            page,
        }
    }

    /// Same rectangle on another page
    pub fn on_page(self, page: u32) -> Self {
        Self { page, ..self }
    }

    /// Text fields may be stored without a height
    pub fn has_height(&self) -> bool {
        self.height > 0.0
    }
}

/// A field as persisted by the document layer: type, placement and raw value
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(flatten)]
    pub position: FieldPosition,
    #[serde(default)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_kind_parses_case_insensitively() {
        assert_eq!("Signature".parse::<FieldKind>(), Ok(FieldKind::Signature));
        assert_eq!(" radio ".parse::<FieldKind>(), Ok(FieldKind::Radio));
        assert!("stamp".parse::<FieldKind>().is_err());
    }

    #[test]
    fn test_field_kind_display_matches_serde_name() {
        for kind in [
            FieldKind::Signature,
            FieldKind::Initials,
            FieldKind::Text,
            FieldKind::Name,
            FieldKind::Hyperlink,
            FieldKind::Date,
            FieldKind::Checkbox,
            FieldKind::Radio,
            FieldKind::Image,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_field_spec_deserializes_flat_position() {
        let json = r#"{"id":"f1","type":"date","x":10,"y":20.5,"width":120,"height":30,"page":2,"value":"2025-01-17"}"#;
        let spec: FieldSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind, FieldKind::Date);
        assert_eq!(spec.position, FieldPosition::new(10.0, 20.5, 120.0, 30.0, 2));
        assert_eq!(spec.value.as_deref(), Some("2025-01-17"));
    }

    #[test]
    fn test_field_spec_value_is_optional() {
        let json = r#"{"id":"f2","type":"checkbox","x":0,"y":0,"width":20,"height":20,"page":1}"#;
        let spec: FieldSpec = serde_json::from_str(json).unwrap();
        assert!(spec.value.is_none());
        assert!(spec.kind.is_mark());
    }

    #[test]
    fn test_zero_height_means_unknown() {
        let pos = FieldPosition::new(5.0, 5.0, 100.0, 0.0, 1);
        assert!(!pos.has_height());
        assert_eq!(pos.on_page(3).page, 3);
    }
}
