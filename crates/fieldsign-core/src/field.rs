//! Conversion of stored field values into drawable content

use crate::date::parse_date_value;
use crate::error::EmbedFailure;
use crate::image::ImageBlob;
use chrono::NaiveDate;
use shared_types::FieldKind;

/// A field value in the shape its renderer needs
#[derive(Debug, Clone, PartialEq)]
pub enum FieldContent {
    Image(ImageBlob),
    Text(String),
    Date(NaiveDate),
    Checked(bool),
}

impl FieldContent {
    /// Decode a stored string value for a field of `kind`
    pub fn from_raw(kind: FieldKind, raw: &str) -> Result<Self, EmbedFailure> {
        match kind {
            FieldKind::Signature | FieldKind::Initials | FieldKind::Image => {
                Ok(FieldContent::Image(ImageBlob::from_data_url(raw)?))
            }
            FieldKind::Text | FieldKind::Name | FieldKind::Hyperlink => {
                Ok(FieldContent::Text(raw.to_string()))
            }
            FieldKind::Date => Ok(FieldContent::Date(parse_date_value(raw)?)),
            FieldKind::Checkbox | FieldKind::Radio => {
                parse_checked(raw)
                    .map(FieldContent::Checked)
                    .ok_or_else(|| EmbedFailure::InvalidValue {
                        kind,
                        value: raw.to_string(),
                    })
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            FieldContent::Image(_) => "image",
            FieldContent::Text(_) => "text",
            FieldContent::Date(_) => "date",
            FieldContent::Checked(_) => "checked-state",
        }
    }

    /// Whether a field of `kind` can render this content
    pub fn fits(&self, kind: FieldKind) -> bool {
        match self {
            FieldContent::Image(_) => kind.is_image(),
            FieldContent::Text(_) => matches!(
                kind,
                FieldKind::Text | FieldKind::Name | FieldKind::Hyperlink
            ),
            FieldContent::Date(_) => kind == FieldKind::Date,
            FieldContent::Checked(_) => kind.is_mark(),
        }
    }
}

/// Parse a checkbox/radio value; empty counts as unchecked
pub fn parse_checked(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "checked" | "x" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_kinds_keep_value_verbatim() {
        for kind in [FieldKind::Text, FieldKind::Name, FieldKind::Hyperlink] {
            assert_eq!(
                FieldContent::from_raw(kind, " https://example.com ").unwrap(),
                FieldContent::Text(" https://example.com ".to_string())
            );
        }
    }

    #[test]
    fn test_date_value() {
        assert_eq!(
            FieldContent::from_raw(FieldKind::Date, "2025-01-17").unwrap(),
            FieldContent::Date(NaiveDate::from_ymd_opt(2025, 1, 17).unwrap())
        );
        assert!(matches!(
            FieldContent::from_raw(FieldKind::Date, "tomorrow"),
            Err(EmbedFailure::InvalidDate(_))
        ));
    }

    #[test]
    fn test_checked_values() {
        for raw in ["true", "TRUE", "1", "yes", "On", "checked", "x"] {
            assert_eq!(parse_checked(raw), Some(true), "{}", raw);
        }
        for raw in ["false", "0", "no", "off", "", "  "] {
            assert_eq!(parse_checked(raw), Some(false), "{:?}", raw);
        }
        assert_eq!(parse_checked("maybe"), None);
    }

    #[test]
    fn test_invalid_mark_value_names_kind() {
        let err = FieldContent::from_raw(FieldKind::Radio, "maybe").unwrap_err();
        assert_eq!(err.to_string(), "Invalid radio value: \"maybe\"");
    }

    #[test]
    fn test_image_kinds_require_data_url() {
        assert!(matches!(
            FieldContent::from_raw(FieldKind::Signature, "data:image/png,raw"),
            Err(EmbedFailure::InvalidDataUrl(_))
        ));
        assert!(matches!(
            FieldContent::from_raw(FieldKind::Initials, "!!not base64!!"),
            Err(EmbedFailure::InvalidDataUrl(_))
        ));
    }

    #[test]
    fn test_fits() {
        let checked = FieldContent::Checked(true);
        assert!(checked.fits(FieldKind::Radio));
        assert!(!checked.fits(FieldKind::Text));
        assert!(FieldContent::Text(String::new()).fits(FieldKind::Hyperlink));
        assert!(!FieldContent::Text(String::new()).fits(FieldKind::Date));
    }
}
