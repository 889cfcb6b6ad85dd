//! Embedding configuration
//!
//! All lengths are editor (UI) pixels; they are multiplied by the page
//! scale before drawing so output matches the editor preview on any page
//! size. Configuration can be loaded from TOML, with every key optional.

use crate::date::DateFormatPolicy;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared_pdf::PagePolicy;
use std::fs;
use std::path::Path;

/// RGB color with components in 0.0..=1.0
pub type Rgb = [f32; 3];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Out-of-range page handling (default: lenient fallback to page 1)
    pub page_policy: PagePolicy,
    pub date: DateFormatPolicy,
    pub text: TextLayout,
    pub checkbox: MarkStyle,
}

impl EmbedConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use fieldsign_core::EmbedConfig;
    /// use shared_pdf::PagePolicy;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = EmbedConfig::from_toml_str(r#"
    ///     page_policy = "strict"
    ///
    ///     [date]
    ///     locale = "en_US"
    /// "#)?;
    /// assert_eq!(config.page_policy, PagePolicy::Strict);
    /// assert_eq!(config.date.pattern, "%-d %B %Y");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    pub fn with_page_policy(mut self, policy: PagePolicy) -> Self {
        self.page_policy = policy;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.date.locale = locale.into();
        self
    }
}

/// Single-line text placement inside a field box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayout {
    pub font_size: f64,
    /// Left inset, matching the editor's field padding
    pub padding: f64,
    /// Baseline distance from the box top, as a fraction of box height
    pub baseline_ratio: f64,
    /// Baseline distance from the top when the field has no height
    pub default_baseline_offset: f64,
    pub color: Rgb,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            padding: 4.0,
            baseline_ratio: 0.65,
            default_baseline_offset: 12.0,
            color: [0.0, 0.0, 0.0],
        }
    }
}

/// Checkbox and radio appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkStyle {
    /// Side of the drawn box, independent of the field's own size
    pub size: f64,
    pub border_width: f64,
    pub border_color: Rgb,
    pub check_color: Rgb,
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            border_width: 1.0,
            border_color: [0.0, 0.0, 0.0],
            check_color: [0.0, 0.6, 0.0],
        }
    }
}
