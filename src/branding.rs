use serde::{Deserialize, Serialize};

use crate::error::ProfilePdfError;
use crate::types::Color;

const DEFAULT_COMPANY_NAME: &str = "Celerates";
const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";

/// Branding options as edited in the profile form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingConfig {
    /// Company name used for the header and watermark
    #[serde(default = "default_company_name")]
    pub company_name: String,

    /// Logo reference; reserved, no template draws it yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Primary color in `#rgb` or `#rrggbb` form
    #[serde(default = "default_primary_color")]
    pub primary_color: String,

    #[serde(default)]
    pub include_watermark: bool,
}

fn default_company_name() -> String {
    DEFAULT_COMPANY_NAME.to_string()
}

fn default_primary_color() -> String {
    DEFAULT_PRIMARY_COLOR.to_string()
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            logo: None,
            primary_color: default_primary_color(),
            include_watermark: false,
        }
    }
}

impl BrandingConfig {
    pub fn new(company_name: impl Into<String>, primary_color: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            primary_color: primary_color.into(),
            ..Self::default()
        }
    }

    pub fn with_watermark(mut self, include: bool) -> Self {
        self.include_watermark = include;
        self
    }

    /// Checks the color once, up front, so layout code only ever sees a
    /// parsed [`Color`].
    pub fn resolve(&self) -> Result<Branding, ProfilePdfError> {
        let primary = Color::from_hex(&self.primary_color)
            .ok_or_else(|| ProfilePdfError::MalformedBrandingColor(self.primary_color.clone()))?;
        Ok(Branding {
            company_name: self.company_name.clone(),
            primary,
            include_watermark: self.include_watermark,
        })
    }
}

/// Validated branding handed to the layout routines.
#[derive(Debug, Clone, PartialEq)]
pub struct Branding {
    pub company_name: String,
    pub primary: Color,
    pub include_watermark: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form() {
        let config = BrandingConfig::default();
        assert_eq!(config.company_name, "Celerates");
        assert_eq!(config.primary_color, "#3b82f6");
        assert!(!config.include_watermark);
        assert!(config.logo.is_none());
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let config: BrandingConfig =
            serde_json::from_str(r#"{"includeWatermark": true}"#).unwrap();
        assert_eq!(config.company_name, "Celerates");
        assert!(config.include_watermark);
    }

    #[test]
    fn resolve_parses_the_primary_color() {
        let branding = BrandingConfig::new("Acme", "#f00").resolve().unwrap();
        assert_eq!(branding.primary, Color::rgb8(255, 0, 0));
        assert_eq!(branding.company_name, "Acme");
    }

    #[test]
    fn resolve_rejects_malformed_colors() {
        let err = BrandingConfig::new("Acme", "blue").resolve().unwrap_err();
        assert!(matches!(err, ProfilePdfError::MalformedBrandingColor(ref raw) if raw == "blue"));
    }
}
