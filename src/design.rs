//! Caller-supplied design configuration.
//!
//! A [`DesignConfig`] is the loosely-typed object produced by whatever UI
//! collects the user's styling choices. Every field is optional, style names
//! are free-form strings, and several legacy aliases are still accepted.
//! Nothing here is validated: [`normalize`](crate::normalize) turns it into a
//! [`CanonicalStyle`](crate::CanonicalStyle).
//!
//! # Example
//!
//! ```
//! use qrframe_renderer::DesignConfig;
//!
//! let json = r##"{ "patternStyle": "dots", "qrColor": "#112233", "useGradientBg": "true" }"##;
//! let design = DesignConfig::from_json(json).unwrap();
//!
//! assert_eq!(design.pattern_style.as_deref(), Some("dots"));
//! assert_eq!(design.use_gradient_bg, Some(true));
//! ```

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// DesignConfig
// ============================================================================

/// Raw design configuration as it arrives from the caller.
///
/// # JSON Format
///
/// ```json
/// {
///   "patternStyle": "rounded",
///   "patternUseGradient": true,
///   "patternColor1": "#1e3a8a",
///   "patternColor2": "#9333ea",
///   "patternGradientType": "diagonal",
///   "patternBgTransparent": false,
///   "cornerFrameStyle": "extra-rounded",
///   "cornerDotStyle": "circle",
///   "frameStyle": "label",
///   "frameText": "Scan me",
///   "frameBgColor": "#000000"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct DesignConfig {
    /// Module shape: classic, dots, rounded, pixels, grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_color1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_color2: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub pattern_use_gradient: Option<bool>,
    /// vertical, horizontal, diagonal, inverse-diagonal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_gradient_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_bg_color1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_bg_color2: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub pattern_bg_use_gradient: Option<bool>,
    /// Linear variants plus radial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_bg_gradient_type: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub pattern_bg_transparent: Option<bool>,

    /// Finder pattern outer square: square, rounded, circle, extra-rounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_frame_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_frame_color: Option<String>,
    /// Finder pattern center dot: square, rounded, circle, extra-rounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_dot_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_dot_color: Option<String>,

    /// Logo image reference (data URI or URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Logo edge length as a fraction of the symbol.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_f32")]
    pub logo_size: Option<f32>,

    /// none, label, tag, bubble, badge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_color1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_color2: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub frame_use_gradient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_gradient_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_bg_color1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_bg_color2: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub frame_bg_use_gradient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_bg_gradient_type: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub frame_bg_transparent: Option<bool>,

    // ---- Legacy aliases ----
    /// Legacy alias of `patternColor`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_color: Option<String>,
    /// Legacy alias of `patternBgColor`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Legacy alias of `patternBgColor1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color1: Option<String>,
    /// Legacy alias of `patternBgColor2`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color2: Option<String>,
    /// Legacy alias of `patternBgUseGradient`.
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_bool"
    )]
    pub use_gradient_bg: Option<bool>,
}

impl DesignConfig {
    /// Creates an empty design; every field falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frame style and label text.
    pub fn with_frame(mut self, style: impl Into<String>, text: impl Into<String>) -> Self {
        self.frame_style = Some(style.into());
        self.frame_text = Some(text.into());
        self
    }

    /// Sets the solid module color.
    pub fn with_pattern_color(mut self, color: impl Into<String>) -> Self {
        self.pattern_color = Some(color.into());
        self
    }

    /// Sets the logo reference.
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Serializes the design to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the design to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a design from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Accepts `true`, `"true"`, `"1"`, `1` and their negatives. Anything else
/// reads as absent rather than failing the whole document.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => Some(b),
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|n| n != 0.0),
        Some(serde_json::Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Accepts numbers and numeric strings. Anything else reads as absent.
fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|n| n as f32),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f32>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

// ============================================================================
// Tests
// ============================================================================
