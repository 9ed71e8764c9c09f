//! Canonical style descriptor and the design normalizer.
//!
//! [`normalize`] is the single place where a loose [`DesignConfig`] becomes a
//! fully resolved [`CanonicalStyle`]. Both the preview and the export paths
//! consume the canonical form, never the raw design.
//!
//! Field precedence is always: explicit pattern-prefixed field, then legacy
//! alias, then the hard default (`#000000` foreground, `#ffffff` background).

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::design::DesignConfig;

const DEFAULT_FOREGROUND: Color = Color::BLACK;
const DEFAULT_BACKGROUND: Color = Color::WHITE;
const DEFAULT_LOGO_SIZE: f32 = 0.4;

// ============================================================================
// Color
// ============================================================================

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`, with or without the leading `#`.
    pub fn parse(s: &str) -> Option<Self> {
        let rgb = Srgb::<u8>::from_str(s.trim()).ok()?;
        Some(Self::new(rgb.red, rgb.green, rgb.blue))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

// ============================================================================
// Paint
// ============================================================================

/// Direction names accepted for gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    Vertical,
    Horizontal,
    Diagonal,
    InverseDiagonal,
    Radial,
}

impl GradientDirection {
    /// Parses a direction name. `radial` is only honoured when `allow_radial`
    /// is set; anything unknown reads as vertical.
    pub fn parse(name: Option<&str>, allow_radial: bool) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("horizontal") => Self::Horizontal,
            Some("diagonal") => Self::Diagonal,
            Some("inverse-diagonal") | Some("inverse_diagonal") | Some("inversediagonal") => {
                Self::InverseDiagonal
            }
            Some("radial") if allow_radial => Self::Radial,
            _ => Self::Vertical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Diagonal => "diagonal",
            Self::InverseDiagonal => "inverse-diagonal",
            Self::Radial => "radial",
        }
    }

    /// Fixed angle lookup. Radial has no angle.
    pub fn angle(&self) -> Option<f32> {
        match self {
            Self::Vertical => Some(0.0),
            Self::Horizontal => Some(90.0),
            Self::Diagonal => Some(45.0),
            Self::InverseDiagonal => Some(135.0),
            Self::Radial => None,
        }
    }

    /// Inverse of [`angle`](Self::angle) for the four linear directions.
    pub fn from_angle(angle: f32) -> Self {
        match angle.rem_euclid(180.0).round() as u32 {
            90 => Self::Horizontal,
            45 => Self::Diagonal,
            135 => Self::InverseDiagonal,
            _ => Self::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GradientKind {
    /// Angle in degrees. 0 runs top to bottom, 90 left to right.
    Linear { angle: f32 },
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// Two-stop gradient in the given direction.
    pub fn two_stop(direction: GradientDirection, from: Color, to: Color) -> Self {
        let kind = match direction.angle() {
            Some(angle) => GradientKind::Linear { angle },
            None => GradientKind::Radial,
        };
        Self {
            kind,
            stops: vec![
                GradientStop { offset: 0.0, color: from },
                GradientStop { offset: 1.0, color: to },
            ],
        }
    }

    pub fn direction(&self) -> GradientDirection {
        match self.kind {
            GradientKind::Linear { angle } => GradientDirection::from_angle(angle),
            GradientKind::Radial => GradientDirection::Radial,
        }
    }

    /// Start and end points of a linear gradient inside a `w x h` box at
    /// `(x, y)`. Radial gradients return the box center twice.
    pub fn endpoints(&self, x: f32, y: f32, w: f32, h: f32) -> ((f32, f32), (f32, f32)) {
        let (cx, cy) = (x + w / 2.0, y + h / 2.0);
        match self.kind {
            GradientKind::Linear { angle } => {
                let rad = angle.to_radians();
                let (dx, dy) = (rad.sin() * w / 2.0, rad.cos() * h / 2.0);
                ((cx - dx, cy - dy), (cx + dx, cy + dy))
            }
            GradientKind::Radial => ((cx, cy), (cx, cy)),
        }
    }
}

/// A solid color or a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paint {
    Solid(Color),
    Gradient(Gradient),
}

impl Paint {
    pub fn is_gradient(&self) -> bool {
        matches!(self, Self::Gradient(_))
    }

    /// The solid color, or the first stop of a gradient.
    pub fn first_color(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient(g) => g.stops.first().map(|s| s.color).unwrap_or(DEFAULT_FOREGROUND),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

// ============================================================================
// Style enums
// ============================================================================

/// Shape of the data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternStyle {
    #[default]
    Classic,
    Dots,
    Rounded,
    Pixels,
    Grid,
}

impl PatternStyle {
    pub fn parse(name: Option<&str>) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("dots") => Self::Dots,
            Some("rounded") => Self::Rounded,
            Some("pixels") => Self::Pixels,
            Some("grid") => Self::Grid,
            _ => Self::Classic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Dots => "dots",
            Self::Rounded => "rounded",
            Self::Pixels => "pixels",
            Self::Grid => "grid",
        }
    }
}

/// Shape of a finder pattern square or its center dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerStyle {
    #[default]
    Square,
    Rounded,
    Circle,
    ExtraRounded,
}

impl CornerStyle {
    pub fn parse(name: Option<&str>) -> Self {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("rounded") => Self::Rounded,
            Some("circle") | Some("dot") => Self::Circle,
            Some("extra-rounded") | Some("extra_rounded") => Self::ExtraRounded,
            _ => Self::Square,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rounded => "rounded",
            Self::Circle => "circle",
            Self::ExtraRounded => "extra-rounded",
        }
    }
}

/// Decorative frame variants. "none" is represented by the absence of a
/// [`FrameStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameKind {
    Label,
    Tag,
    Bubble,
    Badge,
}

impl FrameKind {
    pub fn parse(name: Option<&str>) -> Option<Self> {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("label") => Some(Self::Label),
            Some("tag") => Some(Self::Tag),
            Some("bubble") => Some(Self::Bubble),
            Some("badge") => Some(Self::Badge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Tag => "tag",
            Self::Bubble => "bubble",
            Self::Badge => "badge",
        }
    }
}

// ============================================================================
// CanonicalStyle
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    /// Image reference as supplied (data URI or URL).
    pub source: String,
    /// Edge length as a fraction of the symbol, 0.1..=0.5.
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStyle {
    pub kind: FrameKind,
    /// Label text, already trimmed and never empty.
    pub text: String,
    /// Border and text paint.
    pub paint: Paint,
    /// `None` means transparent.
    pub background: Option<Paint>,
}

/// Fully resolved style shared by every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalStyle {
    pub pattern: PatternStyle,
    pub pattern_paint: Paint,
    /// Symbol background. `None` means transparent.
    pub background: Option<Paint>,
    pub corner_frame: CornerStyle,
    pub corner_frame_color: Color,
    pub corner_dot: CornerStyle,
    pub corner_dot_color: Color,
    pub logo: Option<Logo>,
    pub frame: Option<FrameStyle>,
}

impl Default for CanonicalStyle {
    fn default() -> Self {
        normalize(&DesignConfig::default())
    }
}

impl CanonicalStyle {
    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Converts back to a design that normalizes to this same style.
    pub fn to_design(&self) -> DesignConfig {
        let mut design = DesignConfig {
            pattern_style: Some(self.pattern.as_str().to_string()),
            corner_frame_style: Some(self.corner_frame.as_str().to_string()),
            corner_frame_color: Some(self.corner_frame_color.to_hex()),
            corner_dot_style: Some(self.corner_dot.as_str().to_string()),
            corner_dot_color: Some(self.corner_dot_color.to_hex()),
            ..DesignConfig::default()
        };

        let (color, c1, c2, gradient, ty) = paint_fields(&self.pattern_paint);
        design.pattern_color = color;
        design.pattern_color1 = c1;
        design.pattern_color2 = c2;
        design.pattern_use_gradient = Some(gradient);
        design.pattern_gradient_type = ty;

        match &self.background {
            None => design.pattern_bg_transparent = Some(true),
            Some(paint) => {
                let (color, c1, c2, gradient, ty) = paint_fields(paint);
                design.pattern_bg_transparent = Some(false);
                design.pattern_bg_color = color;
                design.pattern_bg_color1 = c1;
                design.pattern_bg_color2 = c2;
                design.pattern_bg_use_gradient = Some(gradient);
                design.pattern_bg_gradient_type = ty;
            }
        }

        if let Some(logo) = &self.logo {
            design.logo = Some(logo.source.clone());
            design.logo_size = Some(logo.size);
        }

        match &self.frame {
            None => design.frame_style = Some("none".to_string()),
            Some(frame) => {
                design.frame_style = Some(frame.kind.as_str().to_string());
                design.frame_text = Some(frame.text.clone());
                let (color, c1, c2, gradient, ty) = paint_fields(&frame.paint);
                design.frame_color = color;
                design.frame_color1 = c1;
                design.frame_color2 = c2;
                design.frame_use_gradient = Some(gradient);
                design.frame_gradient_type = ty;
                match &frame.background {
                    None => design.frame_bg_transparent = Some(true),
                    Some(paint) => {
                        let (color, c1, c2, gradient, ty) = paint_fields(paint);
                        design.frame_bg_transparent = Some(false);
                        design.frame_bg_color = color;
                        design.frame_bg_color1 = c1;
                        design.frame_bg_color2 = c2;
                        design.frame_bg_use_gradient = Some(gradient);
                        design.frame_bg_gradient_type = ty;
                    }
                }
            }
        }

        design
    }
}

type PaintFields = (
    Option<String>,
    Option<String>,
    Option<String>,
    bool,
    Option<String>,
);

fn paint_fields(paint: &Paint) -> PaintFields {
    match paint {
        Paint::Solid(color) => (Some(color.to_hex()), None, None, false, None),
        Paint::Gradient(g) => {
            let first = g.stops.first().map(|s| s.color).unwrap_or(DEFAULT_FOREGROUND);
            let last = g.stops.last().map(|s| s.color).unwrap_or(first);
            (
                None,
                Some(first.to_hex()),
                Some(last.to_hex()),
                true,
                Some(g.direction().as_str().to_string()),
            )
        }
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Returns the first candidate that parses as a color.
fn pick(candidates: &[Option<&String>]) -> Option<Color> {
    candidates
        .iter()
        .flatten()
        .find_map(|s| Color::parse(s.as_str()))
}

fn resolve_paint(
    use_gradient: bool,
    first: Option<Color>,
    second: Option<Color>,
    solid: Option<Color>,
    direction: GradientDirection,
    fallback: Color,
) -> Paint {
    if use_gradient {
        let from = first.or(solid).unwrap_or(fallback);
        let to = second.unwrap_or(from);
        Paint::Gradient(Gradient::two_stop(direction, from, to))
    } else {
        Paint::Solid(solid.unwrap_or(fallback))
    }
}

/// Turns a loose design into the canonical style. Total and pure.
///
/// # Example
///
/// ```
/// use qrframe_renderer::{normalize, Color, DesignConfig, Paint};
///
/// let style = normalize(&DesignConfig::default());
/// assert_eq!(style.pattern_paint, Paint::Solid(Color::BLACK));
/// assert_eq!(style.background, Some(Paint::Solid(Color::WHITE)));
/// assert!(style.frame.is_none());
/// ```
pub fn normalize(design: &DesignConfig) -> CanonicalStyle {
    let pattern = PatternStyle::parse(design.pattern_style.as_deref());

    let pattern_paint = resolve_paint(
        design.pattern_use_gradient.unwrap_or(false),
        pick(&[design.pattern_color1.as_ref()]),
        pick(&[design.pattern_color2.as_ref()]),
        pick(&[design.pattern_color.as_ref(), design.qr_color.as_ref()]),
        GradientDirection::parse(design.pattern_gradient_type.as_deref(), false),
        DEFAULT_FOREGROUND,
    );

    let background = if design.pattern_bg_transparent.unwrap_or(false) {
        None
    } else {
        let use_gradient = design
            .pattern_bg_use_gradient
            .or(design.use_gradient_bg)
            .unwrap_or(false);
        Some(resolve_paint(
            use_gradient,
            pick(&[design.pattern_bg_color1.as_ref(), design.bg_color1.as_ref()]),
            pick(&[design.pattern_bg_color2.as_ref(), design.bg_color2.as_ref()]),
            pick(&[design.pattern_bg_color.as_ref(), design.bg_color.as_ref()]),
            GradientDirection::parse(design.pattern_bg_gradient_type.as_deref(), true),
            DEFAULT_BACKGROUND,
        ))
    };

    let module_color = pattern_paint.first_color();
    let corner_frame_color = pick(&[design.corner_frame_color.as_ref()]).unwrap_or(module_color);
    let corner_dot_color = pick(&[design.corner_dot_color.as_ref()]).unwrap_or(module_color);

    let logo = design
        .logo
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|source| Logo {
            source: source.to_string(),
            size: design
                .logo_size
                .filter(|s| s.is_finite())
                .unwrap_or(DEFAULT_LOGO_SIZE)
                .clamp(0.1, 0.5),
        });

    CanonicalStyle {
        pattern,
        pattern_paint,
        background,
        corner_frame: CornerStyle::parse(design.corner_frame_style.as_deref()),
        corner_frame_color,
        corner_dot: CornerStyle::parse(design.corner_dot_style.as_deref()),
        corner_dot_color,
        logo,
        frame: normalize_frame(design),
    }
}

fn normalize_frame(design: &DesignConfig) -> Option<FrameStyle> {
    let kind = FrameKind::parse(design.frame_style.as_deref())?;
    let text = design.frame_text.as_deref().map(str::trim).unwrap_or("");
    if text.is_empty() {
        return None;
    }

    let paint = resolve_paint(
        design.frame_use_gradient.unwrap_or(false),
        pick(&[design.frame_color1.as_ref()]),
        pick(&[design.frame_color2.as_ref()]),
        pick(&[design.frame_color.as_ref()]),
        GradientDirection::parse(design.frame_gradient_type.as_deref(), false),
        DEFAULT_FOREGROUND,
    );

    let background = if design.frame_bg_transparent.unwrap_or(false) {
        None
    } else {
        Some(resolve_paint(
            design.frame_bg_use_gradient.unwrap_or(false),
            pick(&[design.frame_bg_color1.as_ref()]),
            pick(&[design.frame_bg_color2.as_ref()]),
            pick(&[design.frame_bg_color.as_ref()]),
            GradientDirection::parse(design.frame_bg_gradient_type.as_deref(), true),
            DEFAULT_BACKGROUND,
        ))
    };

    Some(FrameStyle {
        kind,
        text: text.to_string(),
        paint,
        background,
    })
}

// ============================================================================
// Tests
// ============================================================================
