//! Translates canonical style names into the vector engine's vocabulary.
//!
//! The preview and export paths both build their [`EngineConfig`] through
//! [`build_engine_config`], so the two can never disagree on how a style
//! name maps to a shape.

use qrcode::EcLevel;

use crate::style::{CanonicalStyle, Color, CornerStyle, Paint, PatternStyle};

/// Quiet-zone width in modules.
pub const ENGINE_MARGIN: u32 = 1;

/// Module shapes understood by the vector engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotShape {
    Square,
    Dots,
    Rounded,
    /// Slightly inset squares.
    Pixel,
    /// Squares separated by a visible gap.
    Grid,
}

impl From<PatternStyle> for DotShape {
    fn from(style: PatternStyle) -> Self {
        match style {
            PatternStyle::Classic => Self::Square,
            PatternStyle::Dots => Self::Dots,
            PatternStyle::Rounded => Self::Rounded,
            PatternStyle::Pixels => Self::Pixel,
            PatternStyle::Grid => Self::Grid,
        }
    }
}

/// Finder pattern shapes understood by the vector engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerShape {
    Square,
    Rounded,
    Dot,
    ExtraRounded,
}

impl From<CornerStyle> for CornerShape {
    fn from(style: CornerStyle) -> Self {
        match style {
            CornerStyle::Square => Self::Square,
            CornerStyle::Rounded => Self::Rounded,
            CornerStyle::Circle => Self::Dot,
            CornerStyle::ExtraRounded => Self::ExtraRounded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    Byte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotsOptions {
    pub shape: DotShape,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CornerOptions {
    pub shape: CornerShape,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub source: String,
    /// Edge length as a fraction of the symbol.
    pub size: f32,
    /// Dots under the logo are left out.
    pub hide_background_dots: bool,
}

/// Everything a [`QrEngine`](crate::engine::QrEngine) needs to draw one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub mode: EncodeMode,
    pub ec_level: EcLevel,
    pub dots: DotsOptions,
    pub corners_square: CornerOptions,
    pub corners_dot: CornerOptions,
    /// `None` leaves the symbol transparent.
    pub background: Option<Paint>,
    pub image: Option<ImageOptions>,
}

/// Builds the engine configuration for `style` at `size` pixels.
pub fn build_engine_config(style: &CanonicalStyle, size: u32) -> EngineConfig {
    let ec_level = if style.logo.is_some() {
        EcLevel::H
    } else {
        EcLevel::M
    };

    EngineConfig {
        width: size,
        height: size,
        margin: ENGINE_MARGIN,
        mode: EncodeMode::Byte,
        ec_level,
        dots: DotsOptions {
            shape: style.pattern.into(),
            paint: style.pattern_paint.clone(),
        },
        corners_square: CornerOptions {
            shape: style.corner_frame.into(),
            color: style.corner_frame_color,
        },
        corners_dot: CornerOptions {
            shape: style.corner_dot.into(),
            color: style.corner_dot_color,
        },
        background: style.background.clone(),
        image: style.logo.as_ref().map(|logo| ImageOptions {
            source: logo.source.clone(),
            size: logo.size,
            hide_background_dots: true,
        }),
    }
}

/// The single color the plain renderer can use for a paint.
pub fn first_stop_color(paint: &Paint) -> Color {
    paint.first_color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignConfig;
    use crate::style::normalize;

    #[test]
    fn default_config() {
        let config = build_engine_config(&normalize(&DesignConfig::default()), 300);
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 300);
        assert_eq!(config.margin, 1);
        assert_eq!(config.mode, EncodeMode::Byte);
        assert_eq!(config.ec_level, EcLevel::M);
        assert_eq!(config.dots.shape, DotShape::Square);
        assert!(config.image.is_none());
    }

    #[test]
    fn logo_forces_high_ec() {
        let design = DesignConfig::new().with_logo("data:image/png;base64,AAAA");
        let config = build_engine_config(&normalize(&design), 256);
        assert_eq!(config.ec_level, EcLevel::H);
        assert!(config.image.as_ref().unwrap().hide_background_dots);
    }

    #[test]
    fn style_names_map_to_engine_shapes() {
        assert_eq!(DotShape::from(PatternStyle::Dots), DotShape::Dots);
        assert_eq!(DotShape::from(PatternStyle::Pixels), DotShape::Pixel);
        assert_eq!(DotShape::from(PatternStyle::Grid), DotShape::Grid);
        assert_eq!(CornerShape::from(CornerStyle::Circle), CornerShape::Dot);
        assert_eq!(
            CornerShape::from(CornerStyle::ExtraRounded),
            CornerShape::ExtraRounded
        );
    }

    #[test]
    fn first_stop_of_gradient() {
        let design = DesignConfig {
            pattern_use_gradient: Some(true),
            pattern_color1: Some("#ff0000".into()),
            pattern_color2: Some("#0000ff".into()),
            ..Default::default()
        };
        let style = normalize(&design);
        assert_eq!(first_stop_color(&style.pattern_paint), Color::new(255, 0, 0));
    }
}
