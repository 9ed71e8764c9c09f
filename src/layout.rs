//! Shared frame geometry.
//!
//! [`compute_frame_layout`] is the only place frame constants live. The DOM
//! compositor turns a [`FrameLayout`] into CSS and the canvas compositor turns
//! the same value into drawing calls, so the preview and the exported raster
//! cannot drift apart.
//!
//! All constants are designed against a 256 px baseline and scale as
//! `max(baseline, baseline * pixel_size / 256)`.

use crate::style::{Color, FrameKind, FrameStyle, Paint};

/// Reference canvas edge the baseline constants were designed for.
pub const BASELINE_SIZE: f32 = 256.0;
/// QR bitmap edge as a fraction of the canvas when a frame is drawn.
pub const QR_SCALE: f32 = 0.65;

pub const BORDER_WIDTH: f32 = 3.0;
pub const PADDING: f32 = 10.0;
pub const LABEL_HEIGHT: f32 = 32.0;
pub const LABEL_MARGIN: f32 = 6.0;
pub const FONT_SIZE: f32 = 14.0;
pub const SHADOW_OFFSET: f32 = 2.0;
pub const SHADOW_BLUR: f32 = 6.0;
/// Shadow opacity, 0..=1.
pub const SHADOW_ALPHA: f32 = 0.15;

pub const RADIUS_DEFAULT: f32 = 8.0;
pub const RADIUS_BADGE: f32 = 16.0;
pub const RADIUS_BUBBLE: f32 = 24.0;
pub const RADIUS_TAG: f32 = 12.0;

/// Border drawn around a bare (unframed) preview.
pub const BARE_BORDER_WIDTH: f32 = 1.0;
pub const BARE_BORDER_COLOR: Color = Color::new(0xe5, 0xe7, 0xeb);

/// Label font stack shared by the CSS and canvas compositors.
pub const LABEL_FONT_FAMILY: &str =
    "Inter, Helvetica, Arial, 'Liberation Sans', 'DejaVu Sans', sans-serif";

/// Red-channel threshold below which a `label` background counts as dark.
pub const DARK_LABEL_THRESHOLD: u8 = 80;

/// Scales a baseline constant to `pixel_size`, never going below the baseline.
pub fn scaled(baseline: f32, pixel_size: u32) -> f32 {
    baseline.max(baseline * pixel_size as f32 / BASELINE_SIZE)
}

// ============================================================================
// Geometry types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrinks the rect by `by` on every side.
    pub fn inset(&self, by: f32) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            (self.width - 2.0 * by).max(0.0),
            (self.height - 2.0 * by).max(0.0),
        )
    }
}

/// Per-corner radii.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Corners {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl Corners {
    pub fn uniform(r: f32) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_right: f(self.bottom_right),
            bottom_left: f(self.bottom_left),
        }
    }

    pub fn as_array(&self) -> [f32; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// CSS `border-radius` shorthand, in pixels.
    pub fn to_css(&self) -> String {
        format!(
            "{:.1}px {:.1}px {:.1}px {:.1}px",
            self.top_left, self.top_right, self.bottom_right, self.bottom_left
        )
    }
}

// ============================================================================
// FrameLayout
// ============================================================================

/// Resolved frame geometry for one pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameLayout {
    pub pixel_size: u32,
    pub kind: FrameKind,
    pub border_width: f32,
    pub padding: f32,
    /// Padding between the inner background edge and the QR bitmap.
    pub inner_padding: f32,
    pub label_height: f32,
    pub label_margin: f32,
    pub font_size: f32,
    pub shadow_offset: f32,
    pub shadow_blur: f32,
    /// Outer frame corners.
    pub radius: Corners,
    /// Inner QR background corners.
    pub inner_radius: Corners,
    /// Label band background corners (top edge only).
    pub label_radius: Corners,
    /// Frame body including its border.
    pub outer_rect: Rect,
    /// Band that holds the label text, inside the border.
    pub label_rect: Rect,
    /// Label band background for the `label` style; covers the top border.
    pub label_background_rect: Rect,
    /// QR background area.
    pub inner_rect: Rect,
    /// Where the QR bitmap is drawn.
    pub qr_rect: Rect,
}

fn outer_radius(kind: FrameKind, pixel_size: u32) -> Corners {
    match kind {
        FrameKind::Bubble => Corners::uniform(scaled(RADIUS_BUBBLE, pixel_size)),
        FrameKind::Badge => Corners::uniform(scaled(RADIUS_BADGE, pixel_size)),
        FrameKind::Tag => {
            let r = scaled(RADIUS_TAG, pixel_size);
            Corners {
                top_left: 0.0,
                ..Corners::uniform(r)
            }
        }
        FrameKind::Label => Corners::uniform(scaled(RADIUS_DEFAULT, pixel_size)),
    }
}

/// Computes the frame geometry for `kind` on a `pixel_size` square canvas.
pub fn compute_frame_layout(kind: FrameKind, pixel_size: u32) -> FrameLayout {
    let size = pixel_size as f32;
    let border_width = scaled(BORDER_WIDTH, pixel_size);
    let padding = scaled(PADDING, pixel_size);
    let inner_padding = padding / 2.0;
    let label_height = scaled(LABEL_HEIGHT, pixel_size);
    let label_margin = scaled(LABEL_MARGIN, pixel_size);
    let font_size = scaled(FONT_SIZE, pixel_size);
    let shadow_offset = scaled(SHADOW_OFFSET, pixel_size);
    let shadow_blur = scaled(SHADOW_BLUR, pixel_size);

    // Vertical space the frame needs besides the QR bitmap itself.
    let overhead =
        2.0 * border_width + label_height + label_margin + padding + 2.0 * inner_padding;
    let available = size - 2.0 * shadow_blur - overhead;
    let qr_side = (size * QR_SCALE).round().min(available.floor()).max(0.0);

    let inner_side = qr_side + 2.0 * inner_padding;
    let outer_width = inner_side + 2.0 * padding + 2.0 * border_width;
    let outer_height =
        2.0 * border_width + label_height + label_margin + inner_side + padding;
    let outer_rect = Rect::new(
        ((size - outer_width) / 2.0).round(),
        ((size - outer_height) / 2.0).round(),
        outer_width,
        outer_height,
    );

    let label_rect = Rect::new(
        outer_rect.x + border_width,
        outer_rect.y + border_width,
        outer_width - 2.0 * border_width,
        label_height,
    );
    let label_background_rect = Rect::new(
        outer_rect.x,
        outer_rect.y,
        outer_width,
        border_width + label_height,
    );
    let inner_rect = Rect::new(
        outer_rect.x + border_width + padding,
        label_rect.bottom() + label_margin,
        inner_side,
        inner_side,
    );
    let qr_rect = inner_rect.inset(inner_padding);

    let radius = outer_radius(kind, pixel_size);
    let inner_radius = radius.map(|r| r / 2.0);
    let label_radius = Corners {
        top_left: radius.top_left,
        top_right: radius.top_right,
        bottom_right: 0.0,
        bottom_left: 0.0,
    };

    FrameLayout {
        pixel_size,
        kind,
        border_width,
        padding,
        inner_padding,
        label_height,
        label_margin,
        font_size,
        shadow_offset,
        shadow_blur,
        radius,
        inner_radius,
        label_radius,
        outer_rect,
        label_rect,
        label_background_rect,
        inner_rect,
        qr_rect,
    }
}

/// Picks the label text color.
///
/// A gradient background always gets white text. A solid `label` background
/// whose red channel is below the threshold also gets white. Everything else
/// uses the frame's own color. The red channel is a cheap stand-in for
/// luminance and is kept for parity with existing exports.
pub fn label_text_color(frame: &FrameStyle) -> Color {
    match &frame.background {
        Some(paint) if paint.is_gradient() => Color::WHITE,
        Some(Paint::Solid(bg))
            if frame.kind == FrameKind::Label && bg.r < DARK_LABEL_THRESHOLD =>
        {
            Color::WHITE
        }
        _ => frame.paint.first_color(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignConfig;
    use crate::style::normalize;

    fn frame(design: DesignConfig) -> FrameStyle {
        normalize(&design).frame.expect("frame")
    }

    #[test]
    fn baseline_values_at_256() {
        let layout = compute_frame_layout(FrameKind::Label, 256);
        assert_eq!(layout.border_width, BORDER_WIDTH);
        assert_eq!(layout.padding, PADDING);
        assert_eq!(layout.label_height, LABEL_HEIGHT);
        assert_eq!(layout.radius, Corners::uniform(RADIUS_DEFAULT));
    }

    #[test]
    fn constants_scale_with_size() {
        let layout = compute_frame_layout(FrameKind::Label, 1024);
        assert_eq!(layout.border_width, 12.0);
        assert_eq!(layout.padding, 40.0);
        assert_eq!(layout.label_height, 128.0);
        assert_eq!(layout.qr_rect.width, 666.0);
    }

    #[test]
    fn constants_are_monotonic_and_bounded() {
        let mut previous = compute_frame_layout(FrameKind::Badge, 1);
        for size in [1, 16, 64, 128, 255, 256, 300, 512, 1024, 2048, 4096, 5000] {
            let layout = compute_frame_layout(FrameKind::Badge, size);
            assert!(layout.border_width >= BORDER_WIDTH);
            assert!(layout.padding >= PADDING);
            assert!(layout.label_height >= LABEL_HEIGHT);
            assert!(layout.border_width >= previous.border_width);
            assert!(layout.padding >= previous.padding);
            assert!(layout.label_height >= previous.label_height);
            previous = layout;
        }
    }

    #[test]
    fn frame_fits_the_canvas() {
        for size in [256, 512, 1024, 2048, 4096] {
            let layout = compute_frame_layout(FrameKind::Bubble, size);
            let s = size as f32;
            assert!(layout.outer_rect.x >= 0.0);
            assert!(layout.outer_rect.y >= 0.0);
            assert!(layout.outer_rect.right() <= s);
            assert!(layout.outer_rect.bottom() <= s);
            assert!(layout.qr_rect.width <= (s * QR_SCALE).round());
        }
    }

    #[test]
    fn qr_is_centered_horizontally() {
        let layout = compute_frame_layout(FrameKind::Label, 1024);
        let (cx, _) = layout.qr_rect.center();
        assert!((cx - 512.0).abs() <= 1.0);
    }

    #[test]
    fn label_sits_above_qr() {
        let layout = compute_frame_layout(FrameKind::Label, 512);
        assert!(layout.label_rect.bottom() <= layout.inner_rect.y);
        assert!(layout.inner_rect.bottom() <= layout.outer_rect.bottom());
    }

    #[test]
    fn radius_per_style() {
        let bubble = compute_frame_layout(FrameKind::Bubble, 256).radius;
        let badge = compute_frame_layout(FrameKind::Badge, 256).radius;
        let label = compute_frame_layout(FrameKind::Label, 256).radius;
        let tag = compute_frame_layout(FrameKind::Tag, 256).radius;
        assert!(bubble.top_left > badge.top_left);
        assert!(badge.top_left > label.top_left);
        assert_eq!(tag.top_left, 0.0);
        assert_eq!(tag.top_right, RADIUS_TAG);
        assert_eq!(tag.bottom_left, RADIUS_TAG);
    }

    #[test]
    fn label_radius_is_top_only() {
        let layout = compute_frame_layout(FrameKind::Label, 256);
        assert_eq!(layout.label_radius.bottom_left, 0.0);
        assert_eq!(layout.label_radius.bottom_right, 0.0);
        assert_eq!(layout.label_radius.top_left, layout.radius.top_left);
    }

    #[test]
    fn dark_label_background_gets_white_text() {
        let f = frame(DesignConfig {
            frame_bg_color: Some("#000000".into()),
            frame_color: Some("#123456".into()),
            ..DesignConfig::new().with_frame("label", "Scan me")
        });
        assert_eq!(label_text_color(&f), Color::WHITE);
    }

    #[test]
    fn light_label_background_uses_frame_color() {
        let f = frame(DesignConfig {
            frame_bg_color: Some("#FFFFFF".into()),
            frame_color: Some("#123456".into()),
            ..DesignConfig::new().with_frame("label", "Scan me")
        });
        assert_eq!(label_text_color(&f), Color::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn gradient_background_forces_white() {
        let f = frame(DesignConfig {
            frame_bg_use_gradient: Some(true),
            frame_bg_color1: Some("#ffffff".into()),
            ..DesignConfig::new().with_frame("bubble", "Hi")
        });
        assert_eq!(label_text_color(&f), Color::WHITE);
    }

    #[test]
    fn dark_background_only_matters_for_label_style() {
        let f = frame(DesignConfig {
            frame_bg_color: Some("#000000".into()),
            frame_color: Some("#222222".into()),
            ..DesignConfig::new().with_frame("badge", "Hi")
        });
        assert_eq!(label_text_color(&f), Color::new(0x22, 0x22, 0x22));
    }

    #[test]
    fn red_channel_is_the_proxy() {
        // Fairly dark by luminance, but the red channel is saturated.
        let f = frame(DesignConfig {
            frame_bg_color: Some("#ff0000".into()),
            ..DesignConfig::new().with_frame("label", "Hi")
        });
        assert_eq!(label_text_color(&f), Color::BLACK);
    }
}
