//! Canvas frame compositor.
//!
//! Draws a [`FrameLayout`] with tiny-skia so raster, PDF and print-adjacent
//! exports match the DOM preview. Draw order:
//!
//! 1. drop shadow
//! 2. frame background
//! 3. border stroke
//! 4. label band (`label` style only)
//! 5. inner QR background
//! 6. QR symbol
//! 7. label text

use resvg::tiny_skia::{
    self, FillRule, GradientStop, LinearGradient, Path, PathBuilder, Pixmap, Point,
    RadialGradient, Shader, SpreadMode, Stroke, Transform,
};

use crate::engine::escape_xml;
use crate::error::Result;
use crate::layout::{
    Corners, FrameLayout, LABEL_FONT_FAMILY, Rect, SHADOW_ALPHA, label_text_color,
};
use crate::raster::{new_pixmap, parse_svg, render_tree_into};
use crate::style::{Color, FrameKind, FrameStyle, GradientKind, Paint};

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;
/// Concentric passes used to approximate the shadow blur.
const SHADOW_STEPS: u32 = 8;

/// Inputs for one framed raster.
pub struct CanvasFrame<'a> {
    pub layout: &'a FrameLayout,
    pub frame: &'a FrameStyle,
    /// QR background, `None` when transparent.
    pub symbol_background: Option<&'a Paint>,
    /// Engine SVG, drawn into `layout.qr_rect`.
    pub symbol_svg: &'a str,
    /// Fill the canvas and every transparent area with white.
    pub opaque: bool,
}

/// Draws the framed symbol onto a fresh `pixel_size` square canvas.
pub fn draw_framed(input: &CanvasFrame<'_>) -> Result<Pixmap> {
    let layout = input.layout;
    let size = layout.pixel_size;
    let opaque_fill = input.opaque.then_some(Color::WHITE);
    let mut pixmap = new_pixmap(size, size, opaque_fill)?;

    draw_shadow(&mut pixmap, layout);

    if let Some(background) = &input.frame.background {
        fill_rounded(&mut pixmap, layout.outer_rect, layout.radius, background);
    }

    stroke_border(&mut pixmap, layout, &input.frame.paint);

    if input.frame.kind == FrameKind::Label {
        if let Some(background) = &input.frame.background {
            fill_rounded(
                &mut pixmap,
                layout.label_background_rect,
                layout.label_radius,
                background,
            );
        }
    }

    let inner_fill = match (input.symbol_background, input.opaque) {
        (Some(paint), _) => Some(paint.clone()),
        (None, true) => Some(Paint::Solid(Color::WHITE)),
        (None, false) => None,
    };
    if let Some(paint) = &inner_fill {
        fill_rounded(&mut pixmap, layout.inner_rect, layout.inner_radius, paint);
    }

    let tree = parse_svg(input.symbol_svg)?;
    render_tree_into(&tree, &mut pixmap, layout.qr_rect);

    draw_label_text(&mut pixmap, layout, input.frame)?;

    Ok(pixmap)
}

// ============================================================================
// Drawing passes
// ============================================================================

fn draw_shadow(pixmap: &mut Pixmap, layout: &FrameLayout) {
    let alpha = SHADOW_ALPHA / SHADOW_STEPS as f32;
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(tiny_skia::Color::from_rgba(0.0, 0.0, 0.0, alpha).unwrap_or(tiny_skia::Color::BLACK));
    paint.anti_alias = true;

    for step in 0..SHADOW_STEPS {
        let spread = layout.shadow_blur * (step as f32 + 1.0) / SHADOW_STEPS as f32 / 2.0;
        let rect = Rect::new(
            layout.outer_rect.x - spread,
            layout.outer_rect.y + layout.shadow_offset - spread,
            layout.outer_rect.width + 2.0 * spread,
            layout.outer_rect.height + 2.0 * spread,
        );
        if let Some(path) = rounded_rect(rect, layout.radius.map(|r| r + spread)) {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

fn stroke_border(pixmap: &mut Pixmap, layout: &FrameLayout, paint: &Paint) {
    let half = layout.border_width / 2.0;
    let rect = layout.outer_rect.inset(half);
    let Some(path) = rounded_rect(rect, layout.radius.map(|r| (r - half).max(0.0))) else {
        return;
    };
    let sk_paint = sk_paint(paint, layout.outer_rect);
    let stroke = Stroke {
        width: layout.border_width,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &sk_paint, &stroke, Transform::identity(), None);
}

fn fill_rounded(pixmap: &mut Pixmap, rect: Rect, radius: Corners, paint: &Paint) {
    let Some(path) = rounded_rect(rect, radius) else {
        return;
    };
    let sk_paint = sk_paint(paint, rect);
    pixmap.fill_path(&path, &sk_paint, FillRule::Winding, Transform::identity(), None);
}

/// Renders the label text as a one-element SVG so it goes through the same
/// text shaping as every other SVG in the crate.
fn draw_label_text(pixmap: &mut Pixmap, layout: &FrameLayout, frame: &FrameStyle) -> Result<()> {
    let size = layout.pixel_size;
    let (cx, cy) = layout.label_rect.center();
    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}"><text x="{cx:.2}" y="{cy:.2}" font-family="{LABEL_FONT_FAMILY}" font-size="{fs:.2}" font-weight="bold" text-anchor="middle" dominant-baseline="central" fill="{fill}">{text}</text></svg>"#,
        fs = layout.font_size,
        fill = label_text_color(frame).to_hex(),
        text = escape_xml(&frame.text),
    );
    let tree = parse_svg(&svg)?;
    render_tree_into(
        &tree,
        pixmap,
        Rect::new(0.0, 0.0, size as f32, size as f32),
    );
    Ok(())
}

// ============================================================================
// Paths and shaders
// ============================================================================

/// A rounded rectangle with per-corner radii, each clamped to half the
/// shorter side.
pub fn rounded_rect(rect: Rect, radius: Corners) -> Option<Path> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let max = rect.width.min(rect.height) / 2.0;
    let [tl, tr, br, bl] = radius.as_array().map(|r| r.clamp(0.0, max));
    let (x, y, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(x + tl, y);
    pb.line_to(r - tr, y);
    if tr > 0.0 {
        pb.cubic_to(r - tr + tr * KAPPA, y, r, y + tr - tr * KAPPA, r, y + tr);
    }
    pb.line_to(r, b - br);
    if br > 0.0 {
        pb.cubic_to(r, b - br + br * KAPPA, r - br + br * KAPPA, b, r - br, b);
    }
    pb.line_to(x + bl, b);
    if bl > 0.0 {
        pb.cubic_to(x + bl - bl * KAPPA, b, x, b - bl + bl * KAPPA, x, b - bl);
    }
    pb.line_to(x, y + tl);
    if tl > 0.0 {
        pb.cubic_to(x, y + tl - tl * KAPPA, x + tl - tl * KAPPA, y, x + tl, y);
    }
    pb.close();
    pb.finish()
}

fn sk_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255)
}

/// Builds a tiny-skia paint whose gradient spans `bounds`.
fn sk_paint(paint: &Paint, bounds: Rect) -> tiny_skia::Paint<'static> {
    let mut sk = tiny_skia::Paint {
        anti_alias: true,
        ..tiny_skia::Paint::default()
    };
    sk.shader = shader(paint, bounds).unwrap_or(Shader::SolidColor(sk_color(paint.first_color())));
    sk
}

fn shader(paint: &Paint, bounds: Rect) -> Option<Shader<'static>> {
    let gradient = match paint {
        Paint::Solid(color) => return Some(Shader::SolidColor(sk_color(*color))),
        Paint::Gradient(gradient) => gradient,
    };
    let stops: Vec<GradientStop> = gradient
        .stops
        .iter()
        .map(|s| GradientStop::new(s.offset, sk_color(s.color)))
        .collect();

    match gradient.kind {
        GradientKind::Linear { .. } => {
            let ((x0, y0), (x1, y1)) =
                gradient.endpoints(bounds.x, bounds.y, bounds.width, bounds.height);
            LinearGradient::new(
                Point::from_xy(x0, y0),
                Point::from_xy(x1, y1),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
        }
        GradientKind::Radial => {
            let (cx, cy) = bounds.center();
            RadialGradient::new(
                Point::from_xy(cx, cy),
                Point::from_xy(cx, cy),
                bounds.width.max(bounds.height) / 2.0,
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            )
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
