//! Vector engine with module shapes, finder variants, gradients and logo.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    ModuleMatrix, QrEngine, encode, escape_xml, rounded_rect_path, write_gradient_def,
};
use crate::error::Result;
use crate::mapper::{CornerShape, DotShape, EngineConfig};
use crate::style::Paint;

/// Gradient ids must be unique when several symbols share one document.
static RENDER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Fraction of a module removed on each side for the pixel shape.
const PIXEL_INSET: f32 = 0.05;
/// Fraction of a module removed on each side for the grid shape.
const GRID_INSET: f32 = 0.15;

/// The full-fidelity engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledEngine;

impl StyledEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Symbol geometry in output pixels.
struct Grid {
    cell: f32,
    offset: f32,
}

impl Grid {
    fn new(matrix: &ModuleMatrix, config: &EngineConfig) -> Self {
        let size = config.width.min(config.height) as f32;
        let count = matrix.width() as f32 + 2.0 * config.margin as f32;
        let cell = size / count;
        Self {
            cell,
            offset: cell * config.margin as f32,
        }
    }

    fn origin(&self, x: usize, y: usize) -> (f32, f32) {
        (
            self.offset + x as f32 * self.cell,
            self.offset + y as f32 * self.cell,
        )
    }
}

/// Module range hidden behind the logo, inclusive.
#[derive(Clone, Copy)]
struct CutOut {
    min: usize,
    max: usize,
}

impl CutOut {
    fn contains(&self, x: usize, y: usize) -> bool {
        (self.min..=self.max).contains(&x) && (self.min..=self.max).contains(&y)
    }
}

impl QrEngine for StyledEngine {
    fn name(&self) -> &'static str {
        "styled"
    }

    fn is_styled(&self) -> bool {
        true
    }

    fn render_svg(&self, value: &str, config: &EngineConfig) -> Result<String> {
        let matrix = encode(value, config.ec_level)?;
        let grid = Grid::new(&matrix, config);
        let (w, h) = (config.width as f32, config.height as f32);
        let seq = RENDER_SEQ.fetch_add(1, Ordering::Relaxed);

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            config.width, config.height, config.width, config.height
        );

        let mut defs = String::new();
        let bg_fill = config
            .background
            .as_ref()
            .map(|paint| fill_ref(paint, &format!("qr-bg-{seq}"), w, h, &mut defs));
        let dots_fill = fill_ref(&config.dots.paint, &format!("qr-dots-{seq}"), w, h, &mut defs);
        if !defs.is_empty() {
            let _ = write!(svg, "<defs>{defs}</defs>");
        }

        if let Some(fill) = bg_fill {
            let _ = write!(
                svg,
                r#"<rect x="0" y="0" width="{}" height="{}" fill="{fill}"/>"#,
                config.width, config.height
            );
        }

        let cut_out = config
            .image
            .as_ref()
            .filter(|image| image.hide_background_dots)
            .map(|image| logo_cut_out(&matrix, image.size));

        let _ = write!(svg, r#"<g class="qr-dots" fill="{dots_fill}">"#);
        let width = matrix.width();
        for y in 0..width {
            for x in 0..width {
                if !matrix.is_dark(x as i64, y as i64) || matrix.is_finder(x, y) {
                    continue;
                }
                if cut_out.is_some_and(|c| c.contains(x, y)) {
                    continue;
                }
                write_dot(&mut svg, &matrix, &grid, x, y, config.dots.shape);
            }
        }
        svg.push_str("</g>");

        for (fx, fy) in matrix.finder_origins() {
            write_finder(&mut svg, &grid, fx, fy, config);
        }

        if let Some(image) = &config.image {
            let side = w.min(h) * image.size;
            let _ = write!(
                svg,
                r#"<image class="qr-logo" x="{:.2}" y="{:.2}" width="{side:.2}" height="{side:.2}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
                (w - side) / 2.0,
                (h - side) / 2.0,
                escape_xml(&image.source)
            );
        }

        svg.push_str("</svg>");
        log::debug!(
            "styled engine rendered {}x{} modules at {}px",
            width,
            width,
            config.width
        );
        Ok(svg)
    }
}

/// Returns a `fill` attribute value, appending a gradient def when needed.
fn fill_ref(paint: &Paint, id: &str, w: f32, h: f32, defs: &mut String) -> String {
    match paint {
        Paint::Solid(color) => color.to_hex(),
        Paint::Gradient(gradient) => {
            write_gradient_def(defs, id, gradient, w, h);
            format!("url(#{id})")
        }
    }
}

fn logo_cut_out(matrix: &ModuleMatrix, size: f32) -> CutOut {
    let width = matrix.width();
    let logo_modules = (width as f32 * size).ceil() as usize + 2;
    let logo_modules = logo_modules.min(width);
    let min = (width - logo_modules) / 2;
    CutOut {
        min,
        max: min + logo_modules - 1,
    }
}

fn write_dot(
    out: &mut String,
    matrix: &ModuleMatrix,
    grid: &Grid,
    x: usize,
    y: usize,
    shape: DotShape,
) {
    let (px, py) = grid.origin(x, y);
    let c = grid.cell;
    match shape {
        DotShape::Square => {
            let _ = write!(
                out,
                r#"<rect x="{px:.2}" y="{py:.2}" width="{c:.2}" height="{c:.2}"/>"#
            );
        }
        DotShape::Dots => {
            let r = c / 2.0;
            let _ = write!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{r:.2}"/>"#,
                px + r,
                py + r
            );
        }
        DotShape::Pixel | DotShape::Grid => {
            let inset = c * if shape == DotShape::Pixel {
                PIXEL_INSET
            } else {
                GRID_INSET
            };
            let side = c - 2.0 * inset;
            let _ = write!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{side:.2}" height="{side:.2}"/>"#,
                px + inset,
                py + inset
            );
        }
        DotShape::Rounded => {
            // A corner is rounded when neither of its two edge neighbours is dark.
            let (xi, yi) = (x as i64, y as i64);
            let left = matrix.is_dark(xi - 1, yi);
            let right = matrix.is_dark(xi + 1, yi);
            let top = matrix.is_dark(xi, yi - 1);
            let bottom = matrix.is_dark(xi, yi + 1);
            let r = c / 2.0;
            let radius = |a: bool, b: bool| if a || b { 0.0 } else { r };
            let d = rounded_rect_path(
                px,
                py,
                c,
                c,
                [
                    radius(top, left),
                    radius(top, right),
                    radius(bottom, right),
                    radius(bottom, left),
                ],
            );
            let _ = write!(out, r#"<path d="{d}"/>"#);
        }
    }
}

fn write_finder(out: &mut String, grid: &Grid, fx: usize, fy: usize, config: &EngineConfig) {
    let (x, y) = grid.origin(fx, fy);
    let c = grid.cell;

    let outer = 7.0 * c;
    let square = &config.corners_square;
    match square.shape {
        CornerShape::Dot => {
            let cx = x + outer / 2.0;
            let cy = y + outer / 2.0;
            let _ = write!(
                out,
                r#"<path class="qr-corner-square" fill="{}" fill-rule="evenodd" d="{} {}"/>"#,
                square.color.to_hex(),
                circle_path(cx, cy, 3.5 * c),
                circle_path(cx, cy, 2.5 * c)
            );
        }
        shape => {
            let r = match shape {
                CornerShape::Rounded => c,
                CornerShape::ExtraRounded => 2.5 * c,
                _ => 0.0,
            };
            let inner_r = (r - c).max(0.0);
            let _ = write!(
                out,
                r#"<path class="qr-corner-square" fill="{}" fill-rule="evenodd" d="{} {}"/>"#,
                square.color.to_hex(),
                rounded_rect_path(x, y, outer, outer, [r; 4]),
                rounded_rect_path(x + c, y + c, 5.0 * c, 5.0 * c, [inner_r; 4])
            );
        }
    }

    let dot = &config.corners_dot;
    let (dx, dy, side) = (x + 2.0 * c, y + 2.0 * c, 3.0 * c);
    match dot.shape {
        CornerShape::Dot => {
            let _ = write!(
                out,
                r#"<circle class="qr-corner-dot" fill="{}" cx="{:.2}" cy="{:.2}" r="{:.2}"/>"#,
                dot.color.to_hex(),
                dx + side / 2.0,
                dy + side / 2.0,
                side / 2.0
            );
        }
        shape => {
            let r = match shape {
                CornerShape::Rounded => 0.5 * c,
                CornerShape::ExtraRounded => c,
                _ => 0.0,
            };
            let _ = write!(
                out,
                r#"<path class="qr-corner-dot" fill="{}" d="{}"/>"#,
                dot.color.to_hex(),
                rounded_rect_path(dx, dy, side, side, [r; 4])
            );
        }
    }
}

fn circle_path(cx: f32, cy: f32, r: f32) -> String {
    format!(
        "M{:.2} {cy:.2}A{r:.2} {r:.2} 0 1 0 {:.2} {cy:.2}A{r:.2} {r:.2} 0 1 0 {:.2} {cy:.2}Z",
        cx - r,
        cx + r,
        cx - r
    )
}
