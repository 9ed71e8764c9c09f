//! QR rendering engines.
//!
//! Engines are a capability: the [`StyledEngine`] draws every shape and
//! gradient variant, while the [`PlainEngine`] is the reduced-fidelity
//! fallback used when the styled engine cannot be loaded. Which one is in
//! use is decided once, through an [`EngineLoader`], rather than by checks
//! scattered through the renderers.
//!
//! Both engines return their markup synchronously. The returned string is
//! the completion signal: there is no settle delay between rendering and
//! extraction.

pub mod plain;
pub mod styled;

pub use plain::PlainEngine;
pub use styled::StyledEngine;

use std::fmt::Write as _;

use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

use crate::error::Result;
use crate::mapper::EngineConfig;
use crate::style::{Gradient, GradientKind};

// ============================================================================
// QrEngine
// ============================================================================

/// A renderer that turns a content value into an `<svg>` document.
pub trait QrEngine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this engine honours shape variants and gradients.
    fn is_styled(&self) -> bool;

    /// Renders `value` as a standalone SVG document sized per `config`.
    fn render_svg(&self, value: &str, config: &EngineConfig) -> Result<String>;
}

// ============================================================================
// EngineLoader
// ============================================================================

/// Strategy for obtaining the styled engine.
///
/// A loader is consulted exactly once per [`PreviewRenderer`](crate::PreviewRenderer);
/// a failure is terminal and is not retried.
pub trait EngineLoader {
    fn load(&self) -> std::result::Result<Box<dyn QrEngine>, String>;
}

/// Loads the built-in [`StyledEngine`]. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEngineLoader;

impl EngineLoader for DefaultEngineLoader {
    fn load(&self) -> std::result::Result<Box<dyn QrEngine>, String> {
        Ok(Box::new(StyledEngine::new()))
    }
}

/// A loader that always fails with the given reason.
///
/// Useful for hosts that ship without the styled engine, and for exercising
/// the fallback path.
#[derive(Debug, Clone, Default)]
pub struct UnavailableEngineLoader {
    pub reason: String,
}

impl UnavailableEngineLoader {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl EngineLoader for UnavailableEngineLoader {
    fn load(&self) -> std::result::Result<Box<dyn QrEngine>, String> {
        Err(self.reason.clone())
    }
}

// ============================================================================
// ModuleMatrix
// ============================================================================

/// The encoded symbol as a square grid of dark/light modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    pub fn from_code(code: &QrCode) -> Self {
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Self {
            width: code.width(),
            dark,
        }
    }

    /// Number of modules per side.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Out-of-range coordinates read as light.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.width {
            return false;
        }
        self.dark[y as usize * self.width + x as usize]
    }

    /// True for modules inside one of the three 7x7 finder patterns.
    pub fn is_finder(&self, x: usize, y: usize) -> bool {
        let far = self.width.saturating_sub(7);
        (x < 7 && y < 7) || (x >= far && y < 7) || (x < 7 && y >= far)
    }

    /// Top-left module of each finder pattern.
    pub fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.width.saturating_sub(7);
        [(0, 0), (far, 0), (0, far)]
    }
}

/// Encodes `value` in byte mode at the smallest version that fits.
pub fn encode(value: &str, ec_level: EcLevel) -> Result<ModuleMatrix> {
    let data = value.as_bytes();
    for version in 1..=40 {
        match byte_mode_bits(data, Version::Normal(version), ec_level) {
            Ok(bits) => {
                let code = QrCode::with_bits(bits, ec_level)?;
                return Ok(ModuleMatrix::from_code(&code));
            }
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(QrError::DataTooLong.into())
}

fn byte_mode_bits(data: &[u8], version: Version, ec_level: EcLevel) -> qrcode::QrResult<Bits> {
    let mut bits = Bits::new(version);
    bits.push_byte_data(data)?;
    bits.push_terminator(ec_level)?;
    Ok(bits)
}

// ============================================================================
// SVG helpers
// ============================================================================

/// Writes a `<linearGradient>`/`<radialGradient>` spanning the `w x h` box
/// in user space.
pub(crate) fn write_gradient_def(out: &mut String, id: &str, gradient: &Gradient, w: f32, h: f32) {
    match gradient.kind {
        GradientKind::Linear { .. } => {
            let ((x1, y1), (x2, y2)) = gradient.endpoints(0.0, 0.0, w, h);
            let _ = write!(
                out,
                r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}">"#
            );
            write_stops(out, gradient);
            out.push_str("</linearGradient>");
        }
        GradientKind::Radial => {
            let r = w.max(h) / 2.0;
            let _ = write!(
                out,
                r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{:.2}" cy="{:.2}" r="{r:.2}">"#,
                w / 2.0,
                h / 2.0
            );
            write_stops(out, gradient);
            out.push_str("</radialGradient>");
        }
    }
}

fn write_stops(out: &mut String, gradient: &Gradient) {
    for stop in &gradient.stops {
        let _ = write!(
            out,
            r#"<stop offset="{:.3}" stop-color="{}"/>"#,
            stop.offset,
            stop.color.to_hex()
        );
    }
}

/// SVG path data for a rectangle with per-corner radii
/// `[top_left, top_right, bottom_right, bottom_left]`.
pub(crate) fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) -> String {
    let max = w.min(h) / 2.0;
    let [tl, tr, br, bl] = radii.map(|r| r.clamp(0.0, max));
    let mut d = String::new();
    let _ = write!(d, "M{:.2} {:.2}", x + tl, y);
    let _ = write!(d, "H{:.2}", x + w - tr);
    if tr > 0.0 {
        let _ = write!(d, "A{tr:.2} {tr:.2} 0 0 1 {:.2} {:.2}", x + w, y + tr);
    }
    let _ = write!(d, "V{:.2}", y + h - br);
    if br > 0.0 {
        let _ = write!(d, "A{br:.2} {br:.2} 0 0 1 {:.2} {:.2}", x + w - br, y + h);
    }
    let _ = write!(d, "H{:.2}", x + bl);
    if bl > 0.0 {
        let _ = write!(d, "A{bl:.2} {bl:.2} 0 0 1 {:.2} {:.2}", x, y + h - bl);
    }
    let _ = write!(d, "V{:.2}", y + tl);
    if tl > 0.0 {
        let _ = write!(d, "A{tl:.2} {tl:.2} 0 0 1 {:.2} {:.2}", x + tl, y);
    }
    d.push('Z');
    d
}

/// Escapes text for use in XML attribute values and text nodes.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
