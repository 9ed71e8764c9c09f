//! Export pipeline.
//!
//! Turns a value and a design into a downloadable artifact (SVG, PNG, JPEG
//! or PDF) or a self-printing HTML document.
//!
//! # Example
//!
//! ```
//! use qrframe_renderer::{DesignConfig, ExportOutput, export};
//!
//! let design = DesignConfig::new().with_frame("label", "Scan me");
//! let output = export("https://example.com", &design, "png", "default", None).unwrap();
//!
//! let ExportOutput::File(artifact) = output else { unreachable!() };
//! assert_eq!(artifact.filename, "qr-code.png");
//! assert_eq!(artifact.mime_type, "image/png");
//! ```
//!
//! SVG exports carry the bare symbol only; frames are drawn by the DOM and
//! canvas compositors and never added to vector output.

mod pdf;
mod print;

pub use pdf::{PdfBackend, UnavailablePdfBackend, default_backend as default_pdf_backend};
#[cfg(feature = "pdf")]
pub use pdf::PdfWriterBackend;
pub use print::PrintDocument;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;

use crate::arena::MountArena;
use crate::compositor::canvas::{CanvasFrame, draw_framed};
use crate::compositor::dom;
use crate::design::DesignConfig;
use crate::engine::{QrEngine, StyledEngine};
use crate::error::{Error, Result};
use crate::layout::compute_frame_layout;
use crate::mapper::{EngineConfig, build_engine_config};
use crate::raster::{encode_jpeg, encode_png, pixmap_to_rgba_image, rasterize_svg};
use crate::style::{CanonicalStyle, Color, normalize};

/// Pixel size used for `"default"` and any unusable size input.
pub const DEFAULT_PIXEL_SIZE: u32 = 1024;
pub const LARGE_PIXEL_SIZE: u32 = 2048;
pub const XL_PIXEL_SIZE: u32 = 4096;
/// Upper bound for numeric sizes. Larger requests are clamped.
pub const MAX_PIXEL_SIZE: u32 = 8192;

const DEFAULT_FILE_STEM: &str = "qr-code";

// ============================================================================
// ExportFormat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Svg,
    Pdf,
    Print,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Print => "html",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
            Self::Print => "text/html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "print" => Ok(Self::Print),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Print => "print",
            other => other.extension(),
        })
    }
}

/// Maps a size input to a pixel size.
///
/// `"default"`, `"large"` and `"xl"` are named presets; numeric strings are
/// taken as-is up to [`MAX_PIXEL_SIZE`]. Anything else, including zero and
/// negative numbers, yields [`DEFAULT_PIXEL_SIZE`].
pub fn resolve_pixel_size(size: &str) -> u32 {
    let size = size.trim();
    match size.to_ascii_lowercase().as_str() {
        "" | "default" => DEFAULT_PIXEL_SIZE,
        "large" => LARGE_PIXEL_SIZE,
        "xl" => XL_PIXEL_SIZE,
        numeric => match numeric.parse::<f64>() {
            Ok(px) if px.is_finite() && px >= 1.0 => (px.floor() as u32).min(MAX_PIXEL_SIZE),
            _ => {
                log::debug!("unusable export size {size:?}, using {DEFAULT_PIXEL_SIZE}");
                DEFAULT_PIXEL_SIZE
            }
        },
    }
}

/// Builds a download filename with the extension of the delivered format.
///
/// Path components and characters that are invalid in filenames are
/// dropped, as is a trailing extension of any export format.
pub fn sanitize_filename(requested: Option<&str>, format: ExportFormat) -> String {
    let name = requested.unwrap_or("");
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let mut stem: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();

    if let Some((base, ext)) = stem.rsplit_once('.') {
        if ext.parse::<ExportFormat>().is_ok() || ext.eq_ignore_ascii_case("html") {
            stem = base.to_string();
        }
    }

    let stem = stem.trim().trim_matches('.');
    let stem = if stem.is_empty() { DEFAULT_FILE_STEM } else { stem };
    format!("{stem}.{}", format.extension())
}

// ============================================================================
// Request / Output
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub value: String,
    pub style: CanonicalStyle,
    pub format: ExportFormat,
    pub pixel_size: u32,
    pub filename: Option<String>,
}

impl ExportRequest {
    /// A PNG request at the default size.
    pub fn new(value: impl Into<String>, design: &DesignConfig) -> Self {
        Self {
            value: value.into(),
            style: normalize(design),
            format: ExportFormat::Png,
            pixel_size: DEFAULT_PIXEL_SIZE,
            filename: None,
        }
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pixel_size(mut self, pixel_size: u32) -> Self {
        self.pixel_size = pixel_size.clamp(1, MAX_PIXEL_SIZE);
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn extension(&self) -> &str {
        self.filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
    }

    /// The artifact as a base64 `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    /// Writes the artifact into `dir` under its filename.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::debug!("wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    File(ExportArtifact),
    Print(PrintDocument),
}

impl ExportOutput {
    pub fn as_artifact(&self) -> Option<&ExportArtifact> {
        match self {
            Self::File(artifact) => Some(artifact),
            Self::Print(_) => None,
        }
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Runs export requests against one engine, PDF backend and mount arena.
///
/// `Exporter` is `Sync`; concurrent exports each get their own container.
pub struct Exporter {
    engine: Box<dyn QrEngine>,
    pdf: Box<dyn PdfBackend>,
    arena: MountArena,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    pub fn new() -> Self {
        Self {
            engine: Box::new(StyledEngine::new()),
            pdf: default_pdf_backend(),
            arena: MountArena::new(),
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn QrEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_pdf_backend(mut self, pdf: Box<dyn PdfBackend>) -> Self {
        self.pdf = pdf;
        self
    }

    pub fn arena(&self) -> &MountArena {
        &self.arena
    }

    pub fn export(&self, request: &ExportRequest) -> Result<ExportOutput> {
        if request.value.trim().is_empty() {
            return Err(Error::EmptyValue);
        }
        let px = request.pixel_size.clamp(1, MAX_PIXEL_SIZE);
        log::debug!(
            "exporting {} at {px}px via {} engine",
            request.format,
            self.engine.name()
        );

        let file = |format: ExportFormat, bytes: Vec<u8>| {
            ExportOutput::File(ExportArtifact {
                filename: sanitize_filename(request.filename.as_deref(), format),
                mime_type: format.mime_type(),
                bytes,
            })
        };

        match request.format {
            ExportFormat::Svg => {
                let config = build_engine_config(&request.style, px);
                let svg = self.mount_and_extract(&request.value, &config)?;
                Ok(file(ExportFormat::Svg, svg.into_bytes()))
            }
            ExportFormat::Png => {
                let image = self.raster(request, px, false)?;
                Ok(file(ExportFormat::Png, encode_png(&image)?))
            }
            ExportFormat::Jpeg => {
                let image = self.raster(request, px, true)?;
                Ok(file(ExportFormat::Jpeg, encode_jpeg(&image)?))
            }
            ExportFormat::Pdf => {
                let image = self.raster(request, px, false)?;
                if self.pdf.is_available() {
                    Ok(file(ExportFormat::Pdf, self.pdf.write_pdf(&image, px)?))
                } else {
                    log::warn!(
                        "PDF backend {:?} unavailable, delivering PNG instead",
                        self.pdf.name()
                    );
                    Ok(file(ExportFormat::Png, encode_png(&image)?))
                }
            }
            ExportFormat::Print => {
                let body = self.print_body(request, px)?;
                let title = request
                    .filename
                    .as_deref()
                    .map(|name| sanitize_filename(Some(name), ExportFormat::Print))
                    .and_then(|name| name.strip_suffix(".html").map(str::to_string))
                    .unwrap_or_default();
                Ok(ExportOutput::Print(PrintDocument::new(&title, &body)))
            }
        }
    }

    /// Renders the engine output into a scoped container and pulls the
    /// `<svg>` element back out.
    fn mount_and_extract(&self, value: &str, config: &EngineConfig) -> Result<String> {
        let guard = self.arena.acquire();
        guard.mount(self.engine.render_svg(value, config)?);
        guard.extract_svg()
    }

    fn raster(&self, request: &ExportRequest, px: u32, opaque: bool) -> Result<RgbaImage> {
        let style = &request.style;
        let pixmap = match &style.frame {
            Some(frame) => {
                let layout = compute_frame_layout(frame.kind, px);
                let side = layout.qr_rect.width.round().max(1.0) as u32;
                let svg = self.mount_and_extract(&request.value, &build_engine_config(style, side))?;
                draw_framed(&CanvasFrame {
                    layout: &layout,
                    frame,
                    symbol_background: style.background.as_ref(),
                    symbol_svg: &svg,
                    opaque,
                })?
            }
            None => {
                let svg = self.mount_and_extract(&request.value, &build_engine_config(style, px))?;
                rasterize_svg(&svg, px, px, opaque.then_some(Color::WHITE))?
            }
        };
        pixmap_to_rgba_image(&pixmap)
    }

    fn print_body(&self, request: &ExportRequest, px: u32) -> Result<String> {
        let style = &request.style;
        match &style.frame {
            Some(frame) => {
                let layout = compute_frame_layout(frame.kind, px);
                let side = layout.qr_rect.width.round().max(1.0) as u32;
                let svg = self.mount_and_extract(&request.value, &build_engine_config(style, side))?;
                Ok(dom::wrap(&svg, &layout, frame, style.background.as_ref()))
            }
            None => {
                let svg = self.mount_and_extract(&request.value, &build_engine_config(style, px))?;
                Ok(svg)
            }
        }
    }
}

/// Exports `value` with `design`.
///
/// `format` is one of png, jpg, jpeg, svg, pdf or print; `size` is a preset
/// name or a pixel count (see [`resolve_pixel_size`]).
pub fn export(
    value: &str,
    design: &DesignConfig,
    format: &str,
    size: &str,
    filename: Option<&str>,
) -> Result<ExportOutput> {
    if value.trim().is_empty() {
        return Err(Error::EmptyValue);
    }
    let format = format.parse::<ExportFormat>()?;
    let mut request = ExportRequest::new(value, design)
        .with_format(format)
        .with_pixel_size(resolve_pixel_size(size));
    if let Some(name) = filename {
        request = request.with_filename(name);
    }
    Exporter::new().export(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use crate::layout::compute_frame_layout;
    use crate::raster::font_database;
    use crate::style::FrameKind;

    fn artifact(output: ExportOutput) -> ExportArtifact {
        match output {
            ExportOutput::File(artifact) => artifact,
            ExportOutput::Print(_) => panic!("expected a file"),
        }
    }

    fn decode(artifact: &ExportArtifact) -> RgbaImage {
        image::load_from_memory(&artifact.bytes).unwrap().to_rgba8()
    }

    /// Engine whose output holds no `<svg>` element.
    struct BrokenEngine;

    impl QrEngine for BrokenEngine {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn is_styled(&self) -> bool {
            false
        }

        fn render_svg(&self, _value: &str, _config: &EngineConfig) -> Result<String> {
            Ok("<canvas></canvas>".to_string())
        }
    }

    #[test]
    fn format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("jpg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        assert_eq!("print".parse::<ExportFormat>().unwrap(), ExportFormat::Print);
        assert!(matches!(
            "gif".parse::<ExportFormat>(),
            Err(Error::UnsupportedFormat(f)) if f == "gif"
        ));
    }

    #[test]
    fn size_presets() {
        assert_eq!(resolve_pixel_size("default"), 1024);
        assert_eq!(resolve_pixel_size("large"), 2048);
        assert_eq!(resolve_pixel_size("xl"), 4096);
        assert_eq!(resolve_pixel_size("512"), 512);
        assert_eq!(resolve_pixel_size(" 300 "), 300);
        assert_eq!(resolve_pixel_size("0"), 1024);
        assert_eq!(resolve_pixel_size("-20"), 1024);
        assert_eq!(resolve_pixel_size("huge"), 1024);
        assert_eq!(resolve_pixel_size("NaN"), 1024);
        assert_eq!(resolve_pixel_size("100000"), MAX_PIXEL_SIZE);
    }

    #[test]
    fn filenames() {
        assert_eq!(sanitize_filename(None, ExportFormat::Png), "qr-code.png");
        assert_eq!(sanitize_filename(Some("menu"), ExportFormat::Jpeg), "menu.jpg");
        assert_eq!(sanitize_filename(Some("menu.pdf"), ExportFormat::Png), "menu.png");
        assert_eq!(sanitize_filename(Some("../etc/passwd"), ExportFormat::Svg), "passwd.svg");
        assert_eq!(sanitize_filename(Some("a:b?"), ExportFormat::Pdf), "a-b-.pdf");
        assert_eq!(sanitize_filename(Some("   "), ExportFormat::Png), "qr-code.png");
        assert_eq!(sanitize_filename(Some("v1.2"), ExportFormat::Png), "v1.2.png");
    }

    #[test]
    fn data_uri() {
        let artifact = ExportArtifact {
            filename: "x.svg".into(),
            mime_type: "image/svg+xml",
            bytes: b"<svg/>".to_vec(),
        };
        assert_eq!(artifact.extension(), "svg");
        assert_eq!(artifact.to_data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn write_to_dir_uses_filename() {
        let dir = std::env::temp_dir().join(format!("qrframe-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let artifact = ExportArtifact {
            filename: "written.svg".into(),
            mime_type: "image/svg+xml",
            bytes: b"<svg/>".to_vec(),
        };
        let path = artifact.write_to_dir(&dir).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"<svg/>");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn default_png_is_black_on_white() {
        let output = export("https://example.com", &DesignConfig::new(), "png", "default", None).unwrap();
        let artifact = artifact(output);
        assert_eq!(artifact.filename, "qr-code.png");
        let image = decode(&artifact);
        assert_eq!(image.dimensions(), (1024, 1024));
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);

        // Module (0, 0) sits one quiet-zone module in and belongs to a finder.
        let cell = 1024.0 / 27.0;
        let p = (cell * 1.5) as u32;
        assert_eq!(image.get_pixel(p, p).0, [0, 0, 0, 255]);
    }

    #[test]
    fn label_frame_png_has_black_band_and_white_text() {
        let design = DesignConfig {
            frame_bg_color: Some("#000000".into()),
            ..DesignConfig::new().with_frame("label", "Scan me")
        };
        let output = export("hello", &design, "png", "512", Some("menu")).unwrap();
        let image = decode(&artifact(output));
        assert_eq!(image.dimensions(), (512, 512));

        let layout = compute_frame_layout(FrameKind::Label, 512);
        let band = layout.label_background_rect;
        let x = (band.x + band.width * 0.1) as u32;
        let y = (band.y + band.height * 0.5) as u32;
        assert_eq!(image.get_pixel(x, y).0, [0, 0, 0, 255]);

        // Glyph checks need at least one system font.
        if font_database().len() == 0 {
            return;
        }
        let label = layout.label_rect;
        let (x0, y0) = (label.x.ceil() as u32, label.y.ceil() as u32);
        let (x1, y1) = (label.right().floor() as u32, label.bottom().floor() as u32);
        let white: Vec<u32> = (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y).0[..3].iter().all(|&c| c > 200))
            .map(|(x, _)| x)
            .collect();
        assert!(white.len() > 50, "label text not drawn in white");

        let min = *white.iter().min().unwrap() as f32;
        let max = *white.iter().max().unwrap() as f32;
        let (center, _) = label.center();
        assert!(((min + max) / 2.0 - center).abs() < label.width * 0.05);
    }

    fn red_png() -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]))).unwrap()
    }

    fn logo_center(logo: &str) -> [u8; 4] {
        let design = DesignConfig::new().with_logo(logo);
        let image = decode(&artifact(export("hello", &design, "png", "256", None).unwrap()));
        image.get_pixel(128, 128).0
    }

    #[test]
    fn inline_logo_is_drawn() {
        let logo = format!("data:image/png;base64,{}", STANDARD.encode(red_png()));
        assert_eq!(logo_center(&logo), [255, 0, 0, 255]);
    }

    #[test]
    fn logo_file_path_is_never_read() {
        let path = std::env::temp_dir().join(format!("qrframe-logo-{}.png", std::process::id()));
        std::fs::write(&path, red_png()).unwrap();
        let center = logo_center(&path.display().to_string());
        std::fs::remove_file(&path).unwrap();
        assert_eq!(center, [255, 255, 255, 255]);
    }

    #[test]
    fn remote_logo_leaves_empty_cut_out() {
        assert_eq!(logo_center("https://example.com/logo.png"), [255, 255, 255, 255]);
    }

    #[test]
    fn jpeg_is_opaque_rgb() {
        let design = DesignConfig {
            pattern_bg_transparent: Some(true),
            ..DesignConfig::new()
        };
        let output = export("hello", &design, "jpeg", "128", Some("code.jpeg")).unwrap();
        let artifact = artifact(output);
        assert_eq!(artifact.filename, "code.jpg");
        assert_eq!(artifact.mime_type, "image/jpeg");
        let image = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!(image.color(), image::ColorType::Rgb8);
        let corner = image.to_rgb8().get_pixel(1, 1).0;
        assert!(corner.iter().all(|&c| c > 240));
    }

    #[test]
    fn svg_omits_frame() {
        let design = DesignConfig::new().with_frame("badge", "Visit our site");
        let output = export("hello", &design, "svg", "256", None).unwrap();
        let artifact = artifact(output);
        let svg = String::from_utf8(artifact.bytes.clone()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("qr-frame"));
        assert!(!svg.contains("Visit our site"));
        assert!(artifact.to_data_uri().starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn svg_and_png_agree_on_colors() {
        let design = DesignConfig {
            pattern_bg_color: Some("#00ff00".into()),
            ..DesignConfig::new().with_pattern_color("#ff0000")
        };
        let svg = artifact(export("hello", &design, "svg", "230", None).unwrap());
        let svg = String::from_utf8(svg.bytes).unwrap();
        assert!(svg.contains("#ff0000"));
        assert!(svg.contains("#00ff00"));

        let png = decode(&artifact(export("hello", &design, "png", "230", None).unwrap()));
        // "hello" encodes as a 21-module symbol; 23 cells with the quiet zone.
        let cell = 230.0 / 23.0;
        assert_eq!(png.get_pixel(2, 2).0, [0, 255, 0, 255]);
        let p = (cell * 1.5) as u32;
        assert_eq!(png.get_pixel(p, p).0, [255, 0, 0, 255]);
    }

    #[test]
    fn pdf_falls_back_to_png() {
        let exporter = Exporter::new().with_pdf_backend(Box::new(UnavailablePdfBackend));
        let request = ExportRequest::new("hello", &DesignConfig::new())
            .with_format(ExportFormat::Pdf)
            .with_pixel_size(128)
            .with_filename("menu.pdf");
        let artifact = artifact(exporter.export(&request).unwrap());
        assert_eq!(artifact.filename, "menu.png");
        assert_eq!(artifact.mime_type, "image/png");
        assert_eq!(decode(&artifact).dimensions(), (128, 128));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pdf_export() {
        let output = export("hello", &DesignConfig::new(), "pdf", "128", None).unwrap();
        let artifact = artifact(output);
        assert_eq!(artifact.filename, "qr-code.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn print_document_contains_frame() {
        let design = DesignConfig::new().with_frame("tag", "Menu");
        let output = export("hello", &design, "print", "300", Some("Lunch")).unwrap();
        let ExportOutput::Print(doc) = output else {
            panic!("expected a print document");
        };
        assert_eq!(doc.title, "Lunch");
        assert!(doc.html.contains("qr-frame--tag"));
        assert!(doc.html.contains("<svg"));
        assert!(doc.html.contains("window.print()"));
    }

    #[test]
    fn empty_value_fails_before_rendering() {
        let exporter = Exporter::new().with_engine(Box::new(BrokenEngine));
        let request = ExportRequest::new("   ", &DesignConfig::new());
        assert!(matches!(exporter.export(&request), Err(Error::EmptyValue)));
        assert_eq!(exporter.arena().live_count(), 0);
        assert!(matches!(
            export("", &DesignConfig::new(), "gif", "default", None),
            Err(Error::EmptyValue)
        ));
    }

    #[test]
    fn missing_svg_releases_container() {
        let exporter = Exporter::new().with_engine(Box::new(BrokenEngine));
        let request = ExportRequest::new("hello", &DesignConfig::new()).with_format(ExportFormat::Svg);
        assert!(matches!(
            exporter.export(&request),
            Err(Error::SvgNotFound { .. })
        ));
        assert_eq!(exporter.arena().live_count(), 0);
    }

    #[test]
    fn exporter_is_shareable_across_threads() {
        let exporter = Exporter::new();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let exporter = &exporter;
                scope.spawn(move || {
                    let request = ExportRequest::new(format!("value {i}"), &DesignConfig::new())
                        .with_format(ExportFormat::Svg)
                        .with_pixel_size(64);
                    exporter.export(&request).unwrap();
                });
            }
        });
        assert_eq!(exporter.arena().live_count(), 0);
    }
}
