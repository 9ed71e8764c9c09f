//! qrframe-renderer: styled QR code rendering with decorative frames
//!
//! This crate turns a content value plus a loose, user-facing
//! [`DesignConfig`] into a live HTML preview or a downloadable artifact
//! (SVG, PNG, JPEG, PDF or a print document).
//!
//! # Example
//!
//! ```
//! use qrframe_renderer::{DesignConfig, PreviewRenderer, normalize};
//!
//! let design = DesignConfig {
//!     pattern_style: Some("rounded".into()),
//!     ..DesignConfig::new().with_frame("badge", "Scan me")
//! };
//!
//! // Loose input becomes one canonical style
//! let style = normalize(&design);
//! assert!(style.has_frame());
//!
//! // Mount a preview; identical remounts are no-ops
//! let mut preview = PreviewRenderer::default();
//! let element = preview.mount("https://example.com", &design, 300).unwrap();
//! assert!(element.framed);
//! ```
//!
//! # Exporting
//!
//! ```
//! use qrframe_renderer::{DesignConfig, ExportFormat, ExportRequest, Exporter};
//!
//! let request = ExportRequest::new("https://example.com", &DesignConfig::new())
//!     .with_format(ExportFormat::Svg)
//!     .with_pixel_size(512)
//!     .with_filename("site");
//!
//! let output = Exporter::new().export(&request).unwrap();
//! let artifact = output.as_artifact().unwrap();
//! assert_eq!(artifact.filename, "site.svg");
//! ```
//!
//! # Serializable Designs
//!
//! [`DesignConfig`] is the camelCase JSON shape hosts already store:
//!
//! ```
//! use qrframe_renderer::DesignConfig;
//!
//! let design = DesignConfig::from_json(r##"{"patternColor":"#112233","frameStyle":"tag"}"##).unwrap();
//! assert_eq!(design.pattern_color.as_deref(), Some("#112233"));
//! let json = design.to_json().unwrap();
//! ```

mod arena;
mod compositor;
mod design;
mod engine;
mod error;
mod export;
mod layout;
mod mapper;
mod preview;
mod raster;
mod style;

#[cfg(feature = "tsify")]
mod wasm;

pub use arena::{MountArena, MountGuard};
pub use compositor::canvas::{CanvasFrame, draw_framed};
pub use compositor::dom::{bare as dom_bare, paint_to_css, wrap as dom_wrap};
pub use design::DesignConfig;
pub use engine::{
    DefaultEngineLoader, EngineLoader, ModuleMatrix, PlainEngine, QrEngine, StyledEngine,
    UnavailableEngineLoader, encode,
};
pub use error::{Error, Result};
#[cfg(feature = "pdf")]
pub use export::PdfWriterBackend;
pub use export::{
    DEFAULT_PIXEL_SIZE, ExportArtifact, ExportFormat, ExportOutput, ExportRequest, Exporter,
    LARGE_PIXEL_SIZE, MAX_PIXEL_SIZE, PdfBackend, PrintDocument, UnavailablePdfBackend,
    XL_PIXEL_SIZE, default_pdf_backend, export, resolve_pixel_size, sanitize_filename,
};
pub use layout::{Corners, FrameLayout, Rect, compute_frame_layout, label_text_color, scaled};
pub use mapper::{
    CornerOptions, CornerShape, DotShape, DotsOptions, EncodeMode, EngineConfig, ImageOptions,
    build_engine_config, first_stop_color,
};
pub use preview::{EngineState, PreviewElement, PreviewRenderer};
pub use style::{
    CanonicalStyle, Color, CornerStyle, FrameKind, FrameStyle, Gradient, GradientDirection,
    GradientKind, GradientStop, Logo, Paint, PatternStyle, normalize,
};
