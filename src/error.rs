//! Error taxonomy for rendering and export.
//!
//! Only unrecoverable conditions live here. Degradations (engine not
//! loaded, PDF backend missing, undecodable logo) are absorbed where they
//! happen and logged instead.

use thiserror::Error;

/// Errors returned by preview and export operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The content value was empty. Raised before any rendering work.
    #[error("QR content value is empty")]
    EmptyValue,

    /// The mounted container did not hold an `<svg>` element.
    #[error("no <svg> element found in mount container {container}")]
    SvgNotFound { container: u64 },

    /// The requested export format is not one of png, jpg, jpeg, svg, pdf, print.
    #[error("unsupported export format: {0:?}")]
    UnsupportedFormat(String),

    #[error("failed to encode QR symbol: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("failed to parse SVG: {0}")]
    SvgParse(#[from] resvg::usvg::Error),

    #[error("failed to allocate a {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
