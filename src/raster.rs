//! SVG rasterization and bitmap utilities using resvg/tiny-skia.
//!
//! Shared by the export pipeline and the canvas compositor.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::codecs::jpeg::JpegEncoder;
use image::buffer::ConvertBuffer;
use image::{ImageFormat, RgbImage, RgbaImage};
use resvg::tiny_skia::{self, Pixmap, Transform};
use resvg::usvg::{ImageHrefResolver, ImageKind, Options, Tree, fontdb};

use crate::error::{Error, Result};
use crate::layout::Rect;
use crate::style::Color;

/// JPEG quality used for exports.
pub const JPEG_QUALITY: u8 = 92;

static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// System fonts, loaded once and shared read-only.
pub(crate) fn font_database() -> Arc<fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Image references limited to inline `data:` URIs.
///
/// Anything else (file paths, URLs) is never read. Images that are skipped
/// or fail to decode leave their area empty and are logged.
fn inline_image_resolver<'a>() -> ImageHrefResolver<'a> {
    let decode = ImageHrefResolver::default_data_resolver();
    ImageHrefResolver {
        resolve_data: Box::new(move |mime: &str, data: Arc<Vec<u8>>, opts: &Options| {
            let raster = data.clone();
            match decode(mime, data, opts) {
                None => {
                    log::warn!("unsupported embedded image type {mime:?}, image skipped");
                    None
                }
                Some(ImageKind::SVG(tree)) => Some(ImageKind::SVG(tree)),
                Some(_) if image::load_from_memory(&raster).is_err() => {
                    log::warn!("embedded {mime:?} image could not be decoded, image skipped");
                    None
                }
                kind => kind,
            }
        }),
        resolve_string: Box::new(|href: &str, _opts: &Options| {
            log::warn!("image {href:?} is not an inline data URI, image skipped");
            None
        }),
    }
}

/// Parses SVG markup. Text is shaped against the system font database.
pub fn parse_svg(svg_data: &str) -> Result<Tree> {
    let opts = Options {
        fontdb: font_database(),
        image_href_resolver: inline_image_resolver(),
        ..Options::default()
    };
    Ok(Tree::from_str(svg_data, &opts)?)
}

/// Allocates a transparent pixmap, or one filled with `background`.
pub fn new_pixmap(width: u32, height: u32, background: Option<Color>) -> Result<Pixmap> {
    let mut pixmap = Pixmap::new(width, height).ok_or(Error::PixmapAlloc { width, height })?;
    if let Some(color) = background {
        pixmap.fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    }
    Ok(pixmap)
}

/// Draws `tree` into `target`, scaled to fill it.
pub fn render_tree_into(tree: &Tree, pixmap: &mut Pixmap, target: Rect) {
    let size = tree.size();
    let sx = target.width / size.width();
    let sy = target.height / size.height();
    let transform = Transform::from_row(sx, 0.0, 0.0, sy, target.x, target.y);
    resvg::render(tree, transform, &mut pixmap.as_mut());
}

/// Rasterizes an SVG document to exactly `width x height` pixels.
///
/// With `background` set, the pixmap is filled with that color first so the
/// result is fully opaque where the SVG is transparent.
pub fn rasterize_svg(
    svg_data: &str,
    width: u32,
    height: u32,
    background: Option<Color>,
) -> Result<Pixmap> {
    let tree = parse_svg(svg_data)?;
    let mut pixmap = new_pixmap(width, height, background)?;
    render_tree_into(
        &tree,
        &mut pixmap,
        Rect::new(0.0, 0.0, width as f32, height as f32),
    );
    Ok(pixmap)
}

/// Converts a premultiplied tiny-skia pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut raw = Vec::with_capacity(width as usize * height as usize * 4);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, raw).ok_or(Error::PixmapAlloc { width, height })
}

// ============================================================================
// Encoding
// ============================================================================

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Encodes without an alpha channel.
///
/// The alpha channel is dropped as-is, so callers render onto an opaque
/// background (see [`new_pixmap`]) first.
pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>> {
    let rgb: RgbImage = image.convert();
    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY))?;
    Ok(bytes)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use image::Rgba;

    fn red_png() -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))).unwrap()
    }

    fn svg_with_image(href: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="16" height="16"><image x="0" y="0" width="16" height="16" xlink:href="{href}"/></svg>"#
        )
    }

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><circle cx="50" cy="50" r="40" fill="#ff0000"/></svg>"##;

    #[test]
    fn rasterize_to_exact_size() {
        let pixmap = rasterize_svg(SIMPLE_SVG, 64, 64, None).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (64, 64));

        let img = pixmap_to_rgba_image(&pixmap).unwrap();
        assert_eq!(img.get_pixel(32, 32).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn background_fill_is_opaque() {
        let pixmap = rasterize_svg(SIMPLE_SVG, 64, 64, Some(Color::WHITE)).unwrap();
        let img = pixmap_to_rgba_image(&pixmap).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn invalid_svg_is_an_error() {
        assert!(matches!(
            rasterize_svg("<not-svg>", 10, 10, None),
            Err(Error::SvgParse(_))
        ));
    }

    #[test]
    fn zero_sized_pixmap_fails() {
        assert!(matches!(
            new_pixmap(0, 10, None),
            Err(Error::PixmapAlloc { width: 0, height: 10 })
        ));
    }

    #[test]
    fn jpeg_has_no_alpha() {
        let pixmap = rasterize_svg(SIMPLE_SVG, 8, 8, Some(Color::WHITE)).unwrap();
        let bytes = encode_jpeg(&pixmap_to_rgba_image(&pixmap).unwrap()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        let corner = decoded.to_rgb8().get_pixel(0, 0).0;
        assert!(corner.iter().all(|&c| c > 245));
    }

    #[test]
    fn png_keeps_alpha() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn inline_image_is_drawn() {
        let href = format!("data:image/png;base64,{}", STANDARD.encode(red_png()));
        let pixmap = rasterize_svg(&svg_with_image(&href), 16, 16, None).unwrap();
        let img = pixmap_to_rgba_image(&pixmap).unwrap();
        assert_eq!(img.get_pixel(8, 8).0, [255, 0, 0, 255]);
    }

    #[test]
    fn file_path_image_is_not_read() {
        let path = std::env::temp_dir().join(format!("qrframe-raster-{}.png", std::process::id()));
        std::fs::write(&path, red_png()).unwrap();
        let svg = svg_with_image(&path.display().to_string());
        let pixmap = rasterize_svg(&svg, 16, 16, None).unwrap();
        std::fs::remove_file(&path).unwrap();

        let img = pixmap_to_rgba_image(&pixmap).unwrap();
        assert_eq!(img.get_pixel(8, 8).0[3], 0);
    }

    #[test]
    fn undecodable_inline_image_is_skipped() {
        let href = format!("data:image/png;base64,{}", STANDARD.encode(b"\x89PNG\r\n\x1a\nbroken"));
        let pixmap = rasterize_svg(&svg_with_image(&href), 16, 16, None).unwrap();
        let img = pixmap_to_rgba_image(&pixmap).unwrap();
        assert_eq!(img.get_pixel(8, 8).0[3], 0);
    }
}
