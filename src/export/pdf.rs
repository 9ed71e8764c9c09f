//! PDF backends.
//!
//! PDF output is an optional capability. [`default_backend`] returns the
//! pdf-writer backend when the `pdf` feature is enabled and an
//! [`UnavailablePdfBackend`] otherwise; the export pipeline checks
//! [`PdfBackend::is_available`] once and falls back to PNG.

use image::RgbaImage;

use crate::error::{Error, Result};

/// Embeds a raster image as a single full-bleed page.
pub trait PdfBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    /// Writes a one-page PDF whose square page is `page_size` points wide.
    fn write_pdf(&self, image: &RgbaImage, page_size: u32) -> Result<Vec<u8>>;
}

/// Stand-in used when no PDF library is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePdfBackend;

impl PdfBackend for UnavailablePdfBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn write_pdf(&self, _image: &RgbaImage, _page_size: u32) -> Result<Vec<u8>> {
        Err(Error::Pdf("no PDF backend available".into()))
    }
}

/// The best backend compiled into this build.
pub fn default_backend() -> Box<dyn PdfBackend> {
    #[cfg(feature = "pdf")]
    {
        Box::new(PdfWriterBackend)
    }

    #[cfg(not(feature = "pdf"))]
    {
        Box::new(UnavailablePdfBackend)
    }
}

#[cfg(feature = "pdf")]
pub use writer::PdfWriterBackend;

#[cfg(feature = "pdf")]
mod writer {
    use image::RgbaImage;
    use miniz_oxide::deflate::compress_to_vec_zlib;
    use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

    use super::PdfBackend;
    use crate::error::Result;

    const COMPRESSION_LEVEL: u8 = 6;
    const IMAGE_NAME: &[u8] = b"Im1";

    /// PDF output through pdf-writer, with Flate-compressed image data.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfWriterBackend;

    impl PdfBackend for PdfWriterBackend {
        fn name(&self) -> &'static str {
            "pdf-writer"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn write_pdf(&self, image: &RgbaImage, page_size: u32) -> Result<Vec<u8>> {
            let (width, height) = image.dimensions();
            let side = page_size as f32;

            let catalog_id = Ref::new(1);
            let page_tree_id = Ref::new(2);
            let page_id = Ref::new(3);
            let content_id = Ref::new(4);
            let image_id = Ref::new(5);
            let mask_id = Ref::new(6);

            let mut pdf = Pdf::new();
            pdf.catalog(catalog_id).pages(page_tree_id);
            pdf.pages(page_tree_id).kids([page_id]).count(1);

            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, side, side));
            page.parent(page_tree_id);
            page.contents(content_id);
            let mut resources = page.resources();
            resources.x_objects().pair(Name(IMAGE_NAME), image_id);
            resources.finish();
            page.finish();

            // Image space is the unit square; scale it to the full page.
            let mut content = Content::new();
            content.save_state();
            content.transform([side, 0.0, 0.0, side, 0.0, 0.0]);
            content.x_object(Name(IMAGE_NAME));
            content.restore_state();
            pdf.stream(content_id, &content.finish());

            let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
            let mut alpha = Vec::with_capacity(width as usize * height as usize);
            for pixel in image.pixels() {
                let [r, g, b, a] = pixel.0;
                rgb.extend_from_slice(&[r, g, b]);
                alpha.push(a);
            }
            let has_alpha = alpha.iter().any(|&a| a != 255);

            let rgb = compress_to_vec_zlib(&rgb, COMPRESSION_LEVEL);
            let mut xobject = pdf.image_xobject(image_id, &rgb);
            xobject.filter(Filter::FlateDecode);
            xobject.width(width as i32);
            xobject.height(height as i32);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
            if has_alpha {
                xobject.s_mask(mask_id);
            }
            xobject.finish();

            if has_alpha {
                let alpha = compress_to_vec_zlib(&alpha, COMPRESSION_LEVEL);
                let mut mask = pdf.image_xobject(mask_id, &alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(width as i32);
                mask.height(height as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask.finish();
            }

            log::debug!("wrote {width}x{height} image into {side}pt PDF page");
            Ok(pdf.finish())
        }
    }
}
