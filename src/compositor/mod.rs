//! Frame compositors.
//!
//! Two renderers draw the same [`FrameLayout`](crate::layout::FrameLayout):
//!
//! - [`dom`] emits HTML with inline CSS for the live preview and print.
//! - [`canvas`] draws pixels with tiny-skia for PNG, JPEG and PDF exports.

pub mod canvas;
pub mod dom;
