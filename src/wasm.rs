//! JavaScript bindings.
//!
//! Only available with the `tsify` feature. Designs cross the boundary as
//! plain objects in the camelCase [`DesignConfig`] shape.
//!
//! ```javascript
//! import init, { QrPreview, exportQr } from 'qrframe-renderer';
//!
//! await init();
//!
//! const preview = new QrPreview();
//! container.innerHTML = preview.render('https://example.com', design, 300);
//!
//! const file = exportQr('https://example.com', design, 'png', 'large', 'menu');
//! link.href = file.dataUri;
//! link.download = file.filename;
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::design::DesignConfig;
use crate::export::{ExportOutput, export};
use crate::preview::{EngineState, PreviewRenderer};

fn design_from_js(design: JsValue) -> Result<DesignConfig, JsError> {
    if design.is_undefined() || design.is_null() {
        return Ok(DesignConfig::default());
    }
    serde_wasm_bindgen::from_value(design)
        .map_err(|e| JsError::new(&format!("Invalid design: {}", e)))
}

/// Live preview bound to one container.
#[wasm_bindgen]
pub struct QrPreview {
    renderer: PreviewRenderer,
}

#[wasm_bindgen]
impl QrPreview {
    #[wasm_bindgen(constructor)]
    pub fn new() -> QrPreview {
        Self {
            renderer: PreviewRenderer::default(),
        }
    }

    /// Renders the preview and returns its HTML.
    pub fn render(&mut self, value: &str, design: JsValue, size: u32) -> Result<String, JsError> {
        let design = design_from_js(design)?;
        let element = self
            .renderer
            .mount(value, &design, size)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(element.html.clone())
    }

    /// One of `loading`, `ready` or `unavailable`.
    #[wasm_bindgen(js_name = "engineState")]
    pub fn engine_state(&self) -> String {
        match self.renderer.state() {
            EngineState::Loading => "loading",
            EngineState::Ready(_) => "ready",
            EngineState::Unavailable { .. } => "unavailable",
        }
        .to_string()
    }

    pub fn clear(&mut self) {
        self.renderer.clear();
    }
}

impl Default for QrPreview {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsExport {
    filename: Option<String>,
    mime_type: &'static str,
    data_uri: Option<String>,
    print_html: Option<String>,
}

/// Exports a QR code. Returns `{ filename, mimeType, dataUri }` for files
/// and `{ mimeType, printHtml }` for the print format.
#[wasm_bindgen(js_name = "exportQr")]
pub fn export_qr(
    value: &str,
    design: JsValue,
    format: &str,
    size: &str,
    filename: Option<String>,
) -> Result<JsValue, JsError> {
    let design = design_from_js(design)?;
    let output = export(value, &design, format, size, filename.as_deref())
        .map_err(|e| JsError::new(&e.to_string()))?;

    let result = match output {
        ExportOutput::File(artifact) => JsExport {
            data_uri: Some(artifact.to_data_uri()),
            filename: Some(artifact.filename),
            mime_type: artifact.mime_type,
            print_html: None,
        },
        ExportOutput::Print(doc) => JsExport {
            filename: None,
            mime_type: "text/html",
            data_uri: None,
            print_html: Some(doc.html),
        },
    };
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Failed to serialize export: {}", e)))
}
