//! Printable HTML documents.

use crate::engine::escape_xml;

/// A standalone HTML page that prints itself once loaded.
///
/// The host opens it in a new window or frame; printing runs from the
/// page's `onload` handler so the caller is never blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintDocument {
    pub title: String,
    pub html: String,
}

impl PrintDocument {
    /// Builds the page around already composed `body` markup.
    pub fn new(title: &str, body: &str) -> Self {
        let title = if title.trim().is_empty() { "QR Code" } else { title.trim() };
        let html = format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n",
                "<style>\n",
                "@page {{ margin: 0; }}\n",
                "html, body {{ margin: 0; height: 100%; }}\n",
                "body {{ display: flex; align-items: center; justify-content: center; }}\n",
                "</style>\n",
                "<script>window.onload = function () {{ window.print(); }};</script>\n",
                "</head>\n<body>\n{body}\n</body>\n</html>\n"
            ),
            title = escape_xml(title),
            body = body,
        );
        Self {
            title: title.to_string(),
            html,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }
}
