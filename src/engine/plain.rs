//! Plain fallback engine.
//!
//! Draws square modules in a single flat color. Shape variants, corner
//! colors, gradients and logos are not representable here: gradients
//! collapse to their first stop. This is an accepted loss of fidelity, not
//! an error.

use std::fmt::Write as _;

use super::{QrEngine, encode};
use crate::error::Result;
use crate::mapper::{EngineConfig, first_stop_color};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainEngine;

impl PlainEngine {
    pub fn new() -> Self {
        Self
    }
}

impl QrEngine for PlainEngine {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn is_styled(&self) -> bool {
        false
    }

    fn render_svg(&self, value: &str, config: &EngineConfig) -> Result<String> {
        let matrix = encode(value, config.ec_level)?;
        let width = matrix.width();
        let margin = config.margin as usize;
        let total = width + 2 * margin;
        let dark = first_stop_color(&config.dots.paint);

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {total} {total}" shape-rendering="crispEdges">"#,
            config.width, config.height
        );
        if let Some(background) = &config.background {
            let _ = write!(
                svg,
                r#"<rect width="{total}" height="{total}" fill="{}"/>"#,
                first_stop_color(background).to_hex()
            );
        }

        let _ = write!(svg, r#"<path fill="{}" d=""#, dark.to_hex());
        for y in 0..width {
            for x in 0..width {
                if matrix.is_dark(x as i64, y as i64) {
                    let _ = write!(svg, "M{} {}h1v1h-1z", x + margin, y + margin);
                }
            }
        }
        svg.push_str(r#""/></svg>"#);
        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignConfig;
    use crate::mapper::build_engine_config;
    use crate::style::normalize;

    #[test]
    fn gradient_collapses_to_first_stop() {
        let design = DesignConfig {
            pattern_style: Some("dots".into()),
            pattern_use_gradient: Some(true),
            pattern_color1: Some("#ff0000".into()),
            pattern_color2: Some("#0000ff".into()),
            logo: Some("logo.png".into()),
            ..Default::default()
        };
        let config = build_engine_config(&normalize(&design), 200);
        let svg = PlainEngine::new().render_svg("plain", &config).unwrap();

        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(!svg.contains("#0000ff"));
        assert!(!svg.contains("Gradient"));
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("<image"));
    }

    #[test]
    fn view_box_includes_margin() {
        let config = build_engine_config(&normalize(&DesignConfig::default()), 100);
        let svg = PlainEngine::new().render_svg("hello", &config).unwrap();
        // Version 1 symbol (21 modules) plus one module of margin per side.
        assert!(svg.contains(r#"viewBox="0 0 23 23""#));
    }
}
