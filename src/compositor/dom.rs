//! DOM/CSS frame compositor.

use std::fmt::Write as _;

use crate::engine::escape_xml;
use crate::layout::{
    BARE_BORDER_COLOR, BARE_BORDER_WIDTH, FrameLayout, LABEL_FONT_FAMILY, SHADOW_ALPHA,
    label_text_color,
};
use crate::style::{FrameKind, FrameStyle, GradientKind, Paint};

/// CSS `background` value for a paint.
pub fn paint_to_css(paint: &Paint) -> String {
    match paint {
        Paint::Solid(color) => color.to_hex(),
        Paint::Gradient(gradient) => {
            let stops = gradient
                .stops
                .iter()
                .map(|s| format!("{} {:.0}%", s.color.to_hex(), s.offset * 100.0))
                .collect::<Vec<_>>()
                .join(", ");
            match gradient.kind {
                // Engine angles run top-to-bottom at 0; CSS runs bottom-to-top.
                GradientKind::Linear { angle } => {
                    format!("linear-gradient({:.0}deg, {stops})", 180.0 - angle)
                }
                GradientKind::Radial => format!("radial-gradient(circle, {stops})"),
            }
        }
    }
}

fn background_css(paint: Option<&Paint>) -> String {
    paint.map(paint_to_css).unwrap_or_else(|| "transparent".to_string())
}

/// Wraps symbol markup without a frame: plain 1px border.
pub fn bare(symbol: &str, size: u32) -> String {
    format!(
        r#"<div class="qr-preview" style="display:inline-block;box-sizing:content-box;line-height:0;width:{size}px;height:{size}px;border:{BARE_BORDER_WIDTH}px solid {};">{symbol}</div>"#,
        BARE_BORDER_COLOR.to_hex()
    )
}

/// Wraps symbol markup in the frame described by `layout`.
///
/// `symbol` is expected to be sized to `layout.qr_rect`. `symbol_background`
/// is the QR background paint, `None` when transparent.
pub fn wrap(
    symbol: &str,
    layout: &FrameLayout,
    frame: &FrameStyle,
    symbol_background: Option<&Paint>,
) -> String {
    let b = layout.border_width;
    let outer = layout.outer_rect;
    let frame_bg = background_css(frame.background.as_ref());

    // Gradient borders use the padding-box/border-box background trick so
    // border-radius still applies.
    let (border, background) = match &frame.paint {
        Paint::Solid(color) => (format!("{b:.1}px solid {}", color.to_hex()), frame_bg.clone()),
        gradient @ Paint::Gradient(_) => {
            let inner = match &frame.background {
                Some(Paint::Solid(c)) => format!("linear-gradient({0}, {0})", c.to_hex()),
                Some(paint) => paint_to_css(paint),
                None => "linear-gradient(transparent, transparent)".to_string(),
            };
            (
                format!("{b:.1}px solid transparent"),
                format!("{inner} padding-box, {} border-box", paint_to_css(gradient)),
            )
        }
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="qr-frame qr-frame--{kind}" style="position:relative;display:inline-flex;flex-direction:column;align-items:center;box-sizing:border-box;width:{w:.1}px;height:{h:.1}px;padding:0 {p:.1}px {p:.1}px;border:{border};border-radius:{radius};background:{background};box-shadow:0 {so:.1}px {sb:.1}px rgba(0,0,0,{SHADOW_ALPHA});">"#,
        kind = frame.kind.as_str(),
        w = outer.width,
        h = outer.height,
        p = layout.padding,
        radius = layout.radius.to_css(),
        so = layout.shadow_offset,
        sb = layout.shadow_blur,
    );

    let text_color = label_text_color(frame).to_hex();
    let text = escape_xml(&frame.text);
    if frame.kind == FrameKind::Label && frame.background.is_some() {
        // The band is pulled out over the top and side borders, the same
        // area the canvas fills after stroking the border.
        let band = layout.label_background_rect;
        let _ = write!(
            html,
            r#"<div class="qr-frame__label" style="box-sizing:border-box;flex:none;width:{w:.1}px;height:{h:.1}px;margin:-{b:.1}px -{m:.1}px {lm:.1}px;padding-top:{b:.1}px;border-radius:{radius};background:{frame_bg};color:{text_color};font:bold {fs:.1}px {LABEL_FONT_FAMILY};line-height:{lh:.1}px;text-align:center;white-space:nowrap;overflow:hidden;">{text}</div>"#,
            w = band.width,
            h = band.height,
            m = b + layout.padding,
            lm = layout.label_margin,
            radius = layout.label_radius.to_css(),
            fs = layout.font_size,
            lh = layout.label_height,
        );
    } else {
        let label = layout.label_rect;
        let _ = write!(
            html,
            r#"<div class="qr-frame__label" style="box-sizing:border-box;flex:none;width:{w:.1}px;height:{h:.1}px;margin:0 -{p:.1}px {lm:.1}px;color:{text_color};font:bold {fs:.1}px {LABEL_FONT_FAMILY};line-height:{h:.1}px;text-align:center;white-space:nowrap;overflow:hidden;">{text}</div>"#,
            w = label.width,
            h = label.height,
            p = layout.padding,
            lm = layout.label_margin,
            fs = layout.font_size,
        );
    }

    let inner = layout.inner_rect;
    let _ = write!(
        html,
        r#"<div class="qr-frame__inner" style="box-sizing:border-box;flex:none;width:{w:.1}px;height:{w:.1}px;padding:{ip:.1}px;line-height:0;border-radius:{radius};background:{bg};">{symbol}</div></div>"#,
        w = inner.width,
        ip = layout.inner_padding,
        radius = layout.inner_radius.to_css(),
        bg = background_css(symbol_background),
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignConfig;
    use crate::layout::compute_frame_layout;
    use crate::style::normalize;

    #[test]
    fn css_gradients() {
        let design = DesignConfig {
            pattern_use_gradient: Some(true),
            pattern_color1: Some("#ff0000".into()),
            pattern_color2: Some("#0000ff".into()),
            pattern_gradient_type: Some("horizontal".into()),
            pattern_bg_use_gradient: Some(true),
            pattern_bg_gradient_type: Some("radial".into()),
            ..Default::default()
        };
        let style = normalize(&design);
        assert_eq!(
            paint_to_css(&style.pattern_paint),
            "linear-gradient(90deg, #ff0000 0%, #0000ff 100%)"
        );
        assert!(paint_to_css(style.background.as_ref().unwrap()).starts_with("radial-gradient"));
    }

    #[test]
    fn vertical_gradient_runs_downward() {
        let design = DesignConfig {
            pattern_use_gradient: Some(true),
            ..Default::default()
        };
        let css = paint_to_css(&normalize(&design).pattern_paint);
        assert!(css.starts_with("linear-gradient(180deg"));
    }

    #[test]
    fn bare_has_plain_border() {
        let html = bare("<svg></svg>", 200);
        assert!(html.contains("border:1px solid #e5e7eb"));
        assert!(html.contains("width:200px"));
        assert!(html.contains("<svg></svg>"));
    }

    #[test]
    fn wrap_uses_layout_numbers() {
        let design = DesignConfig {
            frame_bg_color: Some("#000000".into()),
            ..DesignConfig::new().with_frame("label", "Scan <me>")
        };
        let style = normalize(&design);
        let frame = style.frame.as_ref().unwrap();
        let layout = compute_frame_layout(frame.kind, 256);
        let html = wrap("<svg/>", &layout, frame, style.background.as_ref());

        assert!(html.contains("qr-frame--label"));
        assert!(html.contains(&format!("width:{:.1}px", layout.outer_rect.width)));
        assert!(html.contains(&format!("border:{:.1}px solid #000000", layout.border_width)));
        assert!(html.contains(&format!("border-radius:{}", layout.radius.to_css())));
        assert!(html.contains(&format!("border-radius:{}", layout.label_radius.to_css())));
        assert!(html.contains("color:#ffffff"));
        assert!(html.contains("Scan &lt;me&gt;"));
        assert!(html.contains("<svg/>"));
    }

    #[test]
    fn label_band_covers_border_like_canvas() {
        let design = DesignConfig {
            frame_color: Some("#ff0000".into()),
            frame_bg_color: Some("#000000".into()),
            ..DesignConfig::new().with_frame("label", "Scan me")
        };
        let style = normalize(&design);
        let frame = style.frame.as_ref().unwrap();
        let layout = compute_frame_layout(frame.kind, 512);
        let html = wrap("<svg/>", &layout, frame, None);

        // The outer box must not clip the band back inside its border.
        let outer_tag = &html[..html.find('>').unwrap()];
        assert!(!outer_tag.contains("overflow"));

        // The outer content box is inset by border + padding at the sides
        // and by the border at the top; the negative margins undo exactly
        // that, landing the band on `label_background_rect`.
        let band = layout.label_background_rect;
        let b = layout.border_width;
        let p = layout.padding;
        assert_eq!((band.x, band.y), (layout.outer_rect.x, layout.outer_rect.y));
        assert!(html.contains(&format!(
            "width:{:.1}px;height:{:.1}px;margin:-{b:.1}px -{:.1}px",
            band.width,
            band.height,
            b + p
        )));
        assert!(html.contains("background:#000000"));
    }

    #[test]
    fn label_font_matches_canvas() {
        let style = normalize(&DesignConfig::new().with_frame("bubble", "Hi"));
        let frame = style.frame.as_ref().unwrap();
        let layout = compute_frame_layout(frame.kind, 256);
        let html = wrap("<svg/>", &layout, frame, None);
        assert!(html.contains(&format!("font:bold {:.1}px {LABEL_FONT_FAMILY}", layout.font_size)));
    }

    #[test]
    fn gradient_border_keeps_radius() {
        let design = DesignConfig {
            frame_use_gradient: Some(true),
            frame_color1: Some("#ff0000".into()),
            frame_color2: Some("#00ff00".into()),
            ..DesignConfig::new().with_frame("bubble", "Hi")
        };
        let style = normalize(&design);
        let frame = style.frame.as_ref().unwrap();
        let layout = compute_frame_layout(frame.kind, 256);
        let html = wrap("<svg/>", &layout, frame, None);
        assert!(html.contains("solid transparent"));
        assert!(html.contains("border-box"));
        assert!(html.contains("background:transparent"));
    }
}
