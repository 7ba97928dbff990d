//! SVG parsing and rendering using resvg/usvg.
//!
//! Shared by vector assets (pattern tiles, overlays, static borders) and by
//! the text layer, which renders its glyphs through generated SVG markup.

use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, Options, Tree, fontdb};

use crate::color::Color;

// ============================================================================
// Parsing
// ============================================================================

/// Parses SVG markup.
///
/// When `fonts` is given, text elements are shaped against that database;
/// otherwise text is dropped.
pub fn parse_svg(svg_data: &str, fonts: Option<Arc<fontdb::Database>>) -> Result<Tree, usvg::Error> {
    let mut opts = Options::default();
    if let Some(fonts) = fonts {
        opts.fontdb = fonts;
    }
    Tree::from_str(svg_data, &opts)
}

/// Returns the intrinsic `(width, height)` of an SVG document.
pub fn svg_natural_size(svg_data: &str) -> Option<(f32, f32)> {
    let tree = parse_svg(svg_data, None).ok()?;
    let size = tree.size();
    Some((size.width(), size.height()))
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Renders SVG markup into a `width x height` pixmap.
///
/// The document is stretched to fill the target exactly; callers that need
/// the intrinsic aspect ratio compute the target size from
/// [`svg_natural_size`]. If `fill_color` is provided, every fill and stroke
/// is replaced with it first.
///
/// Returns `None` if the SVG cannot be parsed or the size is zero.
pub fn render_svg(
    svg_data: &str,
    width: u32,
    height: u32,
    fill_color: Option<Color>,
) -> Option<Pixmap> {
    let svg_data = match fill_color {
        Some(color) => replace_svg_colors(svg_data, color),
        None => svg_data.to_string(),
    };

    let tree = parse_svg(&svg_data, None).ok()?;
    render_tree(&tree, width, height)
}

/// Renders a parsed tree into a `width x height` pixmap, stretching to fit.
pub fn render_tree(tree: &Tree, width: u32, height: u32) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    let svg_size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / svg_size.width(),
        height as f32 / svg_size.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());
    Some(pixmap)
}

/// Replaces `fill="..."` and `stroke="..."` attribute values with `color`.
///
/// This is a text-level substitution that keeps `none` and `transparent`
/// values, enough for the single-color pattern and overlay art it is used on.
pub fn replace_svg_colors(svg_data: &str, color: Color) -> String {
    let hex_color = Color::rgb(color.r, color.g, color.b).to_hex();
    let result = replace_color_attr(svg_data, "fill", &hex_color);
    replace_color_attr(&result, "stroke", &hex_color)
}

/// Replaces a color attribute value, preserving "none" values.
fn replace_color_attr(svg: &str, attr: &str, new_color: &str) -> String {
    let mut result = String::with_capacity(svg.len());
    let pattern = format!("{}=\"", attr);
    let mut remaining = svg;

    while let Some(start) = remaining.find(&pattern) {
        result.push_str(&remaining[..start + pattern.len()]);
        remaining = &remaining[start + pattern.len()..];

        if let Some(end) = remaining.find('"') {
            let value = &remaining[..end];
            if value == "none" || value == "transparent" || value.starts_with("url(") {
                result.push_str(value);
            } else {
                result.push_str(new_color);
            }
            remaining = &remaining[end..];
        }
    }

    result.push_str(remaining);
    result
}

/// Escapes text for use inside SVG element content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Looks up the Twemoji SVG for an emoji character.
#[cfg(feature = "twemoji")]
pub fn resolve_emoji(emoji: &str) -> Option<String> {
    use twemoji_assets::svg::SvgTwemojiAsset;
    let asset = SvgTwemojiAsset::from_emoji(emoji)?;
    let svg: &str = asset.as_ref();
    Some(svg.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect x="0" y="0" width="100" height="50" fill="#ff0000"/></svg>"##;

    #[test]
    fn render_stretches_to_target() {
        let pixmap = render_svg(SIMPLE_SVG, 40, 40, None).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 40));
        let p = pixmap.pixel(20, 35).unwrap();
        assert_eq!(p.alpha(), 255);
        assert_eq!(p.red(), 255);
    }

    #[test]
    fn render_with_color_replacement() {
        let pixmap = render_svg(SIMPLE_SVG, 10, 10, Some(Color::rgb(0, 255, 0))).unwrap();
        let p = pixmap.pixel(5, 5).unwrap();
        assert!(p.green() > p.red(), "green should dominate after replacement");
    }

    #[test]
    fn natural_size() {
        assert_eq!(svg_natural_size(SIMPLE_SVG), Some((100.0, 50.0)));
        assert_eq!(svg_natural_size("not svg"), None);
    }

    #[test]
    fn zero_size_returns_none() {
        assert!(render_svg(SIMPLE_SVG, 0, 10, None).is_none());
    }

    #[test]
    fn replace_color_preserves_none_and_urls() {
        let svg = r##"<circle fill="none" stroke="#000000"/><rect fill="url(#g)"/>"##;
        let result = replace_svg_colors(svg, Color::rgb(255, 0, 0));
        assert!(result.contains(r#"fill="none""#));
        assert!(result.contains(r##"stroke="#ff0000""##));
        assert!(result.contains(r##"fill="url(#g)""##));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn resolves_emoji() {
        let svg = resolve_emoji("🦆").expect("duck emoji should be supported");
        assert!(svg.contains("<svg"));
        assert!(resolve_emoji("not-an-emoji").is_none());
    }
}
