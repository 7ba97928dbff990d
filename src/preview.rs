//! CSS and SVG for the live preview.
//!
//! The preview is a 192 px box rendered by the browser. [`PreviewStyle`]
//! derives everything it needs from the same geometry and filter functions
//! the exporter uses, so the preview and the export cannot disagree about
//! where the ring or the clip edge lies.

use serde::Serialize;

use crate::color::FillType;
use crate::config::{BackgroundType, BorderMode, BorderSettings, EditorConfig, SubjectTransform};
use crate::filter::build_filter_expression;
use crate::geometry::{
    CapStyle, PREVIEW_BASE_SIZE, RectF, Scale, compute_clip_region, outer_silhouette, px,
};
use crate::layer::background::BASE_TILE_SIZE;
use crate::layer::border_geometry;
use crate::layer::svg::escape_xml;

/// One CSS declaration, e.g. `("background-color", "#5b9bd5")`.
pub type CssDeclaration = (&'static str, String);

/// Styling of the preview, at [`PREVIEW_BASE_SIZE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewStyle {
    /// `clip-path` of the border-aware content region.
    pub content_clip_path: String,
    /// `clip-path` of the outer silhouette.
    pub silhouette_clip_path: String,
    /// `filter` applied to the subject image.
    pub filter: String,
    /// Declarations for the background element.
    pub background: Vec<CssDeclaration>,
    /// `transform` applied to the contain-fit subject image.
    pub image_transform: String,
    /// Dynamic ring overlay, absent when no ring is drawn.
    pub border: Option<BorderPreview>,
    /// `url(...)` of the static frame.
    pub frame_url: Option<String>,
    /// `clip-path` of the secondary overlay, when one is configured.
    pub overlay_clip_path: Option<String>,
}

/// The dynamic border as SVG.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderPreview {
    pub path_data: String,
    pub stroke_width: f32,
    /// Complete `<svg>` element covering the preview box.
    pub svg: String,
}

impl PreviewStyle {
    pub fn from_config(config: &EditorConfig) -> Self {
        let config = config.sanitized();
        let size = PREVIEW_BASE_SIZE;
        let cap = config.border.cap_style;
        let content = compute_clip_region(size, config.border.width, config.border.offset, cap);
        let content_clip_path = content.to_css();

        let filter = build_filter_expression(config.filters.enabled, &config.filters.channels);

        let (border, frame_url) = match config.border.mode {
            BorderMode::Dynamic => (border_preview(size, &config.border), None),
            BorderMode::Static => (
                None,
                config
                    .border
                    .static_source
                    .as_ref()
                    .and_then(|source| source.to_css_url())
                    .map(|url| css_url(&url)),
            ),
        };

        Self {
            silhouette_clip_path: outer_silhouette(size, cap).to_css(),
            filter: filter.to_css(),
            background: background_declarations(&config),
            image_transform: image_transform(&config.transform),
            border,
            frame_url,
            overlay_clip_path: config.overlay.as_ref().map(|_| content_clip_path.clone()),
            content_clip_path,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn css_url(url: &str) -> String {
    format!("url(\"{}\")", url.replace('"', "%22"))
}

fn background_declarations(config: &EditorConfig) -> Vec<CssDeclaration> {
    let background = &config.background;
    let mut decls = vec![("background-color", background.color.to_hex())];
    match background.kind {
        BackgroundType::Solid => {}
        BackgroundType::Gradient => {
            decls.push(("background-image", background.gradient.to_css()));
        }
        BackgroundType::Pattern => {
            if let Some(url) = background.pattern.source.as_ref().and_then(|s| s.to_css_url()) {
                let tile = BASE_TILE_SIZE * background.pattern.scale / 100.0;
                decls.push(("background-image", css_url(&url)));
                decls.push(("background-size", format!("{}px auto", px(tile))));
                decls.push(("background-repeat", "repeat".to_string()));
            }
        }
        BackgroundType::Image => {
            if let Some(url) = background.image.source.as_ref().and_then(|s| s.to_css_url()) {
                let size = match background.image.size {
                    crate::config::BackgroundSize::Percent(p) => format!("{p}% auto"),
                    other => other.to_string(),
                };
                decls.push(("background-image", css_url(&url)));
                decls.push(("background-size", size));
                decls.push((
                    "background-position",
                    background.image.position.as_css().to_string(),
                ));
                decls.push(("background-repeat", "no-repeat".to_string()));
            }
        }
    }
    decls
}

/// Transform of the contain-fit subject image, relative to its center.
pub fn image_transform(transform: &SubjectTransform) -> String {
    format!(
        "translate({}px, {}px) scale({}) rotate({}deg) scaleX({}) scaleY({})",
        px(transform.position.x),
        px(transform.position.y),
        px(transform.zoom),
        px(transform.rotate),
        if transform.flip_horizontal { -1 } else { 1 },
        if transform.flip_vertical { -1 } else { 1 },
    )
}

fn border_preview(size: f32, settings: &BorderSettings) -> Option<BorderPreview> {
    let geometry = border_geometry(size, settings, Scale::PREVIEW)?;
    let path_data = geometry.svg_path_data();
    let (line_cap, line_join) = match settings.cap_style {
        CapStyle::Rounded => ("round", "round"),
        CapStyle::Square => ("butt", "miter"),
        CapStyle::Beveled => ("butt", "round"),
    };

    let (defs, stroke) = match settings.fill_type {
        FillType::Solid => (String::new(), settings.color.to_hex()),
        FillType::Gradient => {
            let g = &settings.gradient;
            let stops = format!(
                r#"<stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/>"#,
                g.start.to_hex(),
                g.end.to_hex()
            );
            let defs = match g.direction {
                crate::color::GradientDirection::Radial => format!(
                    r#"<defs><radialGradient id="border-gradient" gradientUnits="userSpaceOnUse" cx="{c}" cy="{c}" r="{}">{stops}</radialGradient></defs>"#,
                    px(size / 2.0 - geometry.stroke_width / 2.0),
                    c = px(size / 2.0)
                ),
                direction => {
                    let ((x1, y1), (x2, y2)) = direction.linear_endpoints(RectF::square(size));
                    format!(
                        r#"<defs><linearGradient id="border-gradient" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient></defs>"#,
                        px(x1),
                        px(y1),
                        px(x2),
                        px(y2)
                    )
                }
            };
            (defs, "url(#border-gradient)".to_string())
        }
    };

    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">{defs}<path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="{line_cap}" stroke-linejoin="{line_join}" opacity="{}"/></svg>"#,
        escape_xml(&path_data),
        stroke,
        px(geometry.stroke_width),
        px(settings.opacity / 100.0),
        s = px(size)
    );

    Some(BorderPreview {
        path_data,
        stroke_width: geometry.stroke_width,
        svg,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetSource;
    use crate::color::{Color, Gradient, GradientDirection};
    use crate::config::{BackgroundAnchor, BackgroundSize, OverlaySettings, Position};

    #[test]
    fn default_preview() {
        let style = PreviewStyle::from_config(&EditorConfig::default());
        assert_eq!(style.content_clip_path, "circle(96px at 96px 96px)");
        assert_eq!(style.silhouette_clip_path, "circle(96px at 96px 96px)");
        assert_eq!(style.filter, "none");
        assert_eq!(
            style.background,
            vec![("background-color", "#5b9bd5".to_string())]
        );
        assert_eq!(
            style.image_transform,
            "translate(0px, 0px) scale(1) rotate(0deg) scaleX(1) scaleY(1)"
        );
        assert!(style.border.is_none());
        assert!(style.overlay_clip_path.is_none());
    }

    #[test]
    fn border_shrinks_content_clip() {
        let mut config = EditorConfig::default();
        config.border.width = 10.0;
        config.border.offset = 2.0;
        let style = PreviewStyle::from_config(&config);
        assert_eq!(style.content_clip_path, "circle(89px at 96px 96px)");

        config.border.cap_style = CapStyle::Square;
        let style = PreviewStyle::from_config(&config);
        assert_eq!(style.content_clip_path, "inset(7px 7px 7px 7px)");
        assert_eq!(style.silhouette_clip_path, "inset(0px 0px 0px 0px)");
    }

    #[test]
    fn border_svg_matches_export_geometry() {
        let mut config = EditorConfig::default();
        config.border.width = 6.0;
        config.border.cap_style = CapStyle::Square;
        config.border.color = Color::rgb(255, 0, 0);
        config.border.opacity = 50.0;
        let style = PreviewStyle::from_config(&config);
        let border = style.border.unwrap();
        assert_eq!(border.path_data, "M 3 3 L 189 3 L 189 189 L 3 189 Z");
        assert_eq!(border.stroke_width, 6.0);
        assert!(border.svg.contains(r##"stroke="#ff0000""##));
        assert!(border.svg.contains(r#"stroke-linecap="butt""#));
        assert!(border.svg.contains(r#"opacity="0.5""#));
        assert!(crate::layer::svg::parse_svg(&border.svg, None).is_ok());
    }

    #[test]
    fn gradient_border_uses_defs() {
        let mut config = EditorConfig::default();
        config.border.width = 4.0;
        config.border.fill_type = FillType::Gradient;
        config.border.gradient =
            Gradient::new(Color::BLACK, Color::WHITE, GradientDirection::Radial);
        let border = PreviewStyle::from_config(&config).border.unwrap();
        assert!(border.svg.contains(r#"<radialGradient id="border-gradient""#));
        assert!(border.svg.contains(r#"r="94""#));
        assert!(border.svg.contains(r#"stroke="url(#border-gradient)""#));
    }

    #[test]
    fn filters_and_transform() {
        let mut config = EditorConfig::default();
        config.filters.enabled = true;
        config.filters.channels.brightness = 120.0;
        config.filters.channels.blur = 2.0;
        config.transform.zoom = 1.5;
        config.transform.rotate = -45.0;
        config.transform.flip_horizontal = true;
        config.transform.position = Position { x: 12.5, y: -3.0 };
        let style = PreviewStyle::from_config(&config);
        assert_eq!(style.filter, "brightness(120%) blur(2px)");
        assert_eq!(
            style.image_transform,
            "translate(12.5px, -3px) scale(1.5) rotate(-45deg) scaleX(-1) scaleY(1)"
        );
    }

    #[test]
    fn image_background_declarations() {
        let mut config = EditorConfig::default();
        config.background.kind = BackgroundType::Image;
        config.background.image.source = Some(AssetSource::path("bg/stars.png"));
        config.background.image.size = BackgroundSize::Percent(50.0);
        config.background.image.position = BackgroundAnchor::Top;
        let style = PreviewStyle::from_config(&config);
        assert_eq!(
            style.background,
            vec![
                ("background-color", "#5b9bd5".to_string()),
                ("background-image", "url(\"bg/stars.png\")".to_string()),
                ("background-size", "50% auto".to_string()),
                ("background-position", "top".to_string()),
                ("background-repeat", "no-repeat".to_string()),
            ]
        );
    }

    #[test]
    fn pattern_and_gradient_backgrounds() {
        let mut config = EditorConfig::default();
        config.background.kind = BackgroundType::Pattern;
        config.background.pattern.source = Some(AssetSource::path("dots.svg"));
        config.background.pattern.scale = 50.0;
        let style = PreviewStyle::from_config(&config);
        assert!(style
            .background
            .contains(&("background-size", "30px auto".to_string())));

        config.background.kind = BackgroundType::Gradient;
        let style = PreviewStyle::from_config(&config);
        assert_eq!(
            style.background[1],
            (
                "background-image",
                "linear-gradient(to right, #4ecdc4, #45b7d1)".to_string()
            )
        );
    }

    #[test]
    fn static_frame_and_overlay() {
        let mut config = EditorConfig::default();
        config.border.mode = BorderMode::Static;
        config.border.width = 8.0;
        config.border.static_source = Some(AssetSource::path("frames/gold.png"));
        config.overlay = Some(OverlaySettings {
            source: AssetSource::path("overlay.png"),
            size: 80.0,
        });
        let style = PreviewStyle::from_config(&config);
        assert!(style.border.is_none());
        assert_eq!(style.frame_url.as_deref(), Some("url(\"frames/gold.png\")"));
        assert_eq!(
            style.overlay_clip_path.as_deref(),
            Some("circle(92px at 96px 96px)")
        );
    }

    #[test]
    fn serializes_camel_case() {
        let json = PreviewStyle::from_config(&EditorConfig::default())
            .to_json()
            .unwrap();
        assert!(json.contains("\"contentClipPath\""));
        assert!(json.contains("\"imageTransform\""));
    }
}
