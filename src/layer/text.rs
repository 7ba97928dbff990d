//! Text overlay.
//!
//! [`layout_text`] places the characters (straight, vertical or around a
//! circle) without touching pixels. [`TextPlan::to_svg`] turns the result
//! into SVG markup, and [`paint_text`] renders it with resvg against a
//! [`FontLibrary`].

use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use resvg::tiny_skia::Transform;
use resvg::usvg::fontdb;

use super::svg::{escape_xml, parse_svg};
use super::{Layer, RenderContext};
use crate::color::{FillType, GradientDirection};
use crate::config::{CurveDirection, TextLayout, TextSettings};
use crate::geometry::{RectF, Scale, px};

/// Share of the circle circumference curved text may occupy before it is
/// shrunk to fit.
pub const CURVED_TEXT_ARC_FRACTION: f32 = 0.9;

/// Line height of vertical text, in ems.
pub const VERTICAL_LINE_HEIGHT: f32 = 1.2;

/// Advance width assumed when no font metrics are available, in ems.
pub const AVERAGE_ADVANCE_EM: f32 = 0.6;

// ============================================================================
// Measuring
// ============================================================================

/// Font parameters of a text run, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub family: String,
    pub weight: u16,
    pub size: f32,
    pub letter_spacing: f32,
}

/// Measures the advance width of a run of text.
pub trait TextMeasure {
    fn measure(&self, text: &str, style: &FontStyle) -> f32;
}

/// Width estimate from character count, used when no fonts are loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl TextMeasure for EstimatedMetrics {
    fn measure(&self, text: &str, style: &FontStyle) -> f32 {
        let n = text.chars().count() as f32;
        (n * (style.size * AVERAGE_ADVANCE_EM + style.letter_spacing)).max(0.0)
    }
}

/// A shared font database used to shape and measure text.
#[derive(Clone)]
pub struct FontLibrary {
    db: Arc<fontdb::Database>,
}

impl FontLibrary {
    /// A library with no fonts; text is skipped when rendering.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
        }
    }

    /// A library populated with the fonts installed on this system.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!("loaded {} system font faces", db.len());
        resolve_generic_families(&mut db);
        Self { db: Arc::new(db) }
    }

    /// Adds a font from memory (TTF, OTF or collection).
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        let db = Arc::make_mut(&mut self.db);
        db.load_font_data(data);
        resolve_generic_families(db);
    }

    /// Adds a font file.
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let db = Arc::make_mut(&mut self.db);
        db.load_font_file(path)?;
        resolve_generic_families(db);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }
}

/// Families tried, in order, for `sans-serif` and `serif` when the
/// database defaults are not installed.
const FALLBACK_FAMILIES: [&str; 4] = ["DejaVu Sans", "Liberation Sans", "Noto Sans", "FreeSans"];

/// Points `sans-serif` and `serif` at an installed face when their defaults
/// are missing, so the editor's generic families always resolve.
fn resolve_generic_families(db: &mut fontdb::Database) {
    let resolves = |db: &fontdb::Database, family: fontdb::Family<'_>| {
        db.query(&fontdb::Query {
            families: &[family],
            ..Default::default()
        })
        .is_some()
    };
    if resolves(db, fontdb::Family::SansSerif) && resolves(db, fontdb::Family::Serif) {
        return;
    }

    let installed: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    let Some(family) = FALLBACK_FAMILIES
        .iter()
        .find(|name| installed.iter().any(|f| f == *name))
        .map(|name| name.to_string())
        .or_else(|| installed.first().cloned())
    else {
        return;
    };

    if !resolves(db, fontdb::Family::SansSerif) {
        debug!("sans-serif resolves to {family}");
        db.set_sans_serif_family(family.clone());
    }
    if !resolves(db, fontdb::Family::Serif) {
        debug!("serif resolves to {family}");
        db.set_serif_family(family);
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl TextMeasure for FontLibrary {
    /// Shapes the run through usvg and takes the width of its bounds,
    /// falling back to [`EstimatedMetrics`] when nothing could be shaped.
    fn measure(&self, text: &str, style: &FontStyle) -> f32 {
        if self.db.is_empty() || text.trim().is_empty() {
            return EstimatedMetrics.measure(text, style);
        }
        let estimate = EstimatedMetrics.measure(text, style);
        let (w, h) = ((estimate * 4.0).max(1.0), (style.size * 3.0).max(1.0));
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="0" y="{}" font-family="{}" font-weight="{}" font-size="{}" letter-spacing="{}">{}</text></svg>"#,
            style.size * 2.0,
            escape_xml(&style.family),
            style.weight,
            style.size,
            style.letter_spacing,
            escape_xml(text)
        );
        match parse_svg(&svg, Some(self.database())) {
            Ok(tree) if !tree.root().children().is_empty() => {
                tree.root().abs_bounding_box().width()
            }
            _ => estimate,
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

/// One positioned run of text. `x`/`y` is the run's center.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Degrees, clockwise.
    pub rotation: f32,
}

/// The result of [`layout_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextPlan {
    /// Style after scaling and any shrink-to-fit.
    pub style: FontStyle,
    pub glyphs: Vec<PlacedGlyph>,
}

/// Lays out the text overlay on a `size x size` surface.
///
/// Returns `None` when the overlay is disabled or has no content.
///
/// Curved text places character `i` of `n` at
/// `start_angle ± i * 360 / n` degrees (0 is 12 o'clock, positive is
/// clockwise) and rotates it tangent to the circle. Counterclockwise text is
/// additionally turned 180° so it reads upright along the bottom. If the
/// measured run is longer than [`CURVED_TEXT_ARC_FRACTION`] of the
/// circumference, font size and letter spacing shrink proportionally.
pub fn layout_text(
    settings: &TextSettings,
    size: f32,
    scale: Scale,
    measure: &dyn TextMeasure,
) -> Option<TextPlan> {
    if !settings.is_visible() {
        return None;
    }

    let mut style = FontStyle {
        family: settings.font_family.clone(),
        weight: settings.font_weight,
        size: scale.apply(settings.font_size),
        letter_spacing: scale.apply(settings.letter_spacing),
    };
    let cx = size / 2.0 + settings.offset_x / 100.0 * size;
    let cy = size / 2.0 + settings.offset_y / 100.0 * size;
    let chars: Vec<char> = settings.content.chars().collect();
    let n = chars.len();

    let glyphs = match settings.layout {
        TextLayout::Straight => vec![PlacedGlyph {
            text: settings.content.clone(),
            x: cx,
            y: cy,
            rotation: 0.0,
        }],
        TextLayout::Vertical => {
            let line = style.size * VERTICAL_LINE_HEIGHT;
            let first = -(n as f32 - 1.0) / 2.0;
            chars
                .iter()
                .enumerate()
                .map(|(i, ch)| PlacedGlyph {
                    text: ch.to_string(),
                    x: cx,
                    y: cy + (first + i as f32) * line,
                    rotation: 0.0,
                })
                .collect()
        }
        TextLayout::Curved => {
            let radius = scale.apply(settings.curve_radius);
            let usable = CURVED_TEXT_ARC_FRACTION * 2.0 * std::f32::consts::PI * radius;
            let full = measure.measure(&settings.content, &style);
            if full > usable && full > 0.0 {
                let shrink = usable / full;
                debug!("curved text {full:.1}px exceeds {usable:.1}px, shrinking by {shrink:.3}");
                style.size *= shrink;
                style.letter_spacing *= shrink;
            }

            let (sign, turn) = match settings.curve_direction {
                CurveDirection::Clockwise => (1.0, 0.0),
                CurveDirection::Counterclockwise => (-1.0, 180.0),
            };
            let step = 360.0 / n as f32;
            chars
                .iter()
                .enumerate()
                .map(|(i, ch)| {
                    let angle = settings.curve_start_angle + sign * step * i as f32;
                    let (sin, cos) = angle.to_radians().sin_cos();
                    PlacedGlyph {
                        text: ch.to_string(),
                        x: cx + radius * sin,
                        y: cy - radius * cos,
                        rotation: angle + turn,
                    }
                })
                .collect()
        }
    };

    Some(TextPlan { style, glyphs })
}

impl TextPlan {
    /// SVG document of the whole `size x size` surface containing the text.
    ///
    /// Gradients span the full surface.
    pub fn to_svg(&self, size: f32, settings: &TextSettings) -> String {
        let mut svg = String::new();
        // Writing to a String cannot fail.
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
            s = px(size)
        );

        let fill = match settings.fill_type {
            FillType::Solid => {
                let c = settings.color;
                format!(
                    r#"fill="{}" fill-opacity="{}""#,
                    crate::color::Color::rgb(c.r, c.g, c.b),
                    c.a as f32 / 255.0
                )
            }
            FillType::Gradient => {
                let g = settings.gradient;
                let stops = format!(
                    r#"<stop offset="0" stop-color="{}" stop-opacity="{}"/><stop offset="1" stop-color="{}" stop-opacity="{}"/>"#,
                    crate::color::Color::rgb(g.start.r, g.start.g, g.start.b),
                    g.start.a as f32 / 255.0,
                    crate::color::Color::rgb(g.end.r, g.end.g, g.end.b),
                    g.end.a as f32 / 255.0
                );
                let _ = match g.direction {
                    GradientDirection::Radial => write!(
                        svg,
                        r#"<defs><radialGradient id="text-fill" gradientUnits="userSpaceOnUse" cx="{c}" cy="{c}" r="{c}">{stops}</radialGradient></defs>"#,
                        c = px(size / 2.0)
                    ),
                    direction => {
                        let ((x1, y1), (x2, y2)) =
                            direction.linear_endpoints(RectF::square(size));
                        write!(
                            svg,
                            r#"<defs><linearGradient id="text-fill" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient></defs>"#,
                            px(x1),
                            px(y1),
                            px(x2),
                            px(y2)
                        )
                    }
                };
                r#"fill="url(#text-fill)""#.to_string()
            }
        };

        let _ = write!(
            svg,
            r#"<g opacity="{}" font-family="{}" font-weight="{}" font-size="{}" letter-spacing="{}" text-anchor="middle" dominant-baseline="central" {fill}>"#,
            (settings.opacity / 100.0).clamp(0.0, 1.0),
            escape_xml(&self.style.family),
            self.style.weight,
            px(self.style.size),
            px(self.style.letter_spacing)
        );
        for glyph in &self.glyphs {
            let (x, y) = (px(glyph.x), px(glyph.y));
            let _ = if glyph.rotation == 0.0 {
                write!(
                    svg,
                    r#"<text x="{x}" y="{y}" xml:space="preserve">{}</text>"#,
                    escape_xml(&glyph.text)
                )
            } else {
                write!(
                    svg,
                    r#"<text x="{x}" y="{y}" transform="rotate({} {x} {y})" xml:space="preserve">{}</text>"#,
                    px(glyph.rotation),
                    escape_xml(&glyph.text)
                )
            };
        }
        svg.push_str("</g></svg>");
        svg
    }
}

// ============================================================================
// Painting
// ============================================================================

/// Stage 7: the text overlay, drawn unclipped on top of everything.
pub struct TextLayer<'a> {
    pub settings: &'a TextSettings,
    pub fonts: &'a FontLibrary,
}

impl Layer for TextLayer<'_> {
    fn name(&self) -> &'static str {
        "text"
    }

    fn paint(&self, ctx: &mut RenderContext) {
        paint_text(ctx, self.settings, self.fonts);
    }
}

/// Lays out and renders the text overlay.
pub fn paint_text(ctx: &mut RenderContext, settings: &TextSettings, fonts: &FontLibrary) {
    let size = ctx.size();
    let Some(plan) = layout_text(settings, size, ctx.scale(), fonts) else {
        return;
    };
    if fonts.is_empty() {
        warn!("no fonts available, skipping text overlay");
        return;
    }
    let svg = plan.to_svg(size, settings);
    match parse_svg(&svg, Some(fonts.database())) {
        Ok(tree) => {
            debug!("text overlay with {} runs", plan.glyphs.len());
            resvg::render(&tree, Transform::identity(), &mut ctx.pixmap_mut().as_mut());
        }
        Err(e) => warn!("text overlay markup rejected: {e}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
