//! Border ring and static frame.
//!
//! The dynamic ring is stroked along the same region
//! [`compute_clip_region`] produces for the content clip, so the two always
//! share a boundary. Partial rings walk that boundary clockwise from the
//! configured rotation.

use log::{debug, warn};
use resvg::tiny_skia::{LineCap, LineJoin, Paint, Path, Shader, Stroke, Transform};

use super::background::picture_size;
use super::{Layer, RenderContext};
use crate::asset::Asset;
use crate::color::FillType;
use crate::config::{BackgroundSize, BorderMode, BorderSettings};
use crate::geometry::{
    CapStyle, ClipRegion, RectF, Scale, compute_clip_region, path_to_svg_data,
};

/// Amounts at or above this percentage draw the full closed ring.
pub const FULL_BORDER_THRESHOLD: f32 = 99.0;

// ============================================================================
// Geometry
// ============================================================================

/// The stroke path of a dynamic border.
#[derive(Debug, Clone)]
pub struct BorderGeometry {
    /// Centerline region of the ring.
    pub ring: ClipRegion,
    pub stroke_width: f32,
    pub path: Path,
    /// Analytic length of `path`.
    pub drawn_length: f32,
    pub perimeter: f32,
    /// True when the full closed ring is drawn.
    pub closed: bool,
}

impl BorderGeometry {
    /// SVG path data for the preview overlay.
    pub fn svg_path_data(&self) -> String {
        path_to_svg_data(&self.path)
    }
}

/// Computes the ring for a `size x size` surface.
///
/// Returns `None` when nothing is drawn: zero width or zero amount.
pub fn border_geometry(
    size: f32,
    settings: &BorderSettings,
    scale: Scale,
) -> Option<BorderGeometry> {
    let stroke_width = scale.apply(settings.width);
    if stroke_width.is_nan() || stroke_width <= 0.0 {
        return None;
    }
    let amount = if settings.amount.is_finite() {
        settings.amount.clamp(0.0, 100.0)
    } else {
        100.0
    };
    if amount <= 0.0 {
        return None;
    }

    let ring = compute_clip_region(size, stroke_width, 0.0, settings.cap_style);
    let boundary = ring.boundary();
    let perimeter = boundary.perimeter();

    if amount >= FULL_BORDER_THRESHOLD {
        return Some(BorderGeometry {
            ring,
            stroke_width,
            path: ring.to_path()?,
            drawn_length: perimeter,
            perimeter,
            closed: true,
        });
    }

    let start = settings.rotation / 360.0 * perimeter;
    let traced = boundary.trace(start, amount / 100.0 * perimeter)?;
    Some(BorderGeometry {
        ring,
        stroke_width,
        path: traced.path,
        drawn_length: traced.length,
        perimeter,
        closed: false,
    })
}

/// Stroke style for a cap style.
pub fn border_stroke(cap_style: CapStyle, width: f32) -> Stroke {
    let (line_cap, line_join) = match cap_style {
        CapStyle::Rounded => (LineCap::Round, LineJoin::Round),
        CapStyle::Square => (LineCap::Butt, LineJoin::Miter),
        CapStyle::Beveled => (LineCap::Butt, LineJoin::Round),
    };
    Stroke {
        width,
        line_cap,
        line_join,
        ..Default::default()
    }
}

// ============================================================================
// Painting
// ============================================================================

/// Stage 6: the border, drawn after the silhouette clip is released.
pub struct BorderLayer<'a> {
    pub settings: &'a BorderSettings,
    /// Frame picture for [`BorderMode::Static`].
    pub static_asset: Option<&'a Asset>,
    /// Outer silhouette masking the static frame.
    pub silhouette: ClipRegion,
}

impl Layer for BorderLayer<'_> {
    fn name(&self) -> &'static str {
        "border"
    }

    fn paint(&self, ctx: &mut RenderContext) {
        paint_border(ctx, self.settings, self.static_asset, &self.silhouette);
    }
}

/// Paints the border onto the context.
pub fn paint_border(
    ctx: &mut RenderContext,
    settings: &BorderSettings,
    static_asset: Option<&Asset>,
    silhouette: &ClipRegion,
) {
    match settings.mode {
        BorderMode::Dynamic => stroke_ring(ctx, settings),
        BorderMode::Static => match static_asset {
            Some(frame) => draw_static_frame(ctx, settings, frame, silhouette),
            None => warn!("static border has no frame picture, skipping"),
        },
    }
}

fn stroke_ring(ctx: &mut RenderContext, settings: &BorderSettings) {
    let size = ctx.size();
    let Some(geometry) = border_geometry(size, settings, ctx.scale()) else {
        return;
    };
    debug!(
        "border {:?}: width {:.1}, {:.1}/{:.1} px of perimeter",
        settings.cap_style, geometry.stroke_width, geometry.drawn_length, geometry.perimeter
    );

    let opacity = settings.opacity / 100.0;
    let shader = match settings.fill_type {
        FillType::Solid => Shader::SolidColor(settings.color.to_skia(opacity)),
        FillType::Gradient => settings.gradient.shader(
            RectF::square(size),
            size / 2.0 - geometry.stroke_width / 2.0,
            opacity,
        ),
    };
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    };
    let stroke = border_stroke(settings.cap_style, geometry.stroke_width);
    ctx.pixmap_mut()
        .stroke_path(&geometry.path, &paint, &stroke, Transform::identity(), None);
}

/// Draws the frame picture cover-fitted and centered, masked by the
/// silhouette.
fn draw_static_frame(
    ctx: &mut RenderContext,
    settings: &BorderSettings,
    frame: &Asset,
    silhouette: &ClipRegion,
) {
    let size = ctx.size();
    let natural = frame.natural_size();
    let (dw, dh) = picture_size(
        BackgroundSize::Cover,
        natural,
        RectF::square(size),
        ctx.scale().factor(),
    );
    let dest = RectF::new((size - dw) / 2.0, (size - dh) / 2.0, dw, dh);

    let surface = ctx.surface();
    let Some(mask) = silhouette.to_mask(surface.width(), surface.height()) else {
        return;
    };
    let opacity = settings.opacity / 100.0;
    if !ctx.draw_asset(frame, dest.transform_from(natural), None, opacity, Some(&mask)) {
        warn!("static border frame could not be rasterized, skipping");
    }
}

// ============================================================================
// Tests
// ============================================================================
