//! Clip-region geometry shared by the preview styling path and the exporter.
//!
//! Every shape the compositor clips to or strokes along comes out of
//! [`compute_clip_region`]. The preview turns a [`ClipRegion`] into a CSS
//! `clip-path` with [`ClipRegion::to_css`]; the exporter turns the same value
//! into a tiny-skia path or mask. Neither side keeps its own copy of the math.

use std::f32::consts::PI;
use std::fmt::Write as _;

use resvg::tiny_skia::{FillRule, Mask, Path, PathBuilder, PathSegment, Rect, Transform};
use serde::{Deserialize, Serialize};

/// Edge length, in CSS pixels, of the interactive preview's working square.
///
/// All user-facing lengths (position, border width/offset, font size) are
/// expressed in this space and rescaled with [`Scale`] on export.
pub const PREVIEW_BASE_SIZE: f32 = 192.0;

/// Corner radius of the beveled cap style at preview size.
pub const BEVEL_CORNER_RADIUS: f32 = 10.0;

/// Smallest diameter/side a clip region may collapse to.
pub const MIN_CLIP_EXTENT: f32 = 1.0;

// ============================================================================
// CapStyle
// ============================================================================

/// Outer silhouette of the border and of the clip region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CapStyle {
    /// Circle.
    #[default]
    Rounded,
    /// Axis-aligned square.
    Square,
    /// Square with quarter-round corners.
    Beveled,
}

// ============================================================================
// Scale
// ============================================================================

/// Ratio between an output surface and the preview's base working size.
///
/// One factor is used for every linear measurement (position, border width,
/// border offset, font size, blur radius) so that exports at different
/// resolutions stay geometrically similar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale(f32);

impl Scale {
    /// The identity scale used by the preview itself.
    pub const PREVIEW: Self = Self(1.0);

    /// Scale for a square surface of `resolution` pixels.
    pub fn for_resolution(resolution: u32) -> Self {
        Self(resolution as f32 / PREVIEW_BASE_SIZE)
    }

    /// Returns the raw multiplier.
    pub fn factor(self) -> f32 {
        self.0
    }

    /// Converts a preview-space length to surface pixels.
    pub fn apply(self, value: f32) -> f32 {
        value * self.0
    }
}

// ============================================================================
// RectF
// ============================================================================

/// A rectangle in floating-point surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// A square anchored at the origin.
    pub fn square(size: f32) -> Self {
        Self::new(0.0, 0.0, size, size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Maps a box of size `natural` anchored at the origin onto this rect.
    pub fn transform_from(&self, natural: (f32, f32)) -> Transform {
        Transform::from_translate(self.x, self.y).pre_scale(
            self.width / natural.0.max(f32::EPSILON),
            self.height / natural.1.max(f32::EPSILON),
        )
    }

    /// Converts to a tiny-skia rect, `None` when empty or non-finite.
    pub fn to_skia(&self) -> Option<Rect> {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

// ============================================================================
// ClipRegion
// ============================================================================

/// A closed region produced by [`compute_clip_region`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipRegion {
    Circle { cx: f32, cy: f32, radius: f32 },
    Square { x: f32, y: f32, side: f32 },
    RoundedSquare { x: f32, y: f32, side: f32, corner_radius: f32 },
}

/// Beveled corner radius for a container of the given size.
pub fn bevel_radius(container_size: f32) -> f32 {
    BEVEL_CORNER_RADIUS * container_size / PREVIEW_BASE_SIZE
}

/// Computes the clip region for a square container.
///
/// - `Rounded`: circle of radius
///   `max(border_width / 2, container_size / 2 - border_width / 2 - border_offset)`.
/// - `Square`: square inset by `border_width / 2 + border_offset`, side
///   `container_size - 2 * border_offset - border_width`.
/// - `Beveled`: the same square with [`bevel_radius`] corners.
///
/// Inputs are clamped instead of rejected: the result always has a positive
/// radius/side and the rounded radius never drops below `border_width / 2`.
pub fn compute_clip_region(
    container_size: f32,
    border_width: f32,
    border_offset: f32,
    cap_style: CapStyle,
) -> ClipRegion {
    let size = finite_or_zero(container_size).max(0.0);
    let width = finite_or_zero(border_width).max(0.0);
    let offset = finite_or_zero(border_offset);
    let center = size / 2.0;

    match cap_style {
        CapStyle::Rounded => {
            let radius = (center - width / 2.0 - offset)
                .max(width / 2.0)
                .max(MIN_CLIP_EXTENT / 2.0);
            ClipRegion::Circle {
                cx: center,
                cy: center,
                radius,
            }
        }
        CapStyle::Square | CapStyle::Beveled => {
            let side = (size - 2.0 * offset - width).max(width).max(MIN_CLIP_EXTENT);
            let inset = (size - side) / 2.0;
            if cap_style == CapStyle::Square {
                ClipRegion::Square {
                    x: inset,
                    y: inset,
                    side,
                }
            } else {
                ClipRegion::RoundedSquare {
                    x: inset,
                    y: inset,
                    side,
                    corner_radius: bevel_radius(size).clamp(0.0, side / 2.0),
                }
            }
        }
    }
}

/// The silhouette of the whole surface: the clip region with no border.
///
/// For [`CapStyle::Beveled`] this is the rounded square of
/// [`bevel_radius`], not an octagon with 10% chamfered corners. The
/// silhouette and the ring always share one shape.
pub fn outer_silhouette(container_size: f32, cap_style: CapStyle) -> ClipRegion {
    compute_clip_region(container_size, 0.0, 0.0, cap_style)
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

impl ClipRegion {
    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> RectF {
        match *self {
            ClipRegion::Circle { cx, cy, radius } => {
                RectF::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0)
            }
            ClipRegion::Square { x, y, side } | ClipRegion::RoundedSquare { x, y, side, .. } => {
                RectF::new(x, y, side, side)
            }
        }
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f32 {
        match *self {
            ClipRegion::Circle { radius, .. } => 2.0 * PI * radius,
            ClipRegion::Square { side, .. } => 4.0 * side,
            ClipRegion::RoundedSquare {
                side,
                corner_radius,
                ..
            } => 4.0 * (side - 2.0 * corner_radius) + 2.0 * PI * corner_radius,
        }
    }

    /// Returns true if the point lies inside the region.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        match *self {
            ClipRegion::Circle { cx, cy, radius } => {
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= radius * radius
            }
            ClipRegion::Square { x, y, side } => {
                px >= x && px <= x + side && py >= y && py <= y + side
            }
            ClipRegion::RoundedSquare {
                x,
                y,
                side,
                corner_radius: r,
            } => {
                if px < x || px > x + side || py < y || py > y + side {
                    return false;
                }
                // Distance to the inner square whose corners are the arc centers.
                let nx = px.clamp(x + r, x + side - r);
                let ny = py.clamp(y + r, y + side - r);
                let (dx, dy) = (px - nx, py - ny);
                dx * dx + dy * dy <= r * r
            }
        }
    }

    /// The boundary as a clockwise chain of segments.
    ///
    /// Circles start at 12 o'clock; squares start at the top-left corner;
    /// rounded squares start where the top edge leaves the top-left corner arc.
    pub fn boundary(&self) -> Boundary {
        let segments = match *self {
            ClipRegion::Circle { cx, cy, radius } => vec![BoundarySegment::Arc {
                cx,
                cy,
                radius,
                start_deg: -90.0,
                sweep_deg: 360.0,
            }],
            ClipRegion::Square { x, y, side } => {
                let (l, t, r, b) = (x, y, x + side, y + side);
                vec![
                    BoundarySegment::Line { from: (l, t), to: (r, t) },
                    BoundarySegment::Line { from: (r, t), to: (r, b) },
                    BoundarySegment::Line { from: (r, b), to: (l, b) },
                    BoundarySegment::Line { from: (l, b), to: (l, t) },
                ]
            }
            ClipRegion::RoundedSquare {
                x,
                y,
                side,
                corner_radius: cr,
            } => {
                let (l, t, r, b) = (x, y, x + side, y + side);
                let corner = |cx: f32, cy: f32, start_deg: f32| BoundarySegment::Arc {
                    cx,
                    cy,
                    radius: cr,
                    start_deg,
                    sweep_deg: 90.0,
                };
                vec![
                    BoundarySegment::Line { from: (l + cr, t), to: (r - cr, t) },
                    corner(r - cr, t + cr, -90.0),
                    BoundarySegment::Line { from: (r, t + cr), to: (r, b - cr) },
                    corner(r - cr, b - cr, 0.0),
                    BoundarySegment::Line { from: (r - cr, b), to: (l + cr, b) },
                    corner(l + cr, b - cr, 90.0),
                    BoundarySegment::Line { from: (l, b - cr), to: (l, t + cr) },
                    corner(l + cr, t + cr, 180.0),
                ]
            }
        };
        Boundary { segments }
    }

    /// Builds the closed path of the region.
    pub fn to_path(&self) -> Option<Path> {
        match *self {
            ClipRegion::Circle { cx, cy, radius } => PathBuilder::from_circle(cx, cy, radius),
            ClipRegion::Square { x, y, side } => {
                Rect::from_xywh(x, y, side, side).map(PathBuilder::from_rect)
            }
            ClipRegion::RoundedSquare { .. } => {
                let boundary = self.boundary();
                let first = boundary.segments.first()?;
                let mut pb = PathBuilder::new();
                let (sx, sy) = first.point_at(0.0);
                pb.move_to(sx, sy);
                for segment in &boundary.segments {
                    segment.append(&mut pb, 0.0, 1.0);
                }
                pb.close();
                pb.finish()
            }
        }
    }

    /// Rasterizes the region into an anti-aliased mask of the given size.
    pub fn to_mask(&self, width: u32, height: u32) -> Option<Mask> {
        let path = self.to_path()?;
        let mut mask = Mask::new(width, height)?;
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        Some(mask)
    }

    /// CSS `clip-path` value describing the region inside its container.
    pub fn to_css(&self) -> String {
        match *self {
            ClipRegion::Circle { cx, cy, radius } => {
                format!("circle({}px at {}px {}px)", px(radius), px(cx), px(cy))
            }
            ClipRegion::Square { x, y, .. } => {
                format!("inset({}px {}px {}px {}px)", px(y), px(x), px(y), px(x))
            }
            ClipRegion::RoundedSquare {
                x,
                y,
                corner_radius,
                ..
            } => format!(
                "inset({}px {}px {}px {}px round {}px)",
                px(y),
                px(x),
                px(y),
                px(x),
                px(corner_radius)
            ),
        }
    }
}

/// Formats a length with at most three decimals and no trailing zeros.
pub(crate) fn px(value: f32) -> f32 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

// ============================================================================
// Boundary
// ============================================================================

/// One piece of a region boundary.
///
/// Angles are in degrees, measured clockwise from the +x axis in surface
/// coordinates (y grows downward), so -90 is 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundarySegment {
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
    Arc {
        cx: f32,
        cy: f32,
        radius: f32,
        start_deg: f32,
        sweep_deg: f32,
    },
}

impl BoundarySegment {
    pub fn length(&self) -> f32 {
        match *self {
            BoundarySegment::Line { from, to } => (to.0 - from.0).hypot(to.1 - from.1),
            BoundarySegment::Arc {
                radius, sweep_deg, ..
            } => radius * sweep_deg.abs().to_radians(),
        }
    }

    /// Point at fraction `t` (0..=1) along the segment.
    pub fn point_at(&self, t: f32) -> (f32, f32) {
        match *self {
            BoundarySegment::Line { from, to } => {
                (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
            }
            BoundarySegment::Arc {
                cx,
                cy,
                radius,
                start_deg,
                sweep_deg,
            } => {
                let angle = (start_deg + sweep_deg * t).to_radians();
                (cx + radius * angle.cos(), cy + radius * angle.sin())
            }
        }
    }

    /// Appends the part between fractions `t0` and `t1`.
    ///
    /// The builder's current point must already be at `point_at(t0)`.
    fn append(&self, pb: &mut PathBuilder, t0: f32, t1: f32) {
        match *self {
            BoundarySegment::Line { .. } => {
                let (x, y) = self.point_at(t1);
                pb.line_to(x, y);
            }
            BoundarySegment::Arc {
                cx,
                cy,
                radius,
                start_deg,
                sweep_deg,
            } => append_arc(
                pb,
                cx,
                cy,
                radius,
                start_deg + sweep_deg * t0,
                sweep_deg * (t1 - t0),
            ),
        }
    }
}

/// Appends a circular arc as cubic Béziers of at most 90° each.
fn append_arc(pb: &mut PathBuilder, cx: f32, cy: f32, radius: f32, start_deg: f32, sweep_deg: f32) {
    if sweep_deg.abs() <= f32::EPSILON {
        return;
    }
    let pieces = (sweep_deg.abs() / 90.0).ceil().max(1.0) as usize;
    let step = sweep_deg.to_radians() / pieces as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();
    let mut a0 = start_deg.to_radians();
    for _ in 0..pieces {
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        let p0 = (cx + radius * c0, cy + radius * s0);
        let p3 = (cx + radius * c1, cy + radius * s1);
        let p1 = (p0.0 - k * radius * s0, p0.1 + k * radius * c0);
        let p2 = (p3.0 + k * radius * s1, p3.1 - k * radius * c1);
        pb.cubic_to(p1.0, p1.1, p2.0, p2.1, p3.0, p3.1);
        a0 = a1;
    }
}

/// A closed region boundary as an ordered chain of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    segments: Vec<BoundarySegment>,
}

/// A traced open path together with its analytic length.
#[derive(Debug, Clone)]
pub struct TracedPath {
    pub path: Path,
    pub length: f32,
}

impl Boundary {
    pub fn segments(&self) -> &[BoundarySegment] {
        &self.segments
    }

    pub fn perimeter(&self) -> f32 {
        self.segments.iter().map(BoundarySegment::length).sum()
    }

    /// Traces `length` units clockwise, starting `start` units past the
    /// boundary origin. Both values wrap around the perimeter.
    ///
    /// Returns `None` when nothing would be drawn.
    pub fn trace(&self, start: f32, length: f32) -> Option<TracedPath> {
        let perimeter = self.perimeter();
        if perimeter <= 0.0 || !length.is_finite() || length <= 0.0 {
            return None;
        }
        let length = length.min(perimeter);
        let start = if start.is_finite() {
            start.rem_euclid(perimeter)
        } else {
            0.0
        };
        let end = start + length;

        let mut pb = PathBuilder::new();
        let mut drawn = 0.0;
        let mut seg_start = 0.0;
        let mut started = false;

        // Two laps cover any window that wraps past the origin.
        'laps: for _ in 0..2 {
            for segment in &self.segments {
                let seg_len = segment.length();
                let seg_end = seg_start + seg_len;
                if seg_start >= end {
                    break 'laps;
                }
                let from = start.max(seg_start);
                let to = end.min(seg_end);
                if seg_len > 0.0 && to - from > 1e-4 {
                    let t0 = (from - seg_start) / seg_len;
                    let t1 = (to - seg_start) / seg_len;
                    if !started {
                        let (x, y) = segment.point_at(t0);
                        pb.move_to(x, y);
                        started = true;
                    }
                    segment.append(&mut pb, t0, t1);
                    drawn += to - from;
                }
                seg_start = seg_end;
            }
        }

        let path = pb.finish()?;
        Some(TracedPath {
            path,
            length: drawn,
        })
    }
}

/// Serializes a path as SVG path data (`M`, `L`, `Q`, `C`, `Z` commands).
pub fn path_to_svg_data(path: &Path) -> String {
    let mut out = String::new();
    for segment in path.segments() {
        if !out.is_empty() {
            out.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = match segment {
            PathSegment::MoveTo(p) => write!(out, "M {} {}", px(p.x), px(p.y)),
            PathSegment::LineTo(p) => write!(out, "L {} {}", px(p.x), px(p.y)),
            PathSegment::QuadTo(p1, p) => {
                write!(out, "Q {} {} {} {}", px(p1.x), px(p1.y), px(p.x), px(p.y))
            }
            PathSegment::CubicTo(p1, p2, p) => write!(
                out,
                "C {} {} {} {} {} {}",
                px(p1.x),
                px(p1.y),
                px(p2.x),
                px(p2.y),
                px(p.x),
                px(p.y)
            ),
            PathSegment::Close => write!(out, "Z"),
        };
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CAPS: [CapStyle; 3] = [CapStyle::Rounded, CapStyle::Square, CapStyle::Beveled];

    fn approx(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn rounded_radius_follows_formula() {
        let region = compute_clip_region(192.0, 10.0, 0.0, CapStyle::Rounded);
        assert_eq!(
            region,
            ClipRegion::Circle {
                cx: 96.0,
                cy: 96.0,
                radius: 91.0
            }
        );

        let region = compute_clip_region(192.0, 10.0, 4.0, CapStyle::Rounded);
        let ClipRegion::Circle { radius, .. } = region else {
            panic!("expected circle");
        };
        assert_eq!(radius, 87.0);
    }

    #[test]
    fn beveled_silhouette_is_rounded_square() {
        let silhouette = outer_silhouette(192.0, CapStyle::Beveled);
        assert_eq!(
            silhouette,
            compute_clip_region(192.0, 0.0, 0.0, CapStyle::Beveled)
        );

        // (8, 8) lies inside the r=10 arc but outside a 19.2px chamfer.
        let mask = silhouette.to_mask(192, 192).unwrap();
        assert_eq!(mask.data()[8 * 192 + 8], 255);
        assert_eq!(mask.data()[192 + 1], 0);
        assert_eq!(mask.data()[96 * 192 + 96], 255);
    }

    #[test]
    fn rounded_radius_never_below_half_border() {
        for offset in [-50.0, 0.0, 90.0, 200.0, 1000.0] {
            for width in [0.0, 4.0, 20.0, 400.0] {
                let ClipRegion::Circle { radius, .. } =
                    compute_clip_region(192.0, width, offset, CapStyle::Rounded)
                else {
                    panic!("expected circle");
                };
                assert!(radius >= width / 2.0, "radius {radius} < {}", width / 2.0);
                assert!(radius > 0.0);
            }
        }
    }

    #[test]
    fn regions_are_never_degenerate() {
        let sizes = [0.0, 1.0, 192.0, -5.0, f32::NAN];
        let widths = [0.0, 3.0, 192.0, 500.0, -1.0];
        let offsets = [-200.0, -10.0, 0.0, 10.0, 400.0, f32::INFINITY];
        for cap in CAPS {
            for size in sizes {
                for width in widths {
                    for offset in offsets {
                        let region = compute_clip_region(size, width, offset, cap);
                        let bounds = region.bounds();
                        assert!(bounds.width > 0.0, "{cap:?} {size} {width} {offset}");
                        assert!(region.perimeter() > 0.0);
                        assert!(region.to_path().is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn square_inset_and_side() {
        let region = compute_clip_region(192.0, 10.0, 3.0, CapStyle::Square);
        assert_eq!(
            region,
            ClipRegion::Square {
                x: 8.0,
                y: 8.0,
                side: 176.0
            }
        );
    }

    #[test]
    fn beveled_corner_scales_with_container() {
        let ClipRegion::RoundedSquare { corner_radius, .. } =
            compute_clip_region(192.0, 0.0, 0.0, CapStyle::Beveled)
        else {
            panic!("expected rounded square");
        };
        assert_eq!(corner_radius, 10.0);

        let ClipRegion::RoundedSquare { corner_radius, .. } =
            compute_clip_region(384.0, 0.0, 0.0, CapStyle::Beveled)
        else {
            panic!("expected rounded square");
        };
        assert_eq!(corner_radius, 20.0);
    }

    #[test]
    fn boundary_length_matches_perimeter() {
        for cap in CAPS {
            let region = compute_clip_region(300.0, 12.0, 5.0, cap);
            let boundary = region.boundary();
            assert!(
                approx(boundary.perimeter(), region.perimeter(), 1e-2),
                "{cap:?}: {} vs {}",
                boundary.perimeter(),
                region.perimeter()
            );
        }
    }

    #[test]
    fn trace_covers_requested_fraction() {
        for cap in CAPS {
            let region = compute_clip_region(500.0, 20.0, 0.0, cap);
            let boundary = region.boundary();
            let perimeter = boundary.perimeter();
            for amount in [1.0_f32, 25.0, 50.0, 75.0, 100.0] {
                let traced = boundary
                    .trace(perimeter * 0.3, perimeter * amount / 100.0)
                    .expect("non-empty trace");
                assert!(
                    approx(traced.length, perimeter * amount / 100.0, 0.05),
                    "{cap:?} {amount}: {}",
                    traced.length
                );
            }
            assert!(boundary.trace(0.0, 0.0).is_none());
        }
    }

    #[test]
    fn trace_wraps_past_origin() {
        let region = compute_clip_region(100.0, 0.0, 0.0, CapStyle::Square);
        let boundary = region.boundary();
        // Last half of the left edge plus first half of the top edge.
        let traced = boundary.trace(350.0, 100.0).unwrap();
        assert!(approx(traced.length, 100.0, 1e-3));
        let bounds = traced.path.bounds();
        assert!(approx(bounds.left(), 0.0, 1e-3));
        assert!(approx(bounds.right(), 50.0, 1e-3));
        assert!(approx(bounds.bottom(), 50.0, 1e-3));
    }

    #[test]
    fn half_circle_starting_at_top_spans_right_side() {
        let region = compute_clip_region(200.0, 0.0, 0.0, CapStyle::Rounded);
        let boundary = region.boundary();
        let traced = boundary.trace(0.0, boundary.perimeter() / 2.0).unwrap();
        let bounds = traced.path.bounds();
        assert!(approx(bounds.left(), 100.0, 0.5));
        assert!(approx(bounds.right(), 200.0, 0.5));
        assert!(approx(bounds.top(), 0.0, 0.5));
        assert!(approx(bounds.bottom(), 200.0, 0.5));
    }

    #[test]
    fn contains_respects_rounded_corners() {
        let region = compute_clip_region(192.0, 0.0, 0.0, CapStyle::Beveled);
        assert!(region.contains(96.0, 96.0));
        assert!(region.contains(5.0, 96.0));
        assert!(!region.contains(0.5, 0.5));
        assert!(region.contains(10.0, 10.0));
    }

    #[test]
    fn css_clip_paths() {
        assert_eq!(
            compute_clip_region(192.0, 10.0, 0.0, CapStyle::Rounded).to_css(),
            "circle(91px at 96px 96px)"
        );
        assert_eq!(
            compute_clip_region(192.0, 10.0, 0.0, CapStyle::Square).to_css(),
            "inset(5px 5px 5px 5px)"
        );
        assert_eq!(
            compute_clip_region(192.0, 10.0, 0.0, CapStyle::Beveled).to_css(),
            "inset(5px 5px 5px 5px round 10px)"
        );
    }

    #[test]
    fn mask_covers_region_interior() {
        let region = compute_clip_region(64.0, 0.0, 0.0, CapStyle::Rounded);
        let mask = region.to_mask(64, 64).unwrap();
        let at = |x: usize, y: usize| mask.data()[y * 64 + x];
        assert_eq!(at(32, 32), 255);
        assert_eq!(at(0, 0), 0);
    }

    #[test]
    fn svg_path_data_for_square() {
        let path = compute_clip_region(10.0, 0.0, 0.0, CapStyle::Square)
            .to_path()
            .unwrap();
        let data = path_to_svg_data(&path);
        assert!(data.starts_with("M 0 0"));
        assert!(data.ends_with('Z'));
    }

    #[test]
    fn scale_for_resolution() {
        let scale = Scale::for_resolution(384);
        assert_eq!(scale.factor(), 2.0);
        assert_eq!(scale.apply(10.0), 20.0);
        assert_eq!(Scale::PREVIEW.apply(7.0), 7.0);
    }
}
