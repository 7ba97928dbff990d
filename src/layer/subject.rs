//! The subject photo: contain fit, zoom, rotation, flip and pan.

use log::{debug, warn};
use resvg::tiny_skia::{PixmapPaint, Transform};

use super::{Layer, RenderContext};
use crate::asset::Asset;
use crate::config::SubjectTransform;
use crate::filter::FilterExpression;
use crate::geometry::Scale;

/// Where and how large the subject lands on a square surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectPlacement {
    /// Surface position of the image center.
    pub center: (f32, f32),
    /// Degrees, clockwise.
    pub rotation: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Contain-fit scale multiplied by zoom.
    pub scale: f32,
    /// Intrinsic image size.
    pub natural: (f32, f32),
}

impl SubjectPlacement {
    /// Drawn size before rotation.
    pub fn drawn_size(&self) -> (f32, f32) {
        (self.natural.0 * self.scale, self.natural.1 * self.scale)
    }

    /// Maps natural image coordinates to surface coordinates.
    pub fn transform(&self) -> Transform {
        let flip_x = if self.flip_horizontal { -1.0 } else { 1.0 };
        let flip_y = if self.flip_vertical { -1.0 } else { 1.0 };
        Transform::from_translate(self.center.0, self.center.1)
            .pre_concat(Transform::from_rotate(self.rotation))
            .pre_scale(flip_x, flip_y)
            .pre_scale(self.scale, self.scale)
            .pre_translate(-self.natural.0 / 2.0, -self.natural.1 / 2.0)
    }
}

/// Places an image of intrinsic size `natural` on a `size x size` surface.
///
/// The image is contain-fit into the square, multiplied by `zoom`, and its
/// center is moved by the scaled pan offset. Returns `None` for empty images.
pub fn subject_placement(
    natural: (f32, f32),
    size: f32,
    transform: &SubjectTransform,
    scale: Scale,
) -> Option<SubjectPlacement> {
    let (w, h) = natural;
    if !(w > 0.0 && h > 0.0 && size > 0.0) {
        return None;
    }
    let contain = (size / w).min(size / h);
    Some(SubjectPlacement {
        center: (
            size / 2.0 + scale.apply(transform.position.x),
            size / 2.0 + scale.apply(transform.position.y),
        ),
        rotation: transform.rotate,
        flip_horizontal: transform.flip_horizontal,
        flip_vertical: transform.flip_vertical,
        scale: contain * transform.zoom,
        natural,
    })
}

/// Stage 3: the subject photo, drawn through the silhouette clip.
pub struct SubjectLayer<'a> {
    pub image: &'a Asset,
    pub transform: &'a SubjectTransform,
    pub filter: &'a FilterExpression,
}

impl Layer for SubjectLayer<'_> {
    fn name(&self) -> &'static str {
        "subject"
    }

    fn paint(&self, ctx: &mut RenderContext) {
        paint_subject(ctx, self.image, self.transform, self.filter);
    }
}

/// Draws the subject through the active clip.
///
/// A non-identity filter is applied to an isolated layer holding only the
/// subject, so it never touches the background.
pub fn paint_subject(
    ctx: &mut RenderContext,
    image: &Asset,
    transform: &SubjectTransform,
    filter: &FilterExpression,
) {
    let natural = image.natural_size();
    let Some(placement) = subject_placement(natural, ctx.size(), transform, ctx.scale()) else {
        warn!("subject image is empty, skipping");
        return;
    };
    debug!(
        "subject {}x{} at {:.1},{:.1} scale {:.3} rotate {}",
        natural.0,
        natural.1,
        placement.center.0,
        placement.center.1,
        placement.scale,
        placement.rotation
    );

    if filter.is_identity() {
        if !ctx.draw_asset(image, placement.transform(), None, 1.0, None) {
            warn!("subject image could not be rasterized, skipping");
        }
        return;
    }

    let Some(mut layer) = ctx.rasterize_asset(image, placement.transform(), None) else {
        warn!("subject image could not be rasterized, skipping");
        return;
    };
    filter.scaled(ctx.scale()).apply(&mut layer);
    ctx.draw_pixmap(
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

// ============================================================================
// Tests
// ============================================================================
