//! Secondary decorative overlay drawn over the subject.

use log::warn;

use super::{Layer, RenderContext};
use crate::asset::Asset;
use crate::geometry::{ClipRegion, RectF};

// ============================================================================
// OverlayLayer
// ============================================================================

/// Stage 4: a square picture centered on the surface.
///
/// The overlay is re-clipped to the inner border-aware region on top of the
/// silhouette, so it never bleeds under the ring.
pub struct OverlayLayer<'a> {
    pub asset: &'a Asset,
    /// Edge length in percent of the surface.
    pub size_percent: f32,
    pub region: ClipRegion,
}

impl Layer for OverlayLayer<'_> {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn paint(&self, ctx: &mut RenderContext) {
        paint_secondary_overlay(ctx, self.asset, self.size_percent, &self.region);
    }
}

/// Centered square placement of an overlay on a `size x size` surface.
pub fn overlay_rect(size: f32, size_percent: f32) -> RectF {
    let edge = size * size_percent / 100.0;
    let offset = (size - edge) / 2.0;
    RectF::new(offset, offset, edge, edge)
}

/// Draws `asset` centered at `size_percent` of the surface, through
/// `region` intersected with the active clip.
pub fn paint_secondary_overlay(
    ctx: &mut RenderContext,
    asset: &Asset,
    size_percent: f32,
    region: &ClipRegion,
) {
    let rect = overlay_rect(ctx.size(), size_percent);
    if rect.width.is_nan() || rect.width < 1.0 {
        return;
    }
    let Some(mask) = ctx.region_mask(region) else {
        return;
    };
    let transform = rect.transform_from(asset.natural_size());
    if !ctx.draw_asset(asset, transform, None, 1.0, Some(&mask)) {
        warn!("overlay could not be rasterized, skipping");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{CapStyle, Scale, compute_clip_region};
    use crate::raster::RasterSurface;
    use image::{Rgba, RgbaImage};

    fn context(size: u32) -> RenderContext {
        RenderContext::new(
            RasterSurface::square(size).unwrap(),
            Scale::for_resolution(size),
        )
    }

    fn yellow() -> Asset {
        Asset::Raster(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 0, 255])))
    }

    #[test]
    fn rect_is_centered() {
        assert_eq!(overlay_rect(200.0, 50.0), RectF::new(50.0, 50.0, 100.0, 100.0));
        assert_eq!(overlay_rect(200.0, 150.0), RectF::new(-50.0, -50.0, 300.0, 300.0));
    }

    #[test]
    fn half_size_overlay_leaves_edges_clear() {
        let mut ctx = context(100);
        let region = compute_clip_region(100.0, 0.0, 0.0, CapStyle::Square);
        paint_secondary_overlay(&mut ctx, &yellow(), 50.0, &region);

        assert_eq!(ctx.surface().pixel(50, 50).unwrap().0, [255, 255, 0, 255]);
        assert_eq!(ctx.surface().pixel(10, 10).unwrap().0[3], 0);
    }

    #[test]
    fn oversized_overlay_is_clipped_to_region() {
        let mut ctx = context(100);
        let region = compute_clip_region(100.0, 20.0, 0.0, CapStyle::Square);
        paint_secondary_overlay(&mut ctx, &yellow(), 200.0, &region);

        assert_eq!(ctx.surface().pixel(50, 50).unwrap().0[3], 255);
        assert_eq!(ctx.surface().pixel(5, 50).unwrap().0[3], 0);
    }

    #[test]
    fn huge_vector_overlay_renders_at_surface_size() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
        let mut ctx = context(64);
        let region = compute_clip_region(64.0, 0.0, 0.0, CapStyle::Square);
        paint_secondary_overlay(&mut ctx, &Asset::Vector(svg.to_string()), 1_000_000.0, &region);

        assert_eq!(ctx.surface().pixel(0, 0).unwrap().0, [0, 255, 0, 255]);
        assert_eq!(ctx.surface().pixel(63, 63).unwrap().0, [0, 255, 0, 255]);
    }

    #[test]
    fn zero_size_draws_nothing() {
        let mut ctx = context(50);
        let region = compute_clip_region(50.0, 0.0, 0.0, CapStyle::Rounded);
        paint_secondary_overlay(&mut ctx, &yellow(), 0.0, &region);
        assert!(ctx.surface().is_blank());
    }
}
