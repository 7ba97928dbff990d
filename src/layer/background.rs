//! Background fill of the inner border-aware region.

use log::{debug, warn};
use resvg::tiny_skia::{
    FilterQuality, Paint, Path, Pattern, Shader, SpreadMode, Transform,
};

use super::{Layer, RenderContext};
use crate::asset::Asset;
use crate::color::Color;
use crate::config::{BackgroundSettings, BackgroundSize, BackgroundType};
use crate::geometry::{ClipRegion, RectF};

/// Edge length of a pattern tile at 100% scale, in preview pixels.
pub const BASE_TILE_SIZE: f32 = 60.0;

/// Stage 2: fills `region` with the configured background.
pub struct BackgroundLayer<'a> {
    pub settings: &'a BackgroundSettings,
    pub region: ClipRegion,
    /// Decoded pattern tile or picture, when the type needs one.
    pub asset: Option<&'a Asset>,
}

impl Layer for BackgroundLayer<'_> {
    fn name(&self) -> &'static str {
        "background"
    }

    fn paint(&self, ctx: &mut RenderContext) {
        paint_background(ctx, &self.region, self.settings, self.asset);
    }
}

/// Fills `region` (intersected with the active clip) with the background.
///
/// Pattern and image backgrounds whose asset is missing fall back to the
/// solid `color`.
pub fn paint_background(
    ctx: &mut RenderContext,
    region: &ClipRegion,
    settings: &BackgroundSettings,
    asset: Option<&Asset>,
) {
    let Some(path) = region.to_path() else {
        return;
    };
    let bounds = region.bounds();

    match (settings.kind, asset) {
        (BackgroundType::Solid, _) => fill_solid(ctx, &path, settings.color),
        (BackgroundType::Gradient, _) => {
            let radius = bounds.width.min(bounds.height) / 2.0;
            let shader = settings.gradient.shader(bounds, radius, 1.0);
            fill_with(ctx, &path, shader);
        }
        (BackgroundType::Pattern, Some(tile)) => {
            if !fill_pattern(ctx, &path, bounds, settings, tile) {
                warn!("pattern tile could not be rasterized, using solid fill");
                fill_solid(ctx, &path, settings.color);
            }
        }
        (BackgroundType::Image, Some(picture)) => {
            if !draw_picture(ctx, region, bounds, settings, picture) {
                warn!("background picture could not be drawn, using solid fill");
                fill_solid(ctx, &path, settings.color);
            }
        }
        (BackgroundType::Pattern | BackgroundType::Image, None) => {
            warn!("{:?} background has no asset, using solid fill", settings.kind);
            fill_solid(ctx, &path, settings.color);
        }
    }
}

fn fill_solid(ctx: &mut RenderContext, path: &Path, color: Color) {
    fill_with(ctx, path, Shader::SolidColor(color.to_skia(1.0)));
}

fn fill_with(ctx: &mut RenderContext, path: &Path, shader: Shader<'_>) {
    let paint = Paint {
        shader,
        anti_alias: true,
        ..Default::default()
    };
    ctx.fill_path(path, &paint);
}

/// Size of one pattern tile in surface pixels, keeping the asset's aspect.
pub fn pattern_tile_size(asset: &Asset, scale_percent: f32, surface_scale: f32) -> (f32, f32) {
    let width = BASE_TILE_SIZE * surface_scale * scale_percent / 100.0;
    let (nw, nh) = asset.natural_size();
    let height = if nw > 0.0 { width * nh / nw } else { width };
    (width, height)
}

fn fill_pattern(
    ctx: &mut RenderContext,
    path: &Path,
    bounds: RectF,
    settings: &BackgroundSettings,
    tile: &Asset,
) -> bool {
    let (tile_w, tile_h) = pattern_tile_size(tile, settings.pattern.scale, ctx.scale().factor());
    if tile_w < 1.0 || tile_h < 1.0 {
        return false;
    }
    let Some(tile_pixmap) = tile.to_pixmap(tile_w, tile_h, settings.pattern.tint) else {
        return false;
    };
    debug!(
        "pattern tile {}x{} drawn at {:.1}x{:.1}",
        tile_pixmap.width(),
        tile_pixmap.height(),
        tile_w,
        tile_h
    );

    let transform = Transform::from_translate(bounds.x, bounds.y).pre_scale(
        tile_w / tile_pixmap.width() as f32,
        tile_h / tile_pixmap.height() as f32,
    );
    let shader = Pattern::new(
        tile_pixmap.as_ref(),
        SpreadMode::Repeat,
        FilterQuality::Bicubic,
        1.0,
        transform,
    );
    fill_with(ctx, path, shader);
    true
}

/// Drawn size of a background picture inside `bounds`.
pub fn picture_size(
    size: BackgroundSize,
    natural: (f32, f32),
    bounds: RectF,
    surface_scale: f32,
) -> (f32, f32) {
    let (nw, nh) = (natural.0.max(1.0), natural.1.max(1.0));
    match size {
        BackgroundSize::Cover => {
            let s = (bounds.width / nw).max(bounds.height / nh);
            (nw * s, nh * s)
        }
        BackgroundSize::Contain => {
            let s = (bounds.width / nw).min(bounds.height / nh);
            (nw * s, nh * s)
        }
        BackgroundSize::Auto => (nw * surface_scale, nh * surface_scale),
        BackgroundSize::Percent(p) => {
            let w = bounds.width * p / 100.0;
            (w, w * nh / nw)
        }
    }
}

fn draw_picture(
    ctx: &mut RenderContext,
    region: &ClipRegion,
    bounds: RectF,
    settings: &BackgroundSettings,
    picture: &Asset,
) -> bool {
    let (dw, dh) = picture_size(
        settings.image.size,
        picture.natural_size(),
        bounds,
        ctx.scale().factor(),
    );
    if dw < 1.0 || dh < 1.0 {
        return false;
    }
    let (ax, ay) = settings.image.position.alignment();
    let dest = RectF::new(
        bounds.x + (bounds.width - dw) * ax,
        bounds.y + (bounds.height - dh) * ay,
        dw,
        dh,
    );

    let Some(mask) = ctx.region_mask(region) else {
        return false;
    };
    let transform = dest.transform_from(picture.natural_size());
    ctx.draw_asset(picture, transform, None, 1.0, Some(&mask))
}

// ============================================================================
// Tests
// ============================================================================
