//! Compositing stages.
//!
//! An export paints a fixed sequence of stages onto one square
//! [`RenderContext`]. Each stage implements [`Layer`]:
//!
//! 1. [`ClipLayer::Push`] establishes the outer silhouette.
//! 2. [`BackgroundLayer`] fills the inner border-aware region.
//! 3. [`SubjectLayer`] draws the transformed, filtered photo.
//! 4. [`OverlayLayer`] draws the secondary decorative picture.
//! 5. [`ClipLayer::Release`] drops the silhouette.
//! 6. [`BorderLayer`] strokes the ring (or draws the static frame).
//! 7. [`TextLayer`] draws the text overlay.
//!
//! Stages only ever read the configuration; all mutable state lives in the
//! context.

pub mod background;
pub mod border;
pub mod overlay;
pub mod subject;
pub mod svg;
pub mod text;

pub use background::{BackgroundLayer, paint_background};
pub use border::{BorderGeometry, BorderLayer, border_geometry, paint_border};
pub use overlay::{OverlayLayer, paint_secondary_overlay};
pub use subject::{SubjectLayer, SubjectPlacement, paint_subject, subject_placement};
pub use text::{
    EstimatedMetrics, FontLibrary, FontStyle, PlacedGlyph, TextLayer, TextMeasure, TextPlan,
    layout_text, paint_text,
};

use log::warn;
use resvg::tiny_skia::{FillRule, Mask, Paint, Path, Pixmap, PixmapPaint, PixmapRef, Transform};

use crate::asset::Asset;
use crate::color::Color;
use crate::geometry::{ClipRegion, Scale};
use crate::raster::{RasterSurface, intersect_masks};

// ============================================================================
// Render Context
// ============================================================================

/// The surface being composited plus the active clip.
///
/// Clips nest: [`RenderContext::push_clip`] intersects the new region with
/// whatever is already active, and [`RenderContext::pop_clip`] restores the
/// previous state.
pub struct RenderContext {
    surface: RasterSurface,
    scale: Scale,
    clips: Vec<Mask>,
}

impl RenderContext {
    pub fn new(surface: RasterSurface, scale: Scale) -> Self {
        Self {
            surface,
            scale,
            clips: Vec::new(),
        }
    }

    /// Edge length of the (square) surface in pixels.
    pub fn size(&self) -> f32 {
        self.surface.width() as f32
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        self.surface.pixmap_mut()
    }

    pub fn into_surface(self) -> RasterSurface {
        self.surface
    }

    /// The active clip, if any.
    pub fn clip(&self) -> Option<&Mask> {
        self.clips.last()
    }

    /// Number of active clips.
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    /// Rasterizes `region` and intersects it with the active clip.
    pub fn region_mask(&self, region: &ClipRegion) -> Option<Mask> {
        let mut mask = region.to_mask(self.surface.width(), self.surface.height())?;
        if let Some(active) = self.clip() {
            intersect_masks(&mut mask, active);
        }
        Some(mask)
    }

    /// Makes `region` (intersected with the active clip) the active clip.
    ///
    /// Returns false if the mask could not be built, in which case the clip
    /// stack is unchanged.
    pub fn push_clip(&mut self, region: &ClipRegion) -> bool {
        match self.region_mask(region) {
            Some(mask) => {
                self.clips.push(mask);
                true
            }
            None => false,
        }
    }

    pub fn pop_clip(&mut self) {
        self.clips.pop();
    }

    /// Fills `path` through the active clip.
    pub fn fill_path(&mut self, path: &Path, paint: &Paint) {
        let clip = self.clips.last();
        self.surface.pixmap_mut().fill_path(
            path,
            paint,
            FillRule::Winding,
            Transform::identity(),
            clip,
        );
    }

    /// Draws a pixmap through `mask`, or through the active clip when
    /// `mask` is `None`.
    pub fn draw_pixmap(
        &mut self,
        src: PixmapRef<'_>,
        paint: &PixmapPaint,
        transform: Transform,
        mask: Option<&Mask>,
    ) {
        let mask = mask.or(self.clips.last());
        self.surface
            .pixmap_mut()
            .draw_pixmap(0, 0, src, paint, transform, mask);
    }

    /// Draws `asset` with its natural box mapped through `transform`.
    ///
    /// The asset is rasterized at surface size so the cost does not depend
    /// on how large it is drawn. Returns `false` when it could not be
    /// rasterized.
    pub fn draw_asset(
        &mut self,
        asset: &Asset,
        transform: Transform,
        tint: Option<Color>,
        opacity: f32,
        mask: Option<&Mask>,
    ) -> bool {
        let Some(layer) = self.rasterize_asset(asset, transform, tint) else {
            return false;
        };
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            ..Default::default()
        };
        self.draw_pixmap(layer.as_ref(), &paint, Transform::identity(), mask);
        true
    }

    /// Rasterizes `asset` onto a transparent surface-sized pixmap.
    pub fn rasterize_asset(
        &self,
        asset: &Asset,
        transform: Transform,
        tint: Option<Color>,
    ) -> Option<Pixmap> {
        asset.render_onto(self.surface.width(), self.surface.height(), transform, tint)
    }
}

// ============================================================================
// Layer Trait
// ============================================================================

/// One compositing stage.
pub trait Layer {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    /// Paints onto the context.
    fn paint(&self, ctx: &mut RenderContext);
}

/// Pushes or releases the silhouette clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipLayer {
    Push(ClipRegion),
    Release,
}

impl Layer for ClipLayer {
    fn name(&self) -> &'static str {
        match self {
            Self::Push(_) => "clip",
            Self::Release => "release-clip",
        }
    }

    fn paint(&self, ctx: &mut RenderContext) {
        match self {
            Self::Push(region) => {
                if !ctx.push_clip(region) {
                    warn!("could not build clip mask, drawing unclipped");
                }
            }
            Self::Release => ctx.pop_clip(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
