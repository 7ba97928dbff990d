//! Raster surfaces and pixel-format conversions.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, IntSize, Mask, Pixmap};
use thiserror::Error;

/// Errors raised while allocating or encoding a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("cannot allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

// ============================================================================
// RasterSurface
// ============================================================================

/// A transparent RGBA drawing surface.
///
/// Pixels are stored premultiplied, as tiny-skia requires. Readers such as
/// [`RasterSurface::pixel`] and [`RasterSurface::to_rgba_image`] return
/// straight alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// Allocates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::Allocation { width, height })?;
        Ok(Self { pixmap })
    }

    /// Allocates a transparent square surface.
    pub fn square(size: u32) -> Result<Self, SurfaceError> {
        Self::new(size, size)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Returns the unpremultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba([p.red(), p.green(), p.blue(), p.alpha()]))
    }

    /// Returns true if every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        pixmap_to_rgba_image(&self.pixmap)
    }

    /// Encodes the surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// Converts a premultiplied pixmap to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let p = src.demultiply();
        *dst = Rgba([p.red(), p.green(), p.blue(), p.alpha()]);
    }
    img
}

/// Converts a straight-alpha image to a premultiplied pixmap.
///
/// Returns `None` for zero-sized images.
pub fn rgba_image_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let data = img
        .pixels()
        .flat_map(|px| {
            let [r, g, b, a] = px.0;
            let p = ColorU8::from_rgba(r, g, b, a).premultiply();
            [p.red(), p.green(), p.blue(), p.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Replaces the RGB of every pixel with `(r, g, b)`, keeping alpha.
pub fn tint_rgba_image(img: &mut RgbaImage, r: u8, g: u8, b: u8) {
    for px in img.pixels_mut() {
        px.0 = [r, g, b, px.0[3]];
    }
}

/// Multiplies `mask` by `other` in place, leaving their intersection.
///
/// Both masks must have the same dimensions; mismatched masks are left as is.
pub fn intersect_masks(mask: &mut Mask, other: &Mask) {
    if mask.width() != other.width() || mask.height() != other.height() {
        return;
    }
    for (a, b) in mask.data_mut().iter_mut().zip(other.data()) {
        *a = ((*a as u16 * *b as u16 + 127) / 255) as u8;
    }
}

// ============================================================================
// Tests
// ============================================================================
