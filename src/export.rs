//! Export orchestration.
//!
//! [`Exporter`] replays an [`EditorConfig`] onto a fresh square surface at
//! the requested resolution and encodes it as PNG. All lengths in the
//! config are preview pixels and are rescaled by `resolution / 192`.
//!
//! The stage order is fixed:
//!
//! 1. clip to the outer silhouette
//! 2. background, inside the border-aware content region
//! 3. subject photo
//! 4. secondary overlay, re-clipped to the content region
//! 5. release the clip
//! 6. border
//! 7. text
//!
//! Only a missing or undecodable subject aborts an export. Every other asset
//! that fails to load is logged and its stage falls back or is skipped.

use log::{debug, info, warn};
use thiserror::Error;

use crate::asset::{Asset, AssetError, AssetLoader, AssetSource, FsAssetLoader};
use crate::config::{BackgroundType, BorderMode, EditorConfig};
use crate::filter::build_filter_expression;
use crate::geometry::{Scale, compute_clip_region, outer_silhouette};
use crate::layer::{
    BackgroundLayer, BorderLayer, ClipLayer, FontLibrary, Layer, OverlayLayer, RenderContext,
    SubjectLayer, TextLayer,
};
use crate::raster::{RasterSurface, SurfaceError};
use crate::session::WorkingImage;

/// File name offered for the exported picture.
pub const EXPORT_FILE_NAME: &str = "profile-picture.png";

/// Edge length of the standard desktop export.
pub const DESKTOP_BASE_SIZE: u32 = 384;

/// Largest accepted export edge length.
pub const MAX_RESOLUTION: u32 = 8192;

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Please upload an image first!")]
    MissingSubjectImage,

    #[error("export resolution {0} is outside 1..={MAX_RESOLUTION}")]
    InvalidResolution(u32),

    #[error("failed to decode the subject image")]
    SubjectDecode(#[source] AssetError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

// ============================================================================
// ExportQuality
// ============================================================================

/// Resolution presets, as multiples of [`DESKTOP_BASE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ExportQuality {
    #[default]
    Standard,
    Hd,
    UltraHd,
    FourKPlus,
}

impl ExportQuality {
    pub const ALL: [Self; 4] = [Self::Standard, Self::Hd, Self::UltraHd, Self::FourKPlus];

    pub fn multiplier(self) -> u32 {
        match self {
            Self::Standard => 1,
            Self::Hd => 2,
            Self::UltraHd => 4,
            Self::FourKPlus => 6,
        }
    }

    /// Edge length in pixels.
    pub fn resolution(self) -> u32 {
        DESKTOP_BASE_SIZE * self.multiplier()
    }
}

// ============================================================================
// RasterBytes
// ============================================================================

/// An encoded export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBytes {
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl RasterBytes {
    /// Writes the bytes to `path`.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Composites editor configurations into pictures.
#[derive(Debug, Clone)]
pub struct Exporter<L: AssetLoader = FsAssetLoader> {
    loader: L,
    fonts: FontLibrary,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(FsAssetLoader::new())
    }
}

impl<L: AssetLoader> Exporter<L> {
    /// Creates an exporter using the fonts installed on this system.
    pub fn new(loader: L) -> Self {
        Self::with_fonts(loader, FontLibrary::system())
    }

    pub fn with_fonts(loader: L, fonts: FontLibrary) -> Self {
        Self { loader, fonts }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Renders and PNG-encodes `config` at `resolution x resolution`.
    pub fn export_image(
        &self,
        config: &EditorConfig,
        working_image: Option<&WorkingImage>,
        resolution: u32,
    ) -> Result<RasterBytes, ExportError> {
        let surface = self.render(config, working_image, resolution)?;
        let bytes = surface.encode_png()?;
        info!(
            "exported {EXPORT_FILE_NAME}: {}x{}, {} bytes",
            surface.width(),
            surface.height(),
            bytes.len()
        );
        Ok(RasterBytes {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime_type: "image/png",
            width: surface.width(),
            height: surface.height(),
            bytes,
        })
    }

    /// Exports at a preset resolution.
    pub fn export_quality(
        &self,
        config: &EditorConfig,
        working_image: Option<&WorkingImage>,
        quality: ExportQuality,
    ) -> Result<RasterBytes, ExportError> {
        self.export_image(config, working_image, quality.resolution())
    }

    /// Composites `config` onto a new surface without encoding it.
    pub fn render(
        &self,
        config: &EditorConfig,
        working_image: Option<&WorkingImage>,
        resolution: u32,
    ) -> Result<RasterSurface, ExportError> {
        let working_image = working_image.ok_or(ExportError::MissingSubjectImage)?;
        if resolution == 0 || resolution > MAX_RESOLUTION {
            return Err(ExportError::InvalidResolution(resolution));
        }
        let config = config.sanitized();
        let subject = working_image.decode().map_err(ExportError::SubjectDecode)?;

        let size = resolution as f32;
        let scale = Scale::for_resolution(resolution);
        let cap = config.border.cap_style;
        let silhouette = outer_silhouette(size, cap);
        let content = compute_clip_region(
            size,
            scale.apply(config.border.width),
            scale.apply(config.border.offset),
            cap,
        );
        debug!("export {resolution}px, scale {:.3}, content {content:?}", scale.factor());

        let background_source = match config.background.kind {
            BackgroundType::Pattern => config.background.pattern.source.as_ref(),
            BackgroundType::Image => config.background.image.source.as_ref(),
            BackgroundType::Solid | BackgroundType::Gradient => None,
        };
        let background_asset = self.load_optional("background", background_source);
        let overlay_asset = self.load_optional(
            "overlay",
            config.overlay.as_ref().map(|overlay| &overlay.source),
        );
        let frame_asset = match config.border.mode {
            BorderMode::Static => {
                self.load_optional("border frame", config.border.static_source.as_ref())
            }
            BorderMode::Dynamic => None,
        };
        let filter = build_filter_expression(config.filters.enabled, &config.filters.channels);

        let mut layers: Vec<Box<dyn Layer + '_>> = Vec::with_capacity(7);
        layers.push(Box::new(ClipLayer::Push(silhouette)));
        layers.push(Box::new(BackgroundLayer {
            settings: &config.background,
            region: content,
            asset: background_asset.as_ref(),
        }));
        layers.push(Box::new(SubjectLayer {
            image: &subject,
            transform: &config.transform,
            filter: &filter,
        }));
        if let (Some(settings), Some(asset)) = (&config.overlay, &overlay_asset) {
            layers.push(Box::new(OverlayLayer {
                asset,
                size_percent: settings.size,
                region: content,
            }));
        }
        layers.push(Box::new(ClipLayer::Release));
        layers.push(Box::new(BorderLayer {
            settings: &config.border,
            static_asset: frame_asset.as_ref(),
            silhouette,
        }));
        layers.push(Box::new(TextLayer {
            settings: &config.text,
            fonts: &self.fonts,
        }));

        let mut ctx = RenderContext::new(RasterSurface::square(resolution)?, scale);
        for layer in &layers {
            debug!("painting {}", layer.name());
            layer.paint(&mut ctx);
        }
        Ok(ctx.into_surface())
    }

    fn load_optional(&self, what: &str, source: Option<&AssetSource>) -> Option<Asset> {
        let source = source?;
        match self.loader.load(source) {
            Ok(asset) => Some(asset),
            Err(e) => {
                warn!("{what} asset failed to load, continuing without it: {e}");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
