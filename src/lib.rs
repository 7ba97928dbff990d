//! pfp-compositor: profile picture compositing
//!
//! This crate turns the state of a profile picture editor into a finished
//! square PNG. The editor state is one serializable [`EditorConfig`]: a
//! subject photo transform, a background, color filters, a border ring, an
//! optional decorative overlay and a text overlay. The same geometry drives
//! both the browser preview ([`PreviewStyle`]) and the export
//! ([`Exporter`]), so the two always agree.
//!
//! # Example
//!
//! ```no_run
//! use pfp_compositor::{CapStyle, EditorConfig, Exporter, Session, MemoryStore};
//!
//! let mut session = Session::new(MemoryStore::new());
//! let photo = std::fs::read("me.jpg")?;
//! session.upload(&photo, "image/jpeg")?;
//!
//! let mut config = EditorConfig::default();
//! config.border.width = 8.0;
//! config.border.cap_style = CapStyle::Rounded;
//! config.border.amount = 75.0;
//!
//! let exporter = Exporter::default();
//! let png = exporter.export_image(&config, session.working_image(), 768)?;
//! png.save(&png.file_name)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Scaling
//!
//! Every length in the config is in preview pixels, relative to a
//! [`PREVIEW_BASE_SIZE`] box. An export at resolution `R` multiplies them by
//! `R / 192`, so exports at different resolutions are geometrically similar.

mod asset;
mod color;
mod config;
mod export;
mod filter;
mod geometry;
pub mod layer;
mod preview;
mod raster;
mod session;

pub use asset::{
    Asset, AssetError, AssetLoader, AssetSource, FsAssetLoader, decode_data_url, encode_data_url,
};
pub use color::{Color, FillType, Gradient, GradientDirection, ParseColorError};
pub use config::{
    BackgroundAnchor, BackgroundSettings, BackgroundSize, BackgroundType, BorderMode,
    BorderSettings, CurveDirection, EditorConfig, FilterSettings, GridSnap, ImageSettings,
    OverlaySettings, PatternSettings, Position, SubjectTransform, TextLayout, TextSettings,
};
pub use export::{
    DESKTOP_BASE_SIZE, EXPORT_FILE_NAME, ExportError, ExportQuality, Exporter, MAX_RESOLUTION,
    RasterBytes,
};
pub use filter::{FilterChannels, FilterExpression, FilterOp, build_filter_expression};
pub use geometry::{
    Boundary, BoundarySegment, CapStyle, ClipRegion, PREVIEW_BASE_SIZE, RectF, Scale,
    TracedPath, bevel_radius, compute_clip_region, outer_silhouette,
};
pub use layer::{FontLibrary, RenderContext};
pub use preview::{BorderPreview, CssDeclaration, PreviewStyle, image_transform};
pub use raster::{RasterSurface, SurfaceError};
pub use session::{
    FileStore, KeyValueStore, MemoryStore, SESSION_KEY, Session, SessionError, WorkingImage,
};
