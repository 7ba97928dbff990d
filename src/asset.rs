//! Image assets referenced by the editor configuration.
//!
//! Backgrounds, pattern tiles, the secondary overlay, the static border and
//! the subject photo are all described by an [`AssetSource`] and resolved
//! through an [`AssetLoader`] into a decoded [`Asset`].

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;
use log::debug;
use resvg::tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::layer::svg::{parse_svg, render_svg, replace_svg_colors, svg_natural_size};
use crate::raster::{rgba_image_to_pixmap, tint_rgba_image};

/// Largest edge, in pixels, a vector asset is rasterized at on its own.
pub const MAX_VECTOR_EDGE: u32 = 8192;

/// Errors raised while loading or decoding an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data URL")]
    MalformedDataUrl,

    #[error("invalid base64 payload")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to decode bitmap")]
    Decode(#[from] image::ImageError),

    #[error("failed to parse SVG")]
    Svg(#[from] resvg::usvg::Error),

    #[error("emoji '{0}' is not available")]
    UnknownEmoji(String),

    #[error("asset has no pixels")]
    Empty,
}

// ============================================================================
// AssetSource
// ============================================================================

/// Where an asset's bytes come from.
///
/// Serializes as a single-key object:
///
/// ```json
/// { "path": "patterns/dots.svg" }
/// { "dataUrl": "data:image/png;base64,iVBOR..." }
/// { "svg": "<svg ...>...</svg>" }
/// { "emoji": "🦆" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum AssetSource {
    /// A file, resolved against the loader's root directory.
    Path(PathBuf),
    /// A `data:` URL carrying a bitmap or SVG.
    DataUrl(String),
    /// Inline SVG markup.
    Svg(String),
    /// An emoji rendered from Twemoji.
    ///
    /// Only resolvable when the `twemoji` feature is enabled.
    Emoji(String),
}

impl AssetSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn svg(svg: impl Into<String>) -> Self {
        Self::Svg(svg.into())
    }

    /// Returns a URL usable in CSS `url(...)`.
    ///
    /// Inline SVG and emoji sources are embedded as data URLs.
    pub fn to_css_url(&self) -> Option<String> {
        match self {
            Self::Path(path) => Some(path.to_string_lossy().into_owned()),
            Self::DataUrl(url) => Some(url.clone()),
            Self::Svg(svg) => Some(encode_data_url("image/svg+xml", svg.as_bytes())),
            #[cfg(feature = "twemoji")]
            Self::Emoji(emoji) => crate::layer::svg::resolve_emoji(emoji)
                .map(|svg| encode_data_url("image/svg+xml", svg.as_bytes())),
            #[cfg(not(feature = "twemoji"))]
            Self::Emoji(_) => None,
        }
    }
}

// ============================================================================
// Data URLs
// ============================================================================

/// Splits a base64 `data:` URL into its MIME type and decoded payload.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), AssetError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(AssetError::MalformedDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(AssetError::MalformedDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(AssetError::MalformedDataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_ascii_lowercase(), bytes))
}

/// Builds a base64 `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

// ============================================================================
// Asset
// ============================================================================

/// A decoded asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    /// A bitmap with straight alpha.
    Raster(RgbaImage),
    /// Validated SVG markup, rasterized on demand at the target size.
    Vector(String),
}

impl Asset {
    /// Decodes bytes, sniffing SVG by content and everything else through
    /// the `image` crate's format detection.
    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        if looks_like_svg(bytes) {
            let svg = String::from_utf8_lossy(bytes).into_owned();
            return Self::from_svg(svg);
        }
        let img = image::load_from_memory(bytes)?.to_rgba8();
        if img.width() == 0 || img.height() == 0 {
            return Err(AssetError::Empty);
        }
        Ok(Self::Raster(img))
    }

    /// Validates SVG markup.
    pub fn from_svg(svg: String) -> Result<Self, AssetError> {
        crate::layer::svg::parse_svg(&svg, None)?;
        Ok(Self::Vector(svg))
    }

    /// Intrinsic size in pixels.
    pub fn natural_size(&self) -> (f32, f32) {
        match self {
            Self::Raster(img) => (img.width() as f32, img.height() as f32),
            Self::Vector(svg) => svg_natural_size(svg).unwrap_or((1.0, 1.0)),
        }
    }

    /// Produces a pixmap meant to be drawn at `width x height`.
    ///
    /// Vectors are rendered at that size, capped at [`MAX_VECTOR_EDGE`] per
    /// side. Bitmaps are returned at their natural size. Either way the
    /// caller scales by the returned pixmap's real size. `tint` replaces RGB
    /// and keeps alpha.
    pub fn to_pixmap(&self, width: f32, height: f32, tint: Option<Color>) -> Option<Pixmap> {
        match self {
            Self::Raster(img) => raster_pixmap(img, tint),
            Self::Vector(svg) => {
                let edge = |v: f32| v.ceil().clamp(1.0, MAX_VECTOR_EDGE as f32) as u32;
                render_svg(svg, edge(width), edge(height), tint)
            }
        }
    }

    /// Rasterizes the asset onto a transparent `width x height` pixmap,
    /// mapping its natural coordinates through `transform`.
    ///
    /// Only the part that lands inside the target is rasterized, so the cost
    /// is bounded by the target however far `transform` scales the asset.
    pub fn render_onto(
        &self,
        width: u32,
        height: u32,
        transform: Transform,
        tint: Option<Color>,
    ) -> Option<Pixmap> {
        let mut target = Pixmap::new(width, height)?;
        match self {
            Self::Raster(img) => {
                let src = raster_pixmap(img, tint)?;
                let paint = PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..Default::default()
                };
                target.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
            }
            Self::Vector(svg) => {
                let tree = match tint {
                    Some(color) => parse_svg(&replace_svg_colors(svg, color), None),
                    None => parse_svg(svg, None),
                }
                .ok()?;
                resvg::render(&tree, transform, &mut target.as_mut());
            }
        }
        Some(target)
    }
}

fn raster_pixmap(img: &RgbaImage, tint: Option<Color>) -> Option<Pixmap> {
    match tint {
        Some(color) => {
            let mut tinted = img.clone();
            tint_rgba_image(&mut tinted, color.r, color.g, color.b);
            rgba_image_to_pixmap(&tinted)
        }
        None => rgba_image_to_pixmap(img),
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

// ============================================================================
// AssetLoader
// ============================================================================

/// Resolves an [`AssetSource`] to a decoded [`Asset`].
pub trait AssetLoader {
    fn load(&self, source: &AssetSource) -> Result<Asset, AssetError>;
}

/// Loads assets from the local filesystem and from inline sources.
#[derive(Debug, Clone, Default)]
pub struct FsAssetLoader {
    root: Option<PathBuf>,
}

impl FsAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AssetLoader for FsAssetLoader {
    fn load(&self, source: &AssetSource) -> Result<Asset, AssetError> {
        match source {
            AssetSource::Path(path) => {
                let path = self.resolve_path(path);
                debug!("loading asset from {}", path.display());
                let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
                    path: path.clone(),
                    source,
                })?;
                Asset::decode(&bytes)
            }
            AssetSource::DataUrl(url) => {
                let (_mime, bytes) = decode_data_url(url)?;
                Asset::decode(&bytes)
            }
            AssetSource::Svg(svg) => Asset::from_svg(svg.clone()),
            #[cfg(feature = "twemoji")]
            AssetSource::Emoji(emoji) => {
                let svg = crate::layer::svg::resolve_emoji(emoji)
                    .ok_or_else(|| AssetError::UnknownEmoji(emoji.clone()))?;
                Asset::from_svg(svg)
            }
            #[cfg(not(feature = "twemoji"))]
            AssetSource::Emoji(emoji) => Err(AssetError::UnknownEmoji(emoji.clone())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::RectF;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect width="20" height="10" fill="#0000ff"/></svg>"##;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn data_url_round_trip() {
        let url = encode_data_url("image/png", b"abc");
        assert_eq!(url, "data:image/png;base64,YWJj");
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"abc");
    }

    #[test]
    fn malformed_data_urls() {
        assert!(matches!(
            decode_data_url("image/png;base64,YWJj"),
            Err(AssetError::MalformedDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,plain"),
            Err(AssetError::MalformedDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,***"),
            Err(AssetError::Base64(_))
        ));
    }

    #[test]
    fn decode_sniffs_svg() {
        let asset = Asset::decode(SQUARE_SVG.as_bytes()).unwrap();
        assert!(matches!(asset, Asset::Vector(_)));
        assert_eq!(asset.natural_size(), (20.0, 10.0));
    }

    #[test]
    fn decode_png() {
        let img = RgbaImage::from_pixel(3, 5, Rgba([1, 2, 3, 255]));
        let asset = Asset::decode(&png_bytes(&img)).unwrap();
        assert_eq!(asset, Asset::Raster(img));
        assert_eq!(asset.natural_size(), (3.0, 5.0));
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(Asset::decode(b"definitely not an image").is_err());
        assert!(Asset::from_svg("<svg".to_string()).is_err());
    }

    #[test]
    fn raster_tint_keeps_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let pixmap = Asset::Raster(img)
            .to_pixmap(50.0, 50.0, Some(Color::rgb(255, 0, 0)))
            .unwrap();
        assert_eq!(pixmap.width(), 2);
        let p = pixmap.pixel(0, 0).unwrap();
        assert_eq!((p.red(), p.alpha()), (255, 255));
    }

    #[test]
    fn vector_renders_at_target_size() {
        let pixmap = Asset::Vector(SQUARE_SVG.to_string())
            .to_pixmap(30.0, 15.0, None)
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (30, 15));
    }

    #[test]
    fn oversized_vector_is_capped() {
        let pixmap = Asset::Vector(SQUARE_SVG.to_string())
            .to_pixmap(1.0e9, 20.0, None)
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (MAX_VECTOR_EDGE, 20));
    }

    #[test]
    fn render_onto_only_covers_target() {
        // Scaled a million times the vector still yields a 16x16 pixmap,
        // fully covered by the rect.
        let transform = Transform::from_translate(-1.0e6, -1.0e6).pre_scale(1.0e5, 2.0e5);
        let pixmap = Asset::Vector(SQUARE_SVG.to_string())
            .render_onto(16, 16, transform, None)
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (16, 16));
        let p = pixmap.pixel(8, 8).unwrap();
        assert_eq!((p.blue(), p.alpha()), (255, 255));
    }

    #[test]
    fn render_onto_places_raster() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        let transform = RectF::new(4.0, 4.0, 8.0, 8.0).transform_from((2.0, 2.0));
        let pixmap = Asset::Raster(img)
            .render_onto(16, 16, transform, None)
            .unwrap();
        assert_eq!(pixmap.pixel(8, 8).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(1, 1).unwrap().alpha(), 0);
    }

    #[test]
    fn fs_loader_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tile.svg"), SQUARE_SVG).unwrap();

        let loader = FsAssetLoader::with_root(dir.path());
        let asset = loader.load(&AssetSource::path("tile.svg")).unwrap();
        assert!(matches!(asset, Asset::Vector(_)));

        let missing = loader.load(&AssetSource::path("missing.png"));
        assert!(matches!(missing, Err(AssetError::Io { .. })));
    }

    #[test]
    fn fs_loader_reads_data_urls() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([9, 9, 9, 255]));
        let url = encode_data_url("image/png", &png_bytes(&img));
        let asset = FsAssetLoader::new().load(&AssetSource::DataUrl(url)).unwrap();
        assert_eq!(asset, Asset::Raster(img));
    }

    #[test]
    fn source_serializes_as_tagged_object() {
        let json = serde_json::to_string(&AssetSource::path("a.png")).unwrap();
        assert_eq!(json, r#"{"path":"a.png"}"#);
        let source: AssetSource = serde_json::from_str(r#"{"svg":"<svg/>"}"#).unwrap();
        assert_eq!(source, AssetSource::svg("<svg/>"));
    }

    #[cfg(not(feature = "twemoji"))]
    #[test]
    fn emoji_requires_feature() {
        let result = FsAssetLoader::new().load(&AssetSource::Emoji("🦆".into()));
        assert!(matches!(result, Err(AssetError::UnknownEmoji(_))));
    }
}
