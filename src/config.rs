//! Serializable editor configuration.
//!
//! An [`EditorConfig`] captures every editor setting in one record that can
//! be serialized to JSON, handed to the preview styler, and replayed by the
//! exporter. Lengths are in preview pixels (see
//! [`PREVIEW_BASE_SIZE`](crate::geometry::PREVIEW_BASE_SIZE)).
//!
//! # Example
//!
//! ```
//! use pfp_compositor::{CapStyle, EditorConfig};
//!
//! let mut config = EditorConfig::default();
//! config.border.width = 8.0;
//! config.border.cap_style = CapStyle::Beveled;
//!
//! let json = config.to_json().unwrap();
//! let restored = EditorConfig::from_json(&json).unwrap();
//! assert_eq!(restored, config);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::asset::AssetSource;
use crate::color::{Color, FillType, Gradient, GradientDirection};
use crate::filter::FilterChannels;
use crate::geometry::CapStyle;

// Slider ranges.
pub const ZOOM_RANGE: (f32, f32) = (0.1, 5.0);
pub const ROTATION_RANGE: (f32, f32) = (-180.0, 180.0);
pub const POSITION_RANGE: (f32, f32) = (-200.0, 200.0);
pub const GRID_SIZE_RANGE: (f32, f32) = (5.0, 50.0);
pub const BORDER_WIDTH_RANGE: (f32, f32) = (0.0, 20.0);
pub const BORDER_OFFSET_RANGE: (f32, f32) = (-10.0, 10.0);
pub const PATTERN_SCALE_RANGE: (f32, f32) = (20.0, 200.0);
pub const FONT_SIZE_RANGE: (f32, f32) = (4.0, 200.0);
pub const OVERLAY_SIZE_RANGE: (f32, f32) = (0.0, 200.0);
pub const BACKGROUND_PERCENT_RANGE: (f32, f32) = (0.0, 200.0);

fn clamp_range(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn clamp_percent(value: f32, fallback: f32) -> f32 {
    clamp_range(value, (0.0, 100.0), fallback)
}

// ============================================================================
// EditorConfig
// ============================================================================

/// The complete state of the editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct EditorConfig {
    pub transform: SubjectTransform,
    pub background: BackgroundSettings,
    pub filters: FilterSettings,
    pub border: BorderSettings,
    /// Secondary decorative overlay, drawn over the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlaySettings>,
    pub text: TextSettings,
}

impl EditorConfig {
    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from JSON. Missing fields take their reset values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns a copy with every numeric field clamped to its slider range.
    ///
    /// Non-finite values are replaced with the reset default.
    pub fn sanitized(&self) -> Self {
        Self {
            transform: self.transform.sanitized(),
            background: self.background.sanitized(),
            filters: self.filters,
            border: self.border.sanitized(),
            overlay: self.overlay.as_ref().map(OverlaySettings::sanitized),
            text: self.text.sanitized(),
        }
    }
}

// ============================================================================
// Subject transform
// ============================================================================

/// Zoom, rotation, flip and pan applied to the subject photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct SubjectTransform {
    /// Multiplier on top of the contain fit.
    pub zoom: f32,
    /// Degrees, clockwise.
    pub rotate: f32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Pan offset from the center, in preview pixels.
    pub position: Position,
    pub grid_snap: GridSnap,
}

impl Default for SubjectTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotate: 0.0,
            flip_horizontal: false,
            flip_vertical: false,
            position: Position::default(),
            grid_snap: GridSnap::default(),
        }
    }
}

impl SubjectTransform {
    fn sanitized(&self) -> Self {
        let grid_snap = GridSnap {
            enabled: self.grid_snap.enabled,
            cell_size: clamp_range(self.grid_snap.cell_size, GRID_SIZE_RANGE, 20.0),
        };
        Self {
            zoom: clamp_range(self.zoom, ZOOM_RANGE, 1.0),
            rotate: clamp_range(self.rotate, ROTATION_RANGE, 0.0),
            flip_horizontal: self.flip_horizontal,
            flip_vertical: self.flip_vertical,
            position: Position {
                x: clamp_range(self.position.x, POSITION_RANGE, 0.0),
                y: clamp_range(self.position.y, POSITION_RANGE, 0.0),
            },
            grid_snap,
        }
    }

    /// Sets the pan position, snapping it to the grid when enabled.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = self.grid_snap.snap(Position { x, y });
    }
}

/// A 2D offset in preview pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Optional snapping of drag positions to a square grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GridSnap {
    pub enabled: bool,
    pub cell_size: f32,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            enabled: false,
            cell_size: 20.0,
        }
    }
}

impl GridSnap {
    /// Rounds each coordinate to the nearest grid line when enabled.
    pub fn snap(&self, position: Position) -> Position {
        if !self.enabled || self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return position;
        }
        let snap = |v: f32| (v / self.cell_size).round() * self.cell_size;
        Position {
            x: snap(position.x),
            y: snap(position.y),
        }
    }
}

// ============================================================================
// Background
// ============================================================================

/// How the background behind the subject is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BackgroundType {
    #[default]
    Solid,
    Gradient,
    Pattern,
    Image,
}

/// Background fill settings.
///
/// `color` doubles as the fallback fill when a pattern or image asset is
/// missing or fails to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BackgroundSettings {
    #[serde(rename = "type")]
    pub kind: BackgroundType,
    pub color: Color,
    pub gradient: Gradient,
    pub pattern: PatternSettings,
    pub image: ImageSettings,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            kind: BackgroundType::Solid,
            color: Color::rgb(0x5b, 0x9b, 0xd5),
            gradient: Gradient::new(
                Color::rgb(0x4e, 0xcd, 0xc4),
                Color::rgb(0x45, 0xb7, 0xd1),
                GradientDirection::ToRight,
            ),
            pattern: PatternSettings::default(),
            image: ImageSettings::default(),
        }
    }
}

impl BackgroundSettings {
    fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.pattern.scale = clamp_range(self.pattern.scale, PATTERN_SCALE_RANGE, 100.0);
        if let BackgroundSize::Percent(p) = self.image.size {
            out.image.size = BackgroundSize::Percent(clamp_range(p, BACKGROUND_PERCENT_RANGE, 100.0));
        }
        out
    }
}

/// A repeating tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PatternSettings {
    pub source: Option<AssetSource>,
    /// Tile scale in percent of the base tile size.
    pub scale: f32,
    /// Replaces the tile's colors, keeping its alpha.
    pub tint: Option<Color>,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            source: None,
            scale: 100.0,
            tint: None,
        }
    }
}

/// A single, non-repeating background picture.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ImageSettings {
    pub source: Option<AssetSource>,
    pub size: BackgroundSize,
    pub position: BackgroundAnchor,
}

/// CSS-style `background-size`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
    /// Natural size, scaled with the surface.
    Auto,
    /// Width as a percentage of the region; height keeps the aspect ratio.
    Percent(f32),
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for BackgroundSize {
    fn schema_name() -> String {
        "BackgroundSize".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

impl fmt::Display for BackgroundSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => f.write_str("cover"),
            Self::Contain => f.write_str("contain"),
            Self::Auto => f.write_str("auto"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

impl FromStr for BackgroundSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cover" => Ok(Self::Cover),
            "contain" => Ok(Self::Contain),
            "auto" => Ok(Self::Auto),
            other => other
                .strip_suffix('%')
                .and_then(|p| p.trim().parse::<f32>().ok())
                .map(Self::Percent)
                .ok_or_else(|| format!("invalid background size '{other}'")),
        }
    }
}

impl TryFrom<String> for BackgroundSize {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundSize> for String {
    fn from(size: BackgroundSize) -> Self {
        size.to_string()
    }
}

/// CSS-style `background-position` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BackgroundAnchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl BackgroundAnchor {
    /// Fractional alignment `(x, y)` of the picture within its region.
    pub fn alignment(&self) -> (f32, f32) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::Top => (0.5, 0.0),
            Self::Bottom => (0.5, 1.0),
            Self::Left => (0.0, 0.5),
            Self::Right => (1.0, 0.5),
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Filter sliders plus their master switch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FilterSettings {
    pub enabled: bool,
    #[serde(flatten)]
    pub channels: FilterChannels,
}

// ============================================================================
// Border
// ============================================================================

/// Procedural ring or a pre-made frame picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BorderMode {
    #[default]
    Dynamic,
    Static,
}

/// Border settings.
///
/// `width` and `offset` shape the clip region in both modes; the remaining
/// stroke fields only apply to [`BorderMode::Dynamic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BorderSettings {
    pub mode: BorderMode,
    pub width: f32,
    /// Extra inset of the content region; negative values let the
    /// background reach under the ring.
    pub offset: f32,
    /// Percent.
    pub opacity: f32,
    pub cap_style: CapStyle,
    #[serde(rename = "type")]
    pub fill_type: FillType,
    pub color: Color,
    pub gradient: Gradient,
    /// Percentage of the perimeter to draw.
    pub amount: f32,
    /// Degrees clockwise from 12 o'clock where a partial ring starts.
    pub rotation: f32,
    /// Frame picture used in [`BorderMode::Static`].
    pub static_source: Option<AssetSource>,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            mode: BorderMode::Dynamic,
            width: 0.0,
            offset: 0.0,
            opacity: 100.0,
            cap_style: CapStyle::Rounded,
            fill_type: FillType::Solid,
            color: Color::rgb(0xff, 0x6b, 0x6b),
            gradient: Gradient::new(
                Color::rgb(0xff, 0xd7, 0x00),
                Color::rgb(0xff, 0xa5, 0x00),
                GradientDirection::ToRight,
            ),
            amount: 100.0,
            rotation: 0.0,
            static_source: None,
        }
    }
}

impl BorderSettings {
    fn sanitized(&self) -> Self {
        Self {
            width: clamp_range(self.width, BORDER_WIDTH_RANGE, 0.0),
            offset: clamp_range(self.offset, BORDER_OFFSET_RANGE, 0.0),
            opacity: clamp_percent(self.opacity, 100.0),
            amount: clamp_percent(self.amount, 100.0),
            rotation: if self.rotation.is_finite() {
                self.rotation.rem_euclid(360.0)
            } else {
                0.0
            },
            ..self.clone()
        }
    }
}

// ============================================================================
// Overlay
// ============================================================================

/// A decorative picture layered over the subject, e.g. pixel-art frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct OverlaySettings {
    pub source: AssetSource,
    /// Edge length in percent of the surface.
    #[serde(default = "default_overlay_size")]
    pub size: f32,
}

fn default_overlay_size() -> f32 {
    100.0
}

impl OverlaySettings {
    fn sanitized(&self) -> Self {
        Self {
            source: self.source.clone(),
            size: clamp_range(self.size, OVERLAY_SIZE_RANGE, 100.0),
        }
    }
}

// ============================================================================
// Text
// ============================================================================

/// How the text content is arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum TextLayout {
    #[default]
    Straight,
    /// One character per line, top to bottom.
    Vertical,
    /// Characters spread evenly around a circle.
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CurveDirection {
    #[default]
    Clockwise,
    Counterclockwise,
}

/// Text overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TextSettings {
    pub enabled: bool,
    pub content: String,
    pub font_family: String,
    pub font_weight: u16,
    /// Preview pixels.
    pub font_size: f32,
    /// Preview pixels.
    pub letter_spacing: f32,
    pub layout: TextLayout,
    /// Horizontal offset of the anchor from the center, in percent of the
    /// surface edge.
    pub offset_x: f32,
    /// Vertical offset of the anchor from the center, in percent.
    pub offset_y: f32,
    #[serde(rename = "type")]
    pub fill_type: FillType,
    pub color: Color,
    pub gradient: Gradient,
    /// Percent.
    pub opacity: f32,
    /// Preview pixels.
    pub curve_radius: f32,
    /// Degrees clockwise from 12 o'clock.
    pub curve_start_angle: f32,
    pub curve_direction: CurveDirection,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            content: String::new(),
            font_family: "sans-serif".to_string(),
            font_weight: 700,
            font_size: 24.0,
            letter_spacing: 0.0,
            layout: TextLayout::Straight,
            offset_x: 0.0,
            offset_y: 0.0,
            fill_type: FillType::Solid,
            color: Color::WHITE,
            gradient: Gradient::new(
                Color::rgb(0xff, 0x6b, 0x6b),
                Color::rgb(0xff, 0x8e, 0x53),
                GradientDirection::ToRight,
            ),
            opacity: 100.0,
            curve_radius: 80.0,
            curve_start_angle: 0.0,
            curve_direction: CurveDirection::Clockwise,
        }
    }
}

impl TextSettings {
    fn sanitized(&self) -> Self {
        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };
        Self {
            font_weight: self.font_weight.clamp(100, 900),
            font_size: clamp_range(self.font_size, FONT_SIZE_RANGE, 24.0),
            letter_spacing: finite_or(self.letter_spacing, 0.0),
            offset_x: clamp_range(self.offset_x, (-50.0, 50.0), 0.0),
            offset_y: clamp_range(self.offset_y, (-50.0, 50.0), 0.0),
            opacity: clamp_percent(self.opacity, 100.0),
            curve_radius: finite_or(self.curve_radius, 80.0).max(1.0),
            curve_start_angle: finite_or(self.curve_start_angle, 0.0),
            ..self.clone()
        }
    }

    /// Returns true if there is something to draw.
    pub fn is_visible(&self) -> bool {
        self.enabled && !self.content.trim().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_reset() {
        let config = EditorConfig::default();
        assert_eq!(config.transform.zoom, 1.0);
        assert_eq!(config.background.kind, BackgroundType::Solid);
        assert_eq!(config.background.color.to_hex(), "#5b9bd5");
        assert_eq!(config.border.width, 0.0);
        assert_eq!(config.border.amount, 100.0);
        assert_eq!(config.border.cap_style, CapStyle::Rounded);
        assert!(!config.filters.enabled);
        assert!(config.overlay.is_none());
        assert!(!config.text.is_visible());
    }

    #[test]
    fn empty_json_gives_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn json_uses_camel_case_and_type_keys() {
        let mut config = EditorConfig::default();
        config.border.cap_style = CapStyle::Square;
        config.filters.enabled = true;
        config.filters.channels.hue_rotate = 45.0;

        let json = config.to_json().unwrap();
        assert!(json.contains(r#""capStyle":"square""#));
        assert!(json.contains(r#""hueRotate":45.0"#));
        assert!(json.contains(r#""type":"solid""#));
        assert!(!json.contains("overlay"));

        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let json = r##"{
            "border": { "width": 6, "type": "gradient", "gradient": { "start": "#000000", "end": "#ffffff", "direction": "circle" } },
            "background": { "type": "pattern", "pattern": { "source": { "path": "dots.svg" }, "scale": 50 } }
        }"##;
        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.border.width, 6.0);
        assert_eq!(config.border.fill_type, FillType::Gradient);
        assert_eq!(config.border.gradient.direction, GradientDirection::Radial);
        assert_eq!(config.border.opacity, 100.0);
        assert_eq!(config.background.kind, BackgroundType::Pattern);
        assert_eq!(
            config.background.pattern.source,
            Some(AssetSource::path("dots.svg"))
        );
    }

    #[test]
    fn background_size_strings() {
        assert_eq!("cover".parse::<BackgroundSize>(), Ok(BackgroundSize::Cover));
        assert_eq!("50%".parse::<BackgroundSize>(), Ok(BackgroundSize::Percent(50.0)));
        assert!("huge".parse::<BackgroundSize>().is_err());
        assert_eq!(BackgroundSize::Percent(75.0).to_string(), "75%");
    }

    #[test]
    fn sanitize_clamps_ranges() {
        let mut config = EditorConfig::default();
        config.transform.zoom = 50.0;
        config.transform.rotate = f32::NAN;
        config.transform.position = Position { x: -999.0, y: 10.0 };
        config.border.width = 100.0;
        config.border.offset = -40.0;
        config.border.amount = 150.0;
        config.border.rotation = -90.0;
        config.text.font_size = 0.0;

        let clean = config.sanitized();
        assert_eq!(clean.transform.zoom, 5.0);
        assert_eq!(clean.transform.rotate, 0.0);
        assert_eq!(clean.transform.position, Position { x: -200.0, y: 10.0 });
        assert_eq!(clean.border.width, 20.0);
        assert_eq!(clean.border.offset, -10.0);
        assert_eq!(clean.border.amount, 100.0);
        assert_eq!(clean.border.rotation, 270.0);
        assert_eq!(clean.text.font_size, 4.0);
    }

    #[test]
    fn sanitize_bounds_overlay_and_picture_size() {
        let mut config = EditorConfig::default();
        config.overlay = Some(OverlaySettings {
            source: AssetSource::path("frame.svg"),
            size: 1_000_000.0,
        });
        config.background.image.size = BackgroundSize::Percent(5000.0);
        let clean = config.sanitized();
        assert_eq!(clean.overlay.as_ref().map(|o| o.size), Some(200.0));
        assert_eq!(clean.background.image.size, BackgroundSize::Percent(200.0));

        config.overlay = Some(OverlaySettings {
            source: AssetSource::path("frame.svg"),
            size: f32::INFINITY,
        });
        config.background.image.size = BackgroundSize::Percent(-5.0);
        let clean = config.sanitized();
        assert_eq!(clean.overlay.map(|o| o.size), Some(100.0));
        assert_eq!(clean.background.image.size, BackgroundSize::Percent(0.0));
    }

    #[test]
    fn grid_snap_rounds_to_cells() {
        let grid = GridSnap {
            enabled: true,
            cell_size: 20.0,
        };
        assert_eq!(
            grid.snap(Position { x: 29.0, y: -31.0 }),
            Position { x: 20.0, y: -40.0 }
        );

        let mut transform = SubjectTransform {
            grid_snap: grid,
            ..Default::default()
        };
        transform.move_to(9.0, 11.0);
        assert_eq!(transform.position, Position { x: 0.0, y: 20.0 });

        let off = GridSnap::default();
        assert_eq!(
            off.snap(Position { x: 29.0, y: 1.0 }),
            Position { x: 29.0, y: 1.0 }
        );
    }

    #[test]
    fn text_visibility() {
        let mut text = TextSettings {
            enabled: true,
            content: "   ".to_string(),
            ..Default::default()
        };
        assert!(!text.is_visible());
        text.content = "Hi".to_string();
        assert!(text.is_visible());
    }
}
