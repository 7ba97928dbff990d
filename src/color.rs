//! Colors and two-stop gradients.
//!
//! Colors travel through the editor configuration as CSS hex strings
//! (`"#5B9BD5"`). [`Color`] parses them once and converts to whatever the
//! consumer needs: a tiny-skia color for the exporter, or a hex string for
//! SVG markup and CSS.

use std::fmt;
use std::str::FromStr;

use log::warn;
use palette::Srgb;
use resvg::tiny_skia::{
    self, GradientStop, LinearGradient, Point, RadialGradient, Shader, SpreadMode, Transform,
};
use serde::{Deserialize, Serialize};

use crate::geometry::RectF;

// ============================================================================
// Color
// ============================================================================

/// A straight-alpha sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or one of a few CSS keywords.
    pub fn parse(input: &str) -> Option<Self> {
        let value = input.trim();
        match value.to_ascii_lowercase().as_str() {
            "transparent" => return Some(Self::TRANSPARENT),
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            _ => {}
        }

        let hex = value.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let (rgb, alpha) = match hex.len() {
            3 | 6 => (hex, 255),
            8 => (&hex[..6], u8::from_str_radix(&hex[6..], 16).ok()?),
            _ => return None,
        };
        let parsed: Srgb<u8> = Srgb::from_str(rgb).ok()?;
        Some(Self::rgba(parsed.red, parsed.green, parsed.blue, alpha))
    }

    /// Lowercase `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Converts to a tiny-skia color, multiplying alpha by `opacity` (0.0-1.0).
    pub fn to_skia(&self, opacity: f32) -> tiny_skia::Color {
        let mut color = tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a);
        color.apply_opacity(opacity.clamp(0.0, 1.0));
        color
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Color {
    fn schema_name() -> String {
        "Color".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}'")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ============================================================================
// GradientDirection
// ============================================================================

/// Direction keyword of a two-stop gradient, using CSS spellings.
///
/// Unknown strings deserialize to [`GradientDirection::Diagonal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum GradientDirection {
    #[default]
    #[serde(rename = "to right")]
    ToRight,
    #[serde(rename = "to bottom")]
    ToBottom,
    #[serde(rename = "to top right")]
    ToTopRight,
    #[serde(rename = "to bottom left")]
    ToBottomLeft,
    #[serde(rename = "45deg")]
    Angle45,
    #[serde(rename = "circle")]
    Radial,
    /// Top-left to bottom-right.
    #[serde(rename = "to bottom right", other)]
    Diagonal,
}

impl GradientDirection {
    /// CSS keyword for this direction.
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::ToRight => "to right",
            Self::ToBottom => "to bottom",
            Self::ToTopRight => "to top right",
            Self::ToBottomLeft => "to bottom left",
            Self::Angle45 => "45deg",
            Self::Radial => "circle",
            Self::Diagonal => "to bottom right",
        }
    }

    /// Start and end points of a linear gradient spanning `bounds`.
    ///
    /// `Radial` has no linear form and maps to the default diagonal.
    pub fn linear_endpoints(&self, bounds: RectF) -> ((f32, f32), (f32, f32)) {
        let (l, t, r, b) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());
        match self {
            Self::ToRight => ((l, t), (r, t)),
            Self::ToBottom => ((l, t), (l, b)),
            Self::ToTopRight | Self::Angle45 => ((l, b), (r, t)),
            Self::ToBottomLeft => ((r, t), (l, b)),
            Self::Radial | Self::Diagonal => ((l, t), (r, b)),
        }
    }
}

// ============================================================================
// Gradient
// ============================================================================

/// A two-stop gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Gradient {
    pub start: Color,
    pub end: Color,
    #[serde(default)]
    pub direction: GradientDirection,
}

impl Gradient {
    pub fn new(start: Color, end: Color, direction: GradientDirection) -> Self {
        Self {
            start,
            end,
            direction,
        }
    }

    /// Builds a shader over `bounds`.
    ///
    /// `radial_radius` is only used by [`GradientDirection::Radial`]; the
    /// gradient is then centered in `bounds`. Degenerate geometry falls back
    /// to a solid shader of the start color.
    pub fn shader(&self, bounds: RectF, radial_radius: f32, opacity: f32) -> Shader<'static> {
        let stops = vec![
            GradientStop::new(0.0, self.start.to_skia(opacity)),
            GradientStop::new(1.0, self.end.to_skia(opacity)),
        ];

        let shader = match self.direction {
            GradientDirection::Radial => {
                let (cx, cy) = bounds.center();
                let center = Point::from_xy(cx, cy);
                RadialGradient::new(
                    center,
                    center,
                    radial_radius.max(f32::EPSILON),
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                )
            }
            direction => {
                let ((x0, y0), (x1, y1)) = direction.linear_endpoints(bounds);
                LinearGradient::new(
                    Point::from_xy(x0, y0),
                    Point::from_xy(x1, y1),
                    stops,
                    SpreadMode::Pad,
                    Transform::identity(),
                )
            }
        };

        shader.unwrap_or_else(|| {
            warn!("degenerate gradient geometry, using solid start color");
            Shader::SolidColor(self.start.to_skia(opacity))
        })
    }

    /// CSS `background-image` value.
    pub fn to_css(&self) -> String {
        match self.direction {
            GradientDirection::Radial => {
                format!("radial-gradient(circle, {}, {})", self.start, self.end)
            }
            direction => format!(
                "linear-gradient({}, {}, {})",
                direction.as_css(),
                self.start,
                self.end
            ),
        }
    }
}

// ============================================================================
// FillType
// ============================================================================

/// Whether a stroke or text run uses a flat color or a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum FillType {
    #[default]
    Solid,
    Gradient,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_forms() {
        assert_eq!(Color::parse("#5B9BD5"), Some(Color::rgb(0x5b, 0x9b, 0xd5)));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(
            Color::parse("#ff000080"),
            Some(Color::rgba(255, 0, 0, 0x80))
        );
        assert_eq!(Color::parse(" transparent "), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("5B9BD5"), None);
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#zzzzzz"), None);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::rgb(255, 107, 107)).unwrap();
        assert_eq!(json, "\"#ff6b6b\"");

        let color: Color = serde_json::from_str("\"#FF6B6B\"").unwrap();
        assert_eq!(color, Color::rgb(255, 107, 107));

        assert!(serde_json::from_str::<Color>("\"bogus\"").is_err());
    }

    #[test]
    fn unknown_direction_falls_back_to_diagonal() {
        let direction: GradientDirection = serde_json::from_str("\"to top left\"").unwrap();
        assert_eq!(direction, GradientDirection::Diagonal);

        let direction: GradientDirection = serde_json::from_str("\"circle\"").unwrap();
        assert_eq!(direction, GradientDirection::Radial);
    }

    #[test]
    fn linear_endpoints() {
        let bounds = RectF::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(
            GradientDirection::ToRight.linear_endpoints(bounds),
            ((10.0, 20.0), (110.0, 20.0))
        );
        assert_eq!(
            GradientDirection::ToTopRight.linear_endpoints(bounds),
            ((10.0, 70.0), (110.0, 20.0))
        );
        assert_eq!(
            GradientDirection::Diagonal.linear_endpoints(bounds),
            ((10.0, 20.0), (110.0, 70.0))
        );
    }

    #[test]
    fn gradient_css() {
        let gradient = Gradient::new(
            Color::rgb(0x4e, 0xcd, 0xc4),
            Color::rgb(0x45, 0xb7, 0xd1),
            GradientDirection::ToRight,
        );
        assert_eq!(
            gradient.to_css(),
            "linear-gradient(to right, #4ecdc4, #45b7d1)"
        );
    }

    #[test]
    fn opacity_scales_alpha() {
        let color = Color::rgb(10, 20, 30).to_skia(0.5);
        assert!((color.alpha() - 0.5).abs() < 1e-3);
    }
}
