//! CSS-style image filters.
//!
//! [`build_filter_expression`] turns the editor's filter sliders into an
//! ordered [`FilterExpression`]. The preview emits it as a CSS `filter`
//! string; the exporter applies the same operations to pixels using the
//! Filter Effects color matrices, so both sides stay equivalent.

use std::fmt;

use image::{ImageBuffer, Rgba};
use resvg::tiny_skia::{ColorU8, Pixmap};
use serde::{Deserialize, Serialize};

use crate::geometry::Scale;

// ============================================================================
// FilterChannels
// ============================================================================

/// Raw filter slider values in CSS units.
///
/// Percentages use 100 as neutral for brightness, contrast and saturation and
/// 0 for the rest. `blur` is a radius in preview pixels, `hue_rotate` is in
/// degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FilterChannels {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub blur: f32,
    pub grayscale: f32,
    pub hue_rotate: f32,
    pub invert: f32,
    pub sepia: f32,
}

impl Default for FilterChannels {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            grayscale: 0.0,
            hue_rotate: 0.0,
            invert: 0.0,
            sepia: 0.0,
        }
    }
}

// ============================================================================
// FilterOp
// ============================================================================

/// A single filter function, in CSS units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Blur(f32),
    Grayscale(f32),
    HueRotate(f32),
    Invert(f32),
    Sepia(f32),
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brightness(v) => write!(f, "brightness({v}%)"),
            Self::Contrast(v) => write!(f, "contrast({v}%)"),
            Self::Saturate(v) => write!(f, "saturate({v}%)"),
            Self::Blur(v) => write!(f, "blur({v}px)"),
            Self::Grayscale(v) => write!(f, "grayscale({v}%)"),
            Self::HueRotate(v) => write!(f, "hue-rotate({v}deg)"),
            Self::Invert(v) => write!(f, "invert({v}%)"),
            Self::Sepia(v) => write!(f, "sepia({v}%)"),
        }
    }
}

/// Per-channel color transform on straight-alpha values in 0.0-1.0.
enum ColorTransform {
    /// `c * slope + intercept` on each of r, g, b.
    Linear { slope: f32, intercept: f32 },
    /// Row-major 3x3 matrix applied to (r, g, b).
    Matrix([f32; 9]),
}

impl FilterOp {
    fn color_transform(&self) -> Option<ColorTransform> {
        let transform = match *self {
            Self::Brightness(v) => ColorTransform::Linear {
                slope: v / 100.0,
                intercept: 0.0,
            },
            Self::Contrast(v) => {
                let a = v / 100.0;
                ColorTransform::Linear {
                    slope: a,
                    intercept: 0.5 - 0.5 * a,
                }
            }
            Self::Invert(v) => {
                let a = (v / 100.0).min(1.0);
                ColorTransform::Linear {
                    slope: 1.0 - 2.0 * a,
                    intercept: a,
                }
            }
            Self::Saturate(v) => ColorTransform::Matrix(saturate_matrix(v / 100.0)),
            Self::Grayscale(v) => {
                let a = 1.0 - (v / 100.0).min(1.0);
                ColorTransform::Matrix([
                    0.2126 + 0.7874 * a,
                    0.7152 - 0.7152 * a,
                    0.0722 - 0.0722 * a,
                    0.2126 - 0.2126 * a,
                    0.7152 + 0.2848 * a,
                    0.0722 - 0.0722 * a,
                    0.2126 - 0.2126 * a,
                    0.7152 - 0.7152 * a,
                    0.0722 + 0.9278 * a,
                ])
            }
            Self::Sepia(v) => {
                let a = 1.0 - (v / 100.0).min(1.0);
                ColorTransform::Matrix([
                    0.393 + 0.607 * a,
                    0.769 - 0.769 * a,
                    0.189 - 0.189 * a,
                    0.349 - 0.349 * a,
                    0.686 + 0.314 * a,
                    0.168 - 0.168 * a,
                    0.272 - 0.272 * a,
                    0.534 - 0.534 * a,
                    0.131 + 0.869 * a,
                ])
            }
            Self::HueRotate(deg) => ColorTransform::Matrix(hue_rotate_matrix(deg)),
            Self::Blur(_) => return None,
        };
        Some(transform)
    }
}

fn saturate_matrix(s: f32) -> [f32; 9] {
    [
        0.213 + 0.787 * s,
        0.715 - 0.715 * s,
        0.072 - 0.072 * s,
        0.213 - 0.213 * s,
        0.715 + 0.285 * s,
        0.072 - 0.072 * s,
        0.213 - 0.213 * s,
        0.715 - 0.715 * s,
        0.072 + 0.928 * s,
    ]
}

fn hue_rotate_matrix(degrees: f32) -> [f32; 9] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        0.213 + cos * 0.787 - sin * 0.213,
        0.715 - cos * 0.715 - sin * 0.715,
        0.072 - cos * 0.072 + sin * 0.928,
        0.213 - cos * 0.213 + sin * 0.143,
        0.715 + cos * 0.285 + sin * 0.140,
        0.072 - cos * 0.072 - sin * 0.283,
        0.213 - cos * 0.213 - sin * 0.787,
        0.715 - cos * 0.715 + sin * 0.715,
        0.072 + cos * 0.928 + sin * 0.072,
    ]
}

// ============================================================================
// FilterExpression
// ============================================================================

/// An ordered list of filter operations.
///
/// Operations are kept in the fixed order brightness, contrast, saturate,
/// blur, grayscale, hue-rotate, invert, sepia. Neutral operations are
/// omitted, so an empty expression is the identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterExpression {
    ops: Vec<FilterOp>,
}

/// Builds the filter expression for the given slider values.
///
/// Returns the identity when `enabled` is false. Negative amounts are treated
/// as zero and non-finite values as neutral.
pub fn build_filter_expression(enabled: bool, channels: &FilterChannels) -> FilterExpression {
    if !enabled {
        return FilterExpression::identity();
    }

    let amount = |value: f32, neutral: f32| -> Option<f32> {
        let value = if value.is_finite() { value.max(0.0) } else { neutral };
        ((value - neutral).abs() > 1e-4).then_some(value)
    };

    let mut ops = Vec::new();
    ops.extend(amount(channels.brightness, 100.0).map(FilterOp::Brightness));
    ops.extend(amount(channels.contrast, 100.0).map(FilterOp::Contrast));
    ops.extend(amount(channels.saturation, 100.0).map(FilterOp::Saturate));
    ops.extend(amount(channels.blur, 0.0).map(FilterOp::Blur));
    ops.extend(amount(channels.grayscale.min(100.0), 0.0).map(FilterOp::Grayscale));
    if channels.hue_rotate.is_finite() && channels.hue_rotate.rem_euclid(360.0).abs() > 1e-4 {
        ops.push(FilterOp::HueRotate(channels.hue_rotate));
    }
    ops.extend(amount(channels.invert.min(100.0), 0.0).map(FilterOp::Invert));
    ops.extend(amount(channels.sepia.min(100.0), 0.0).map(FilterOp::Sepia));

    FilterExpression { ops }
}

impl FilterExpression {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    /// CSS `filter` value: `none` or space-separated functions.
    pub fn to_css(&self) -> String {
        if self.ops.is_empty() {
            return "none".to_string();
        }
        self.ops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Rescales length-valued operations (blur) to a surface of another size.
    pub fn scaled(&self, scale: Scale) -> Self {
        let ops = self
            .ops
            .iter()
            .map(|op| match *op {
                FilterOp::Blur(radius) => FilterOp::Blur(scale.apply(radius)),
                other => other,
            })
            .collect();
        Self { ops }
    }

    /// Applies every operation to the pixmap in order.
    ///
    /// Color operations work on unpremultiplied values and clamp to 0..=1
    /// after each step.
    pub fn apply(&self, pixmap: &mut Pixmap) {
        for op in &self.ops {
            match (op, op.color_transform()) {
                (FilterOp::Blur(radius), _) => blur(pixmap, *radius),
                (_, Some(transform)) => apply_color_transform(pixmap, &transform),
                (_, None) => {}
            }
        }
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn apply_color_transform(pixmap: &mut Pixmap, transform: &ColorTransform) {
    for pixel in pixmap.pixels_mut() {
        if pixel.alpha() == 0 {
            continue;
        }
        let straight = pixel.demultiply();
        let rgb = [
            straight.red() as f32 / 255.0,
            straight.green() as f32 / 255.0,
            straight.blue() as f32 / 255.0,
        ];
        let out = match transform {
            ColorTransform::Linear { slope, intercept } => rgb.map(|c| c * slope + intercept),
            ColorTransform::Matrix(m) => [
                m[0] * rgb[0] + m[1] * rgb[1] + m[2] * rgb[2],
                m[3] * rgb[0] + m[4] * rgb[1] + m[5] * rgb[2],
                m[6] * rgb[0] + m[7] * rgb[1] + m[8] * rgb[2],
            ],
        };
        let [r, g, b] = out.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        *pixel = ColorU8::from_rgba(r, g, b, straight.alpha()).premultiply();
    }
}

/// Gaussian blur with standard deviation `radius`, on premultiplied data.
fn blur(pixmap: &mut Pixmap, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let (width, height) = (pixmap.width(), pixmap.height());
    let Some(buffer) =
        ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, pixmap.data().to_vec())
    else {
        return;
    };
    let blurred = image::imageops::blur(&buffer, radius);
    let data = pixmap.data_mut();
    for (dst, src) in data.chunks_exact_mut(4).zip(blurred.pixels()) {
        let [r, g, b, a] = src.0;
        // Rounding may push a channel above alpha; keep the data premultiplied.
        dst.copy_from_slice(&[r.min(a), g.min(a), b.min(a), a]);
    }
}

// ============================================================================
// Tests
// ============================================================================
