//! Two-operand blending: bitmap with bitmap, or bitmap with a constant color.

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    buffer::{
        pixel::{ALPHA, PixelBuffer},
        range::Range,
    },
    foundation::{
        error::{LookError, LookResult},
        math::{clamp_u8, unit},
    },
};

/// Where a blend function is being evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendCtx {
    /// Channel index (B=0, G=1, R=2, A=3).
    pub channel: usize,
    /// Pixel column.
    pub x: u32,
    /// Pixel row.
    pub y: u32,
}

/// Pure per-channel mapping of two normalized operands to a result.
///
/// The result is clamped to `[0, 1]` by the engine.
pub trait BlendFunction: Send + Sync {
    /// Combine `src` (primary operand) with `reference` (second image or constant color).
    fn blend(&self, src: f32, reference: f32, ctx: BlendCtx) -> f32;
}

impl<F> BlendFunction for F
where
    F: Fn(f32, f32, BlendCtx) -> f32 + Send + Sync,
{
    fn blend(&self, src: f32, reference: f32, ctx: BlendCtx) -> f32 {
        self(src, reference, ctx)
    }
}

/// Built-in blend function catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// The reference operand.
    Normal,
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `1 - (1 - a)(1 - b)`
    Screen,
    /// `min(a, b)`
    Darken,
    /// `max(a, b)`
    Lighten,
    /// `|a - b|`
    Difference,
    /// `a / b`; returns `a` when `b` is 1 or 0.
    Divide,
    /// `a mod b`; returns `a` when `b` is 1 or 0.
    Remainder,
    /// `(a + b) / 2`
    Average,
    /// Multiply or screen keyed on the source value.
    Overlay,
    /// Multiply or screen keyed on the reference value.
    HardLight,
    /// `((1 - 2b) a + 2b) a`
    SoftLight,
}

impl BlendMode {
    /// Every built-in mode.
    pub const ALL: [Self; 14] = [
        Self::Normal,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Screen,
        Self::Darken,
        Self::Lighten,
        Self::Difference,
        Self::Divide,
        Self::Remainder,
        Self::Average,
        Self::Overlay,
        Self::HardLight,
        Self::SoftLight,
    ];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Difference => "difference",
            Self::Divide => "divide",
            Self::Remainder => "remainder",
            Self::Average => "average",
            Self::Overlay => "overlay",
            Self::HardLight => "hard_light",
            Self::SoftLight => "soft_light",
        }
    }

    /// Evaluate the mode on two normalized operands.
    #[inline]
    pub fn eval(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Normal => b,
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Screen => 1.0 - (1.0 - a) * (1.0 - b),
            Self::Darken => a.min(b),
            Self::Lighten => a.max(b),
            Self::Difference => (a - b).abs(),
            Self::Divide => {
                if b == 1.0 || b == 0.0 {
                    a
                } else {
                    a / b
                }
            }
            Self::Remainder => {
                if b == 1.0 || b == 0.0 {
                    a
                } else {
                    a % b
                }
            }
            Self::Average => (a + b) * 0.5,
            Self::Overlay => {
                if a < 0.5 {
                    b * 2.0 * a
                } else {
                    1.0 - 2.0 * (1.0 - a) * (1.0 - b)
                }
            }
            Self::HardLight => {
                if b < 0.5 {
                    b * 2.0 * a
                } else {
                    1.0 - 2.0 * (1.0 - a) * (1.0 - b)
                }
            }
            Self::SoftLight => ((1.0 - 2.0 * b) * a + 2.0 * b) * a,
        }
    }
}

impl BlendFunction for BlendMode {
    fn blend(&self, src: f32, reference: f32, _ctx: BlendCtx) -> f32 {
        self.eval(src, reference)
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = LookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let key = match key.as_str() {
            "hardlight" => "hard_light",
            "softlight" => "soft_light",
            "mod" | "modulo" => "remainder",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| LookError::validation(format!("unknown blend mode '{s}'")))
    }
}

/// Blend function held by a blend effect: a built-in mode or a user closure.
#[derive(Clone)]
pub enum BlendFn {
    /// Built-in catalogue entry.
    Mode(BlendMode),
    /// User-supplied function.
    Custom(Arc<dyn BlendFunction>),
}

impl BlendFn {
    /// Wrap a closure or any other [`BlendFunction`].
    pub fn custom(f: impl BlendFunction + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }
}

impl BlendFunction for BlendFn {
    #[inline]
    fn blend(&self, src: f32, reference: f32, ctx: BlendCtx) -> f32 {
        match self {
            Self::Mode(m) => m.eval(src, reference),
            Self::Custom(f) => f.blend(src, reference, ctx),
        }
    }
}

impl From<BlendMode> for BlendFn {
    fn from(m: BlendMode) -> Self {
        Self::Mode(m)
    }
}

impl fmt::Debug for BlendFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode(m) => f.debug_tuple("Mode").field(m).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl serde::Serialize for BlendFn {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Mode(m) => m.serialize(serializer),
            Self::Custom(_) => Err(serde::ser::Error::custom(
                "custom blend functions cannot be serialized",
            )),
        }
    }
}

impl<'de> serde::Deserialize<'de> for BlendFn {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BlendMode::deserialize(deserializer).map(Self::Mode)
    }
}

/// Constant normalized (B, G, R, A) operand for bitmap/color blends.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReferenceColor {
    /// Blue in `[0, 1]`.
    pub b: f32,
    /// Green in `[0, 1]`.
    pub g: f32,
    /// Red in `[0, 1]`.
    pub r: f32,
    /// Alpha in `[0, 1]`.
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl ReferenceColor {
    /// Build from 8-bit components.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            b: unit(b),
            g: unit(g),
            r: unit(r),
            a: unit(a),
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> LookResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(LookError::validation(format!("color '{s}' is not hex")));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| LookError::validation(format!("color '{s}': {e}")))
        };
        match hex.len() {
            6 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(LookError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            ))),
        }
    }

    /// Components in channel order.
    pub fn channels(self) -> [f32; 4] {
        [self.b, self.g, self.r, self.a]
    }

    /// Check every component is finite and within `[0, 1]`.
    pub fn validate(self) -> LookResult<()> {
        if self
            .channels()
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
        {
            Ok(())
        } else {
            Err(LookError::validation(
                "reference color components must be within [0, 1]",
            ))
        }
    }
}

#[inline]
fn blend_pixel(
    px: &mut [u8],
    other: impl Fn(usize) -> f32,
    f: &dyn BlendFunction,
    use_alpha: bool,
    x: u32,
    y: u32,
) {
    for (channel, v) in px.iter_mut().enumerate() {
        if channel == ALPHA && !use_alpha {
            continue;
        }
        let out = f.blend(unit(*v), other(channel), BlendCtx { channel, x, y });
        *v = clamp_u8(out.clamp(0.0, 1.0) * 255.0);
    }
}

/// Blend `buffer1` with `buffer2` channel by channel.
///
/// Both buffers must share width, height and channel count. Pixels outside
/// `range`, and alpha when `use_alpha` is false, are copied from `buffer1`.
#[tracing::instrument(skip(buffer1, buffer2, f), fields(w = buffer1.width(), h = buffer1.height()))]
pub fn blend_bitmaps(
    buffer1: &PixelBuffer,
    buffer2: &PixelBuffer,
    f: &dyn BlendFunction,
    range: Option<Range>,
    use_alpha: bool,
) -> LookResult<PixelBuffer> {
    buffer1.ensure_same_layout(buffer2)?;
    let other = buffer2.as_bytes();
    Ok(buffer1.map_pixels(range, |x, y, px| {
        let off = buffer2.offset(x, y);
        blend_pixel(px, |c| unit(other[off + c]), f, use_alpha, x, y);
    }))
}

/// Blend every pixel of `buffer` with a constant reference color.
#[tracing::instrument(skip(buffer, f), fields(w = buffer.width(), h = buffer.height()))]
pub fn blend_color(
    buffer: &PixelBuffer,
    f: &dyn BlendFunction,
    color: ReferenceColor,
    range: Option<Range>,
    use_alpha: bool,
) -> LookResult<PixelBuffer> {
    color.validate()?;
    let reference = color.channels();
    Ok(buffer.map_pixels(range, |x, y, px| {
        blend_pixel(px, |c| reference[c], f, use_alpha, x, y);
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
