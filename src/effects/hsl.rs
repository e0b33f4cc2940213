//! Hue/saturation/luminance space adjustments.

use std::f32::consts::TAU;

use crate::{
    buffer::{
        pixel::{BLUE, GREEN, PixelBuffer, RED},
        range::Range,
    },
    foundation::{
        error::{LookError, LookResult},
        math::{Q12_ONE, clamp_u8, q12_rotate, q12_sin_cos},
    },
};

/// Linear adjustment performed in HSL space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum HslOp {
    /// Rotate the chrominance vector by `angle_deg`.
    Tint {
        /// Rotation in degrees.
        angle_deg: f64,
    },
    /// Multiply saturation.
    Saturation {
        /// Saturation multiplier (0 = gray).
        factor: f32,
    },
    /// Add to luminance.
    Brightness {
        /// Luminance offset in `[-1, 1]`.
        delta: f32,
    },
    /// Multiply luminance.
    Lightness {
        /// Luminance multiplier.
        factor: f32,
    },
}

impl HslOp {
    /// Check parameters are finite.
    pub fn validate(&self) -> LookResult<()> {
        let ok = match *self {
            Self::Tint { angle_deg } => angle_deg.is_finite(),
            Self::Saturation { factor } | Self::Lightness { factor } => {
                factor.is_finite() && factor >= 0.0
            }
            Self::Brightness { delta } => delta.is_finite(),
        };
        if ok {
            Ok(())
        } else {
            Err(LookError::validation(format!("invalid HSL parameters: {self:?}")))
        }
    }
}

/// RGB (0..1) to HSL (all 0..1).
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < 1e-6 {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < 1e-6 {
        let mut h = (g - b) / d;
        if h < 0.0 {
            h += 6.0;
        }
        h / 6.0
    } else if (max - g).abs() < 1e-6 {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    (h, s, l)
}

/// HSL (all 0..1) to RGB (0..1).
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s.abs() < 1e-6 {
        return (l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Rotate the (hue, saturation) chrominance vector by a Q12 sine/cosine pair.
fn rotate_chroma(h: f32, s: f32, sin: i32, cos: i32) -> (f32, f32) {
    let one = Q12_ONE as f32;
    let (hs, hc) = (h * TAU).sin_cos();
    let a = (s * hc * one).round() as i32;
    let b = (s * hs * one).round() as i32;
    let (ra, rb) = q12_rotate(a, b, sin, cos);
    let (ra, rb) = (ra as f32 / one, rb as f32 / one);
    let s = ra.hypot(rb).min(1.0);
    let h = (rb.atan2(ra) / TAU).rem_euclid(1.0);
    (h, s)
}

/// Apply `op` to every pixel inside `range`. Alpha passes through.
#[tracing::instrument(skip(buffer), fields(w = buffer.width(), h = buffer.height()))]
pub fn apply_hsl(buffer: &PixelBuffer, op: HslOp, range: Option<Range>) -> LookResult<PixelBuffer> {
    op.validate()?;
    let (sin, cos) = match op {
        HslOp::Tint { angle_deg } => q12_sin_cos(angle_deg),
        _ => (0, Q12_ONE),
    };
    Ok(buffer.map_pixels(range, |_, _, px| {
        let (h, s, l) = rgb_to_hsl(
            f32::from(px[RED]) / 255.0,
            f32::from(px[GREEN]) / 255.0,
            f32::from(px[BLUE]) / 255.0,
        );
        let (h, s, l) = match op {
            HslOp::Tint { .. } => {
                let (h, s) = rotate_chroma(h, s, sin, cos);
                (h, s, l)
            }
            HslOp::Saturation { factor } => (h, (s * factor).clamp(0.0, 1.0), l),
            HslOp::Brightness { delta } => (h, s, (l + delta).clamp(0.0, 1.0)),
            HslOp::Lightness { factor } => (h, s, (l * factor).clamp(0.0, 1.0)),
        };
        let (r, g, b) = hsl_to_rgb(h, s, l);
        px[RED] = clamp_u8(r * 255.0);
        px[GREEN] = clamp_u8(g * 255.0);
        px[BLUE] = clamp_u8(b * 255.0);
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/hsl.rs"]
mod tests;
