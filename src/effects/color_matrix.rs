//! 5x5 color matrix engine.
//!
//! Rows 0..=2 weight the input vector `(B, G, R, A)` for the blue, green and red
//! outputs, column 4 holds per-output bias (in units of 255). Row 3 holds
//! per-output multipliers applied after the bias, and `m[4][4]` toggles the bias
//! on or off. Alpha passes through unchanged.

use crate::{
    buffer::{pixel::PixelBuffer, range::Range},
    foundation::{
        error::{LookError, LookResult},
        math::clamp_u8,
    },
};

/// Luminance weights in B, G, R order.
pub const LUMA_BGR: [f32; 3] = [0.114, 0.587, 0.299];

/// Immutable 5x5 color transform.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct ColorMatrix([[f32; 5]; 5]);

impl ColorMatrix {
    /// Unit diagonal, unit multipliers, zero bias.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [1.0, 1.0, 1.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0],
    ]);

    /// Wrap a fixed-size matrix.
    pub const fn new(rows: [[f32; 5]; 5]) -> Self {
        Self(rows)
    }

    /// Build from nested rows, failing unless the shape is exactly 5x5.
    pub fn from_rows(rows: &[Vec<f32>]) -> LookResult<Self> {
        if rows.len() != 5 {
            return Err(LookError::invalid_matrix_shape(format!(
                "color matrix has {} rows, expected 5",
                rows.len()
            )));
        }
        let mut m = [[0.0f32; 5]; 5];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != 5 {
                return Err(LookError::invalid_matrix_shape(format!(
                    "color matrix row {i} has {} columns, expected 5",
                    row.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(LookError::validation(format!(
                    "color matrix row {i} contains a non-finite weight"
                )));
            }
            m[i].copy_from_slice(row);
        }
        Ok(Self(m))
    }

    /// The same weight row for all three color outputs.
    pub fn broadcast(weights: [f32; 3]) -> Self {
        let row = [weights[0], weights[1], weights[2], 0.0, 0.0];
        let mut m = Self::IDENTITY.0;
        m[0] = row;
        m[1] = row;
        m[2] = row;
        Self(m)
    }

    /// Luminance-weighted grayscale.
    pub fn grayscale() -> Self {
        Self::broadcast(LUMA_BGR)
    }

    /// Build from three B/G/R output rows (weights over B, G, R and a bias).
    pub fn from_bgr_rows(b: [f32; 4], g: [f32; 4], r: [f32; 4]) -> Self {
        let expand = |w: [f32; 4]| [w[0], w[1], w[2], 0.0, w[3]];
        let mut m = Self::IDENTITY.0;
        m[0] = expand(b);
        m[1] = expand(g);
        m[2] = expand(r);
        Self(m)
    }

    /// Raw rows.
    pub fn rows(&self) -> &[[f32; 5]; 5] {
        &self.0
    }

    /// Transform the color channels of one pixel in place.
    #[inline]
    pub fn transform_pixel(&self, px: &mut [u8]) {
        let m = &self.0;
        let v = [
            f32::from(px[0]),
            f32::from(px[1]),
            f32::from(px[2]),
            px.get(3).map_or(1.0, |&a| f32::from(a)),
        ];
        let toggle = m[4][4];
        let mut out = [0u8; 3];
        for (o, slot) in out.iter_mut().enumerate() {
            let row = &m[o];
            let mut raw = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3];
            raw += toggle * row[4] * 255.0;
            *slot = clamp_u8(raw * m[3][o]);
        }
        px[..3].copy_from_slice(&out);
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<Vec<Vec<f32>>> for ColorMatrix {
    type Error = LookError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<ColorMatrix> for Vec<Vec<f32>> {
    fn from(m: ColorMatrix) -> Self {
        m.0.iter().map(|r| r.to_vec()).collect()
    }
}

/// Apply `matrix` to every pixel inside `range`, returning a new buffer.
#[tracing::instrument(skip(buffer, matrix), fields(w = buffer.width(), h = buffer.height()))]
pub fn apply_color_matrix(
    buffer: &PixelBuffer,
    matrix: &ColorMatrix,
    range: Option<Range>,
) -> PixelBuffer {
    buffer.map_pixels(range, |_, _, px| matrix.transform_pixel(px))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color_matrix.rs"]
mod tests;
