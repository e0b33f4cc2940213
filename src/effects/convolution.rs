//! Single-kernel convolution engine and the kernel type shared with the gradient engine.

use crate::{
    buffer::{
        pixel::{ALPHA, PixelBuffer},
        range::Range,
    },
    effects::color_matrix::{ColorMatrix, apply_color_matrix},
    foundation::{
        error::{LookError, LookResult},
        math::clamp_u8,
    },
};

/// How neighbor offsets that fall outside the buffer are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMode {
    /// Outside neighbors contribute nothing (implicit zero padding).
    #[default]
    Zero,
    /// Outside neighbors wrap around to the opposite edge.
    Wrap,
}

impl EdgeMode {
    #[inline]
    fn resolve(self, x: i64, y: i64, w: i64, h: i64) -> Option<(u32, u32)> {
        match self {
            Self::Zero => {
                if x < 0 || y < 0 || x >= w || y >= h {
                    None
                } else {
                    Some((x as u32, y as u32))
                }
            }
            Self::Wrap => Some((x.rem_euclid(w) as u32, y.rem_euclid(h) as u32)),
        }
    }
}

/// Square, odd-sized weight matrix with a center cell at `(r, r)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build from nested rows. The matrix must be square with odd dimension.
    pub fn from_rows(rows: &[Vec<f32>]) -> LookResult<Self> {
        let size = rows.len();
        if size == 0 || size % 2 == 0 {
            return Err(LookError::invalid_matrix_shape(format!(
                "kernel dimension {size} must be odd"
            )));
        }
        let mut weights = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(LookError::invalid_matrix_shape(format!(
                    "kernel row {i} has {} columns, expected {size}",
                    row.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(LookError::validation(format!(
                    "kernel row {i} contains a non-finite weight"
                )));
            }
            weights.extend_from_slice(row);
        }
        Ok(Self { size, weights })
    }

    /// Build from a fixed-size array; `N` must be odd.
    pub fn from_array<const N: usize>(rows: [[f32; N]; N]) -> LookResult<Self> {
        let rows = rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>();
        Self::from_rows(&rows)
    }

    /// Build from a literal array; odd `N` is enforced at compile time.
    pub fn fixed<const N: usize>(rows: [[f32; N]; N]) -> Self {
        const { assert!(N % 2 == 1, "kernel dimension must be odd") };
        Self {
            size: N,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// `size` x `size` kernel with every weight equal to `value`.
    pub fn uniform(size: usize, value: f32) -> LookResult<Self> {
        Self::from_rows(&vec![vec![value; size]; size])
    }

    /// Edge length `2r + 1`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Radius `r`.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Copy with every weight multiplied by `k`.
    pub fn scaled(&self, k: f32) -> Self {
        Self {
            size: self.size,
            weights: self.weights.iter().map(|w| w * k).collect(),
        }
    }

    /// Weighted neighbor sum for each channel of pixel `(x, y)`.
    #[inline]
    pub(crate) fn accumulate(&self, src: &PixelBuffer, edge: EdgeMode, x: u32, y: u32) -> [f32; 4] {
        let r = self.radius() as i64;
        let (w, h) = (i64::from(src.width()), i64::from(src.height()));
        let cs = src.channels();
        let bytes = src.as_bytes();
        let mut acc = [0.0f32; 4];
        for ky in 0..self.size {
            let sy = i64::from(y) + ky as i64 - r;
            for kx in 0..self.size {
                let wgt = self.weight(kx, ky);
                if wgt == 0.0 {
                    continue;
                }
                let sx = i64::from(x) + kx as i64 - r;
                let Some((sx, sy)) = edge.resolve(sx, sy, w, h) else {
                    continue;
                };
                let off = src.offset(sx, sy);
                for (c, a) in acc.iter_mut().enumerate().take(cs) {
                    *a += wgt * f32::from(bytes[off + c]);
                }
            }
        }
        acc
    }
}

impl TryFrom<Vec<Vec<f32>>> for Kernel {
    type Error = LookError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Kernel> for Vec<Vec<f32>> {
    fn from(k: Kernel) -> Self {
        k.weights.chunks(k.size).map(<[f32]>::to_vec).collect()
    }
}

/// Single-kernel convolution configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Convolution {
    /// Weight matrix.
    pub kernel: Kernel,
    /// Multiplier applied to the weighted sum.
    #[serde(default = "one")]
    pub factor: f32,
    /// Offset added after the factor.
    #[serde(default)]
    pub bias: f32,
    /// Run a grayscale color matrix over the input first.
    #[serde(default)]
    pub grayscale_first: bool,
    /// Boundary policy.
    #[serde(default)]
    pub edge: EdgeMode,
    /// Copy source alpha instead of convolving it.
    #[serde(default)]
    pub preserve_alpha: bool,
}

fn one() -> f32 {
    1.0
}

impl Convolution {
    /// Factor 1, bias 0, zero padding, alpha convolved.
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            factor: 1.0,
            bias: 0.0,
            grayscale_first: false,
            edge: EdgeMode::Zero,
            preserve_alpha: false,
        }
    }

    /// Set the factor and bias.
    pub fn with_scale(mut self, factor: f32, bias: f32) -> Self {
        self.factor = factor;
        self.bias = bias;
        self
    }

    /// Set the boundary policy.
    pub fn with_edge(mut self, edge: EdgeMode) -> Self {
        self.edge = edge;
        self
    }

    /// Enable the grayscale pre-pass.
    pub fn grayscale_first(mut self) -> Self {
        self.grayscale_first = true;
        self
    }

    /// Copy alpha from the source instead of convolving it.
    pub fn preserving_alpha(mut self) -> Self {
        self.preserve_alpha = true;
        self
    }

    /// Check scalar parameters.
    pub fn validate(&self) -> LookResult<()> {
        if !self.factor.is_finite() || !self.bias.is_finite() {
            return Err(LookError::validation(
                "convolution factor and bias must be finite",
            ));
        }
        Ok(())
    }
}

/// Grayscale copy of `buffer` when requested, otherwise a borrow.
pub(crate) fn prepass<'a>(
    buffer: &'a PixelBuffer,
    grayscale_first: bool,
) -> std::borrow::Cow<'a, PixelBuffer> {
    if grayscale_first {
        std::borrow::Cow::Owned(apply_color_matrix(buffer, &ColorMatrix::grayscale(), None))
    } else {
        std::borrow::Cow::Borrowed(buffer)
    }
}

/// Convolve `buffer` with `conv`, rewriting only pixels inside `range`.
#[tracing::instrument(skip(buffer, conv), fields(w = buffer.width(), h = buffer.height(), k = conv.kernel.size()))]
pub fn convolve(
    buffer: &PixelBuffer,
    conv: &Convolution,
    range: Option<Range>,
) -> LookResult<PixelBuffer> {
    conv.validate()?;
    let src = prepass(buffer, conv.grayscale_first);
    let src = src.as_ref();
    let keep_alpha = conv.preserve_alpha && buffer.has_alpha();
    Ok(buffer.map_pixels(range, |x, y, px| {
        let acc = conv.kernel.accumulate(src, conv.edge, x, y);
        for (c, out) in px.iter_mut().enumerate() {
            if keep_alpha && c == ALPHA {
                continue;
            }
            *out = clamp_u8(conv.factor * acc[c] + conv.bias);
        }
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/convolution.rs"]
mod tests;
