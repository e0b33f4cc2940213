//! Dual-kernel gradient engine used for edge detection and normal maps.

use crate::{
    buffer::{
        pixel::{ALPHA, BLUE, GREEN, PixelBuffer, RED},
        range::Range,
    },
    effects::{
        color_matrix::LUMA_BGR,
        convolution::{EdgeMode, Kernel, prepass},
    },
    foundation::{
        error::{LookError, LookResult},
        math::clamp_u8,
    },
};

/// 4-channel affine transform applied to combined gradient responses.
///
/// Row `o` produces output channel `o` (B, G, R, A) as
/// `sum(row[n] * v[n] for n in 0..4) + row[4]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct ChannelAffine([[f32; 5]; 4]);

impl ChannelAffine {
    /// Pass-through transform.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0],
    ]);

    /// Wrap a fixed-size matrix.
    pub const fn new(rows: [[f32; 5]; 4]) -> Self {
        Self(rows)
    }

    /// Build from nested rows, failing unless the shape is exactly 4x5.
    pub fn from_rows(rows: &[Vec<f32>]) -> LookResult<Self> {
        if rows.len() != 4 || rows.iter().any(|r| r.len() != 5) {
            return Err(LookError::invalid_matrix_shape(
                "channel affine must have 4 rows of 5 columns",
            ));
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(LookError::validation(
                "channel affine contains a non-finite weight",
            ));
        }
        let mut m = [[0.0f32; 5]; 4];
        for (dst, src) in m.iter_mut().zip(rows) {
            dst.copy_from_slice(src);
        }
        Ok(Self(m))
    }

    #[inline]
    fn apply(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        for (o, row) in self.0.iter().enumerate() {
            out[o] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3] + row[4];
        }
        out
    }
}

impl TryFrom<Vec<Vec<f32>>> for ChannelAffine {
    type Error = LookError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<ChannelAffine> for Vec<Vec<f32>> {
    fn from(m: ChannelAffine) -> Self {
        m.0.iter().map(|r| r.to_vec()).collect()
    }
}

/// How horizontal and vertical responses are combined into output channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum GradientCombine {
    /// `sqrt(hx^2 + hy^2)` per channel.
    #[default]
    Magnitude,
    /// Surface normal from luminance responses: red carries `-hx`, green `-hy`,
    /// both scaled by `strength` and offset by 128; blue is the constant up axis.
    Normal {
        /// Response scale before the 128 offset.
        strength: f32,
    },
}

/// Horizontal + vertical kernel pair configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DualConvolution {
    /// Horizontal-response kernel.
    pub horizontal: Kernel,
    /// Vertical-response kernel.
    pub vertical: Kernel,
    /// Run a grayscale color matrix over the input first.
    #[serde(default)]
    pub grayscale_first: bool,
    /// Boundary policy shared by both passes.
    #[serde(default)]
    pub edge: EdgeMode,
    /// Copy source alpha instead of writing a combined alpha response.
    #[serde(default)]
    pub preserve_alpha: bool,
    /// Channel combination.
    #[serde(default)]
    pub combine: GradientCombine,
    /// Optional affine pass over the combined channels.
    #[serde(default)]
    pub post: Option<ChannelAffine>,
}

impl DualConvolution {
    /// Pair two kernels; they must share a dimension.
    pub fn new(horizontal: Kernel, vertical: Kernel) -> LookResult<Self> {
        let dual = Self {
            horizontal,
            vertical,
            grayscale_first: false,
            edge: EdgeMode::Zero,
            preserve_alpha: false,
            combine: GradientCombine::Magnitude,
            post: None,
        };
        dual.validate()?;
        Ok(dual)
    }

    /// Pair a kernel with its transpose.
    pub fn from_horizontal(horizontal: Kernel) -> LookResult<Self> {
        let n = horizontal.size();
        let rows = (0..n)
            .map(|ky| (0..n).map(|kx| horizontal.weight(ky, kx)).collect())
            .collect::<Vec<Vec<f32>>>();
        let vertical = Kernel::from_rows(&rows)?;
        Self::new(horizontal, vertical)
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

    /// Copy alpha from the source.
    pub fn preserving_alpha(mut self) -> Self {
        self.preserve_alpha = true;
        self
    }

    /// Set the channel combination.
    pub fn with_combine(mut self, combine: GradientCombine) -> Self {
        self.combine = combine;
        self
    }

    /// Attach an affine pass over the combined channels.
    pub fn with_post(mut self, post: ChannelAffine) -> Self {
        self.post = Some(post);
        self
    }

    /// Check that both kernels share a dimension.
    pub fn validate(&self) -> LookResult<()> {
        if self.horizontal.size() != self.vertical.size() {
            return Err(LookError::invalid_matrix_shape(format!(
                "gradient kernels differ in dimension: {} vs {}",
                self.horizontal.size(),
                self.vertical.size()
            )));
        }
        if let GradientCombine::Normal { strength } = self.combine
            && !strength.is_finite()
        {
            return Err(LookError::validation("normal strength must be finite"));
        }
        Ok(())
    }
}

/// Run both kernels over `buffer` and combine the responses.
#[tracing::instrument(skip(buffer, dual), fields(w = buffer.width(), h = buffer.height(), k = dual.horizontal.size()))]
pub fn convolve_gradient(
    buffer: &PixelBuffer,
    dual: &DualConvolution,
    range: Option<Range>,
) -> LookResult<PixelBuffer> {
    dual.validate()?;
    let src = prepass(buffer, dual.grayscale_first);
    let src = src.as_ref();
    let cs = buffer.channels();
    let keep_alpha = dual.preserve_alpha && buffer.has_alpha();

    Ok(buffer.map_pixels(range, |x, y, px| {
        let hx = dual.horizontal.accumulate(src, dual.edge, x, y);
        let hy = dual.vertical.accumulate(src, dual.edge, x, y);

        let mut v = match dual.combine {
            GradientCombine::Magnitude => {
                let mut m = [0.0f32; 4];
                for c in 0..cs {
                    m[c] = (hx[c] * hx[c] + hy[c] * hy[c]).sqrt();
                }
                m
            }
            GradientCombine::Normal { strength } => {
                let lx = LUMA_BGR[0] * hx[BLUE] + LUMA_BGR[1] * hx[GREEN] + LUMA_BGR[2] * hx[RED];
                let ly = LUMA_BGR[0] * hy[BLUE] + LUMA_BGR[1] * hy[GREEN] + LUMA_BGR[2] * hy[RED];
                let mut n = [0.0f32; 4];
                n[RED] = 128.0 - strength * lx;
                n[GREEN] = 128.0 - strength * ly;
                n[BLUE] = 255.0;
                n[ALPHA] = 255.0;
                n
            }
        };
        if keep_alpha {
            v[ALPHA] = f32::from(px[ALPHA]);
        }
        if let Some(post) = &dual.post {
            v = post.apply(v);
        }
        for (c, out) in px.iter_mut().enumerate() {
            if keep_alpha && c == ALPHA {
                continue;
            }
            *out = clamp_u8(v[c]);
        }
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
