//! Stock convolution kernels.
//!
//! Smoothing kernels are normalized (weights sum to 1). Gradient pairs return
//! `(horizontal, vertical)` where the vertical kernel is the transpose.

use crate::effects::convolution::Kernel;

/// 3x3 mean.
pub fn box3() -> Kernel {
    Kernel::fixed([[1.0 / 9.0; 3]; 3])
}

/// 5x5 mean.
pub fn box5() -> Kernel {
    Kernel::fixed([[1.0 / 25.0; 5]; 5])
}

/// 3x3 binomial approximation of a gaussian.
pub fn gaussian3() -> Kernel {
    Kernel::fixed([[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]]).scaled(1.0 / 16.0)
}

/// 5x5 binomial approximation of a gaussian.
pub fn gaussian5() -> Kernel {
    const ROW: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
    let mut rows = [[0.0f32; 5]; 5];
    for (ky, row) in rows.iter_mut().enumerate() {
        for (kx, w) in row.iter_mut().enumerate() {
            *w = ROW[ky] * ROW[kx] / 256.0;
        }
    }
    Kernel::fixed(rows)
}

/// Center-weighted sharpen.
pub fn sharpen() -> Kernel {
    Kernel::fixed([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]])
}

/// Stronger 8-neighbor sharpen.
pub fn mean_removal() -> Kernel {
    Kernel::fixed([[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]])
}

/// Diagonal relief; sums to 1 so flat areas keep their color.
pub fn emboss() -> Kernel {
    Kernel::fixed([[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]])
}

/// 4-neighbor Laplacian; flat areas go to zero.
pub fn laplacian() -> Kernel {
    Kernel::fixed([[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]])
}

/// Horizontal edge enhancement.
pub fn edge_enhance() -> Kernel {
    Kernel::fixed([[0.0, 0.0, 0.0], [-1.0, 1.0, 0.0], [0.0, 0.0, 0.0]])
}

fn with_transpose<const N: usize>(h: [[f32; N]; N]) -> (Kernel, Kernel) {
    let mut v = [[0.0f32; N]; N];
    for (ky, row) in h.iter().enumerate() {
        for (kx, w) in row.iter().enumerate() {
            v[kx][ky] = *w;
        }
    }
    (Kernel::fixed(h), Kernel::fixed(v))
}

/// Sobel pair.
pub fn sobel() -> (Kernel, Kernel) {
    with_transpose([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]])
}

/// Prewitt pair.
pub fn prewitt() -> (Kernel, Kernel) {
    with_transpose([[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]])
}

/// Scharr pair.
pub fn scharr() -> (Kernel, Kernel) {
    with_transpose([[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]])
}

/// East and south compass kernels.
pub fn kirsch() -> (Kernel, Kernel) {
    with_transpose([[-3.0, -3.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, 5.0]])
}

#[cfg(test)]
#[path = "../../tests/unit/presets/kernels.rs"]
mod tests;
