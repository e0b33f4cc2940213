//! Stock color matrices.
//!
//! Rows are written in B, G, R output order with weights over (B, G, R) and a
//! bias in `[0, 1]` units (scaled by 255 at apply time).

use crate::effects::color_matrix::{ColorMatrix, LUMA_BGR};

/// Luminance-weighted grayscale.
pub fn grayscale() -> ColorMatrix {
    ColorMatrix::grayscale()
}

/// Warm brown monochrome.
pub fn sepia() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [0.131, 0.534, 0.272, 0.0],
        [0.168, 0.686, 0.349, 0.0],
        [0.189, 0.769, 0.393, 0.0],
    )
}

/// `255 - v` on every color channel.
pub fn invert() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [-1.0, 0.0, 0.0, 1.0],
        [0.0, -1.0, 0.0, 1.0],
        [0.0, 0.0, -1.0, 1.0],
    )
}

/// Instant-film color shift.
pub fn polaroid() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [1.483, -0.016, -0.016, 0.0],
        [-0.122, 1.378, -0.122, 0.0],
        [-0.062, -0.062, 1.438, 0.0],
    )
}

/// Saturated slide-film emulation.
pub fn kodachrome() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [1.6015, -0.5603, -0.1679, 0.1397],
        [-0.0550, 1.0835, -0.1640, 0.0970],
        [-0.0399, -0.3967, 1.1286, 0.2499],
    )
}

/// Three-strip film emulation.
pub fn technicolor() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [1.8476, -0.7502, -0.2311, 0.1214],
        [-0.1060, 1.7659, -0.3088, -0.2759],
        [-0.0916, -0.8545, 1.9125, 0.0462],
    )
}

/// Faded, low-contrast print.
pub fn vintage() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [0.5242, -0.0851, 0.0466, 0.0202],
        [0.0326, 0.6441, 0.0258, 0.0293],
        [-0.0397, 0.3202, 0.6279, 0.0378],
    )
}

/// Blue push, red pull.
pub fn cool() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [1.1, 0.0, 0.0, 0.04],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.9, 0.0],
    )
}

/// Red push, blue pull.
pub fn warm() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [0.9, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.1, 0.04],
    )
}

/// Crushed blues, lifted greens and reds.
pub fn cross_process() -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [0.7, 0.0, 0.0, 0.1],
        [0.0, 1.1, 0.0, -0.03],
        [0.0, 0.1, 1.15, -0.05],
    )
}

/// Add `delta` (in `[0, 1]` units) to every color channel.
pub fn brightness(delta: f32) -> ColorMatrix {
    ColorMatrix::from_bgr_rows(
        [1.0, 0.0, 0.0, delta],
        [0.0, 1.0, 0.0, delta],
        [0.0, 0.0, 1.0, delta],
    )
}

/// Scale distances from mid-gray by `c`.
pub fn contrast(c: f32) -> ColorMatrix {
    let bias = 0.5 * (1.0 - c);
    ColorMatrix::from_bgr_rows(
        [c, 0.0, 0.0, bias],
        [0.0, c, 0.0, bias],
        [0.0, 0.0, c, bias],
    )
}

/// Interpolate between grayscale (`s == 0`) and the input (`s == 1`); values
/// above 1 oversaturate.
pub fn saturation(s: f32) -> ColorMatrix {
    let row = |o: usize| {
        let mut w = [0.0f32; 4];
        for (i, l) in LUMA_BGR.iter().enumerate() {
            w[i] = (1.0 - s) * l + if i == o { s } else { 0.0 };
        }
        w
    };
    ColorMatrix::from_bgr_rows(row(0), row(1), row(2))
}

#[cfg(test)]
#[path = "../../tests/unit/presets/matrices.rs"]
mod tests;
