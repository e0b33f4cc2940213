//! Coordinate transforms about the image center.
//!
//! Mapping is forward: each source pixel is written to where the matrix sends it.
//! Destinations that no source pixel lands on stay zero.

use kurbo::{Affine, Point};

use crate::{
    buffer::{pixel::PixelBuffer, range::Range},
    foundation::error::{LookError, LookResult},
};

/// 2x2 linear map applied to pixel coordinates relative to the image center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Geometric {
    /// Row-major `[[m00, m01], [m10, m11]]`.
    pub matrix: [[f64; 2]; 2],
}

impl Geometric {
    /// Counter-clockwise rotation in image space (y down).
    pub fn rotate(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self {
            matrix: [[c, s], [-s, c]],
        }
    }

    /// Uniform scale about the center.
    pub fn zoom(factor: f64) -> Self {
        Self {
            matrix: [[factor, 0.0], [0.0, factor]],
        }
    }

    /// Mirror left to right.
    pub fn flip_horizontal() -> Self {
        Self {
            matrix: [[-1.0, 0.0], [0.0, 1.0]],
        }
    }

    /// Mirror top to bottom.
    pub fn flip_vertical() -> Self {
        Self {
            matrix: [[1.0, 0.0], [0.0, -1.0]],
        }
    }

    /// Check every coefficient is finite.
    pub fn validate(&self) -> LookResult<()> {
        if self.matrix.iter().flatten().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(LookError::validation(
                "geometric matrix coefficients must be finite",
            ))
        }
    }

    /// Full source-to-destination transform for a `width` x `height` image.
    pub fn to_affine(&self, width: u32, height: u32) -> Affine {
        let cx = (f64::from(width) - 1.0) / 2.0;
        let cy = (f64::from(height) - 1.0) / 2.0;
        let [[m00, m01], [m10, m11]] = self.matrix;
        let linear = Affine::new([m00, m10, m01, m11, 0.0, 0.0]);
        Affine::translate((cx, cy)) * linear * Affine::translate((-cx, -cy))
    }
}

/// Forward-map in-range pixels of `buffer` through `geo`.
///
/// Pixels outside `range` are copied; in-range destinations start cleared and only
/// receive in-range source pixels.
#[tracing::instrument(skip(buffer), fields(w = buffer.width(), h = buffer.height()))]
pub fn apply_geometric(
    buffer: &PixelBuffer,
    geo: &Geometric,
    range: Option<Range>,
) -> LookResult<PixelBuffer> {
    geo.validate()?;
    let mut out = buffer.clone();
    let Some(bounds) = Range::resolve(range, buffer.width(), buffer.height()) else {
        return Ok(out);
    };
    let cs = buffer.channels();
    let zero = vec![0u8; cs];
    for y in bounds.y..bounds.bottom() {
        for x in bounds.x..bounds.right() {
            out.set_pixel(x, y, &zero)?;
        }
    }

    let affine = geo.to_affine(buffer.width(), buffer.height());
    let src = buffer.as_bytes();
    for y in bounds.y..bounds.bottom() {
        for x in bounds.x..bounds.right() {
            let p = affine * Point::new(f64::from(x), f64::from(y));
            let (dx, dy) = (p.x.round(), p.y.round());
            if dx < 0.0 || dy < 0.0 {
                continue;
            }
            let (dx, dy) = (dx as u32, dy as u32);
            if !bounds.contains(dx, dy) {
                continue;
            }
            let off = buffer.offset(x, y);
            out.set_pixel(dx, dy, &src[off..off + cs])?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/geometric.rs"]
mod tests;
