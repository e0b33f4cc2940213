//! Buffer merging and partial application.

use crate::{
    buffer::pixel::{ALPHA, PixelBuffer},
    compose::chain::Transform,
    foundation::{
        error::{LookError, LookResult},
        math::clamp_u8,
    },
};

fn check_weight(name: &str, w: f32) -> LookResult<()> {
    if !w.is_finite() || !(0.0..=1.0).contains(&w) {
        return Err(LookError::validation(format!(
            "{name} must be finite and within [0, 1], got {w}"
        )));
    }
    Ok(())
}

/// Weighted per-byte average: `w * b1 + (1 - w) * b2`.
pub fn average(buffer1: &PixelBuffer, buffer2: &PixelBuffer, w: f32) -> LookResult<PixelBuffer> {
    check_weight("average weight", w)?;
    buffer1.ensure_same_layout(buffer2)?;
    let other = buffer2.as_bytes();
    let iw = 1.0 - w;
    Ok(buffer1.map_pixels(None, |x, y, px| {
        let off = buffer2.offset(x, y);
        for (c, v) in px.iter_mut().enumerate() {
            *v = clamp_u8(w * f32::from(*v) + iw * f32::from(other[off + c]));
        }
    }))
}

/// Sum (`averaged == false`) or mean (`averaged == true`) of two buffers.
///
/// Alpha follows the same rule when `blend_alpha` is set, otherwise it is copied
/// from `buffer1`.
pub fn merge(
    buffer1: &PixelBuffer,
    buffer2: &PixelBuffer,
    blend_alpha: bool,
    averaged: bool,
) -> LookResult<PixelBuffer> {
    buffer1.ensure_same_layout(buffer2)?;
    let f = if averaged { 0.5 } else { 1.0 };
    let other = buffer2.as_bytes();
    Ok(buffer1.map_pixels(None, |x, y, px| {
        let off = buffer2.offset(x, y);
        for (c, v) in px.iter_mut().enumerate() {
            if c == ALPHA && !blend_alpha {
                continue;
            }
            *v = clamp_u8(f * f32::from(*v) + f * f32::from(other[off + c]));
        }
    }))
}

/// Apply `transform` and mix the result with the input by `amount`.
///
/// `amount == 0` reproduces the input bytes, `amount == 1` the full transform.
#[tracing::instrument(skip(buffer, transform), fields(w = buffer.width(), h = buffer.height()))]
pub fn partial_apply<T: Transform + ?Sized>(
    buffer: &PixelBuffer,
    transform: &T,
    amount: f32,
) -> LookResult<PixelBuffer> {
    check_weight("amount", amount)?;
    let transformed = transform.apply(buffer)?;
    if amount == 1.0 {
        return Ok(transformed);
    }
    if transformed.same_layout(buffer) {
        average(&transformed, buffer, amount)
    } else {
        Err(LookError::dimension_mismatch(
            "partial application needs a transform that preserves the buffer layout",
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/merge.rs"]
mod tests;
