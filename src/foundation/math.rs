/// One in Q12 fixed point.
pub(crate) const Q12_ONE: i32 = 1 << 12;

/// Round and saturate a channel value into a byte.
#[inline]
pub(crate) fn clamp_u8(v: f32) -> u8 {
    // NaN saturates to 0 through the float-to-int cast.
    v.round().clamp(0.0, 255.0) as u8
}

/// Byte channel value normalized into `[0, 1]`.
#[inline]
pub(crate) fn unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Sine and cosine of `deg` degrees, scaled to Q12.
pub(crate) fn q12_sin_cos(deg: f64) -> (i32, i32) {
    let (s, c) = deg.to_radians().sin_cos();
    (
        (s * f64::from(Q12_ONE)).round() as i32,
        (c * f64::from(Q12_ONE)).round() as i32,
    )
}

/// Rotate a Q12 vector by a Q12 sine/cosine pair.
#[inline]
pub(crate) fn q12_rotate(a: i32, b: i32, sin: i32, cos: i32) -> (i32, i32) {
    let ra = (a * cos - b * sin) >> 12;
    let rb = (a * sin + b * cos) >> 12;
    (ra, rb)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
