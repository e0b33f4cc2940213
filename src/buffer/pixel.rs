use rayon::prelude::*;

use crate::{
    buffer::range::Range,
    foundation::error::{LookError, LookResult},
};

/// Channel index of blue within a pixel.
pub const BLUE: usize = 0;
/// Channel index of green within a pixel.
pub const GREEN: usize = 1;
/// Channel index of red within a pixel.
pub const RED: usize = 2;
/// Channel index of alpha within a 4-channel pixel.
pub const ALPHA: usize = 3;

/// Owned 8-bit pixel rows in fixed Blue, Green, Red, (Alpha) order.
///
/// `data.len() == stride * height` always holds; rows may carry padding past
/// `width * channels` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes, validating layout and length.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> LookResult<Self> {
        if channels < 3 {
            return Err(LookError::unsupported_pixel_depth(format!(
                "{channels} channel(s) per pixel, at least 3 required"
            )));
        }
        if channels > 4 {
            return Err(LookError::validation(format!(
                "{channels} channels per pixel, at most 4 supported"
            )));
        }
        let row = (width as usize)
            .checked_mul(channels)
            .ok_or_else(|| LookError::validation("pixel buffer row size overflow"))?;
        if stride < row {
            return Err(LookError::validation(format!(
                "stride {stride} is smaller than row size {row}"
            )));
        }
        let expected = stride
            .checked_mul(height as usize)
            .ok_or_else(|| LookError::validation("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(LookError::validation(format!(
                "pixel buffer holds {} bytes, expected stride*height = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            channels,
            data,
        })
    }

    /// Tightly packed buffer where every pixel equals `pixel` (B, G, R, [A]).
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> LookResult<Self> {
        let channels = pixel.len();
        let data = pixel.repeat((width as usize) * (height as usize));
        Self::new(width, height, width as usize * channels, channels, data)
    }

    /// Zeroed buffer with the same geometry as `self`.
    pub fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            stride: self.stride,
            channels: self.channels,
            data: vec![0; self.data.len()],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes per pixel (3 or 4).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Raw bytes, including any row padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * self.channels
    }

    /// Channel bytes of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = self.offset(x, y);
        self.data.get(off..off + self.channels)
    }

    /// Overwrite pixel `(x, y)`; extra or missing channels in `px` are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: &[u8]) -> LookResult<()> {
        if x >= self.width || y >= self.height {
            return Err(LookError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width, self.height
            )));
        }
        let off = self.offset(x, y);
        let n = self.channels.min(px.len());
        self.data[off..off + n].copy_from_slice(&px[..n]);
        Ok(())
    }

    /// True when `other` has the same width, height and channel count.
    pub fn same_layout(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    pub(crate) fn ensure_same_layout(&self, other: &Self) -> LookResult<()> {
        if self.same_layout(other) {
            return Ok(());
        }
        Err(LookError::dimension_mismatch(format!(
            "{}x{}x{} vs {}x{}x{}",
            self.width, self.height, self.channels, other.width, other.height, other.channels
        )))
    }

    /// Build a new buffer from `self`, rewriting only pixels inside `range`.
    ///
    /// Rows are processed in parallel. `f` receives the pixel coordinates and the
    /// destination channel bytes (pre-filled with the source pixel). Pixels outside
    /// `range` and row padding are copied unchanged.
    pub(crate) fn map_pixels<F>(&self, range: Option<Range>, f: F) -> Self
    where
        F: Fn(u32, u32, &mut [u8]) + Sync,
    {
        let mut out = self.clone();
        let Some(bounds) = Range::resolve(range, self.width, self.height) else {
            return out;
        };
        let cs = self.channels;
        let stride = self.stride;
        if stride == 0 {
            return out;
        }
        out.data
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as u32;
                if y < bounds.y || y >= bounds.bottom() {
                    return;
                }
                for x in bounds.x..bounds.right() {
                    let off = x as usize * cs;
                    f(x, y, &mut row[off..off + cs]);
                }
            });
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
