//! Acquisition of pixel buffers from image resources and release back into them.
//!
//! Codecs own file formats; this module owns the byte layout contract. Channels are
//! reordered from the resource's native RGB(A) into the engine's B, G, R, (A) order on
//! acquisition and back again on release.

use image::{DynamicImage, ImageBuffer, Pixel, Rgb, RgbImage, Rgba, RgbaImage};

use crate::{
    buffer::pixel::PixelBuffer,
    foundation::error::{LookError, LookResult},
};

/// An image that can lend its pixels to the engines and take them back.
pub trait ImageResource {
    /// Copy the pixel bytes out into an addressable buffer.
    fn read_pixels(&self) -> LookResult<PixelBuffer>;

    /// Overwrite the resource with `buffer`'s pixels.
    fn write_pixels(&mut self, buffer: &PixelBuffer) -> LookResult<()>;
}

/// Copy `image`'s pixels into a new [`PixelBuffer`].
///
/// Fails with [`LookError::UnsupportedPixelDepth`] for layouts below 24 bits per pixel.
pub fn acquire<I: ImageResource + ?Sized>(image: &I) -> LookResult<PixelBuffer> {
    let buf = image.read_pixels()?;
    tracing::trace!(
        width = buf.width(),
        height = buf.height(),
        channels = buf.channels(),
        "acquired pixel buffer"
    );
    Ok(buf)
}

/// Write `buffer` back into `image`.
///
/// A failed write leaves `image` as it was.
pub fn release<I: ImageResource + ?Sized>(image: &mut I, buffer: PixelBuffer) -> LookResult<()> {
    image.write_pixels(&buffer)?;
    tracing::trace!(
        width = buffer.width(),
        height = buffer.height(),
        "released pixel buffer"
    );
    Ok(())
}

/// Scoped acquisition: acquire, transform, release exactly once.
///
/// When `f` fails the transformed buffer never exists and `image` keeps its
/// original pixels; the caller still owns it after the error.
pub fn process<I, F>(image: &mut I, f: F) -> LookResult<()>
where
    I: ImageResource + ?Sized,
    F: FnOnce(&PixelBuffer) -> LookResult<PixelBuffer>,
{
    let buf = acquire(&*image)?;
    let out = f(&buf)?;
    release(image, out)
}

fn read_swizzled<P>(img: &ImageBuffer<P, Vec<u8>>) -> LookResult<PixelBuffer>
where
    P: Pixel<Subpixel = u8>,
{
    let cs = usize::from(P::CHANNEL_COUNT);
    if cs < 3 {
        return Err(LookError::unsupported_pixel_depth(format!(
            "{}-bit pixels, at least 24 required",
            cs * 8
        )));
    }
    let mut data = img.as_raw().clone();
    for px in data.chunks_exact_mut(cs) {
        px.swap(0, 2);
    }
    PixelBuffer::new(img.width(), img.height(), img.width() as usize * cs, cs, data)
}

fn write_swizzled<P>(img: &mut ImageBuffer<P, Vec<u8>>, buffer: &PixelBuffer) -> LookResult<()>
where
    P: Pixel<Subpixel = u8>,
{
    let cs = usize::from(P::CHANNEL_COUNT);
    if buffer.channels() != cs {
        return Err(LookError::dimension_mismatch(format!(
            "cannot release a {}-channel buffer into a {cs}-channel image",
            buffer.channels()
        )));
    }
    let (w, h) = (buffer.width(), buffer.height());
    let row = w as usize * cs;
    let mut data = Vec::with_capacity(row * h as usize);
    for y in 0..h as usize {
        let start = y * buffer.stride();
        data.extend_from_slice(&buffer.as_bytes()[start..start + row]);
    }
    for px in data.chunks_exact_mut(cs) {
        px.swap(0, 2);
    }
    *img = ImageBuffer::from_raw(w, h, data)
        .ok_or_else(|| LookError::validation("released buffer does not fit image dimensions"))?;
    Ok(())
}

impl ImageResource for RgbImage {
    fn read_pixels(&self) -> LookResult<PixelBuffer> {
        read_swizzled::<Rgb<u8>>(self)
    }

    fn write_pixels(&mut self, buffer: &PixelBuffer) -> LookResult<()> {
        write_swizzled::<Rgb<u8>>(self, buffer)
    }
}

impl ImageResource for RgbaImage {
    fn read_pixels(&self) -> LookResult<PixelBuffer> {
        read_swizzled::<Rgba<u8>>(self)
    }

    fn write_pixels(&mut self, buffer: &PixelBuffer) -> LookResult<()> {
        write_swizzled::<Rgba<u8>>(self, buffer)
    }
}

impl ImageResource for DynamicImage {
    fn read_pixels(&self) -> LookResult<PixelBuffer> {
        match self {
            DynamicImage::ImageRgb8(img) => img.read_pixels(),
            DynamicImage::ImageRgba8(img) => img.read_pixels(),
            other => Err(LookError::unsupported_pixel_depth(format!(
                "{:?} is not an 8-bit RGB or RGBA layout",
                other.color()
            ))),
        }
    }

    fn write_pixels(&mut self, buffer: &PixelBuffer) -> LookResult<()> {
        match self {
            DynamicImage::ImageRgb8(img) => img.write_pixels(buffer),
            DynamicImage::ImageRgba8(img) => img.write_pixels(buffer),
            other => Err(LookError::unsupported_pixel_depth(format!(
                "{:?} is not an 8-bit RGB or RGBA layout",
                other.color()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/acquire.rs"]
mod tests;
