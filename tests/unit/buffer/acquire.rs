use super::*;
use crate::buffer::pixel::{BLUE, RED};

#[test]
fn acquire_reorders_rgb_to_bgr() {
    let img = RgbImage::from_pixel(2, 1, Rgb([200, 100, 50]));
    let buf = acquire(&img).unwrap();
    assert_eq!(buf.channels(), 3);
    let px = buf.pixel(1, 0).unwrap();
    assert_eq!(px[RED], 200);
    assert_eq!(px[BLUE], 50);
}

#[test]
fn release_round_trips_rgba() {
    let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
    let buf = acquire(&img).unwrap();
    assert_eq!(buf.pixel(0, 0), Some(&[3u8, 2, 1, 4][..]));
    let mut back = RgbaImage::new(3, 2);
    release(&mut back, buf).unwrap();
    assert_eq!(back, img);
}

#[test]
fn release_drops_row_padding() {
    let mut img = RgbImage::new(1, 2);
    let buf = PixelBuffer::new(1, 2, 4, 3, vec![1, 2, 3, 99, 4, 5, 6, 99]).unwrap();
    release(&mut img, buf).unwrap();
    assert_eq!(img.as_raw(), &vec![3, 2, 1, 6, 5, 4]);
}

#[test]
fn luma_images_are_rejected() {
    let img = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
    let err = acquire(&img).unwrap_err();
    assert!(matches!(err, LookError::UnsupportedPixelDepth(_)));
}

#[test]
fn release_rejects_channel_change_and_keeps_pixels() {
    let mut img = RgbImage::from_pixel(1, 1, Rgb([7, 8, 9]));
    let buf = PixelBuffer::filled(1, 1, &[0, 0, 0, 0]).unwrap();
    assert!(matches!(
        release(&mut img, buf),
        Err(LookError::DimensionMismatch(_))
    ));
    assert_eq!(img.get_pixel(0, 0), &Rgb([7, 8, 9]));
}

#[test]
fn process_writes_transformed_pixels_once() {
    let mut img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
    process(&mut img, |buf| Ok(buf.map_pixels(None, |_, _, px| px.fill(255)))).unwrap();
    assert_eq!(img.to_rgb8().get_pixel(1, 1), &Rgb([255, 255, 255]));
}

/// Records how often the engines write back into it.
struct Recording {
    inner: RgbImage,
    writes: usize,
}

impl ImageResource for Recording {
    fn read_pixels(&self) -> LookResult<PixelBuffer> {
        self.inner.read_pixels()
    }

    fn write_pixels(&mut self, buffer: &PixelBuffer) -> LookResult<()> {
        self.writes += 1;
        self.inner.write_pixels(buffer)
    }
}

#[test]
fn process_propagates_errors_without_writing() {
    let mut img = Recording {
        inner: RgbImage::from_pixel(2, 1, Rgb([40, 50, 60])),
        writes: 0,
    };
    let res = process(&mut img, |_| Err(LookError::validation("stop")));
    assert!(matches!(res, Err(LookError::Validation(_))));
    assert_eq!(img.writes, 0);
    assert_eq!(img.inner.get_pixel(1, 0), &Rgb([40, 50, 60]));

    // Still usable after the failed pass.
    process(&mut img, |buf| Ok(buf.map_pixels(None, |_, _, px| px.fill(1)))).unwrap();
    assert_eq!(img.writes, 1);
    assert_eq!(img.inner.get_pixel(1, 0), &Rgb([1, 1, 1]));
}

#[test]
fn process_keeps_pixels_when_release_fails() {
    let mut img = RgbImage::from_pixel(2, 2, Rgb([3, 4, 5]));
    let before = img.clone();
    let res = process(&mut img, |_| PixelBuffer::filled(2, 2, &[9, 9, 9, 9]));
    assert!(matches!(res, Err(LookError::DimensionMismatch(_))));
    assert_eq!(img, before);
}
