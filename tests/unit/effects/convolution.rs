use super::*;

fn box3() -> Kernel {
    Kernel::uniform(3, 1.0 / 9.0).unwrap()
}

fn checker(w: u32, h: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::filled(w, h, &[0, 0, 0, 255]).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = if (x + y) % 2 == 0 { 200 } else { 40 };
            buf.set_pixel(x, y, &[v, v / 2, 255 - v, 255]).unwrap();
        }
    }
    buf
}

#[test]
fn kernel_shape_is_validated() {
    assert!(matches!(
        Kernel::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]),
        Err(LookError::InvalidMatrixShape(_))
    ));
    assert!(matches!(
        Kernel::from_rows(&[vec![1.0; 3], vec![1.0; 3], vec![1.0; 2]]),
        Err(LookError::InvalidMatrixShape(_))
    ));
    assert!(matches!(
        Kernel::from_rows(&[]),
        Err(LookError::InvalidMatrixShape(_))
    ));
    let k = Kernel::from_array([[0.0, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 0.0]]).unwrap();
    assert_eq!(k.radius(), 1);
    assert_eq!(k.weight(1, 1), 2.0);
    assert_eq!(k.sum(), 6.0);
}

#[test]
fn box_blur_of_uniform_gray_is_identity_with_wrap() {
    let src = PixelBuffer::filled(5, 4, &[128, 128, 128, 255]).unwrap();
    let conv = Convolution::new(box3()).with_edge(EdgeMode::Wrap);
    let out = convolve(&src, &conv, None).unwrap();
    assert_eq!(out, src);
}

#[test]
fn box_blur_of_uniform_gray_keeps_interior_with_zero_padding() {
    let src = PixelBuffer::filled(5, 5, &[128, 128, 128]).unwrap();
    let out = convolve(&src, &Convolution::new(box3()), None).unwrap();
    for y in 1..4 {
        for x in 1..4 {
            assert_eq!(out.pixel(x, y), src.pixel(x, y));
        }
    }
    // Corner sees four of nine neighbors.
    assert_eq!(out.pixel(0, 0).unwrap()[0], 57);
}

#[test]
fn wrap_reads_the_opposite_edge() {
    let mut src = PixelBuffer::filled(3, 1, &[0, 0, 0]).unwrap();
    src.set_pixel(2, 0, &[90, 90, 90]).unwrap();
    let left = Kernel::from_array([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
    let wrapped = convolve(&src, &Convolution::new(left.clone()).with_edge(EdgeMode::Wrap), None)
        .unwrap();
    assert_eq!(wrapped.pixel(0, 0).unwrap()[0], 90);
    let zeroed = convolve(&src, &Convolution::new(left), None).unwrap();
    assert_eq!(zeroed.pixel(0, 0).unwrap()[0], 0);
}

#[test]
fn scaling_kernel_and_inverse_factor_matches() {
    let src = checker(6, 5);
    let k = Kernel::from_array([[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]).unwrap();
    let base = convolve(&src, &Convolution::new(k.clone()), None).unwrap();
    for scale in [2.0f32, 3.0, 0.25] {
        let conv = Convolution::new(k.scaled(scale)).with_scale(1.0 / scale, 0.0);
        let out = convolve(&src, &conv, None).unwrap();
        for (a, b) in base.as_bytes().iter().zip(out.as_bytes()) {
            assert!((i16::from(*a) - i16::from(*b)).abs() <= 1);
        }
    }
}

#[test]
fn results_saturate_at_both_ends() {
    let src = PixelBuffer::filled(3, 3, &[100, 100, 100]).unwrap();
    let hot = Convolution::new(Kernel::uniform(1, 1.0).unwrap()).with_scale(10.0, 0.0);
    assert_eq!(convolve(&src, &hot, None).unwrap().as_bytes(), &[255; 27]);
    let cold = Convolution::new(Kernel::uniform(1, 1.0).unwrap()).with_scale(1.0, -500.0);
    assert_eq!(convolve(&src, &cold, None).unwrap().as_bytes(), &[0; 27]);
}

#[test]
fn preserve_alpha_copies_source_alpha() {
    let mut src = PixelBuffer::filled(3, 3, &[50, 50, 50, 255]).unwrap();
    src.set_pixel(1, 1, &[50, 50, 50, 10]).unwrap();
    let conv = Convolution::new(box3()).preserving_alpha();
    let out = convolve(&src, &conv, None).unwrap();
    assert_eq!(out.pixel(1, 1).unwrap()[3], 10);
    assert_eq!(out.pixel(0, 0).unwrap()[3], 255);
    let blended = convolve(&src, &Convolution::new(box3()), None).unwrap();
    assert_ne!(blended.pixel(1, 1).unwrap()[3], 10);
}

#[test]
fn grayscale_prepass_equalizes_channels() {
    let src = PixelBuffer::filled(3, 3, &[0, 0, 255]).unwrap();
    let conv = Convolution::new(Kernel::uniform(1, 1.0).unwrap()).grayscale_first();
    let out = convolve(&src, &conv, None).unwrap();
    assert_eq!(out.pixel(1, 1), Some(&[76u8, 76, 76][..]));
}

#[test]
fn range_limits_rewrites() {
    let src = checker(6, 6);
    let r = Range::new(2, 1, 3, 3);
    let out = convolve(&src, &Convolution::new(box3()), Some(r)).unwrap();
    for y in 0..6 {
        for x in 0..6 {
            if !r.contains(x, y) {
                assert_eq!(out.pixel(x, y), src.pixel(x, y));
            }
        }
    }
}

#[test]
fn non_finite_factor_is_rejected_before_work() {
    let src = PixelBuffer::filled(1, 1, &[0, 0, 0]).unwrap();
    let conv = Convolution::new(box3()).with_scale(f32::INFINITY, 0.0);
    assert!(matches!(
        convolve(&src, &conv, None),
        Err(LookError::Validation(_))
    ));
}

#[test]
fn convolution_deserializes_with_defaults() {
    let conv: Convolution =
        serde_json::from_str(r#"{"kernel":[[0,0,0],[0,1,0],[0,0,0]],"edge":"wrap"}"#).unwrap();
    assert_eq!(conv.factor, 1.0);
    assert_eq!(conv.edge, EdgeMode::Wrap);
    assert!(
        serde_json::from_str::<Convolution>(r#"{"kernel":[[1,1],[1,1]]}"#).is_err()
    );
}
