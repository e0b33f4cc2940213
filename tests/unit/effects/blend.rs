use super::*;

fn pair() -> (PixelBuffer, PixelBuffer) {
    let mut a = PixelBuffer::filled(4, 3, &[0, 0, 0, 255]).unwrap();
    let mut b = PixelBuffer::filled(4, 3, &[0, 0, 0, 128]).unwrap();
    for y in 0..3 {
        for x in 0..4 {
            let k = (x * 3 + y) as u8;
            a.set_pixel(x, y, &[k * 20, 255 - k * 15, 90, 255]).unwrap();
            b.set_pixel(x, y, &[200 - k * 10, k * 12, 180, 128]).unwrap();
        }
    }
    (a, b)
}

#[test]
fn screen_white_black_is_white_and_multiply_is_black() {
    let white = PixelBuffer::filled(3, 3, &[255, 255, 255]).unwrap();
    let black = PixelBuffer::filled(3, 3, &[0, 0, 0]).unwrap();
    let screen = blend_bitmaps(&white, &black, &BlendMode::Screen, None, false).unwrap();
    assert_eq!(screen, white);
    let multiply = blend_bitmaps(&white, &black, &BlendMode::Multiply, None, false).unwrap();
    assert_eq!(multiply, black);
}

#[test]
fn commutative_modes_are_symmetric() {
    let (a, b) = pair();
    for mode in [
        BlendMode::Add,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::Difference,
        BlendMode::Multiply,
    ] {
        let ab = blend_bitmaps(&a, &b, &mode, None, true).unwrap();
        let ba = blend_bitmaps(&b, &a, &mode, None, true).unwrap();
        assert_eq!(ab, ba, "{mode} should be commutative");
    }
}

#[test]
fn subtract_and_divide_are_not_symmetric() {
    let (a, b) = pair();
    for mode in [BlendMode::Subtract, BlendMode::Divide] {
        let ab = blend_bitmaps(&a, &b, &mode, None, false).unwrap();
        let ba = blend_bitmaps(&b, &a, &mode, None, false).unwrap();
        assert_ne!(ab, ba, "{mode} should not be commutative");
    }
}

#[test]
fn divide_and_remainder_guard_degenerate_divisors() {
    for mode in [BlendMode::Divide, BlendMode::Remainder] {
        assert_eq!(mode.eval(0.4, 1.0), 0.4);
        assert_eq!(mode.eval(0.4, 0.0), 0.4);
    }
    assert!((BlendMode::Divide.eval(0.25, 0.5) - 0.5).abs() < 1e-6);
    assert!((BlendMode::Remainder.eval(0.75, 0.5) - 0.25).abs() < 1e-6);
}

#[test]
fn piecewise_modes_follow_their_key_operand() {
    assert!((BlendMode::Overlay.eval(0.25, 0.5) - 0.25).abs() < 1e-6);
    assert!((BlendMode::Overlay.eval(0.75, 0.5) - 0.75).abs() < 1e-6);
    // Hard light keys on the reference value.
    assert!((BlendMode::HardLight.eval(0.75, 0.25) - 0.375).abs() < 1e-6);
    assert!((BlendMode::HardLight.eval(0.25, 0.75) - 0.625).abs() < 1e-6);
    assert!((BlendMode::SoftLight.eval(0.5, 0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn alpha_is_copied_unless_requested() {
    let (a, b) = pair();
    let kept = blend_bitmaps(&a, &b, &BlendMode::Normal, None, false).unwrap();
    assert_eq!(kept.pixel(2, 2).unwrap()[3], 255);
    let mixed = blend_bitmaps(&a, &b, &BlendMode::Normal, None, true).unwrap();
    assert_eq!(mixed.pixel(2, 2).unwrap()[3], 128);
}

#[test]
fn mismatched_inputs_fail_fast() {
    let a = PixelBuffer::filled(4, 3, &[0, 0, 0]).unwrap();
    let b = PixelBuffer::filled(3, 4, &[0, 0, 0]).unwrap();
    let c = PixelBuffer::filled(4, 3, &[0, 0, 0, 0]).unwrap();
    for other in [&b, &c] {
        assert!(matches!(
            blend_bitmaps(&a, other, &BlendMode::Add, None, false),
            Err(LookError::DimensionMismatch(_))
        ));
    }
}

#[test]
fn range_limits_bitmap_blend() {
    let (a, b) = pair();
    let r = Range::new(1, 1, 2, 1);
    let out = blend_bitmaps(&a, &b, &BlendMode::Difference, Some(r), true).unwrap();
    for y in 0..3 {
        for x in 0..4 {
            if !r.contains(x, y) {
                assert_eq!(out.pixel(x, y), a.pixel(x, y));
            }
        }
    }
    assert_ne!(out.pixel(1, 1), a.pixel(1, 1));
}

#[test]
fn color_blend_uses_constant_reference() {
    let src = PixelBuffer::filled(2, 2, &[100, 100, 100, 255]).unwrap();
    let red = ReferenceColor::from_rgba8(255, 0, 0, 255);
    let out = blend_color(&src, &BlendMode::Lighten, red, None, false).unwrap();
    assert_eq!(out.pixel(0, 0), Some(&[100u8, 100, 255, 255][..]));
}

#[test]
fn custom_functions_see_coordinates() {
    let src = PixelBuffer::filled(3, 1, &[0, 0, 0]).unwrap();
    let f = BlendFn::custom(|_: f32, _: f32, ctx: BlendCtx| ctx.x as f32 * 0.5);
    let out = blend_color(&src, &f, ReferenceColor::from_rgba8(0, 0, 0, 255), None, false)
        .unwrap();
    assert_eq!(out.pixel(0, 0), Some(&[0u8, 0, 0][..]));
    assert_eq!(out.pixel(1, 0), Some(&[128u8, 128, 128][..]));
    assert_eq!(out.pixel(2, 0), Some(&[255u8, 255, 255][..]));
}

#[test]
fn reference_color_is_validated_and_parsed() {
    let c = ReferenceColor::parse_hex("#ff8000").unwrap();
    assert_eq!(c.r, 1.0);
    assert_eq!(c.b, 0.0);
    assert_eq!(c.a, 1.0);
    assert!(ReferenceColor::parse_hex("#ff80").is_err());
    let bad = ReferenceColor {
        b: 2.0,
        g: 0.0,
        r: 0.0,
        a: 1.0,
    };
    let src = PixelBuffer::filled(1, 1, &[0, 0, 0]).unwrap();
    assert!(blend_color(&src, &BlendMode::Add, bad, None, false).is_err());
}

#[test]
fn mode_names_parse_with_aliases() {
    for m in BlendMode::ALL {
        assert_eq!(m.name().parse::<BlendMode>().unwrap(), m);
    }
    assert_eq!("Hard-Light".parse::<BlendMode>().unwrap(), BlendMode::HardLight);
    assert_eq!("softlight".parse::<BlendMode>().unwrap(), BlendMode::SoftLight);
    assert!("glow".parse::<BlendMode>().is_err());
}

#[test]
fn custom_blend_fn_refuses_serialization() {
    let f = BlendFn::custom(|a: f32, _: f32, _: BlendCtx| a);
    assert!(serde_json::to_string(&f).is_err());
    let m: BlendFn = serde_json::from_str("\"screen\"").unwrap();
    assert!(matches!(m, BlendFn::Mode(BlendMode::Screen)));
}
