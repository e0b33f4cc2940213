use super::*;
use crate::effects::convolution::Kernel;

fn inst(kind: &str, params: serde_json::Value) -> EffectInstance {
    EffectInstance {
        kind: kind.to_string(),
        params,
    }
}

fn sample() -> PixelBuffer {
    let mut buf = PixelBuffer::filled(4, 4, &[10, 20, 30, 255]).unwrap();
    buf.set_pixel(1, 2, &[200, 150, 100, 255]).unwrap();
    buf
}

#[test]
fn parse_color_matrix() {
    let e = parse_effect(&inst(
        "color-matrix",
        serde_json::json!({ "matrix": Vec::<Vec<f32>>::from(ColorMatrix::grayscale()) }),
    ))
    .unwrap();
    assert_eq!(e.kind(), "color_matrix");
}

#[test]
fn parse_convolution_rejects_even_kernels() {
    let err = parse_effect(&inst(
        "convolution",
        serde_json::json!({ "kernel": [[1, 1], [1, 1]] }),
    ))
    .unwrap_err();
    assert!(matches!(err, LookError::Serde(_)));
}

#[test]
fn parse_dual_convolution_checks_pair() {
    let err = parse_effect(&inst(
        "gradient",
        serde_json::json!({
            "horizontal": [[1]],
            "vertical": [[0, 0, 0], [0, 1, 0], [0, 0, 0]],
        }),
    ))
    .unwrap_err();
    assert!(matches!(err, LookError::InvalidMatrixShape(_)));
}

#[test]
fn parse_color_blend_with_hex_color() {
    let e = parse_effect(&inst(
        "color_blend",
        serde_json::json!({ "mode": "multiply", "color": "#000000", "use_alpha": true }),
    ))
    .unwrap();
    let out = e.apply(&sample()).unwrap();
    assert_eq!(out.pixel(0, 0), Some(&[0u8, 0, 0, 255][..]));
}

#[test]
fn parse_geometric_variants() {
    for params in [
        serde_json::json!({ "flip": "h" }),
        serde_json::json!({ "rotate_deg": 90 }),
        serde_json::json!({ "zoom": 1.5 }),
        serde_json::json!({ "matrix": [[1, 0], [0, 1]] }),
    ] {
        assert_eq!(parse_effect(&inst("geometric", params)).unwrap().kind(), "geometric");
    }
    assert!(parse_effect(&inst("geometric", serde_json::json!({}))).is_err());
}

#[test]
fn parse_rejects_unknown_and_empty_kinds() {
    assert!(matches!(
        parse_effect(&inst("", serde_json::Value::Null)),
        Err(LookError::Validation(_))
    ));
    assert!(matches!(
        parse_effect(&inst("sparkle", serde_json::Value::Null)),
        Err(LookError::Validation(_))
    ));
    assert!(parse_effect(&inst("bitmap_blend", serde_json::Value::Null)).is_err());
    assert!(is_engine_kind("HSL"));
    assert!(!is_engine_kind("sepia"));
}

#[test]
fn every_variant_keeps_pixels_outside_range() {
    let src = sample();
    let r = Some(Range::new(1, 1, 2, 2));
    let overlay = PixelBuffer::filled(4, 4, &[255, 0, 128, 0]).unwrap();
    let effects = vec![
        Effect::color_matrix(ColorMatrix::grayscale()),
        Effect::convolution(Convolution::new(Kernel::uniform(3, 0.2).unwrap())),
        Effect::dual_convolution(
            DualConvolution::from_horizontal(
                Kernel::from_array([[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]])
                    .unwrap(),
            )
            .unwrap(),
        ),
        Effect::bitmap_blend(overlay, BlendMode::Difference).with_alpha(),
        Effect::color_blend(ReferenceColor::from_rgba8(9, 9, 9, 9), BlendMode::Screen),
        Effect::geometric(Geometric::rotate(90.0)),
        Effect::hsl(HslOp::Tint { angle_deg: 45.0 }),
    ];
    for e in effects {
        let e = e.with_range(r);
        assert_eq!(e.range(), r);
        let out = e.apply(&src).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                if !Range::new(1, 1, 2, 2).contains(x, y) {
                    assert_eq!(out.pixel(x, y), src.pixel(x, y), "{} at ({x},{y})", e.kind());
                }
            }
        }
    }
}

#[test]
fn bitmap_blend_checks_layout() {
    let e = Effect::bitmap_blend(PixelBuffer::filled(2, 2, &[0, 0, 0, 0]).unwrap(), BlendMode::Add);
    assert!(matches!(
        e.apply(&sample()),
        Err(LookError::DimensionMismatch(_))
    ));
}
