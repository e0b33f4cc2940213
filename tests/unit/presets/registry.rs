use super::*;
use crate::{
    buffer::pixel::{ALPHA, BLUE, GREEN, PixelBuffer, RED},
    compose::chain::ExecOpts,
};

fn sample() -> PixelBuffer {
    let mut buf = PixelBuffer::filled(6, 5, &[40, 90, 160, 255]).unwrap();
    for x in 0..6 {
        buf.set_pixel(x, 2, &[220, 30, 10, 255]).unwrap();
    }
    buf
}

#[test]
fn every_builtin_runs_and_keeps_dimensions() {
    let reg = Registry::builtin();
    let src = sample();
    for name in reg.names() {
        let look = reg.get(name).unwrap();
        assert_eq!(look.name, name);
        let out = look.apply(&src, &ExecOpts::default()).unwrap();
        assert_eq!(out.width(), src.width(), "{name}");
        assert_eq!(out.height(), src.height(), "{name}");
        assert_eq!(out.channels(), src.channels(), "{name}");
    }
}

#[test]
fn builtin_names_are_sorted_and_unique() {
    let reg = Registry::builtin();
    let names = reg.names().collect::<Vec<_>>();
    assert_eq!(names.len(), BUILTIN.len());
    assert!(names.windows(2).all(|w| w[0] < w[1]));
    for expected in ["sepia", "sobel", "normal-map", "lomo", "rotate-90"] {
        assert!(names.contains(&expected), "{expected}");
    }
}

#[test]
fn lookup_normalizes_names() {
    let reg = Registry::builtin();
    assert!(reg.contains("Cross_Process"));
    assert_eq!(reg.get(" NORMAL_MAP ").unwrap().name, "normal-map");
}

#[test]
fn unknown_name_is_a_validation_error() {
    let err = Registry::builtin().get("nope").unwrap_err();
    assert!(matches!(err, LookError::Validation(_)));
}

#[test]
fn register_rejects_empty_and_duplicate_names() {
    let mut reg = Registry::empty();
    reg.register("mine", Chain::new).unwrap();
    assert!(reg.register("MINE", Chain::new).is_err());
    assert!(reg.register("  ", Chain::new).is_err());
    assert_eq!(reg.names().collect::<Vec<_>>(), ["mine"]);
}

#[test]
fn gradient_presets_leave_flat_images_black() {
    let reg = Registry::builtin();
    let flat = PixelBuffer::filled(4, 4, &[90, 90, 90, 200]).unwrap();
    for name in ["sobel", "prewitt", "scharr", "kirsch"] {
        let out = reg
            .get(name)
            .unwrap()
            .apply(&flat, &ExecOpts::default())
            .unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.pixel(x, y).unwrap(), &[0, 0, 0, 200], "{name}");
            }
        }
    }
}

#[test]
fn normal_map_of_flat_image_points_up() {
    let flat = PixelBuffer::filled(5, 5, &[50, 60, 70, 255]).unwrap();
    let out = Registry::builtin()
        .get("normal-map")
        .unwrap()
        .apply(&flat, &ExecOpts::default())
        .unwrap();
    assert_eq!(out.pixel(2, 2).unwrap(), &[255, 128, 128, 255]);
}

#[test]
fn noir_is_gray() {
    let out = Registry::builtin()
        .get("noir")
        .unwrap()
        .apply(&sample(), &ExecOpts::default())
        .unwrap();
    let px = out.pixel(0, 2).unwrap();
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
}

#[test]
fn golden_hour_chains_a_matrix_with_a_color_blend() {
    let look = Registry::builtin().get("golden-hour").unwrap();
    assert_eq!(look.chain.len(), 2);

    let src = PixelBuffer::filled(3, 3, &[128, 128, 128, 200]).unwrap();
    let out = look.apply(&src, &ExecOpts::default()).unwrap();
    let px = out.pixel(1, 1).unwrap();
    assert!(px[RED] > px[GREEN] && px[GREEN] > px[BLUE], "{px:?}");
    assert_eq!(px[ALPHA], 200);

    let warm_only = Chain::new().then(Effect::color_matrix(matrices::warm()));
    let warmed = warm_only.run(&src, &ExecOpts::default()).unwrap();
    assert_ne!(out, warmed);
}
