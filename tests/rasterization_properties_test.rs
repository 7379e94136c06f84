//! Rasterization properties checked against the public API.
//!
//! Each test states one property of the primitives or the resampler that
//! could be refuted by a single counterexample.
//!
//! Run: cargo test --test rasterization_properties_test

#![allow(clippy::unwrap_used, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use proptest::prelude::*;
use softgfx::fixed::Fixed;
use softgfx::prelude::*;
use softgfx::render::{evaluate_bezier, fast_pixel_rgba};

const SENTINEL: Rgba = Rgba::new(0x12, 0x34, 0x56, 0x78);

fn canvas(width: u32, height: u32) -> Surface {
    Surface::new(width, height, PixelFormat::rgba8888()).unwrap()
}

fn lit(s: &Surface) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..s.height() as i32 {
        for x in 0..s.width() as i32 {
            if s.get_pixel(x, y) != Some(0) {
                out.push((x, y));
            }
        }
    }
    out
}

// ============================================================================
// Lines and spans
// ============================================================================

#[test]
fn claim_01_degenerate_line_is_one_pixel() {
    let mut s = canvas(16, 16);
    line(&mut s, 7, 9, 7, 9, Rgba::GREEN).unwrap();
    assert_eq!(lit(&s), vec![(7, 9)]);
    assert_eq!(s.get_rgba(7, 9), Some(Rgba::GREEN));
}

#[test]
fn claim_02_hline_is_order_independent() {
    let mut forward = canvas(16, 16);
    let mut reversed = canvas(16, 16);
    hline(&mut forward, 2, 10, 5, Rgba::WHITE).unwrap();
    hline(&mut reversed, 10, 2, 5, Rgba::WHITE).unwrap();
    assert_eq!(forward.pixels(), reversed.pixels());
    assert_eq!(lit(&forward), (2..=10).map(|x| (x, 5)).collect::<Vec<_>>());

    let mut single = canvas(16, 16);
    hline(&mut single, 5, 5, 5, Rgba::WHITE).unwrap();
    assert_eq!(lit(&single), vec![(5, 5)]);
}

#[test]
fn claim_03_axis_aligned_aaline_equals_line() {
    for (x1, y1, x2, y2) in [(2, 4, 13, 4), (13, 4, 2, 4), (6, 1, 6, 14), (6, 14, 6, 1)] {
        let mut aa = canvas(16, 16);
        let mut plain = canvas(16, 16);
        aaline(&mut aa, x1, y1, x2, y2, Rgba::WHITE).unwrap();
        line(&mut plain, x1, y1, x2, y2, Rgba::WHITE).unwrap();
        assert_eq!(aa.pixels(), plain.pixels(), "({x1},{y1})-({x2},{y2})");
    }
}

#[test]
fn claim_04_blend_truncates() {
    let mut s = Surface::new(1, 1, PixelFormat::xrgb8888()).unwrap();
    s.clear(Rgba::BLACK);
    pixel(&mut s, 0, 0, Rgba::new(255, 0, 0, 128)).unwrap();
    assert_eq!(s.get_rgba(0, 0), Some(Rgba::rgb(127, 0, 0)));
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn claim_05_filled_circle_radius_zero_is_center() {
    let mut s = canvas(9, 9);
    filled_circle(&mut s, 4, 4, 0, Rgba::RED).unwrap();
    assert_eq!(lit(&s), vec![(4, 4)]);
}

#[test]
fn claim_06_rectangle_polygon_equals_box() {
    let mut poly = canvas(16, 16);
    let mut boxed = canvas(16, 16);
    let square = [Point::new(0, 0), Point::new(10, 0), Point::new(10, 10), Point::new(0, 10)];
    filled_polygon(&mut poly, &square, Rgba::BLUE).unwrap();
    fill_rect(&mut boxed, 0, 0, 10, 10, Rgba::BLUE).unwrap();
    assert_eq!(poly.pixels(), boxed.pixels());
    assert_eq!(lit(&poly).len(), 121);
}

#[test]
fn claim_07_bezier_evaluation_hits_endpoints() {
    let xs: Vec<Fixed> = [12, -3, 40, 7, 25].into_iter().map(Fixed::from_int).collect();
    assert_eq!(evaluate_bezier(&xs, Fixed::ZERO), Fixed::from_int(12));
    assert_eq!(evaluate_bezier(&xs, Fixed::from_int(5)), Fixed::from_int(25));
}

#[test]
fn claim_08_negative_radius_rejected_without_drawing() {
    let mut s = canvas(8, 8);
    assert!(matches!(circle(&mut s, 4, 4, -1, Rgba::WHITE), Err(Error::InvalidArgument(_))));
    assert!(matches!(filled_ellipse(&mut s, 4, 4, 2, -3, Rgba::WHITE), Err(Error::InvalidArgument(_))));
    assert!(matches!(polygon(&mut s, &[Point::new(0, 0), Point::new(3, 3)], Rgba::WHITE), Err(Error::InvalidArgument(_))));
    assert!(lit(&s).is_empty());
}

#[test]
fn claim_09_empty_clip_draws_nothing() {
    let mut s = canvas(8, 8);
    s.set_clip_rect(Some(Rect::new(20, 20, 4, 4)));
    filled_circle(&mut s, 4, 4, 3, Rgba::WHITE).unwrap();
    line(&mut s, 0, 0, 7, 7, Rgba::WHITE).unwrap();
    fill_rect(&mut s, 0, 0, 7, 7, Rgba::WHITE).unwrap();
    DrawContext::new().string(&mut s, 0, 0, "x", Rgba::WHITE).unwrap();
    assert!(lit(&s).is_empty());
}

// ============================================================================
// Resampler
// ============================================================================

#[test]
fn claim_10_bilinear_identity_zoom() {
    let mut src = canvas(9, 6);
    for y in 0..6 {
        for x in 0..9 {
            fast_pixel_rgba(&mut src, x, y, Rgba::new((x * 28) as u8, (y * 40) as u8, 200, 255 - x as u8)).unwrap();
        }
    }
    let dst = zoom_surface(&mut src, 1.0, 1.0, Filter::Bilinear).unwrap();
    assert_eq!((dst.width(), dst.height()), (9, 6));
    assert_eq!(dst.to_rgba8(), src.to_rgba8());
}

#[test]
fn claim_11_checkerboard_downscale() {
    // 16.16 step is 2.0, so destination (x, y) samples source (2x, 2y): always a white square
    let mut src = Surface::new(4, 4, PixelFormat::xrgb8888()).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            let color = if (x + y) % 2 == 0 { Rgba::WHITE } else { Rgba::BLACK };
            pixel(&mut src, x, y, color).unwrap();
        }
    }
    let dst = zoom_surface(&mut src, 0.5, 0.5, Filter::Nearest).unwrap();
    assert_eq!((dst.width(), dst.height()), (2, 2));
    assert_eq!(dst.to_rgba8(), [255u8; 16].to_vec());
}

#[test]
fn claim_12_zero_angle_rotozoom_is_zoom() {
    let mut src = canvas(5, 7);
    filled_circle(&mut src, 2, 3, 2, Rgba::RED).unwrap();
    let rotated = rotozoom_surface(&mut src, 0.0, 1.7, Filter::Bilinear).unwrap();
    let zoomed = zoom_surface(&mut src, 1.7, 1.7, Filter::Bilinear).unwrap();
    assert_eq!(rotated.to_rgba8(), zoomed.to_rgba8());
}

// ============================================================================
// Clip safety
// ============================================================================

fn clip_box() -> Rect {
    Rect::new(8, 6, 16, 12)
}

fn outside_unchanged(s: &Surface) -> bool {
    let clip = s.clip_rect();
    (0..s.height() as i32).all(|y| {
        (0..s.width() as i32).all(|x| clip.contains(x, y) || s.get_rgba(x, y) == Some(SENTINEL))
    })
}

fn sentinel_canvas() -> Surface {
    let mut s = canvas(32, 24);
    s.clear(SENTINEL);
    s.set_clip_rect(Some(clip_box()));
    s
}

fn coord() -> impl Strategy<Value = i32> {
    prop_oneof![-40i32..72, -20_000i32..20_000]
}

fn radius() -> impl Strategy<Value = i32> {
    prop_oneof![3 => 0i32..3000, 1 => 0i32..=10_000_000]
}

// pie vertex count grows linearly with the radius
fn pie_radius() -> impl Strategy<Value = i32> {
    prop_oneof![3 => 0i32..3000, 1 => 0i32..=200_000]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lines_stay_in_clip(x1 in coord(), y1 in coord(), x2 in coord(), y2 in coord(), a in 1u8..=255) {
        let color = Rgba::new(200, 10, 90, a);
        let mut s = sentinel_canvas();
        line(&mut s, x1, y1, x2, y2, color).unwrap();
        aaline(&mut s, x1, y1, x2, y2, color).unwrap();
        hline(&mut s, x1, x2, y1, color).unwrap();
        vline(&mut s, x1, y1, y2, color).unwrap();
        rectangle(&mut s, x1, y1, x2, y2, color).unwrap();
        fill_rect(&mut s, x1, y1, x2, y2, color).unwrap();
        prop_assert!(outside_unchanged(&s));
    }

    #[test]
    fn prop_curves_stay_in_clip(x in coord(), y in coord(), rx in radius(), ry in radius(), pr in pie_radius(), a in 1u8..=255) {
        let color = Rgba::new(10, 220, 40, a);
        let mut s = sentinel_canvas();
        circle(&mut s, x, y, rx, color).unwrap();
        aacircle(&mut s, x, y, rx, color).unwrap();
        filled_circle(&mut s, x, y, rx, color).unwrap();
        ellipse(&mut s, x, y, rx, ry, color).unwrap();
        aaellipse(&mut s, x, y, rx, ry, color).unwrap();
        filled_ellipse(&mut s, x, y, rx, ry, color).unwrap();
        pie(&mut s, x, y, pr, ry % 720, rx % 360, color).unwrap();
        filled_pie(&mut s, x, y, pr, ry % 720, rx % 360, color).unwrap();
        arc(&mut s, x, y, pr, rx % 360, ry % 360, color).unwrap();
        prop_assert!(outside_unchanged(&s));
    }

    #[test]
    fn prop_polygons_stay_in_clip(
        points in prop::collection::vec((coord(), coord()), 3..64),
        steps in 2u32..6,
        a in 1u8..=255,
    ) {
        let color = Rgba::new(90, 90, 250, a);
        let points: Vec<Point> = points.into_iter().map(Point::from).collect();
        let mut s = sentinel_canvas();
        polygon(&mut s, &points, color).unwrap();
        aapolygon(&mut s, &points, color).unwrap();
        filled_polygon(&mut s, &points, color).unwrap();
        trigon(&mut s, points[0], points[1], points[2], color).unwrap();
        filled_trigon(&mut s, points[0], points[1], points[2], color).unwrap();
        bezier(&mut s, &points, steps, color).unwrap();
        prop_assert!(outside_unchanged(&s));
    }

    #[test]
    fn prop_bezier_stays_in_hull(values in prop::collection::vec(-20_000i32..20_000, 1..64), t in 0.0f64..=1.0) {
        let data: Vec<Fixed> = values.iter().copied().map(Fixed::from_int).collect();
        let (lo, hi) = (*values.iter().min().unwrap(), *values.iter().max().unwrap());
        let v = evaluate_bezier(&data, Fixed::from_f64(t * values.len() as f64));
        prop_assert!((lo..=hi).contains(&v.round()), "{v} outside [{lo}, {hi}]");
        prop_assert!(v.to_f64() > f64::from(lo) - 1e-3 && v.to_f64() < f64::from(hi) + 1e-3);
    }

    #[test]
    fn prop_text_stays_in_clip(x in -40i32..40, y in -40i32..40, text in "[ -~]{0,6}") {
        let mut s = sentinel_canvas();
        DrawContext::new().string(&mut s, x, y, &text, Rgba::WHITE).unwrap();
        prop_assert!(outside_unchanged(&s));
    }
}
