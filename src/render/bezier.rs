//! Bezier curves through a closed control polygon.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::fixed::Fixed;
use crate::geometry::Point;
use crate::surface::{try_vec, PixelBuffer, Surface};

use super::line::line;

/// Evaluate the Bezier curve with control values `data` at `t`, where `t`
/// runs from 0 to `data.len()`.
///
/// Values below the range return the first element and values at or above it
/// return the last one. Evaluation repeatedly interpolates neighboring values
/// (de Casteljau), so every intermediate is a convex combination of the
/// inputs and long control polygons keep their precision.
///
/// # Example
///
/// ```
/// use softgfx::fixed::Fixed;
/// use softgfx::render::evaluate_bezier;
///
/// let data = [Fixed::from_int(4), Fixed::from_int(9), Fixed::from_int(-2)];
/// assert_eq!(evaluate_bezier(&data, Fixed::ZERO), Fixed::from_int(4));
/// assert_eq!(evaluate_bezier(&data, Fixed::from_int(3)), Fixed::from_int(-2));
/// ```
#[must_use]
pub fn evaluate_bezier(data: &[Fixed], t: Fixed) -> Fixed {
    evaluate_with(data, t, &mut Vec::new())
}

/// [`evaluate_bezier`] with a caller-owned working buffer.
fn evaluate_with(data: &[Fixed], t: Fixed, work: &mut Vec<Fixed>) -> Fixed {
    let (Some(&first), Some(&last)) = (data.first(), data.last()) else {
        return Fixed::ZERO;
    };
    let ndata = Fixed::from_i64(data.len() as i64);
    if t < Fixed::ZERO {
        return first;
    }
    if t >= ndata {
        return last;
    }

    let mu = t / ndata;
    let nu = Fixed::ONE - mu;
    work.clear();
    work.extend_from_slice(data);
    for level in (1..data.len()).rev() {
        for i in 0..level {
            work[i] = work[i] * nu + work[i + 1] * mu;
        }
    }
    work[0]
}

/// Draw a Bezier curve through `points`, treating the control polygon as closed.
///
/// The curve is sampled `steps` times per control point, each sample is
/// rounded to the nearest pixel, and the samples are joined with straight
/// lines. The first sample is the first control point and
/// the last sample returns to it.
///
/// # Errors
///
/// Fewer than 3 points or fewer than 2 steps yields [`Error::InvalidArgument`].
pub fn bezier<B: PixelBuffer>(dst: &mut Surface<B>, points: &[Point], steps: u32, color: Rgba) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::InvalidArgument("bezier needs at least 3 control points"));
    }
    if steps < 2 {
        return Err(Error::InvalidArgument("bezier needs at least 2 steps"));
    }

    let n = points.len();
    let mut xs = try_vec(n + 1, Fixed::ZERO)?;
    let mut ys = try_vec(n + 1, Fixed::ZERO)?;
    let mut work = try_vec(n + 1, Fixed::ZERO)?;
    for (i, p) in points.iter().chain(points.first()).enumerate() {
        xs[i] = Fixed::from_int(p.x);
        ys[i] = Fixed::from_int(p.y);
    }

    let ndata = (n + 1) as i64;
    let samples = n as i64 * i64::from(steps);
    let mut sample = |i: i64| {
        let t = Fixed::ratio(i * ndata, samples).unwrap_or(Fixed::ZERO);
        (evaluate_with(&xs, t, &mut work).round(), evaluate_with(&ys, t, &mut work).round())
    };

    let (mut x1, mut y1) = sample(0);
    let mut result = Ok(());
    for i in 1..=samples {
        let (x2, y2) = sample(i);
        result = result.and(line(dst, x1, y1, x2, y2, color));
        (x1, y1) = (x2, y2);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;
    use approx::assert_relative_eq;

    fn fx(values: &[i32]) -> Vec<Fixed> {
        values.iter().copied().map(Fixed::from_int).collect()
    }

    #[test]
    fn test_evaluate_bounds() {
        let data = fx(&[3, 17, -8, 40]);
        assert_eq!(evaluate_bezier(&data, Fixed::ZERO), Fixed::from_int(3));
        assert_eq!(evaluate_bezier(&data, Fixed::from_int(-2)), Fixed::from_int(3));
        assert_eq!(evaluate_bezier(&data, Fixed::from_int(4)), Fixed::from_int(40));
        assert_eq!(evaluate_bezier(&data, Fixed::from_int(99)), Fixed::from_int(40));
        assert_eq!(evaluate_bezier(&[], Fixed::ONE), Fixed::ZERO);
    }

    #[test]
    fn test_evaluate_linear_midpoint() {
        let data = fx(&[0, 10]);
        assert_relative_eq!(evaluate_bezier(&data, Fixed::ONE).to_f64(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_quadratic() {
        // B(0.5) = 0.25 * 0 + 0.5 * 8 + 0.25 * 4
        let data = fx(&[0, 8, 4]);
        let t = Fixed::from_f64(1.5);
        assert_relative_eq!(evaluate_bezier(&data, t).to_f64(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_long_constant_polygon_keeps_value() {
        let data = vec![Fixed::from_int(100); 40];
        for i in 0..80 {
            let t = Fixed::ratio(i, 2).unwrap();
            let v = evaluate_bezier(&data, t);
            assert_relative_eq!(v.to_f64(), 100.0, epsilon = 1e-6);
            assert_eq!(v.round(), 100, "t = {t}");
        }
    }

    #[test]
    fn test_long_polygon_stays_in_hull() {
        // 40 control points on a circle of radius 50 around (100, 100)
        let angles: Vec<f64> = (0..40).map(|i| f64::from(i) * std::f64::consts::TAU / 40.0).collect();
        let xs: Vec<Fixed> = angles.iter().map(|a| Fixed::from_f64(100.0 + 50.0 * a.cos())).collect();
        let ys: Vec<Fixed> = angles.iter().map(|a| Fixed::from_f64(100.0 + 50.0 * a.sin())).collect();
        for i in 0..400 {
            let t = Fixed::ratio(i, 10).unwrap();
            let (x, y) = (evaluate_bezier(&xs, t).to_f64(), evaluate_bezier(&ys, t).to_f64());
            assert!((49.999..=150.001).contains(&x) && (49.999..=150.001).contains(&y), "({x}, {y}) at t = {t}");
        }
    }

    #[test]
    fn test_vertical_curve_stays_in_its_column() {
        let mut s = Surface::new(200, 100, PixelFormat::xrgb8888()).unwrap();
        let points = [Point::new(100, 10), Point::new(100, 50), Point::new(100, 90)];
        bezier(&mut s, &points, 10, Rgba::WHITE).unwrap();
        let mut columns = std::collections::BTreeSet::new();
        for y in 0..100 {
            for x in 0..200 {
                if s.get_pixel(x, y) != Some(0) {
                    columns.insert(x);
                }
            }
        }
        assert_eq!(columns.into_iter().collect::<Vec<_>>(), vec![100]);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut s = Surface::new(8, 8, PixelFormat::xrgb8888()).unwrap();
        let two = [Point::new(0, 0), Point::new(5, 5)];
        let three = [Point::new(0, 0), Point::new(5, 5), Point::new(7, 1)];
        assert!(matches!(bezier(&mut s, &two, 10, Rgba::WHITE), Err(Error::InvalidArgument(_))));
        assert!(matches!(bezier(&mut s, &three, 1, Rgba::WHITE), Err(Error::InvalidArgument(_))));
        assert!(s.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_curve_starts_at_first_point_and_stays_in_hull() {
        let mut s = Surface::new(40, 40, PixelFormat::xrgb8888()).unwrap();
        let points = [Point::new(5, 5), Point::new(35, 8), Point::new(30, 35), Point::new(8, 30)];
        bezier(&mut s, &points, 8, Rgba::WHITE).unwrap();
        assert_ne!(s.get_pixel(5, 5), Some(0));
        for y in 0..40 {
            for x in 0..40 {
                if s.get_pixel(x, y) != Some(0) {
                    assert!((5..=35).contains(&x) && (5..=35).contains(&y), "({x}, {y}) outside hull");
                }
            }
        }
    }
}
