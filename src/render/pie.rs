//! Pie slices and arcs, approximated by polygons.
//!
//! Angles are integer degrees taken modulo 360, measured clockwise from the
//! positive x axis (y grows downward). An end angle below the start angle
//! wraps through 0 degrees. The arc is sampled every `3 / radius` radians.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::fixed::{deg_to_rad, Fixed};
use crate::geometry::Point;
use crate::surface::{PixelBuffer, Surface};

use super::line::line;
use super::pixel::pixel;
use super::polygon::{filled_polygon_with, polygon};

/// Sample the arc, optionally prefixed by the center vertex.
fn arc_vertices(x: i32, y: i32, rad: i32, start: i32, end: i32, with_center: bool) -> Result<Vec<Point>> {
    let start = start % 360;
    let end = end % 360;

    let dr = Fixed::from_int(rad);
    let delta = Fixed::from_int(3) / dr;
    let start_angle = deg_to_rad(Fixed::from_int(start));
    let mut end_angle = deg_to_rad(Fixed::from_int(end));
    if start > end {
        end_angle += Fixed::TWO_PI;
    }

    let mut count = usize::from(with_center);
    let mut angle = start_angle;
    while angle <= end_angle {
        angle += delta;
        count += 1;
    }

    let mut vertices = Vec::new();
    vertices.try_reserve_exact(count).map_err(|_| {
        let bytes = count.saturating_mul(std::mem::size_of::<Point>());
        log::warn!("arc vertex allocation of {bytes} bytes failed");
        Error::Allocation { bytes }
    })?;
    if with_center {
        vertices.push(Point::new(x, y));
    }
    let mut angle = start_angle;
    while angle <= end_angle {
        vertices.push(Point::new(
            x + (dr * angle.cos()).to_int(),
            y + (dr * angle.sin()).to_int(),
        ));
        angle += delta;
    }
    Ok(vertices)
}

fn check_radius(rad: i32) -> Result<()> {
    if rad < 0 {
        return Err(Error::InvalidArgument("negative radius"));
    }
    Ok(())
}

fn culled<B: PixelBuffer>(dst: &Surface<B>, x: i32, y: i32, rad: i32) -> bool {
    let clip = dst.clip_rect();
    clip.is_empty()
        || clip.rejects_box(
            x.saturating_sub(rad),
            y.saturating_sub(rad),
            x.saturating_add(rad),
            y.saturating_add(rad),
        )
}

pub(crate) fn pie_with<B: PixelBuffer>(
    dst: &mut Surface<B>,
    center: Point,
    rad: i32,
    start: i32,
    end: i32,
    color: Rgba,
    fill_scratch: Option<&mut Vec<i64>>,
) -> Result<()> {
    check_radius(rad)?;
    let Point { x, y } = center;
    if rad == 0 {
        return pixel(dst, x, y, color);
    }
    if culled(dst, x, y, rad) {
        return Ok(());
    }

    let vertices = arc_vertices(x, y, rad, start, end, true)?;
    match vertices.as_slice() {
        [] | [_] => pixel(dst, x, y, color),
        [_, tip] => line(dst, x, y, tip.x, tip.y, color),
        _ => match fill_scratch {
            Some(scratch) => filled_polygon_with(dst, &vertices, color, scratch),
            None => polygon(dst, &vertices, color),
        },
    }
}

/// Draw the outline of a pie slice: both radii and the arc between them.
///
/// # Errors
///
/// Negative radius yields [`Error::InvalidArgument`].
pub fn pie<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, rad: i32, start: i32, end: i32, color: Rgba) -> Result<()> {
    pie_with(dst, Point::new(x, y), rad, start, end, color, None)
}

/// Fill a pie slice.
///
/// # Errors
///
/// Negative radius yields [`Error::InvalidArgument`].
pub fn filled_pie<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, rad: i32, start: i32, end: i32, color: Rgba) -> Result<()> {
    let mut scratch = Vec::new();
    pie_with(dst, Point::new(x, y), rad, start, end, color, Some(&mut scratch))
}

/// Draw an open arc without the radii.
///
/// # Errors
///
/// Negative radius yields [`Error::InvalidArgument`].
pub fn arc<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, rad: i32, start: i32, end: i32, color: Rgba) -> Result<()> {
    check_radius(rad)?;
    if rad == 0 {
        return pixel(dst, x, y, color);
    }
    if culled(dst, x, y, rad) {
        return Ok(());
    }

    let vertices = arc_vertices(x, y, rad, start, end, false)?;
    if let [only] = vertices.as_slice() {
        return pixel(dst, only.x, only.y, color);
    }
    vertices
        .windows(2)
        .fold(Ok(()), |result, w| result.and(line(dst, w[0].x, w[0].y, w[1].x, w[1].y, color)))
}
