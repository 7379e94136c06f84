//! Polygons: stroked, antialiased and scanline-filled, plus three-point trigons.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::surface::{PixelBuffer, Surface};

use super::line::{aaline_int, line};
use super::span::hline;

fn check_vertices(points: &[Point]) -> Result<()> {
    if points.len() < 3 {
        return Err(Error::InvalidArgument("polygon needs at least 3 vertices"));
    }
    Ok(())
}

/// Consecutive edges of a closed polygon, ending with last -> first.
fn edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    points.iter().copied().zip(points.iter().copied().cycle().skip(1))
}

/// Draw a closed polygon outline.
///
/// # Errors
///
/// Fewer than 3 vertices yields [`Error::InvalidArgument`]. Edge failures do
/// not stop the outline; the first one is returned.
pub fn polygon<B: PixelBuffer>(dst: &mut Surface<B>, points: &[Point], color: Rgba) -> Result<()> {
    check_vertices(points)?;
    edges(points).fold(Ok(()), |result, (a, b)| result.and(line(dst, a.x, a.y, b.x, b.y, color)))
}

/// Draw a closed antialiased polygon outline.
///
/// Edges are drawn without their final pixel, so every shared vertex is
/// covered exactly once by the start of the following edge.
pub fn aapolygon<B: PixelBuffer>(dst: &mut Surface<B>, points: &[Point], color: Rgba) -> Result<()> {
    check_vertices(points)?;
    edges(points).fold(Ok(()), |result, (a, b)| {
        result.and(aaline_int(dst, a.x, a.y, b.x, b.y, color, false))
    })
}

/// Fill a polygon with the even-odd rule, allocating the intersection buffer per call.
///
/// [`DrawContext::filled_polygon`](crate::context::DrawContext::filled_polygon)
/// reuses one buffer across calls.
pub fn filled_polygon<B: PixelBuffer>(dst: &mut Surface<B>, points: &[Point], color: Rgba) -> Result<()> {
    let mut scratch = Vec::new();
    filled_polygon_with(dst, points, color, &mut scratch)
}

/// Grow `scratch` to hold one intersection per edge. Never shrinks.
fn reserve_scratch(scratch: &mut Vec<i64>, edges: usize) -> Result<()> {
    scratch.clear();
    scratch.try_reserve(edges).map_err(|_| {
        let bytes = edges.saturating_mul(std::mem::size_of::<i64>());
        log::warn!("polygon scratch allocation of {bytes} bytes failed");
        Error::Allocation { bytes }
    })
}

/// Scanline fill. For every row from the top to the bottom vertex, each
/// non-horizontal edge contributes a 16.16 intersection when the row lies in
/// its half-open `[y1, y2)` range; the bottom row instead uses `(y1, y2]` so
/// the last row of the polygon is not lost. Sorted intersections are filled
/// pairwise, rounding `(x + 32768) >> 16`.
pub(crate) fn filled_polygon_with<B: PixelBuffer>(
    dst: &mut Surface<B>,
    points: &[Point],
    color: Rgba,
    scratch: &mut Vec<i64>,
) -> Result<()> {
    check_vertices(points)?;
    reserve_scratch(scratch, points.len())?;

    let clip = dst.clip_rect();
    if clip.is_empty() {
        return Ok(());
    }

    let miny = points.iter().map(|p| p.y).min().unwrap_or_default();
    let maxy = points.iter().map(|p| p.y).max().unwrap_or_default();

    let mut result = Ok(());
    for y in miny.max(clip.top)..=maxy.min(clip.bottom) {
        scratch.clear();
        for (a, b) in edges(points) {
            let (top, bottom) = match a.y.cmp(&b.y) {
                std::cmp::Ordering::Less => (a, b),
                std::cmp::Ordering::Greater => (b, a),
                std::cmp::Ordering::Equal => continue,
            };
            if (y >= top.y && y < bottom.y) || (y == maxy && y > top.y && y <= bottom.y) {
                let (x1, y1) = (i64::from(top.x), i64::from(top.y));
                let (x2, y2) = (i64::from(bottom.x), i64::from(bottom.y));
                let t = (65536 * (i64::from(y) - y1)) / (y2 - y1);
                scratch.push(t * (x2 - x1) + 65536 * x1);
            }
        }
        scratch.sort_unstable();

        for pair in scratch.chunks_exact(2) {
            let xa = ((pair[0] + 32768) >> 16) as i32;
            let xb = ((pair[1] + 32768) >> 16) as i32;
            result = result.and(hline(dst, xa, xb, y, color));
        }
    }
    result
}

/// Draw a triangle outline.
pub fn trigon<B: PixelBuffer>(dst: &mut Surface<B>, a: Point, b: Point, c: Point, color: Rgba) -> Result<()> {
    polygon(dst, &[a, b, c], color)
}

/// Draw an antialiased triangle outline.
pub fn aatrigon<B: PixelBuffer>(dst: &mut Surface<B>, a: Point, b: Point, c: Point, color: Rgba) -> Result<()> {
    aapolygon(dst, &[a, b, c], color)
}

/// Fill a triangle.
pub fn filled_trigon<B: PixelBuffer>(dst: &mut Surface<B>, a: Point, b: Point, c: Point, color: Rgba) -> Result<()> {
    filled_polygon(dst, &[a, b, c], color)
}
