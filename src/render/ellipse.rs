//! Circles and axis-aligned ellipses: outlined, antialiased and filled.
//!
//! Outlines walk one octant (circles) or one quadrant (ellipses) and mirror
//! each step. The walks remember the previously emitted offsets so that a
//! pixel shared by neighboring steps is drawn once where the stepping allows
//! it; translucent outlines can still double-blend a few symmetric pixels on
//! the axes, exactly like the classic algorithm.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::surface::{PixelBuffer, Surface};

use super::pixel::{pixel, pixel_nolock, pixel_weight_nolock, Ink};
use super::span::{hline, vline};

/// True when the bounding box of the shape misses the clip.
fn culled<B: PixelBuffer>(dst: &Surface<B>, x: i32, y: i32, rx: i32, ry: i32) -> bool {
    let clip = dst.clip_rect();
    clip.is_empty()
        || clip.rejects_box(
            x.saturating_sub(rx),
            y.saturating_sub(ry),
            x.saturating_add(rx),
            y.saturating_add(ry),
        )
}

/// Plot `(x +- dx, y +- dy)`, collapsing to two pixels on the horizontal axis.
#[inline]
fn plot4<B: PixelBuffer>(dst: &mut Surface<B>, ink: Ink, x: i32, y: i32, dx: i32, dy: i32) {
    if dy > 0 {
        ink.put(dst, x - dx, y + dy);
        ink.put(dst, x + dx, y + dy);
        ink.put(dst, x - dx, y - dy);
        ink.put(dst, x + dx, y - dy);
    } else {
        ink.put(dst, x - dx, y);
        ink.put(dst, x + dx, y);
    }
}

/// Fill rows `y +- dy` from `x - half` to `x + half`.
fn span_pair<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, half: i32, dy: i32, color: Rgba) -> Result<()> {
    if dy > 0 {
        hline(dst, x - half, x + half, y + dy, color).and(hline(dst, x - half, x + half, y - dy, color))
    } else {
        hline(dst, x - half, x + half, y, color)
    }
}

/// Midpoint circle decision state.
struct CircleWalk {
    cx: i32,
    cy: i32,
    df: i64,
    d_e: i64,
    d_se: i64,
}

impl CircleWalk {
    fn new(r: i32) -> Self {
        Self {
            cx: 0,
            cy: r,
            df: 1 - i64::from(r),
            d_e: 3,
            d_se: 5 - 2 * i64::from(r),
        }
    }

    /// Advance one column; false once the octant is complete.
    fn step(&mut self) -> bool {
        if self.df < 0 {
            self.df += self.d_e;
            self.d_e += 2;
            self.d_se += 2;
        } else {
            self.df += self.d_se;
            self.d_e += 2;
            self.d_se += 4;
            self.cy -= 1;
        }
        self.cx += 1;
        self.cx <= self.cy
    }
}

/// One step of the scaled ellipse walk: `h`/`i` run along the major radius,
/// `j`/`k` are the matching minor offsets.
#[derive(Debug, Clone, Copy)]
struct EllipseStep {
    h: i32,
    i: i32,
    j: i32,
    k: i32,
}

/// Walks a quadrant of an ellipse in 1/64 pixel units.
struct EllipseWalk {
    ix: i64,
    iy: i64,
    major: i64,
    minor: i64,
    done: bool,
}

impl EllipseWalk {
    fn new(major: i32, minor: i32) -> Self {
        Self {
            ix: 0,
            iy: i64::from(major) * 64,
            major: i64::from(major),
            minor: i64::from(minor),
            done: false,
        }
    }
}

impl Iterator for EllipseWalk {
    type Item = EllipseStep;

    fn next(&mut self) -> Option<EllipseStep> {
        if self.done {
            return None;
        }
        let h = (self.ix + 32) >> 6;
        let i = (self.iy + 32) >> 6;
        let j = (h * self.minor) / self.major;
        let k = (i * self.minor) / self.major;

        self.ix += self.iy / self.major;
        self.iy -= self.ix / self.major;
        self.done = i <= h;

        Some(EllipseStep {
            h: h as i32,
            i: i as i32,
            j: j as i32,
            k: k as i32,
        })
    }
}

/// Draw a circle outline.
///
/// # Errors
///
/// Negative radius yields [`Error::InvalidArgument`]; lock failures propagate.
pub fn circle<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, r: i32, color: Rgba) -> Result<()> {
    if r < 0 {
        return Err(Error::InvalidArgument("negative radius"));
    }
    if r == 0 {
        return pixel(dst, x, y, color);
    }
    if culled(dst, x, y, r, r) {
        return Ok(());
    }

    dst.locked(|s| {
        let ink = Ink::new(s, color);
        let mut walk = CircleWalk::new(r);
        let (mut ocx, mut ocy) = (-1, -1);
        loop {
            if ocy != walk.cy || ocx != walk.cx {
                plot4(s, ink, x, y, walk.cx, walk.cy);
                ocy = walk.cy;
                plot4(s, ink, x, y, walk.cy, walk.cx);
                ocx = walk.cx;
            }
            if !walk.step() {
                break;
            }
        }
        Ok(())
    })
}

/// Draw an antialiased circle outline; identical to [`aaellipse`] with equal radii.
pub fn aacircle<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, r: i32, color: Rgba) -> Result<()> {
    aaellipse(dst, x, y, r, r, color)
}

/// Draw a filled circle as a stack of horizontal spans.
///
/// # Errors
///
/// Negative radius yields [`Error::InvalidArgument`]. Span failures do not stop
/// the fill; the first one is returned.
pub fn filled_circle<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, r: i32, color: Rgba) -> Result<()> {
    if r < 0 {
        return Err(Error::InvalidArgument("negative radius"));
    }
    if r == 0 {
        return pixel(dst, x, y, color);
    }
    if culled(dst, x, y, r, r) {
        return Ok(());
    }

    let mut result = Ok(());
    let mut walk = CircleWalk::new(r);
    let (mut ocx, mut ocy) = (-1, -1);
    loop {
        let (cx, cy) = (walk.cx, walk.cy);
        if ocy != cy {
            result = result.and(span_pair(dst, x, y, cx, cy, color));
            ocy = cy;
        }
        if ocx != cx {
            if cx != cy {
                result = result.and(span_pair(dst, x, y, cy, cx, color));
            }
            ocx = cx;
        }
        if !walk.step() {
            break;
        }
    }
    result
}

/// Draw an ellipse outline.
///
/// # Errors
///
/// Negative radii yield [`Error::InvalidArgument`].
pub fn ellipse<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, rx: i32, ry: i32, color: Rgba) -> Result<()> {
    if rx < 0 || ry < 0 {
        return Err(Error::InvalidArgument("negative radius"));
    }
    if rx == 0 {
        return vline(dst, x, y.saturating_sub(ry), y.saturating_add(ry), color);
    }
    if ry == 0 {
        return hline(dst, x.saturating_sub(rx), x.saturating_add(rx), y, color);
    }
    if culled(dst, x, y, rx, ry) {
        return Ok(());
    }

    dst.locked(|s| {
        let ink = Ink::new(s, color);
        let (mut oh, mut oi, mut oj, mut ok) = (-1, -1, -1, -1);
        if rx > ry {
            for EllipseStep { h, i, j, k } in EllipseWalk::new(rx, ry) {
                if (ok != k && oj != k) || (oj != j && ok != j) || k != j {
                    plot4(s, ink, x, y, h, k);
                    ok = k;
                    plot4(s, ink, x, y, i, j);
                    oj = j;
                }
            }
        } else {
            for EllipseStep { h, i, j, k } in EllipseWalk::new(ry, rx) {
                if (oi != i && oh != i) || (oh != h && oi != h && i != h) {
                    plot4(s, ink, x, y, j, i);
                    oi = i;
                    plot4(s, ink, x, y, k, h);
                    oh = h;
                }
            }
        }
        Ok(())
    })
}

/// Coverage of the pixel nearest the ideal curve, `trunc(min(|num / den|, 1) * 255)`.
///
/// The quotient is taken in 32.32 like [`crate::fixed::Fixed::ratio`], but over `i128` so
/// decision values of very large ellipses do not saturate.
#[inline]
fn coverage(num: i128, den: i128) -> u32 {
    let (num, den) = (num.unsigned_abs(), den.unsigned_abs());
    if den == 0 || num >= den {
        return 255;
    }
    (((num << 32) / den * 255) >> 32) as u32
}

/// Weighted store at wide coordinates; anything outside `i32` is off-surface.
/// `None` stores the color at full strength.
#[inline]
fn blend_at<B: PixelBuffer>(dst: &mut Surface<B>, x: i64, y: i64, color: Rgba, weight: Option<u32>) {
    let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
        return;
    };
    match weight {
        Some(weight) => pixel_weight_nolock(dst, x, y, color, weight),
        None => pixel_nolock(dst, x, y, color),
    }
}

/// Draw an antialiased ellipse outline.
///
/// The walk runs along x until the slope passes -1, then along y. Each step
/// splits 255 units of coverage between the pixel on the curve and its
/// neighbor across it. Decision variables grow with the cube of the radius
/// and are kept in `i128`, so every `i32` radius is accepted.
///
/// # Errors
///
/// Negative radii yield [`Error::InvalidArgument`].
pub fn aaellipse<B: PixelBuffer>(dst: &mut Surface<B>, xc: i32, yc: i32, rx: i32, ry: i32, color: Rgba) -> Result<()> {
    if rx < 0 || ry < 0 {
        return Err(Error::InvalidArgument("negative radius"));
    }
    if rx == 0 {
        return vline(dst, xc, yc.saturating_sub(ry), yc.saturating_add(ry), color);
    }
    if ry == 0 {
        return hline(dst, xc.saturating_sub(rx), xc.saturating_add(rx), yc, color);
    }
    if culled(dst, xc, yc, rx, ry) {
        return Ok(());
    }

    let a2 = i128::from(rx) * i128::from(rx);
    let b2 = i128::from(ry) * i128::from(ry);
    let ds = 2 * a2;
    let dt = 2 * b2;
    let xc2 = 2 * i64::from(xc);
    let yc2 = 2 * i64::from(yc);
    let dxt = (a2 as f64 / ((a2 + b2) as f64).sqrt()) as i64;

    dst.locked(|s| {
        let mut t: i128 = 0;
        let mut sd: i128 = -2 * a2 * i128::from(ry);
        let mut d: i128 = 0;
        let mut x = i64::from(xc);
        let mut y = i64::from(yc) - i64::from(ry);

        blend_at(s, x, y, color, None);
        blend_at(s, xc2 - x, y, color, None);
        blend_at(s, x, yc2 - y, color, None);
        blend_at(s, xc2 - x, yc2 - y, color, None);

        for _ in 0..dxt.max(0) {
            x -= 1;
            d += t - b2;
            let ys;
            if d >= 0 {
                ys = y - 1;
            } else if d - sd - a2 > 0 {
                if 2 * d - sd - a2 >= 0 {
                    ys = y + 1;
                } else {
                    ys = y;
                    y += 1;
                    d -= sd + a2;
                    sd += ds;
                }
            } else {
                y += 1;
                ys = y + 1;
                d -= sd + a2;
                sd += ds;
            }
            t -= dt;

            let weight = coverage(d, sd);
            let iweight = 255 - weight;

            let xx = xc2 - x;
            blend_at(s, x, y, color, Some(iweight));
            blend_at(s, xx, y, color, Some(iweight));
            blend_at(s, x, ys, color, Some(weight));
            blend_at(s, xx, ys, color, Some(weight));

            let yy = yc2 - y;
            blend_at(s, x, yy, color, Some(iweight));
            blend_at(s, xx, yy, color, Some(iweight));
            let yy = yc2 - ys;
            blend_at(s, x, yy, color, Some(weight));
            blend_at(s, xx, yy, color, Some(weight));
        }

        let dyt = (y - i64::from(yc)).abs();
        for _ in 0..dyt {
            y += 1;
            d -= sd + a2;
            let xs;
            if d <= 0 {
                xs = x + 1;
            } else if d + t - b2 < 0 {
                if 2 * d + t - b2 <= 0 {
                    xs = x - 1;
                } else {
                    xs = x;
                    x -= 1;
                    d += t - b2;
                    t -= dt;
                }
            } else {
                x -= 1;
                xs = x - 1;
                d += t - b2;
                t -= dt;
            }
            sd += ds;

            let weight = coverage(d, t);
            let iweight = 255 - weight;

            let xx = xc2 - x;
            let yy = yc2 - y;
            blend_at(s, x, y, color, Some(iweight));
            blend_at(s, xx, y, color, Some(iweight));
            blend_at(s, x, yy, color, Some(iweight));
            blend_at(s, xx, yy, color, Some(iweight));

            let xx = xc2 - xs;
            blend_at(s, xs, y, color, Some(weight));
            blend_at(s, xx, y, color, Some(weight));
            blend_at(s, xs, yy, color, Some(weight));
            blend_at(s, xx, yy, color, Some(weight));
        }
        Ok(())
    })
}

/// Draw a filled ellipse as a stack of horizontal spans.
///
/// # Errors
///
/// Negative radii yield [`Error::InvalidArgument`].
pub fn filled_ellipse<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, rx: i32, ry: i32, color: Rgba) -> Result<()> {
    if rx < 0 || ry < 0 {
        return Err(Error::InvalidArgument("negative radius"));
    }
    if rx == 0 {
        return vline(dst, x, y.saturating_sub(ry), y.saturating_add(ry), color);
    }
    if ry == 0 {
        return hline(dst, x.saturating_sub(rx), x.saturating_add(rx), y, color);
    }
    if culled(dst, x, y, rx, ry) {
        return Ok(());
    }

    let mut result = Ok(());
    let (mut oh, mut oi, mut oj, mut ok) = (-1, -1, -1, -1);
    if rx > ry {
        for EllipseStep { h, i, j, k } in EllipseWalk::new(rx, ry) {
            if ok != k && oj != k {
                result = result.and(span_pair(dst, x, y, h, k, color));
                ok = k;
            }
            if oj != j && ok != j && k != j {
                result = result.and(span_pair(dst, x, y, i, j, color));
                oj = j;
            }
        }
    } else {
        for EllipseStep { h, i, j, k } in EllipseWalk::new(ry, rx) {
            if oi != i && oh != i {
                result = result.and(span_pair(dst, x, y, j, i, color));
                oi = i;
            }
            if oh != h && oi != h && i != h {
                result = result.and(span_pair(dst, x, y, k, h, color));
                oh = h;
            }
        }
    }
    result
}
