//! Aliased and antialiased line rasterization.

use crate::color::Rgba;
use crate::error::Result;
use crate::format::{with_layout, PixelLayout};
use crate::surface::{PixelBuffer, Surface};

use super::clip::clip_line;
use super::pixel::{pixel, pixel_nolock, pixel_weight_nolock};
use super::span::{hline, vline};

/// Draw a one-pixel line between two points, endpoints included.
///
/// Opaque colors run a Bresenham walk that stores the native value directly;
/// translucent colors walk a decision variable and blend every pixel.
pub fn line<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) -> Result<()> {
    let Some((x1, y1, x2, y2)) = clip_line(&dst.clip_rect(), x1, y1, x2, y2) else {
        return Ok(());
    };

    if x1 == x2 {
        if y1 == y2 {
            return pixel(dst, x1, y1, color);
        }
        return vline(dst, x1, y1, y2, color);
    }
    if y1 == y2 {
        return hline(dst, x1, x2, y1, color);
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let sx: i32 = if dx >= 0 { 1 } else { -1 };
    let sy: i32 = if dy >= 0 { 1 } else { -1 };

    dst.locked(|s| {
        if color.is_opaque() {
            bresenham_store(s, x1, y1, dx, dy, color);
        } else {
            bresenham_blend(s, (x1, y1), (x2, y2), (dx, dy), (sx, sy), color);
        }
        Ok(())
    })
}

/// Opaque walk over byte offsets. Both endpoints are inside the clip.
fn bresenham_store<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, y1: i32, dx: i32, dy: i32, color: Rgba) {
    let native = dst.map_rgba(color);
    let bpp = dst.bytes_per_pixel() as isize;
    let pitch = dst.pitch() as isize;

    let mut major = dx.abs() + 1;
    let mut minor = dy.abs() + 1;
    let mut step_major = if dx >= 0 { bpp } else { -bpp };
    let mut step_minor = if dy >= 0 { pitch } else { -pitch };
    if major < minor {
        std::mem::swap(&mut major, &mut minor);
        std::mem::swap(&mut step_major, &mut step_minor);
    }

    let mut offset = dst.offset(x1, y1) as isize;
    let kind = dst.format().kind();
    let pixels = dst.pixels_mut();
    with_layout!(kind, L => {
        let mut err = 0;
        for _ in 0..major {
            let at = offset as usize;
            L::write(&mut pixels[at..at + L::BPP], native);
            err += minor;
            if err >= major {
                err -= major;
                offset += step_minor;
            }
            offset += step_major;
        }
    });
}

fn bresenham_blend<B: PixelBuffer>(
    dst: &mut Surface<B>,
    (x1, y1): (i32, i32),
    (x2, y2): (i32, i32),
    (dx, dy): (i32, i32),
    (sx, sy): (i32, i32),
    color: Rgba,
) {
    let ax = dx.abs() << 1;
    let ay = dy.abs() << 1;
    let (mut x, mut y) = (x1, y1);

    if ax > ay {
        let mut d = ay - (ax >> 1);
        while x != x2 {
            pixel_nolock(dst, x, y, color);
            if d > 0 || (d == 0 && sx == 1) {
                y += sy;
                d -= ax;
            }
            x += sx;
            d += ay;
        }
    } else {
        let mut d = ax - (ay >> 1);
        while y != y2 {
            pixel_nolock(dst, x, y, color);
            if d > 0 || (d == 0 && sy == 1) {
                x += sx;
                d -= ay;
            }
            y += sy;
            d += ax;
        }
    }
    pixel_nolock(dst, x, y, color);
}

/// Draw an antialiased line with Wu's algorithm, including both endpoints.
pub fn aaline<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) -> Result<()> {
    aaline_int(dst, x1, y1, x2, y2, color, true)
}

/// Wu line. The first endpoint is always drawn at full strength; the last one
/// only when `draw_endpoint` is set, so closed outlines do not double-blend
/// shared vertices.
pub(crate) fn aaline_int<B: PixelBuffer>(
    dst: &mut Surface<B>,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Rgba,
    draw_endpoint: bool,
) -> Result<()> {
    let Some((x1, y1, x2, y2)) = clip_line(&dst.clip_rect(), x1, y1, x2, y2) else {
        return Ok(());
    };

    let (mut xx0, mut yy0, xx1, yy1) = if y1 > y2 { (x2, y2, x1, y1) } else { (x1, y1, x2, y2) };
    let mut dx = xx1 - xx0;
    let mut dy = yy1 - yy0;
    let xdir = if dx >= 0 { 1 } else { -1 };
    dx = dx.abs();

    if dx == 0 {
        return vline(dst, x1, y1, y2, color);
    }
    if dy == 0 {
        return hline(dst, x1, x2, y1, color);
    }
    if dx == dy {
        return line(dst, x1, y1, x2, y2, color);
    }

    dst.locked(|s| {
        pixel_nolock(s, x1, y1, color);

        let mut erracc: u32 = 0;
        if dy > dx {
            // x advances by a 16.16 fraction of a pixel per row
            let erradj = ((((dx as u64) << 16) / dy as u64) << 16) as u32;
            let mut x0pxdir = xx0 + xdir;
            while dy > 1 {
                dy -= 1;
                let previous = erracc;
                erracc = erracc.wrapping_add(erradj);
                if erracc <= previous {
                    xx0 = x0pxdir;
                    x0pxdir += xdir;
                }
                yy0 += 1;
                let wgt = (erracc >> 24) & 255;
                pixel_weight_nolock(s, xx0, yy0, color, 255 - wgt);
                pixel_weight_nolock(s, x0pxdir, yy0, color, wgt);
            }
        } else {
            let erradj = ((((dy as u64) << 16) / dx as u64) << 16) as u32;
            let mut y0p1 = yy0 + 1;
            while dx > 1 {
                dx -= 1;
                let previous = erracc;
                erracc = erracc.wrapping_add(erradj);
                if erracc <= previous {
                    yy0 = y0p1;
                    y0p1 += 1;
                }
                xx0 += xdir;
                let wgt = (erracc >> 24) & 255;
                pixel_weight_nolock(s, xx0, yy0, color, 255 - wgt);
                pixel_weight_nolock(s, xx0, y0p1, color, wgt);
            }
        }

        if draw_endpoint {
            pixel_nolock(s, x2, y2, color);
        }
        Ok(())
    })
}
