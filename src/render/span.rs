//! Span fill engine: horizontal and vertical runs, boxes and rectangle outlines.
//!
//! Every entry point orders its endpoints, rejects spans outside the clip,
//! clamps the rest and then either stores the native color row by row (opaque)
//! or blends pixel by pixel (translucent).

use crate::color::Rgba;
use crate::error::Result;
use crate::format::{with_layout, PixelLayout};
use crate::surface::{PixelBuffer, Surface};

use super::pixel::pixel;

#[inline]
fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Clip a horizontal span; `None` when nothing remains.
#[inline]
fn clip_hspan<B: PixelBuffer>(dst: &Surface<B>, x1: i32, x2: i32, y: i32) -> Option<(i32, i32)> {
    let clip = dst.clip_rect();
    let (x1, x2) = ordered(x1, x2);
    if clip.is_empty() || y < clip.top || y > clip.bottom || x2 < clip.left || x1 > clip.right {
        return None;
    }
    Some((x1.max(clip.left), x2.min(clip.right)))
}

/// Clip a vertical span; `None` when nothing remains.
#[inline]
fn clip_vspan<B: PixelBuffer>(dst: &Surface<B>, x: i32, y1: i32, y2: i32) -> Option<(i32, i32)> {
    let clip = dst.clip_rect();
    let (y1, y2) = ordered(y1, y2);
    if clip.is_empty() || x < clip.left || x > clip.right || y2 < clip.top || y1 > clip.bottom {
        return None;
    }
    Some((y1.max(clip.top), y2.min(clip.bottom)))
}

/// Store `native` over the in-bounds run `x1..=x2` of row `y`.
pub(crate) fn store_hspan<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, x2: i32, y: i32, native: u32) {
    let start = dst.offset(x1, y);
    let end = start + (x2 - x1 + 1) as usize * dst.bytes_per_pixel();
    let kind = dst.format().kind();
    let pixels = dst.pixels_mut();
    with_layout!(kind, L => L::fill(&mut pixels[start..end], native));
}

/// Store `native` over the in-bounds run `y1..=y2` of column `x`.
pub(crate) fn store_vspan<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y1: i32, y2: i32, native: u32) {
    let pitch = dst.pitch();
    let mut offset = dst.offset(x, y1);
    let kind = dst.format().kind();
    let pixels = dst.pixels_mut();
    with_layout!(kind, L => {
        for _ in y1..=y2 {
            L::write(&mut pixels[offset..offset + L::BPP], native);
            offset += pitch;
        }
    });
}

/// Blend `color` over an already clipped, ordered box.
fn blend_box<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) -> Result<()> {
    dst.locked(|s| {
        let native = s.map_rgba(color);
        for y in y1..=y2 {
            for x in x1..=x2 {
                let old = s.read(x, y);
                let blended = s.format().blend(old, native, color.a);
                s.write(x, y, blended);
            }
        }
        Ok(())
    })
}

/// Draw the horizontal span `x1..=x2` at row `y`. Endpoint order does not matter.
pub fn hline<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, x2: i32, y: i32, color: Rgba) -> Result<()> {
    let Some((x1, x2)) = clip_hspan(dst, x1, x2, y) else {
        return Ok(());
    };
    if !color.is_opaque() {
        return blend_box(dst, x1, y, x2, y, color);
    }
    dst.locked(|s| {
        let native = s.map_rgba(color);
        store_hspan(s, x1, x2, y, native);
        Ok(())
    })
}

/// Store an already native value over `x1..=x2` at row `y`, without mapping or blending.
pub fn hline_store<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, x2: i32, y: i32, native: u32) -> Result<()> {
    let Some((x1, x2)) = clip_hspan(dst, x1, x2, y) else {
        return Ok(());
    };
    dst.locked(|s| {
        store_hspan(s, x1, x2, y, native);
        Ok(())
    })
}

/// Draw the vertical span `y1..=y2` at column `x`.
pub fn vline<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y1: i32, y2: i32, color: Rgba) -> Result<()> {
    let Some((y1, y2)) = clip_vspan(dst, x, y1, y2) else {
        return Ok(());
    };
    if !color.is_opaque() {
        return blend_box(dst, x, y1, x, y2, color);
    }
    dst.locked(|s| {
        let native = s.map_rgba(color);
        store_vspan(s, x, y1, y2, native);
        Ok(())
    })
}

/// Fill the inclusive box spanned by two corners.
pub fn fill_rect<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) -> Result<()> {
    let (x1, x2) = ordered(x1, x2);
    let (y1, y2) = ordered(y1, y2);
    let clip = dst.clip_rect();
    if clip.rejects_box(x1, y1, x2, y2) || clip.is_empty() {
        return Ok(());
    }

    if x1 == x2 {
        if y1 == y2 {
            return pixel(dst, x1, y1, color);
        }
        return vline(dst, x1, y1, y2, color);
    }
    if y1 == y2 {
        return hline(dst, x1, x2, y1, color);
    }

    let (x1, x2) = (x1.max(clip.left), x2.min(clip.right));
    let (y1, y2) = (y1.max(clip.top), y2.min(clip.bottom));

    if !color.is_opaque() {
        return blend_box(dst, x1, y1, x2, y2, color);
    }
    dst.locked(|s| {
        let native = s.map_rgba(color);
        for y in y1..=y2 {
            store_hspan(s, x1, x2, y, native);
        }
        Ok(())
    })
}

/// Draw the one-pixel outline of the inclusive box spanned by two corners.
///
/// Sides are drawn as independent spans; a failing span does not stop the
/// others, and the first failure is returned.
pub fn rectangle<B: PixelBuffer>(dst: &mut Surface<B>, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) -> Result<()> {
    let (x1, x2) = ordered(x1, x2);
    let (y1, y2) = ordered(y1, y2);

    if x1 == x2 {
        if y1 == y2 {
            return pixel(dst, x1, y1, color);
        }
        return vline(dst, x1, y1, y2, color);
    }
    if y1 == y2 {
        return hline(dst, x1, x2, y1, color);
    }

    let mut result = hline(dst, x1, x2, y1, color);
    result = result.and(hline(dst, x1, x2, y2, color));
    if y2 - y1 >= 2 {
        result = result.and(vline(dst, x1, y1 + 1, y2 - 1, color));
        result = result.and(vline(dst, x2, y1 + 1, y2 - 1, color));
    }
    result
}
