//! Pixel & blend engine.
//!
//! Every single-pixel write in the crate ends up here. Opaque colors are stored
//! directly; translucent ones are blended channel by channel with
//! `dst + ((src - dst) * alpha) >> 8`.

use crate::color::Rgba;
use crate::error::Result;
use crate::surface::{PixelBuffer, Surface};

/// Store a native value at `(x, y)` if it lies in the clip, without locking.
#[inline]
pub fn fast_pixel_nolock<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, native: u32) {
    if dst.clip_rect().contains(x, y) {
        dst.write(x, y, native);
    }
}

/// Store a native value at `(x, y)` if it lies in the clip.
pub fn fast_pixel<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, native: u32) -> Result<()> {
    dst.locked(|s| {
        fast_pixel_nolock(s, x, y, native);
        Ok(())
    })
}

/// Map `color` and store it at `(x, y)` without blending.
pub fn fast_pixel_rgba<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, color: Rgba) -> Result<()> {
    let native = dst.map_rgba(color);
    fast_pixel(dst, x, y, native)
}

/// Blend a native value into `(x, y)` with `alpha`, honoring the clip.
#[inline]
pub(crate) fn put_pixel_alpha<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, native: u32, alpha: u8) {
    if !dst.clip_rect().contains(x, y) {
        return;
    }
    if alpha == 255 {
        dst.write(x, y, native);
    } else {
        let old = dst.read(x, y);
        let blended = dst.format().blend(old, native, alpha);
        dst.write(x, y, blended);
    }
}

/// Draw one pixel without locking; translucent colors blend with the surface.
#[inline]
pub fn pixel_nolock<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, color: Rgba) {
    if !dst.clip_rect().contains(x, y) {
        return;
    }
    let native = dst.map_rgba(color);
    put_pixel_alpha(dst, x, y, native, color.a);
}

/// Draw one pixel; translucent colors blend with the surface.
///
/// # Example
///
/// ```
/// use softgfx::prelude::*;
///
/// let mut s = Surface::new(4, 4, PixelFormat::xrgb8888()).unwrap();
/// pixel(&mut s, 1, 1, Rgba::new(255, 0, 0, 128)).unwrap();
/// assert_eq!(s.get_rgba(1, 1), Some(Rgba::rgb(127, 0, 0)));
/// ```
pub fn pixel<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, color: Rgba) -> Result<()> {
    dst.locked(|s| {
        pixel_nolock(s, x, y, color);
        Ok(())
    })
}

/// Draw one pixel with the color's alpha scaled by a 0-255 coverage weight.
#[inline]
pub fn pixel_weight_nolock<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, color: Rgba, weight: u32) {
    pixel_nolock(dst, x, y, color.weighted(weight));
}

/// A color resolved once per call: opaque colors become a native store,
/// translucent ones stay as RGBA and blend.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Ink {
    Store(u32),
    Blend(Rgba),
}

impl Ink {
    pub(crate) fn new<B: PixelBuffer>(dst: &Surface<B>, color: Rgba) -> Self {
        if color.is_opaque() {
            Self::Store(dst.map_rgba(color))
        } else {
            Self::Blend(color)
        }
    }

    #[inline]
    pub(crate) fn put<B: PixelBuffer>(self, dst: &mut Surface<B>, x: i32, y: i32) {
        match self {
            Self::Store(native) => fast_pixel_nolock(dst, x, y, native),
            Self::Blend(color) => pixel_nolock(dst, x, y, color),
        }
    }
}

/// Locking variant of [`pixel_weight_nolock`].
pub fn pixel_weight<B: PixelBuffer>(dst: &mut Surface<B>, x: i32, y: i32, color: Rgba, weight: u32) -> Result<()> {
    dst.locked(|s| {
        pixel_weight_nolock(s, x, y, color, weight);
        Ok(())
    })
}
