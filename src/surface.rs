//! Surface accessor: a pixel buffer with format, stride and clip rectangle.
//!
//! A [`Surface`] wraps any [`PixelBuffer`] and validates its geometry once at
//! construction, so every in-bounds coordinate maps to the byte range
//! `y * pitch + x * bpp .. + bpp` inside the buffer.

use std::ops::{Deref, DerefMut};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::format::{read_native, with_layout, write_native, Palette, PixelFormat, PixelLayout};
use crate::geometry::{ClipRect, Rect};

/// Row alignment of surfaces allocated by [`Surface::new`].
const ROW_ALIGNMENT: usize = 4;

/// Backing storage of a surface.
///
/// `lock` is called before the library touches pixels directly and `unlock`
/// after, on every exit path. Backends whose memory is not always addressable
/// override both; locks must tolerate nesting.
pub trait PixelBuffer: AsRef<[u8]> + AsMut<[u8]> {
    /// Make the buffer addressable.
    fn lock(&mut self) -> Result<()> {
        Ok(())
    }

    /// Release a previous successful [`lock`](PixelBuffer::lock).
    fn unlock(&mut self) {}
}

impl PixelBuffer for Vec<u8> {}

impl PixelBuffer for Box<[u8]> {}

impl PixelBuffer for &mut [u8] {}

/// Allocate a vector of `len` copies of `value`, reporting allocation failure
/// instead of aborting.
pub(crate) fn try_vec<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    if v.try_reserve_exact(len).is_err() {
        let bytes = len.saturating_mul(std::mem::size_of::<T>());
        log::warn!("allocation of {bytes} bytes failed");
        return Err(Error::Allocation { bytes });
    }
    v.resize(len, value);
    Ok(v)
}

/// A 2D pixel buffer with a native pixel format and a clip rectangle.
#[derive(Debug, Clone)]
pub struct Surface<B = Vec<u8>> {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Stride in bytes (may include padding).
    pitch: usize,
    format: PixelFormat,
    clip: ClipRect,
    /// Native value treated as transparent by consumers of the surface.
    color_key: Option<u32>,
    pixels: B,
}

impl Surface<Vec<u8>> {
    /// Create a zeroed surface with rows padded to 4 bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero or the buffer cannot be allocated.
    ///
    /// # Example
    ///
    /// ```
    /// use softgfx::format::PixelFormat;
    /// use softgfx::surface::Surface;
    ///
    /// let surface = Surface::new(800, 600, PixelFormat::rgba8888()).unwrap();
    /// assert_eq!(surface.width(), 800);
    /// assert_eq!(surface.pitch(), 3200);
    /// ```
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * format.bytes_per_pixel();
        let pitch = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);
        let pixels = try_vec(pitch * height as usize, 0u8)?;

        Ok(Self {
            width,
            height,
            pitch,
            format,
            clip: ClipRect::full(width, height),
            color_key: None,
            pixels,
        })
    }
}

impl<B: PixelBuffer> Surface<B> {
    /// Wrap caller-owned storage.
    ///
    /// # Errors
    ///
    /// Fails when the dimensions are zero, the pitch is narrower than a row, or
    /// the buffer is shorter than `pitch * height` bytes.
    pub fn from_buffer(pixels: B, width: u32, height: u32, pitch: usize, format: PixelFormat) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if pitch < (width as usize) * format.bytes_per_pixel() {
            return Err(Error::InvalidDimensions { width, height });
        }
        let required = pitch.saturating_mul(height as usize);
        let actual = pixels.as_ref().len();
        if actual < required {
            return Err(Error::BufferTooSmall { required, actual });
        }

        Ok(Self {
            width,
            height,
            pitch,
            format,
            clip: ClipRect::full(width, height),
            color_key: None,
            pixels,
        })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the pitch (row width in bytes, including any padding).
    #[must_use]
    pub const fn pitch(&self) -> usize {
        self.pitch
    }

    /// Pixel format.
    #[must_use]
    pub const fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Bytes per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Palette of an indexed surface.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.format.palette()
    }

    /// Replace the palette of an indexed surface.
    pub fn set_palette(&mut self, palette: Palette) {
        self.format.set_palette(palette);
    }

    /// Current clip rectangle.
    #[must_use]
    pub const fn clip_rect(&self) -> ClipRect {
        self.clip
    }

    /// Restrict drawing to `rect` intersected with the surface; `None` resets to
    /// the full surface.
    pub fn set_clip_rect(&mut self, rect: Option<Rect>) {
        self.clip = match rect {
            Some(rect) => ClipRect::from_rect(rect, self.width, self.height),
            None => ClipRect::full(self.width, self.height),
        };
    }

    /// Native color key, if any.
    #[must_use]
    pub const fn color_key(&self) -> Option<u32> {
        self.color_key
    }

    /// Set or clear the native color key.
    pub fn set_color_key(&mut self, key: Option<u32>) {
        self.color_key = key;
    }

    /// Get the raw pixel data as a slice.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_ref()
    }

    /// Get the raw pixel data as a mutable slice.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.pixels.as_mut()
    }

    /// Give back the underlying buffer.
    pub fn into_inner(self) -> B {
        self.pixels
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.pitch;
        let end = start + (self.width as usize) * self.bytes_per_pixel();
        Some(&self.pixels.as_ref()[start..end])
    }

    /// Map a color to this surface's native encoding.
    #[must_use]
    pub fn map_rgba(&self, color: Rgba) -> u32 {
        self.format.map_rgba(color)
    }

    /// Lock the buffer for direct access; unlocked when the guard drops.
    pub fn lock(&mut self) -> Result<SurfaceLock<'_, B>> {
        self.pixels.lock()?;
        Ok(SurfaceLock { surface: self })
    }

    /// Run `f` between a lock and an unlock of the buffer.
    ///
    /// The unlock happens on every exit path, including errors returned by `f`.
    pub fn locked<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    /// True when `(x, y)` lies inside the surface (ignoring the clip).
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Byte offset of an in-bounds pixel.
    #[inline]
    pub(crate) fn offset(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.in_bounds(x, y), "pixel ({x}, {y}) outside surface");
        (y as usize) * self.pitch + (x as usize) * self.bytes_per_pixel()
    }

    /// Native value at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.in_bounds(x, y).then(|| self.read(x, y))
    }

    /// Decoded color at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn get_rgba(&self, x: i32, y: i32) -> Option<Rgba> {
        self.get_pixel(x, y).map(|p| self.format.get_rgba(p))
    }

    /// Unclipped read; the caller guarantees the coordinate is in bounds.
    #[inline]
    pub(crate) fn read(&self, x: i32, y: i32) -> u32 {
        let offset = self.offset(x, y);
        read_native(self.format.kind(), self.pixels.as_ref(), offset)
    }

    /// Unclipped store; the caller guarantees the coordinate is in bounds.
    #[inline]
    pub(crate) fn write(&mut self, x: i32, y: i32, value: u32) {
        let offset = self.offset(x, y);
        let kind = self.format.kind();
        write_native(kind, self.pixels.as_mut(), offset, value);
    }

    /// Fill the whole surface, ignoring the clip, with a native value.
    pub fn fill(&mut self, value: u32) {
        let row_bytes = (self.width as usize) * self.bytes_per_pixel();
        let pitch = self.pitch;
        let height = self.height as usize;
        let kind = self.format.kind();
        let pixels = self.pixels.as_mut();
        with_layout!(kind, L => {
            for y in 0..height {
                let start = y * pitch;
                L::fill(&mut pixels[start..start + row_bytes], value);
            }
        });
    }

    /// Clear the whole surface, ignoring the clip, to a color.
    pub fn clear(&mut self, color: Rgba) {
        let value = self.map_rgba(color);
        self.fill(value);
    }

    /// Copy the surface into a new one with another format.
    ///
    /// Each pixel is decoded and re-mapped, so narrowing formats lose precision.
    pub fn convert(&self, format: PixelFormat) -> Result<Surface> {
        let mut out = Surface::new(self.width, self.height, format)?;
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let color = self.format.get_rgba(self.read(x, y));
                let value = out.format.map_rgba(color);
                out.write(x, y, value);
            }
        }
        Ok(out)
    }

    /// Get pixel data as tightly packed RGBA bytes without stride padding.
    ///
    /// This is useful for encoding to formats like PNG.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut compact = Vec::with_capacity((self.width as usize) * (self.height as usize) * 4);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                compact.extend_from_slice(&self.format.get_rgba(self.read(x, y)).to_array());
            }
        }
        compact
    }
}

/// Guard returned by [`Surface::lock`]; unlocks the buffer on drop.
pub struct SurfaceLock<'a, B: PixelBuffer> {
    surface: &'a mut Surface<B>,
}

impl<B: PixelBuffer> Deref for SurfaceLock<'_, B> {
    type Target = Surface<B>;

    fn deref(&self) -> &Surface<B> {
        self.surface
    }
}

impl<B: PixelBuffer> DerefMut for SurfaceLock<'_, B> {
    fn deref_mut(&mut self) -> &mut Surface<B> {
        self.surface
    }
}

impl<B: PixelBuffer> Drop for SurfaceLock<'_, B> {
    fn drop(&mut self) {
        self.surface.pixels.unlock();
    }
}
