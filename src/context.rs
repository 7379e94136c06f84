//! Drawing state reused across calls.

use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Point;
use crate::render::{filled_polygon_with, pie_with};
use crate::surface::{PixelBuffer, Surface};
use crate::text::{Font, GlyphCache};

/// Owns the buffers that the stateless free functions would otherwise
/// allocate per call: the filled-polygon intersection scratch and the glyph
/// cache.
///
/// The scratch buffer only grows. A context is not shared between threads
/// while drawing; create one per thread.
///
/// # Example
///
/// ```
/// use softgfx::prelude::*;
///
/// let mut surface = Surface::new(64, 16, PixelFormat::xrgb8888()).unwrap();
/// let mut ctx = DrawContext::new();
/// ctx.string(&mut surface, 0, 4, "hello", Rgba::WHITE).unwrap();
/// ctx.filled_trigon(&mut surface, Point::new(48, 2), Point::new(60, 2), Point::new(54, 12), Rgba::RED)
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct DrawContext {
    scratch: Vec<i64>,
    glyphs: GlyphCache,
}

impl DrawContext {
    /// Context with the built-in 8x8 font.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with a custom font.
    #[must_use]
    pub fn with_font(font: Font) -> Self {
        Self {
            scratch: Vec::new(),
            glyphs: GlyphCache::new(font),
        }
    }

    /// Install `font`, or restore the built-in one with `None`. Cached glyphs are dropped.
    pub fn set_font(&mut self, font: Option<Font>) {
        self.glyphs.set_font(font);
    }

    /// The glyph cache.
    #[must_use]
    pub const fn glyphs(&self) -> &GlyphCache {
        &self.glyphs
    }

    /// Capacity of the polygon scratch buffer, in intersections.
    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }

    /// Fill a polygon, reusing the context's intersection buffer.
    ///
    /// # Errors
    ///
    /// Fewer than 3 vertices yields [`crate::Error::InvalidArgument`].
    pub fn filled_polygon<B: PixelBuffer>(&mut self, dst: &mut Surface<B>, points: &[Point], color: Rgba) -> Result<()> {
        filled_polygon_with(dst, points, color, &mut self.scratch)
    }

    /// Fill a triangle.
    pub fn filled_trigon<B: PixelBuffer>(&mut self, dst: &mut Surface<B>, a: Point, b: Point, c: Point, color: Rgba) -> Result<()> {
        self.filled_polygon(dst, &[a, b, c], color)
    }

    /// Fill a pie slice.
    ///
    /// # Errors
    ///
    /// Negative radius yields [`crate::Error::InvalidArgument`].
    pub fn filled_pie<B: PixelBuffer>(
        &mut self,
        dst: &mut Surface<B>,
        x: i32,
        y: i32,
        rad: i32,
        start: i32,
        end: i32,
        color: Rgba,
    ) -> Result<()> {
        pie_with(dst, Point::new(x, y), rad, start, end, color, Some(&mut self.scratch))
    }

    /// Draw one glyph with its top-left corner at `(x, y)`.
    pub fn character<B: PixelBuffer>(&mut self, dst: &mut Surface<B>, x: i32, y: i32, code: u8, color: Rgba) -> Result<()> {
        self.glyphs.character(dst, x, y, code, color)
    }

    /// Draw a byte string, one glyph per byte.
    pub fn string<B: PixelBuffer>(
        &mut self,
        dst: &mut Surface<B>,
        x: i32,
        y: i32,
        text: impl AsRef<[u8]>,
        color: Rgba,
    ) -> Result<()> {
        self.glyphs.string(dst, x, y, text, color)
    }
}
