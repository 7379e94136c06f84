//! Bitmap fonts and cached glyph blitting.
//!
//! A [`Font`] is a table of 256 monochrome glyphs, each `height` rows of
//! `ceil(width / 8)` bytes with the most significant bit leftmost. Glyphs are
//! rendered on demand into small RGBA surfaces and kept in a [`GlyphCache`]
//! until the font changes or the glyph is requested in another color.

use std::borrow::Cow;

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::render::pixel_nolock;
use crate::surface::{PixelBuffer, Surface};

/// Number of glyphs in a font table.
pub const GLYPH_COUNT: usize = 256;

/// Printable ASCII (0x20 to 0x7E), one byte per row, least significant bit leftmost.
#[rustfmt::skip]
const BASIC_LATIN: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x18, 0x3C, 0x3C, 0x18, 0x18, 0x00, 0x18, 0x00], // '!'
    [0x36, 0x36, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '"'
    [0x36, 0x36, 0x7F, 0x36, 0x7F, 0x36, 0x36, 0x00], // '#'
    [0x0C, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x0C, 0x00], // '$'
    [0x00, 0x63, 0x33, 0x18, 0x0C, 0x66, 0x63, 0x00], // '%'
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // '&'
    [0x06, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00], // '\''
    [0x18, 0x0C, 0x06, 0x06, 0x06, 0x0C, 0x18, 0x00], // '('
    [0x06, 0x0C, 0x18, 0x18, 0x18, 0x0C, 0x06, 0x00], // ')'
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // '*'
    [0x00, 0x0C, 0x0C, 0x3F, 0x0C, 0x0C, 0x00, 0x00], // '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ','
    [0x00, 0x00, 0x00, 0x3F, 0x00, 0x00, 0x00, 0x00], // '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x00], // '.'
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00], // '/'
    [0x3E, 0x63, 0x73, 0x7B, 0x6F, 0x67, 0x3E, 0x00], // '0'
    [0x0C, 0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x3F, 0x00], // '1'
    [0x1E, 0x33, 0x30, 0x1C, 0x06, 0x33, 0x3F, 0x00], // '2'
    [0x1E, 0x33, 0x30, 0x1C, 0x30, 0x33, 0x1E, 0x00], // '3'
    [0x38, 0x3C, 0x36, 0x33, 0x7F, 0x30, 0x78, 0x00], // '4'
    [0x3F, 0x03, 0x1F, 0x30, 0x30, 0x33, 0x1E, 0x00], // '5'
    [0x1C, 0x06, 0x03, 0x1F, 0x33, 0x33, 0x1E, 0x00], // '6'
    [0x3F, 0x33, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // '7'
    [0x1E, 0x33, 0x33, 0x1E, 0x33, 0x33, 0x1E, 0x00], // '8'
    [0x1E, 0x33, 0x33, 0x3E, 0x30, 0x18, 0x0E, 0x00], // '9'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x00], // ':'
    [0x00, 0x0C, 0x0C, 0x00, 0x00, 0x0C, 0x0C, 0x06], // ';'
    [0x18, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x18, 0x00], // '<'
    [0x00, 0x00, 0x3F, 0x00, 0x00, 0x3F, 0x00, 0x00], // '='
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // '>'
    [0x1E, 0x33, 0x30, 0x18, 0x0C, 0x00, 0x0C, 0x00], // '?'
    [0x3E, 0x63, 0x7B, 0x7B, 0x7B, 0x03, 0x1E, 0x00], // '@'
    [0x0C, 0x1E, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x00], // 'A'
    [0x3F, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3F, 0x00], // 'B'
    [0x3C, 0x66, 0x03, 0x03, 0x03, 0x66, 0x3C, 0x00], // 'C'
    [0x1F, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1F, 0x00], // 'D'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x46, 0x7F, 0x00], // 'E'
    [0x7F, 0x46, 0x16, 0x1E, 0x16, 0x06, 0x0F, 0x00], // 'F'
    [0x3C, 0x66, 0x03, 0x03, 0x73, 0x66, 0x7C, 0x00], // 'G'
    [0x33, 0x33, 0x33, 0x3F, 0x33, 0x33, 0x33, 0x00], // 'H'
    [0x1E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'I'
    [0x78, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E, 0x00], // 'J'
    [0x67, 0x66, 0x36, 0x1E, 0x36, 0x66, 0x67, 0x00], // 'K'
    [0x0F, 0x06, 0x06, 0x06, 0x46, 0x66, 0x7F, 0x00], // 'L'
    [0x63, 0x77, 0x7F, 0x7F, 0x6B, 0x63, 0x63, 0x00], // 'M'
    [0x63, 0x67, 0x6F, 0x7B, 0x73, 0x63, 0x63, 0x00], // 'N'
    [0x1C, 0x36, 0x63, 0x63, 0x63, 0x36, 0x1C, 0x00], // 'O'
    [0x3F, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x0F, 0x00], // 'P'
    [0x1E, 0x33, 0x33, 0x33, 0x3B, 0x1E, 0x38, 0x00], // 'Q'
    [0x3F, 0x66, 0x66, 0x3E, 0x36, 0x66, 0x67, 0x00], // 'R'
    [0x1E, 0x33, 0x07, 0x0E, 0x38, 0x33, 0x1E, 0x00], // 'S'
    [0x3F, 0x2D, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'T'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x33, 0x3F, 0x00], // 'U'
    [0x33, 0x33, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 'V'
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // 'W'
    [0x63, 0x63, 0x36, 0x1C, 0x1C, 0x36, 0x63, 0x00], // 'X'
    [0x33, 0x33, 0x33, 0x1E, 0x0C, 0x0C, 0x1E, 0x00], // 'Y'
    [0x7F, 0x63, 0x31, 0x18, 0x4C, 0x66, 0x7F, 0x00], // 'Z'
    [0x1E, 0x06, 0x06, 0x06, 0x06, 0x06, 0x1E, 0x00], // '['
    [0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x40, 0x00], // '\\'
    [0x1E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x1E, 0x00], // ']'
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // '_'
    [0x0C, 0x0C, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // '`'
    [0x00, 0x00, 0x1E, 0x30, 0x3E, 0x33, 0x6E, 0x00], // 'a'
    [0x07, 0x06, 0x06, 0x3E, 0x66, 0x66, 0x3B, 0x00], // 'b'
    [0x00, 0x00, 0x1E, 0x33, 0x03, 0x33, 0x1E, 0x00], // 'c'
    [0x38, 0x30, 0x30, 0x3E, 0x33, 0x33, 0x6E, 0x00], // 'd'
    [0x00, 0x00, 0x1E, 0x33, 0x3F, 0x03, 0x1E, 0x00], // 'e'
    [0x1C, 0x36, 0x06, 0x0F, 0x06, 0x06, 0x0F, 0x00], // 'f'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 'g'
    [0x07, 0x06, 0x36, 0x6E, 0x66, 0x66, 0x67, 0x00], // 'h'
    [0x0C, 0x00, 0x0E, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'i'
    [0x30, 0x00, 0x30, 0x30, 0x30, 0x33, 0x33, 0x1E], // 'j'
    [0x07, 0x06, 0x66, 0x36, 0x1E, 0x36, 0x67, 0x00], // 'k'
    [0x0E, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x1E, 0x00], // 'l'
    [0x00, 0x00, 0x33, 0x7F, 0x7F, 0x6B, 0x63, 0x00], // 'm'
    [0x00, 0x00, 0x1F, 0x33, 0x33, 0x33, 0x33, 0x00], // 'n'
    [0x00, 0x00, 0x1E, 0x33, 0x33, 0x33, 0x1E, 0x00], // 'o'
    [0x00, 0x00, 0x3B, 0x66, 0x66, 0x3E, 0x06, 0x0F], // 'p'
    [0x00, 0x00, 0x6E, 0x33, 0x33, 0x3E, 0x30, 0x78], // 'q'
    [0x00, 0x00, 0x3B, 0x6E, 0x66, 0x06, 0x0F, 0x00], // 'r'
    [0x00, 0x00, 0x3E, 0x03, 0x1E, 0x30, 0x1F, 0x00], // 's'
    [0x08, 0x0C, 0x3E, 0x0C, 0x0C, 0x2C, 0x18, 0x00], // 't'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x33, 0x6E, 0x00], // 'u'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x1E, 0x0C, 0x00], // 'v'
    [0x00, 0x00, 0x63, 0x6B, 0x7F, 0x7F, 0x36, 0x00], // 'w'
    [0x00, 0x00, 0x63, 0x36, 0x1C, 0x36, 0x63, 0x00], // 'x'
    [0x00, 0x00, 0x33, 0x33, 0x33, 0x3E, 0x30, 0x1F], // 'y'
    [0x00, 0x00, 0x3F, 0x19, 0x0C, 0x26, 0x3F, 0x00], // 'z'
    [0x38, 0x0C, 0x0C, 0x07, 0x0C, 0x0C, 0x38, 0x00], // '{'
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // '|'
    [0x07, 0x0C, 0x0C, 0x38, 0x0C, 0x0C, 0x07, 0x00], // '}'
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // '~'
];

const fn build_default_font() -> [u8; GLYPH_COUNT * 8] {
    let mut table = [0u8; GLYPH_COUNT * 8];
    let mut glyph = 0;
    while glyph < BASIC_LATIN.len() {
        let mut row = 0;
        while row < 8 {
            table[(0x20 + glyph) * 8 + row] = BASIC_LATIN[glyph][row].reverse_bits();
            row += 1;
        }
        glyph += 1;
    }
    table
}

/// Built-in 8x8 font covering printable ASCII; other codes are blank.
static DEFAULT_FONT: [u8; GLYPH_COUNT * 8] = build_default_font();

/// A 256-glyph monochrome bitmap font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    data: Cow<'static, [u8]>,
    width: u32,
    height: u32,
}

impl Font {
    /// Wrap a glyph table of `256 * ceil(width / 8) * height` bytes.
    ///
    /// # Errors
    ///
    /// Zero dimensions yield [`Error::InvalidDimensions`]; a short table yields
    /// [`Error::BufferTooSmall`].
    pub fn new(data: impl Into<Cow<'static, [u8]>>, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let data = data.into();
        let required = GLYPH_COUNT
            .saturating_mul(width.div_ceil(8) as usize)
            .saturating_mul(height as usize);
        if data.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Glyph width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Glyph height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per glyph row.
    #[must_use]
    pub const fn pitch(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    /// Bytes per glyph.
    #[must_use]
    pub const fn glyph_size(&self) -> usize {
        self.pitch() * self.height as usize
    }

    /// Raw rows of glyph `code`.
    #[must_use]
    pub fn glyph(&self, code: u8) -> &[u8] {
        let start = usize::from(code) * self.glyph_size();
        &self.data[start..start + self.glyph_size()]
    }

    /// True when pixel `(x, y)` of glyph `code` is set.
    #[must_use]
    pub fn is_set(&self, code: u8, x: u32, y: u32) -> bool {
        let row = &self.glyph(code)[y as usize * self.pitch()..];
        row[(x / 8) as usize] & (0x80 >> (x % 8)) != 0
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            data: Cow::Borrowed(&DEFAULT_FONT),
            width: 8,
            height: 8,
        }
    }
}

/// A rendered glyph and the packed color it was rendered in.
#[derive(Debug)]
struct Glyph {
    surface: Surface,
    stamp: u32,
}

/// Per-font cache of rendered glyph surfaces.
#[derive(Debug)]
pub struct GlyphCache {
    font: Font,
    glyphs: Vec<Option<Glyph>>,
}

impl Default for GlyphCache {
    fn default() -> Self {
        Self::new(Font::default())
    }
}

impl GlyphCache {
    /// Create an empty cache for `font`.
    #[must_use]
    pub fn new(font: Font) -> Self {
        Self {
            font,
            glyphs: (0..GLYPH_COUNT).map(|_| None).collect(),
        }
    }

    /// The active font.
    #[must_use]
    pub const fn font(&self) -> &Font {
        &self.font
    }

    /// Install `font`, or the built-in font for `None`, and drop every cached glyph.
    pub fn set_font(&mut self, font: Option<Font>) {
        self.font = font.unwrap_or_default();
        log::debug!("installed {}x{} font", self.font.width, self.font.height);
        self.clear();
    }

    /// Drop every cached glyph.
    pub fn clear(&mut self) {
        self.glyphs.iter_mut().for_each(|g| *g = None);
    }

    /// Number of glyphs currently rendered.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.glyphs.iter().filter(|g| g.is_some()).count()
    }

    /// Rendered surface for `code` in `color`, re-rendering on a color change.
    fn glyph(&mut self, code: u8, color: Rgba) -> Result<&Surface> {
        let stamp = color.to_packed();
        let slot = &mut self.glyphs[usize::from(code)];

        let stale = slot.as_ref().map_or(true, |g| g.stamp != stamp);
        if stale {
            log::trace!("rendering glyph {code:#04x} in {stamp:#010x}");
            let mut surface = match slot.take() {
                Some(old) => old.surface,
                None => Surface::new(self.font.width, self.font.height, PixelFormat::rgba8888())?,
            };
            for y in 0..self.font.height {
                for x in 0..self.font.width {
                    let value = if self.font.is_set(code, x, y) { stamp } else { 0 };
                    surface.write(x as i32, y as i32, value);
                }
            }
            *slot = Some(Glyph { surface, stamp });
        }

        match slot {
            Some(glyph) => Ok(&glyph.surface),
            None => Err(Error::InvalidArgument("glyph slot empty after render")),
        }
    }

    /// Draw glyph `code` with its top-left corner at `(x, y)`.
    ///
    /// Glyph pixels blend with the destination according to the color's alpha;
    /// unset pixels leave it untouched.
    pub fn character<B: PixelBuffer>(&mut self, dst: &mut Surface<B>, x: i32, y: i32, code: u8, color: Rgba) -> Result<()> {
        let (w, h) = (self.font.width as i32, self.font.height as i32);
        let clip = dst.clip_rect();
        if clip.is_empty() || clip.rejects_box(x, y, x.saturating_add(w - 1), y.saturating_add(h - 1)) {
            return Ok(());
        }

        let glyph = self.glyph(code, color)?;
        dst.locked(|s| {
            for gy in 0..h {
                for gx in 0..w {
                    let value = glyph.read(gx, gy);
                    if value & 0xFF == 0 {
                        continue;
                    }
                    pixel_nolock(s, x.saturating_add(gx), y.saturating_add(gy), Rgba::from_packed(value));
                }
            }
            Ok(())
        })
    }

    /// Draw a byte string left to right, advancing by the glyph width.
    ///
    /// Every byte is drawn even if an earlier one fails; the first failure is returned.
    pub fn string<B: PixelBuffer>(
        &mut self,
        dst: &mut Surface<B>,
        x: i32,
        y: i32,
        text: impl AsRef<[u8]>,
        color: Rgba,
    ) -> Result<()> {
        let advance = self.font.width as i32;
        let mut cursor = x;
        let mut result = Ok(());
        for &code in text.as_ref() {
            result = result.and(self.character(dst, cursor, y, code, color));
            cursor = cursor.saturating_add(advance);
        }
        result
    }
}
