//! Pixel formats, palettes and per-format storage strategies.
//!
//! A [`PixelFormat`] describes how a native pixel value encodes color: bytes per
//! pixel, a bit mask per channel and, for 1-byte formats, a [`Palette`].
//! The storage of native values in the byte buffer is handled by one of four
//! layout strategies, picked once per drawing call so inner loops never branch
//! on the format.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Bit layout of one color channel inside a native pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Channel {
    mask: u32,
    shift: u8,
    loss: u8,
}

impl Channel {
    /// Derive shift and precision loss from a contiguous bit mask.
    #[must_use]
    pub const fn from_mask(mask: u32) -> Self {
        if mask == 0 {
            return Self {
                mask: 0,
                shift: 0,
                loss: 8,
            };
        }
        let bits = mask.count_ones();
        Self {
            mask,
            shift: mask.trailing_zeros() as u8,
            loss: if bits >= 8 { 0 } else { (8 - bits) as u8 },
        }
    }

    /// The channel mask.
    #[must_use]
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    /// Bit position of the channel's least significant bit.
    #[must_use]
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Bits dropped when narrowing an 8-bit component into the channel.
    #[must_use]
    pub const fn loss(&self) -> u8 {
        self.loss
    }

    /// True when the format carries this channel.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.mask != 0
    }

    /// Place an 8-bit component into the channel.
    #[inline]
    #[must_use]
    pub const fn pack(&self, value: u8) -> u32 {
        if self.mask == 0 {
            return 0;
        }
        ((value as u32 >> self.loss) << self.shift) & self.mask
    }

    /// Widen the channel back to an 8-bit component.
    #[inline]
    #[must_use]
    pub const fn unpack(&self, pixel: u32) -> u8 {
        if self.mask == 0 {
            return 0;
        }
        (((pixel & self.mask) >> self.shift) << self.loss) as u8
    }

    /// The channel's raw (unwidened) value.
    #[inline]
    pub(crate) const fn raw(&self, pixel: u32) -> i32 {
        ((pixel & self.mask) >> self.shift) as i32
    }

    /// Place a raw channel value back into position.
    #[inline]
    pub(crate) const fn from_raw(&self, raw: i32) -> u32 {
        ((raw as u32) << self.shift) & self.mask
    }
}

/// Color table for 1-byte pixel formats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette; alpha components are ignored and at most 256 entries are kept.
    #[must_use]
    pub fn new(mut colors: Vec<Rgba>) -> Self {
        colors.truncate(256);
        for c in &mut colors {
            c.a = 255;
        }
        Self { colors }
    }

    /// A 256-level gray ramp.
    #[must_use]
    pub fn grayscale() -> Self {
        Self::new((0..=255u8).map(|v| Rgba::rgb(v, v, v)).collect())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True when the palette has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All entries.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Color at `index`; indices past the end read as opaque black.
    #[must_use]
    pub fn get(&self, index: u8) -> Rgba {
        self.colors
            .get(usize::from(index))
            .copied()
            .unwrap_or(Rgba::BLACK)
    }

    /// Index of the closest entry by squared RGB distance; the first of equally
    /// close entries wins.
    #[must_use]
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> u8 {
        let mut best = 0usize;
        let mut smallest = u32::MAX;
        for (i, c) in self.colors.iter().enumerate() {
            let dr = i32::from(r) - i32::from(c.r);
            let dg = i32::from(g) - i32::from(c.g);
            let db = i32::from(b) - i32::from(c.b);
            let distance = (dr * dr + dg * dg + db * db) as u32;
            if distance < smallest {
                best = i;
                if distance == 0 {
                    break;
                }
                smallest = distance;
            }
        }
        best as u8
    }
}

/// Storage class of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    /// 1 byte per pixel, palette index.
    Indexed8,
    /// 2 bytes per pixel, native-endian `u16`.
    Packed16,
    /// 3 bytes per pixel.
    Packed24,
    /// 4 bytes per pixel, native-endian `u32`.
    Packed32,
}

impl PixelKind {
    /// Bytes occupied by one pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Indexed8 => 1,
            Self::Packed16 => 2,
            Self::Packed24 => 3,
            Self::Packed32 => 4,
        }
    }
}

/// Full description of a native pixel encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFormat {
    kind: PixelKind,
    r: Channel,
    g: Channel,
    b: Channel,
    a: Channel,
    palette: Option<Palette>,
}

impl PixelFormat {
    /// 8-bit indexed format.
    #[must_use]
    pub fn indexed8(palette: Palette) -> Self {
        Self {
            kind: PixelKind::Indexed8,
            r: Channel::default(),
            g: Channel::default(),
            b: Channel::default(),
            a: Channel::default(),
            palette: Some(palette),
        }
    }

    /// Packed format with explicit channel masks. `bytes_per_pixel` must be 2, 3 or 4;
    /// 1-byte formats are created with [`PixelFormat::indexed8`].
    pub fn from_masks(bytes_per_pixel: u8, rmask: u32, gmask: u32, bmask: u32, amask: u32) -> Result<Self> {
        let kind = match bytes_per_pixel {
            2 => PixelKind::Packed16,
            3 => PixelKind::Packed24,
            4 => PixelKind::Packed32,
            other => {
                return Err(Error::InvalidFormat(format!(
                    "{other} bytes per pixel needs a palette or is unsupported"
                )))
            }
        };
        let all = rmask | gmask | bmask | amask;
        if bytes_per_pixel < 4 && all >> (u32::from(bytes_per_pixel) * 8) != 0 {
            return Err(Error::InvalidFormat(format!(
                "channel masks {all:#010x} exceed {bytes_per_pixel} bytes"
            )));
        }
        if rmask & gmask != 0 || (rmask | gmask) & bmask != 0 || (rmask | gmask | bmask) & amask != 0 {
            return Err(Error::InvalidFormat("overlapping channel masks".into()));
        }
        Ok(Self {
            kind,
            r: Channel::from_mask(rmask),
            g: Channel::from_mask(gmask),
            b: Channel::from_mask(bmask),
            a: Channel::from_mask(amask),
            palette: None,
        })
    }

    const fn packed(kind: PixelKind, rmask: u32, gmask: u32, bmask: u32, amask: u32) -> Self {
        Self {
            kind,
            r: Channel::from_mask(rmask),
            g: Channel::from_mask(gmask),
            b: Channel::from_mask(bmask),
            a: Channel::from_mask(amask),
            palette: None,
        }
    }

    /// 16-bit 5-6-5 RGB.
    #[must_use]
    pub const fn rgb565() -> Self {
        Self::packed(PixelKind::Packed16, 0xF800, 0x07E0, 0x001F, 0)
    }

    /// 24-bit RGB, red in the high byte of the native value.
    #[must_use]
    pub const fn rgb888() -> Self {
        Self::packed(PixelKind::Packed24, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0)
    }

    /// 32-bit RGB without alpha.
    #[must_use]
    pub const fn xrgb8888() -> Self {
        Self::packed(PixelKind::Packed32, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0)
    }

    /// 32-bit ARGB.
    #[must_use]
    pub const fn argb8888() -> Self {
        Self::packed(PixelKind::Packed32, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000)
    }

    /// 32-bit RGBA with red in the high byte; native values equal [`Rgba::to_packed`].
    #[must_use]
    pub const fn rgba8888() -> Self {
        Self::packed(PixelKind::Packed32, 0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF)
    }

    /// 32-bit ABGR with red in the low byte (bytes R, G, B, A in memory on
    /// little-endian targets). The resampler's canonical format.
    #[must_use]
    pub const fn abgr8888() -> Self {
        Self::packed(PixelKind::Packed32, 0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000)
    }

    /// Storage class.
    #[must_use]
    pub const fn kind(&self) -> PixelKind {
        self.kind
    }

    /// Bytes per pixel (1 to 4).
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.kind.bytes_per_pixel()
    }

    /// Red channel layout.
    #[must_use]
    pub const fn red(&self) -> Channel {
        self.r
    }

    /// Green channel layout.
    #[must_use]
    pub const fn green(&self) -> Channel {
        self.g
    }

    /// Blue channel layout.
    #[must_use]
    pub const fn blue(&self) -> Channel {
        self.b
    }

    /// Alpha channel layout (mask 0 when absent).
    #[must_use]
    pub const fn alpha(&self) -> Channel {
        self.a
    }

    /// Palette of an indexed format.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// Replace the palette of an indexed format; ignored for packed formats.
    pub fn set_palette(&mut self, palette: Palette) {
        if self.kind == PixelKind::Indexed8 {
            self.palette = Some(palette);
        }
    }

    /// Map a color to the native encoding.
    ///
    /// Indexed formats return the nearest palette entry; packed formats drop the
    /// low bits of narrow channels and omit alpha when the format has none.
    #[must_use]
    pub fn map_rgba(&self, color: Rgba) -> u32 {
        match self.kind {
            PixelKind::Indexed8 => self
                .palette
                .as_ref()
                .map_or(0, |p| u32::from(p.nearest(color.r, color.g, color.b))),
            _ => self.r.pack(color.r) | self.g.pack(color.g) | self.b.pack(color.b) | self.a.pack(color.a),
        }
    }

    /// Decode a native value; formats without alpha report 255.
    #[must_use]
    pub fn get_rgba(&self, pixel: u32) -> Rgba {
        match self.kind {
            PixelKind::Indexed8 => self
                .palette
                .as_ref()
                .map_or(Rgba::BLACK, |p| p.get(pixel as u8)),
            _ => Rgba::new(
                self.r.unpack(pixel),
                self.g.unpack(pixel),
                self.b.unpack(pixel),
                if self.a.is_present() { self.a.unpack(pixel) } else { 255 },
            ),
        }
    }

    /// Blend native `src` over native `dst` with `alpha`.
    ///
    /// Packed formats blend each present channel in its raw bit width with
    /// `dst + ((src - dst) * alpha) >> 8`; bits outside the channel masks are
    /// cleared. Indexed formats blend the palette colors and map the result back
    /// to the nearest entry.
    #[must_use]
    pub fn blend(&self, dst: u32, src: u32, alpha: u8) -> u32 {
        use crate::color::blend_channel;

        if alpha == 255 {
            return src;
        }
        match self.kind {
            PixelKind::Indexed8 => {
                let Some(palette) = self.palette.as_ref() else {
                    return src;
                };
                let d = palette.get(dst as u8);
                let s = palette.get(src as u8);
                let r = blend_channel(i32::from(d.r), i32::from(s.r), alpha);
                let g = blend_channel(i32::from(d.g), i32::from(s.g), alpha);
                let b = blend_channel(i32::from(d.b), i32::from(s.b), alpha);
                u32::from(palette.nearest(r as u8, g as u8, b as u8))
            }
            _ => {
                let mix = |ch: Channel| ch.from_raw(blend_channel(ch.raw(dst), ch.raw(src), alpha));
                let a = if self.a.is_present() { mix(self.a) } else { 0 };
                mix(self.r) | mix(self.g) | mix(self.b) | a
            }
        }
    }
}

// ============================================================================
// Storage strategies
// ============================================================================

/// Reads and writes one native value in a pixel's byte slot.
///
/// Implemented by zero-sized strategy types; generic hot loops are instantiated
/// once per strategy.
pub(crate) trait PixelLayout {
    /// Bytes per pixel.
    const BPP: usize;

    /// Read the native value from exactly `BPP` bytes.
    fn read(bytes: &[u8]) -> u32;

    /// Write the native value into exactly `BPP` bytes.
    fn write(bytes: &mut [u8], value: u32);

    /// Store `value` into every pixel of a contiguous run.
    #[inline]
    fn fill(bytes: &mut [u8], value: u32) {
        for px in bytes.chunks_exact_mut(Self::BPP) {
            Self::write(px, value);
        }
    }
}

/// 1-byte palette index.
pub(crate) struct Indexed8;
/// Native-endian `u16`.
pub(crate) struct Packed16;
/// Three bytes in platform byte order.
pub(crate) struct Packed24;
/// Native-endian `u32`.
pub(crate) struct Packed32;

impl PixelLayout for Indexed8 {
    const BPP: usize = 1;

    #[inline]
    fn read(bytes: &[u8]) -> u32 {
        u32::from(bytes[0])
    }

    #[inline]
    fn write(bytes: &mut [u8], value: u32) {
        bytes[0] = value as u8;
    }

    #[inline]
    fn fill(bytes: &mut [u8], value: u32) {
        bytes.fill(value as u8);
    }
}

impl PixelLayout for Packed16 {
    const BPP: usize = 2;

    #[inline]
    fn read(bytes: &[u8]) -> u32 {
        u32::from(u16::from_ne_bytes([bytes[0], bytes[1]]))
    }

    #[inline]
    fn write(bytes: &mut [u8], value: u32) {
        bytes[..2].copy_from_slice(&(value as u16).to_ne_bytes());
    }
}

impl PixelLayout for Packed24 {
    const BPP: usize = 3;

    #[inline]
    fn read(bytes: &[u8]) -> u32 {
        if cfg!(target_endian = "little") {
            u32::from(bytes[0]) | (u32::from(bytes[1]) << 8) | (u32::from(bytes[2]) << 16)
        } else {
            (u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 8) | u32::from(bytes[2])
        }
    }

    #[inline]
    fn write(bytes: &mut [u8], value: u32) {
        let [b0, b1, b2, _] = value.to_le_bytes();
        if cfg!(target_endian = "little") {
            bytes[..3].copy_from_slice(&[b0, b1, b2]);
        } else {
            bytes[..3].copy_from_slice(&[b2, b1, b0]);
        }
    }
}

impl PixelLayout for Packed32 {
    const BPP: usize = 4;

    #[inline]
    fn read(bytes: &[u8]) -> u32 {
        u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    #[inline]
    fn write(bytes: &mut [u8], value: u32) {
        bytes[..4].copy_from_slice(&value.to_ne_bytes());
    }
}

/// Run `$body` with `$layout` bound to the storage strategy of `$kind`.
macro_rules! with_layout {
    ($kind:expr, $layout:ident => $body:expr) => {
        match $kind {
            $crate::format::PixelKind::Indexed8 => {
                type $layout = $crate::format::Indexed8;
                $body
            }
            $crate::format::PixelKind::Packed16 => {
                type $layout = $crate::format::Packed16;
                $body
            }
            $crate::format::PixelKind::Packed24 => {
                type $layout = $crate::format::Packed24;
                $body
            }
            $crate::format::PixelKind::Packed32 => {
                type $layout = $crate::format::Packed32;
                $body
            }
        }
    };
}
pub(crate) use with_layout;

/// Read a native value at byte offset `offset` for any storage class.
#[inline]
pub(crate) fn read_native(kind: PixelKind, bytes: &[u8], offset: usize) -> u32 {
    with_layout!(kind, L => L::read(&bytes[offset..offset + L::BPP]))
}

/// Write a native value at byte offset `offset` for any storage class.
#[inline]
pub(crate) fn write_native(kind: PixelKind, bytes: &mut [u8], offset: usize, value: u32) {
    with_layout!(kind, L => L::write(&mut bytes[offset..offset + L::BPP], value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_mask() {
        let r = Channel::from_mask(0xF800);
        assert_eq!(r.shift(), 11);
        assert_eq!(r.loss(), 3);
        assert_eq!(r.pack(255), 0xF800);
        assert_eq!(r.unpack(0xF800), 248);

        let none = Channel::from_mask(0);
        assert!(!none.is_present());
        assert_eq!(none.pack(200), 0);
    }

    #[test]
    fn test_map_and_get_rgba8888() {
        let fmt = PixelFormat::rgba8888();
        let c = Rgba::new(1, 2, 3, 4);
        assert_eq!(fmt.map_rgba(c), c.to_packed());
        assert_eq!(fmt.get_rgba(0x0102_0304), c);
    }

    #[test]
    fn test_map_without_alpha_reports_opaque() {
        let fmt = PixelFormat::xrgb8888();
        let native = fmt.map_rgba(Rgba::new(10, 20, 30, 40));
        assert_eq!(native, 0x000A_141E);
        assert_eq!(fmt.get_rgba(native), Rgba::rgb(10, 20, 30));
    }

    #[test]
    fn test_rgb565_precision() {
        let fmt = PixelFormat::rgb565();
        let native = fmt.map_rgba(Rgba::rgb(255, 255, 255));
        assert_eq!(native, 0xFFFF);
        assert_eq!(fmt.get_rgba(native), Rgba::rgb(248, 252, 248));
    }

    #[test]
    fn test_from_masks_validation() {
        assert!(PixelFormat::from_masks(1, 0xE0, 0x1C, 0x03, 0).is_err());
        assert!(PixelFormat::from_masks(2, 0xFF_0000, 0xFF00, 0xFF, 0).is_err());
        assert!(PixelFormat::from_masks(4, 0xFF, 0xFF, 0, 0).is_err());
        let fmt = PixelFormat::from_masks(4, 0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000).unwrap();
        assert_eq!(fmt, PixelFormat::abgr8888());
    }

    #[test]
    fn test_palette_nearest() {
        let pal = Palette::new(vec![Rgba::BLACK, Rgba::RED, Rgba::WHITE, Rgba::RED]);
        assert_eq!(pal.nearest(250, 10, 5), 1);
        assert_eq!(pal.nearest(200, 200, 200), 2);
        assert_eq!(pal.nearest(0, 0, 0), 0);
        assert_eq!(pal.get(200), Rgba::BLACK);
    }

    #[test]
    fn test_blend_packed_bias() {
        let fmt = PixelFormat::xrgb8888();
        let out = fmt.blend(fmt.map_rgba(Rgba::BLACK), fmt.map_rgba(Rgba::RED), 128);
        assert_eq!(fmt.get_rgba(out), Rgba::rgb(127, 0, 0));
    }

    #[test]
    fn test_blend_alpha_channel() {
        let fmt = PixelFormat::rgba8888();
        let out = fmt.blend(0x0000_0000, 0xFF00_00FF, 128);
        assert_eq!(Rgba::from_packed(out), Rgba::new(127, 0, 0, 127));
    }

    #[test]
    fn test_blend_indexed() {
        let pal = Palette::grayscale();
        let fmt = PixelFormat::indexed8(pal);
        assert_eq!(fmt.blend(0, 255, 128), 127);
        assert_eq!(fmt.blend(0, 255, 255), 255);
    }

    #[test]
    fn test_layout_roundtrip() {
        let mut buf = [0u8; 4];
        Packed24::write(&mut buf, 0x00AB_CDEF);
        assert_eq!(Packed24::read(&buf), 0x00AB_CDEF);
        assert_eq!(buf[3], 0);

        Packed16::write(&mut buf, 0x1234);
        assert_eq!(Packed16::read(&buf), 0x1234);

        Packed32::write(&mut buf, 0xDEAD_BEEF);
        assert_eq!(read_native(PixelKind::Packed32, &buf, 0), 0xDEAD_BEEF);
    }

    #[test]
    fn test_layout_fill() {
        let mut buf = [0u8; 9];
        Packed24::fill(&mut buf, 0x0001_0203);
        assert_eq!(Packed24::read(&buf[6..9]), 0x0001_0203);

        let mut idx = [0u8; 5];
        write_native(PixelKind::Indexed8, &mut idx, 2, 7);
        Indexed8::fill(&mut idx[3..], 9);
        assert_eq!(idx, [0, 0, 7, 9, 9]);
    }
}
