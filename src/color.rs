//! Color values and the integer blend formula.
//!
//! Drawing primitives take an [`Rgba`] color. The packed 32-bit form keeps red in
//! the high byte and alpha in the low byte (`0xRRGGBBAA`), which is also the
//! native encoding of glyph surfaces.

/// A straight (non-premultiplied) color, one byte per channel.
///
/// Alpha 255 stores the color as-is; anything lower blends it into the
/// destination with [`blend_channel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity, 0 invisible to 255 solid.
    pub a: u8,
}

impl Rgba {
    /// All channels zero.
    pub const TRANSPARENT: Self = Self::from_packed(0x0000_0000);
    /// Solid black.
    pub const BLACK: Self = Self::from_packed(0x0000_00FF);
    /// Solid white.
    pub const WHITE: Self = Self::from_packed(0xFFFF_FFFF);
    /// Solid red.
    pub const RED: Self = Self::from_packed(0xFF00_00FF);
    /// Solid green.
    pub const GREEN: Self = Self::from_packed(0x00FF_00FF);
    /// Solid blue.
    pub const BLUE: Self = Self::from_packed(0x0000_FFFF);

    /// Color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Solid color from three channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: u8::MAX }
    }

    /// Unpack a `0xRRGGBBAA` value.
    #[must_use]
    pub const fn from_packed(value: u32) -> Self {
        let [r, g, b, a] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Pack into `0xRRGGBBAA`.
    #[must_use]
    pub const fn to_packed(self) -> u32 {
        u32::from_be_bytes(self.to_array())
    }

    /// Channels in `[r, g, b, a]` order.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// True when alpha is 255 and the color can be stored without blending.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == u8::MAX
    }

    /// Scale alpha by a 0-255 coverage weight: `alpha' = (alpha * weight) >> 8`.
    ///
    /// A weight of 255 therefore turns alpha 255 into 254; antialiasing relies on
    /// this exact truncation.
    #[must_use]
    pub const fn weighted(self, weight: u32) -> Self {
        Self {
            a: ((self.a as u32 * weight) >> 8) as u8,
            ..self
        }
    }
}

impl From<u32> for Rgba {
    fn from(value: u32) -> Self {
        Self::from_packed(value)
    }
}

impl From<Rgba> for u32 {
    fn from(color: Rgba) -> Self {
        color.to_packed()
    }
}

/// Blend one channel: `dst + ((src - dst) * alpha) >> 8`.
///
/// The shift is arithmetic, so darkening rounds toward negative infinity. The
/// result is bit-exact with the classic software blitters, including the bias
/// that makes `blend_channel(0, 255, 128) == 127`.
#[inline]
#[must_use]
pub const fn blend_channel(dst: i32, src: i32, alpha: u8) -> i32 {
    dst + (((src - dst) * alpha as i32) >> 8)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_packed_roundtrip(value in any::<u32>()) {
            prop_assert_eq!(Rgba::from_packed(value).to_packed(), value);
        }

        #[test]
        fn prop_blend_stays_between(dst in 0i32..256, src in 0i32..256, alpha in any::<u8>()) {
            let out = blend_channel(dst, src, alpha);
            prop_assert!(out >= dst.min(src) && out <= dst.max(src));
        }
    }
}
