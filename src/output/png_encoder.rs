//! PNG export of surfaces as 8-bit RGBA.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::surface::{PixelBuffer, Surface};

/// Writes surfaces as RGBA8 PNG images, decoding every pixel through the
/// surface's own format.
pub struct PngEncoder;

impl PngEncoder {
    fn encode<B: PixelBuffer, W: Write>(surface: &Surface<B>, sink: W) -> Result<()> {
        let mut encoder = png::Encoder::new(sink, surface.width(), surface.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&surface.to_rgba8())?;
        writer.finish()?;
        Ok(())
    }

    /// Write `surface` to a PNG file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<B: PixelBuffer, P: AsRef<Path>>(surface: &Surface<B>, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Self::encode(surface, BufWriter::new(file))?;
        log::debug!("wrote {}x{} PNG to {}", surface.width(), surface.height(), path.display());
        Ok(())
    }

    /// Encode `surface` to PNG bytes in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes<B: PixelBuffer>(surface: &Surface<B>) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        Self::encode(surface, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::format::{Palette, PixelFormat};
    use crate::render::pixel;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(bytes);
        let mut reader = decoder.read_info().unwrap();
        let mut data = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut data).unwrap();
        data.truncate(info.buffer_size());
        (info, data)
    }

    #[test]
    fn test_png_magic() {
        let mut s = Surface::new(10, 10, PixelFormat::rgba8888()).unwrap();
        s.clear(Rgba::RED);
        let bytes = PngEncoder::to_bytes(&s).unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_decoded_pixels_match() {
        // odd width exercises row padding in the source
        let mut s = Surface::new(3, 2, PixelFormat::rgb888()).unwrap();
        pixel(&mut s, 2, 1, Rgba::rgb(10, 20, 30)).unwrap();
        let (info, data) = decode(&PngEncoder::to_bytes(&s).unwrap());
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgba);
        assert_eq!(&data[20..24], &[10, 20, 30, 255]);
        assert_eq!(&data[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_indexed_surface_decodes_through_palette() {
        let mut s = Surface::new(2, 1, PixelFormat::indexed8(Palette::new(vec![Rgba::BLACK, Rgba::GREEN]))).unwrap();
        s.fill(1);
        let (_, data) = decode(&PngEncoder::to_bytes(&s).unwrap());
        assert_eq!(data, vec![0, 255, 0, 255, 0, 255, 0, 255]);
    }
}
