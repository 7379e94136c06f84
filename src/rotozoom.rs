//! Affine resampler: zoom and rotate+zoom into a new surface.
//!
//! Sources with 4 bytes per pixel are resampled in their own format. Indexed
//! sources produce an indexed destination with the same palette and color key;
//! they are always sampled nearest. Every other format is first converted to
//! [`PixelFormat::abgr8888`].
//!
//! Source coordinates are tracked in 16.16 accumulators. The integer part
//! (`>> 16`) of each table entry is the run of source pixels to advance when
//! moving to the next destination pixel, and the low 16 bits weight the
//! bilinear blend. The advances are summed into a source index rather than a
//! moving pointer, which selects the same pixels and lets flips mirror the
//! index. Zoom factors are clamped to at least 0.001 in magnitude; a negative
//! factor mirrors that axis.

use crate::error::Result;
use crate::fixed::{deg_to_rad, Fixed};
use crate::format::{PixelFormat, PixelKind};
use crate::surface::{try_vec, PixelBuffer, Surface};

/// Smallest zoom magnitude and the angle below which rotation is skipped.
const VALUE_LIMIT: Fixed = Fixed::from_raw(0x0041_8937);

/// Sampling filter for the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Copy the source pixel under the sample point.
    #[default]
    Nearest,
    /// Blend the 2x2 neighborhood with 16-bit weights. 32-bit sources only.
    Bilinear,
}

/// Sanitized zoom factors.
#[derive(Debug, Clone, Copy)]
struct Zoom {
    x: Fixed,
    y: Fixed,
    flip_x: bool,
    flip_y: bool,
}

impl Zoom {
    fn new(zoomx: f64, zoomy: f64) -> Self {
        let (x, flip_x) = Self::axis(zoomx);
        let (y, flip_y) = Self::axis(zoomy);
        Self { x, y, flip_x, flip_y }
    }

    fn axis(zoom: f64) -> (Fixed, bool) {
        let z = Fixed::from_f64(zoom);
        (z.abs().max(VALUE_LIMIT), z < Fixed::ZERO)
    }

    fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |len: u32, zoom: Fixed| (Fixed::from_i64(i64::from(len)) * zoom).to_int().max(1) as u32;
        (scale(width, self.x), scale(height, self.y))
    }
}

/// Rotation terms for one call.
#[derive(Debug, Clone, Copy)]
struct Rotation {
    sin: Fixed,
    cos: Fixed,
}

impl Rotation {
    /// `None` when the angle is too small to matter.
    fn new(angle: f64) -> Option<Self> {
        let angle = Fixed::from_f64(angle);
        if angle.abs() <= VALUE_LIMIT {
            return None;
        }
        let rad = deg_to_rad(angle);
        Some(Self {
            sin: rad.sin(),
            cos: rad.cos(),
        })
    }

    /// Even-sized box enclosing the rotated, scaled source rectangle.
    fn bounding_size(&self, width: u32, height: u32, zoom: &Zoom) -> (u32, u32) {
        let x = Fixed::from_i64(i64::from(width >> 1));
        let y = Fixed::from_i64(i64::from(height >> 1));
        let cx = self.cos * zoom.x * x;
        let sy = self.sin * zoom.y * y;
        let sx = self.sin * zoom.x * x;
        let cy = self.cos * zoom.y * y;

        let half_w = (cx + sy).abs().max((cx - sy).abs()).ceil().max(1);
        let half_h = (sx + cy).abs().max((sx - cy).abs()).ceil().max(1);
        ((half_w as u32).saturating_mul(2), (half_h as u32).saturating_mul(2))
    }
}

/// Destination size of [`zoom_surface`].
#[must_use]
pub fn zoom_surface_size(width: u32, height: u32, zoomx: f64, zoomy: f64) -> (u32, u32) {
    Zoom::new(zoomx, zoomy).scaled_size(width, height)
}

/// Destination size of [`rotozoom_surface`].
#[must_use]
pub fn rotozoom_surface_size(width: u32, height: u32, angle: f64, zoom: f64) -> (u32, u32) {
    rotozoom_surface_size_xy(width, height, angle, zoom, zoom)
}

/// Destination size of [`rotozoom_surface_xy`].
///
/// For angles within 0.001 degrees of zero this is the plain zoom size.
#[must_use]
pub fn rotozoom_surface_size_xy(width: u32, height: u32, angle: f64, zoomx: f64, zoomy: f64) -> (u32, u32) {
    let zoom = Zoom::new(zoomx, zoomy);
    match Rotation::new(angle) {
        Some(rotation) => rotation.bounding_size(width, height, &zoom),
        None => zoom.scaled_size(width, height),
    }
}

/// Scale `src` by independent horizontal and vertical factors.
///
/// # Errors
///
/// Fails when the source cannot be locked or a buffer cannot be allocated.
///
/// # Example
///
/// ```
/// use softgfx::prelude::*;
///
/// let mut src = Surface::new(10, 4, PixelFormat::rgba8888()).unwrap();
/// let dst = zoom_surface(&mut src, 2.0, 0.5, Filter::Bilinear).unwrap();
/// assert_eq!((dst.width(), dst.height()), (20, 2));
/// ```
pub fn zoom_surface<B: PixelBuffer>(src: &mut Surface<B>, zoomx: f64, zoomy: f64, filter: Filter) -> Result<Surface> {
    resample(src, None, Zoom::new(zoomx, zoomy), filter)
}

/// Rotate `src` counter-clockwise by `angle` degrees and scale it uniformly.
///
/// # Errors
///
/// Fails when the source cannot be locked or a buffer cannot be allocated.
pub fn rotozoom_surface<B: PixelBuffer>(src: &mut Surface<B>, angle: f64, zoom: f64, filter: Filter) -> Result<Surface> {
    rotozoom_surface_xy(src, angle, zoom, zoom, filter)
}

/// Rotate `src` by `angle` degrees after scaling each axis independently.
///
/// The destination is the smallest even-sized box containing the whole
/// transformed source; uncovered pixels are zero, or the color key for
/// indexed sources.
///
/// # Errors
///
/// Fails when the source cannot be locked or a buffer cannot be allocated.
pub fn rotozoom_surface_xy<B: PixelBuffer>(
    src: &mut Surface<B>,
    angle: f64,
    zoomx: f64,
    zoomy: f64,
    filter: Filter,
) -> Result<Surface> {
    resample(src, Rotation::new(angle), Zoom::new(zoomx, zoomy), filter)
}

fn resample<B: PixelBuffer>(src: &mut Surface<B>, rotation: Option<Rotation>, zoom: Zoom, filter: Filter) -> Result<Surface> {
    src.locked(|s| match s.format().kind() {
        PixelKind::Packed32 | PixelKind::Indexed8 => transform(s, rotation, zoom, filter),
        _ => {
            log::debug!("converting {:?} source to abgr8888 for resampling", s.format().kind());
            transform(&s.convert(PixelFormat::abgr8888())?, rotation, zoom, filter)
        }
    })
}

fn transform<S: PixelBuffer>(src: &Surface<S>, rotation: Option<Rotation>, zoom: Zoom, filter: Filter) -> Result<Surface> {
    let indexed = src.format().kind() == PixelKind::Indexed8;
    let filter = if indexed { Filter::Nearest } else { filter };

    let (width, height) = match rotation {
        Some(r) => r.bounding_size(src.width(), src.height(), &zoom),
        None => zoom.scaled_size(src.width(), src.height()),
    };
    log::debug!(
        "resampling {}x{} -> {}x{} ({:?}, zoom {}x{}, rotated: {})",
        src.width(),
        src.height(),
        width,
        height,
        filter,
        zoom.x,
        zoom.y,
        rotation.is_some()
    );

    let mut dst = Surface::new(width, height, src.format().clone())?;
    if indexed {
        dst.set_color_key(src.color_key());
    }

    match (rotation, filter) {
        (None, Filter::Nearest) => zoom_nearest(src, &mut dst, &zoom)?,
        (None, Filter::Bilinear) => zoom_bilinear(src, &mut dst, &zoom)?,
        (Some(r), _) => {
            if indexed {
                dst.fill(src.color_key().unwrap_or(0) & 0xFF);
            }
            rotate(src, &mut dst, &r, &zoom, filter);
        }
    }
    Ok(dst)
}

/// Build the 16.16 accumulator table for one axis: entry `i` carries the
/// fraction at destination pixel `i` in its low 16 bits and, in its high bits,
/// the whole source pixels to advance when leaving pixel `i - 1`.
fn accumulators(len: u32, step: i32) -> Result<Vec<i32>> {
    let mut table = try_vec(len as usize + 1, 0i32)?;
    let mut acc = 0i32;
    for entry in &mut table {
        *entry = acc;
        acc &= 0xFFFF;
        acc += step;
    }
    Ok(table)
}

/// Source pixel index for each destination pixel plus its 16-bit fraction.
fn positions(table: &[i32]) -> impl Iterator<Item = (i32, i32)> + '_ {
    table.windows(2).scan(0i32, |index, w| {
        let current = (*index, w[0] & 0xFFFF);
        *index += w[1] >> 16;
        Some(current)
    })
}

/// Mirror `index` on a flipped axis and keep it inside `[0, len)`.
#[inline]
fn source_index(index: i32, len: i32, flip: bool) -> i32 {
    let index = index.clamp(0, len - 1);
    if flip {
        len - 1 - index
    } else {
        index
    }
}

fn step(src_len: u32, dst_len: u32) -> i32 {
    ((65536 * i64::from(src_len)) / i64::from(dst_len)) as i32
}

fn zoom_nearest<S: PixelBuffer>(src: &Surface<S>, dst: &mut Surface, zoom: &Zoom) -> Result<()> {
    let (sw, sh) = (src.width() as i32, src.height() as i32);
    let sax = accumulators(dst.width(), step(src.width(), dst.width()))?;
    let say = accumulators(dst.height(), step(src.height(), dst.height()))?;

    for (y, (ry, _)) in positions(&say).enumerate() {
        let sy = source_index(ry, sh, zoom.flip_y);
        for (x, (rx, _)) in positions(&sax).enumerate() {
            let sx = source_index(rx, sw, zoom.flip_x);
            dst.write(x as i32, y as i32, src.read(sx, sy));
        }
    }
    Ok(())
}

fn bilinear_step(src_len: u32, dst_len: u32) -> i32 {
    if dst_len <= 1 {
        0
    } else {
        ((65536 * (i64::from(src_len) - 1)) / (i64::from(dst_len) - 1)) as i32
    }
}

/// Blend the four neighbors byte by byte with 16-bit weights.
#[inline]
fn interpolate(c00: u32, c01: u32, c10: u32, c11: u32, ex: i32, ey: i32) -> u32 {
    let (a, b, c, d) = (c00.to_ne_bytes(), c01.to_ne_bytes(), c10.to_ne_bytes(), c11.to_ne_bytes());
    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let (a, b, c, d) = (i32::from(a[i]), i32::from(b[i]), i32::from(c[i]), i32::from(d[i]));
        let t1 = ((((b - a) * ex) >> 16) + a) & 0xFF;
        let t2 = ((((d - c) * ex) >> 16) + c) & 0xFF;
        *channel = ((((t2 - t1) * ey) >> 16) + t1) as u8;
    }
    u32::from_ne_bytes(out)
}

/// Bilinear sample with the 2x2 neighborhood anchored at `(ix, iy)`.
///
/// Neighbors past the source edge repeat the edge pixel. On a flipped axis the
/// neighborhood is taken from the mirrored source.
#[inline]
fn sample_bilinear<S: PixelBuffer>(src: &Surface<S>, ix: i32, iy: i32, ex: i32, ey: i32, zoom: &Zoom) -> u32 {
    let (sw, sh) = (src.width() as i32, src.height() as i32);
    let x0 = source_index(ix, sw, zoom.flip_x);
    let x1 = source_index(ix + 1, sw, zoom.flip_x);
    let y0 = source_index(iy, sh, zoom.flip_y);
    let y1 = source_index(iy + 1, sh, zoom.flip_y);
    interpolate(src.read(x0, y0), src.read(x1, y0), src.read(x0, y1), src.read(x1, y1), ex, ey)
}

fn zoom_bilinear<S: PixelBuffer>(src: &Surface<S>, dst: &mut Surface, zoom: &Zoom) -> Result<()> {
    let sax = accumulators(dst.width(), bilinear_step(src.width(), dst.width()))?;
    let say = accumulators(dst.height(), bilinear_step(src.height(), dst.height()))?;

    for (y, (ry, ey)) in positions(&say).enumerate() {
        for (x, (rx, ex)) in positions(&sax).enumerate() {
            let value = sample_bilinear(src, rx, ry, ex, ey, zoom);
            dst.write(x as i32, y as i32, value);
        }
    }
    Ok(())
}

/// `65536 * value / zoom`, the per-pixel source increment of one rotation term.
fn rotation_step(value: Fixed, zoom: Fixed) -> i64 {
    i64::from((Fixed::from_int(65536) * value / zoom).to_int())
}

/// Inverse-map every destination pixel into the source.
fn rotate<S: PixelBuffer>(src: &Surface<S>, dst: &mut Surface, rotation: &Rotation, zoom: &Zoom, filter: Filter) {
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
    let (dw, dh) = (dst.width() as i32, dst.height() as i32);
    let (cx, cy) = (i64::from(dw / 2), i64::from(dh / 2));

    let icos_x = rotation_step(rotation.cos, zoom.x);
    let isin_x = rotation_step(rotation.sin, zoom.x);
    let icos_y = rotation_step(rotation.cos, zoom.y);
    let isin_y = rotation_step(rotation.sin, zoom.y);

    for y in 0..dh {
        let v = i64::from(y) - cy;
        let mut sdx = (sw << 15) - cx * icos_x - v * isin_x;
        let mut sdy = (sh << 15) - cx * isin_y + v * icos_y;
        for x in 0..dw {
            let (ix, iy) = (sdx >> 16, sdy >> 16);
            match filter {
                Filter::Nearest => {
                    if (0..sw).contains(&ix) && (0..sh).contains(&iy) {
                        let sx = source_index(ix as i32, sw as i32, zoom.flip_x);
                        let sy = source_index(iy as i32, sh as i32, zoom.flip_y);
                        dst.write(x, y, src.read(sx, sy));
                    }
                }
                Filter::Bilinear => {
                    if (-1..sw).contains(&ix) && (-1..sh).contains(&iy) {
                        let (ex, ey) = ((sdx & 0xFFFF) as i32, (sdy & 0xFFFF) as i32);
                        let value = sample_bilinear(src, ix as i32, iy as i32, ex, ey, zoom);
                        dst.write(x, y, value);
                    }
                }
            }
            sdx += icos_x;
            sdy += isin_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::format::Palette;
    use crate::render::pixel;

    fn gradient(width: u32, height: u32) -> Surface {
        let mut s = Surface::new(width, height, PixelFormat::rgba8888()).unwrap();
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                pixel(&mut s, x, y, Rgba::rgb((x * 20) as u8, (y * 20) as u8, 90)).unwrap();
            }
        }
        s
    }

    fn checkerboard() -> Surface {
        let mut s = Surface::new(4, 4, PixelFormat::xrgb8888()).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let color = if (x + y) % 2 == 0 { Rgba::WHITE } else { Rgba::BLACK };
                pixel(&mut s, x, y, color).unwrap();
            }
        }
        s
    }

    fn same_pixels(a: &Surface, b: &Surface) -> bool {
        a.width() == b.width()
            && a.height() == b.height()
            && (0..a.height() as i32).all(|y| (0..a.width() as i32).all(|x| a.get_pixel(x, y) == b.get_pixel(x, y)))
    }

    #[test]
    fn test_zoom_size() {
        assert_eq!(zoom_surface_size(10, 20, 2.0, 0.5), (20, 10));
        assert_eq!(zoom_surface_size(10, 20, -1.5, 1.0), (15, 20));
        assert_eq!(zoom_surface_size(10, 20, 0.0, 0.0), (1, 1));
        assert_eq!(zoom_surface_size(3, 3, 0.1, 0.1), (1, 1));
    }

    #[test]
    fn test_rotozoom_size() {
        assert_eq!(rotozoom_surface_size(10, 6, 0.0, 1.0), (10, 6));
        let (w, h) = rotozoom_surface_size(10, 6, 90.0, 1.0);
        assert!((6..=8).contains(&w) && (10..=12).contains(&h), "{w}x{h}");
        let (w, h) = rotozoom_surface_size(10, 10, 45.0, 1.0);
        // half diagonal of a 10x10 box is 7.07
        assert_eq!((w, h), (16, 16));
        assert_eq!(rotozoom_surface_size_xy(10, 10, 45.0, 2.0, 2.0), (30, 30));
        let (w, h) = rotozoom_surface_size(1, 1, 30.0, 1.0);
        assert_eq!((w, h), (2, 2));
    }

    #[test]
    fn test_bilinear_identity() {
        let mut src = gradient(7, 5);
        let dst = zoom_surface(&mut src, 1.0, 1.0, Filter::Bilinear).unwrap();
        assert!(same_pixels(&src, &dst));
    }

    #[test]
    fn test_nearest_identity() {
        let mut src = gradient(6, 3);
        let dst = zoom_surface(&mut src, 1.0, 1.0, Filter::Nearest).unwrap();
        assert!(same_pixels(&src, &dst));
    }

    #[test]
    fn test_checkerboard_downscale() {
        // step 2.0 samples columns and rows 0 and 2, all on even squares
        let mut src = checkerboard();
        let dst = zoom_surface(&mut src, 0.5, 0.5, Filter::Nearest).unwrap();
        assert_eq!((dst.width(), dst.height()), (2, 2));
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(dst.get_rgba(x, y), Some(Rgba::WHITE));
        }
    }

    #[test]
    fn test_nearest_upscale_duplicates() {
        let mut src = gradient(3, 2);
        let dst = zoom_surface(&mut src, 2.0, 2.0, Filter::Nearest).unwrap();
        assert_eq!((dst.width(), dst.height()), (6, 4));
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(dst.get_pixel(x, y), src.get_pixel(x / 2, y / 2));
            }
        }
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut src = Surface::new(2, 1, PixelFormat::rgba8888()).unwrap();
        pixel(&mut src, 0, 0, Rgba::new(0, 0, 0, 255)).unwrap();
        pixel(&mut src, 1, 0, Rgba::new(200, 100, 50, 255)).unwrap();
        let dst = zoom_surface(&mut src, 1.5, 1.0, Filter::Bilinear).unwrap();
        assert_eq!(dst.width(), 3);
        assert_eq!(dst.get_rgba(0, 0), Some(Rgba::new(0, 0, 0, 255)));
        assert_eq!(dst.get_rgba(1, 0), Some(Rgba::new(100, 50, 25, 255)));
        assert_eq!(dst.get_rgba(2, 0), Some(Rgba::new(200, 100, 50, 255)));
    }

    #[test]
    fn test_negative_zoom_mirrors() {
        let mut src = gradient(4, 3);
        let dst = zoom_surface(&mut src, -1.0, 1.0, Filter::Nearest).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(dst.get_pixel(x, y), src.get_pixel(3 - x, y));
            }
        }
        let dst = zoom_surface(&mut src, 1.0, -1.0, Filter::Bilinear).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(dst.get_pixel(x, y), src.get_pixel(x, 2 - y));
            }
        }
    }

    #[test]
    fn test_rotate_zero_is_zoom() {
        let mut src = gradient(5, 4);
        for filter in [Filter::Nearest, Filter::Bilinear] {
            let a = rotozoom_surface(&mut src, 0.0, 1.5, filter).unwrap();
            let b = zoom_surface(&mut src, 1.5, 1.5, filter).unwrap();
            assert!(same_pixels(&a, &b));
        }
    }

    #[test]
    fn test_rotate_180() {
        let mut src = gradient(4, 4);
        let dst = rotozoom_surface(&mut src, 180.0, 1.0, Filter::Nearest).unwrap();
        let (w, h) = (dst.width() as i32, dst.height() as i32);
        assert!(w >= 4 && h >= 4);
        assert_eq!(dst.get_rgba(w / 2, h / 2).map(|c| c.a), Some(255));

        // a half turn moves the bright bottom-right corner to the top-left
        let mean = |xs: std::ops::Range<i32>, ys: std::ops::Range<i32>, channel: fn(Rgba) -> u8| {
            let covered: Vec<u32> = ys
                .flat_map(|y| xs.clone().map(move |x| (x, y)))
                .filter_map(|(x, y)| dst.get_rgba(x, y))
                .filter(|c| c.a == 255)
                .map(|c| u32::from(channel(c)))
                .collect();
            covered.iter().sum::<u32>() / covered.len().max(1) as u32
        };
        assert!(mean(0..w / 2, 0..h, |c| c.r) > mean(w / 2..w, 0..h, |c| c.r));
        assert!(mean(0..w, 0..h / 2, |c| c.g) > mean(0..w, h / 2..h, |c| c.g));
    }

    #[test]
    fn test_rotation_leaves_corners_empty() {
        let mut src = Surface::new(8, 8, PixelFormat::rgba8888()).unwrap();
        src.clear(Rgba::WHITE);
        let dst = rotozoom_surface(&mut src, 45.0, 1.0, Filter::Bilinear).unwrap();
        let (w, h) = (dst.width() as i32, dst.height() as i32);
        assert_eq!(dst.get_pixel(0, 0), Some(0));
        assert_eq!(dst.get_pixel(w - 1, h - 1), Some(0));
        assert_eq!(dst.get_rgba(w / 2, h / 2), Some(Rgba::WHITE));
    }

    #[test]
    fn test_indexed_keeps_palette_and_key() {
        let palette = Palette::new(vec![Rgba::BLACK, Rgba::RED, Rgba::GREEN]);
        let mut src = Surface::new(4, 4, PixelFormat::indexed8(palette.clone())).unwrap();
        src.fill(1);
        src.set_color_key(Some(2));

        let zoomed = zoom_surface(&mut src, 2.0, 2.0, Filter::Bilinear).unwrap();
        assert_eq!(zoomed.format().kind(), PixelKind::Indexed8);
        assert_eq!(zoomed.palette(), Some(&palette));
        assert_eq!(zoomed.color_key(), Some(2));
        assert_eq!(zoomed.get_pixel(7, 7), Some(1));

        let rotated = rotozoom_surface(&mut src, 45.0, 1.0, Filter::Nearest).unwrap();
        assert_eq!(rotated.get_pixel(0, 0), Some(2));
        let (w, h) = (rotated.width() as i32, rotated.height() as i32);
        assert_eq!(rotated.get_pixel(w / 2, h / 2), Some(1));
    }

    #[test]
    fn test_other_formats_convert() {
        let mut src = Surface::new(3, 3, PixelFormat::rgb565()).unwrap();
        // exactly representable in 5-6-5
        let color = Rgba::rgb(248, 252, 8);
        src.clear(color);
        let dst = zoom_surface(&mut src, 1.0, 1.0, Filter::Nearest).unwrap();
        assert_eq!(dst.format(), &PixelFormat::abgr8888());
        assert_eq!(dst.get_rgba(2, 2), Some(color));
    }

    #[test]
    fn test_format_preserved_for_32bit() {
        let mut src = Surface::new(3, 3, PixelFormat::argb8888()).unwrap();
        let dst = rotozoom_surface(&mut src, 30.0, 1.0, Filter::Bilinear).unwrap();
        assert_eq!(dst.format(), &PixelFormat::argb8888());
    }

    #[test]
    fn test_single_pixel_source() {
        let mut src = Surface::new(1, 1, PixelFormat::rgba8888()).unwrap();
        src.clear(Rgba::RED);
        let dst = zoom_surface(&mut src, 3.0, 3.0, Filter::Bilinear).unwrap();
        assert!((0..3).all(|y| (0..3).all(|x| dst.get_rgba(x, y) == Some(Rgba::RED))));
    }

    #[test]
    fn test_source_lock_failure() {
        use crate::error::Error;
        use crate::surface::testing::LockFails;

        let mut src = Surface::from_buffer(LockFails(vec![0; 16]), 2, 2, 8, PixelFormat::rgba8888()).unwrap();
        assert!(matches!(zoom_surface(&mut src, 2.0, 2.0, Filter::Nearest), Err(Error::Lock(_))));
        assert!(matches!(rotozoom_surface(&mut src, 10.0, 1.0, Filter::Bilinear), Err(Error::Lock(_))));
    }

    #[test]
    fn test_accumulator_table() {
        let table = accumulators(3, 0x18000).unwrap();
        assert_eq!(table, vec![0, 0x18000, 0x20000, 0x18000]);
        let pos: Vec<_> = positions(&table).collect();
        assert_eq!(pos, vec![(0, 0), (1, 0x8000), (3, 0)]);
    }

    #[test]
    fn test_summed_advances_match_direct_positions() {
        for (src, dst) in [(7u32, 3u32), (3, 7), (10, 10), (640, 97), (1, 5)] {
            let table = accumulators(dst, step(src, dst)).unwrap();
            let increment = i64::from(step(src, dst));
            for (i, (index, frac)) in positions(&table).enumerate() {
                let exact = i as i64 * increment;
                assert_eq!(i64::from(index), exact >> 16, "{src} -> {dst} at {i}");
                assert_eq!(i64::from(frac), exact & 0xFFFF, "{src} -> {dst} at {i}");
            }
        }
    }
}
