//! # softgfx
//!
//! Software 2D rasterization over in-memory surfaces of any pixel format.
//!
//! softgfx draws pixels, lines, circles, ellipses, polygons, pies, Bezier
//! curves and bitmap text into a [`surface::Surface`], and resamples surfaces
//! with nearest or bilinear zoom and rotation. Surfaces may use 1, 2, 3 or 4
//! bytes per pixel with arbitrary channel masks, and every primitive honors the
//! surface's clip rectangle.
//!
//! ## Features
//!
//! - **Format independent**: indexed, 16-bit, 24-bit and 32-bit surfaces
//! - **Alpha blending**: translucent colors blend with `dst + ((src - dst) * a) >> 8`
//! - **Antialiasing**: Wu lines, antialiased ellipses and polygons
//! - **Resampling**: zoom, rotate+zoom and axis flips
//! - **PNG export**: through the pure Rust `png` crate
//!
//! ## Quick Start
//!
//! ```rust
//! use softgfx::prelude::*;
//!
//! let mut surface = Surface::new(64, 64, PixelFormat::xrgb8888())?;
//! filled_circle(&mut surface, 32, 32, 20, Rgba::BLUE)?;
//! aaline(&mut surface, 0, 0, 63, 40, Rgba::WHITE)?;
//!
//! let mut ctx = DrawContext::new();
//! ctx.string(&mut surface, 4, 4, "hi", Rgba::RED)?;
//!
//! let rotated = rotozoom_surface(&mut surface, 30.0, 0.5, Filter::Bilinear)?;
//! assert!(rotated.width() > 32);
//! # Ok::<(), softgfx::Error>(())
//! ```
//!
//! ## References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Foley, J. D. et al. (1990). *Computer Graphics: Principles and Practice*, 2nd ed.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// unwrap() is banned outside tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Colors and the channel blend formula.
pub mod color;

/// 32.32 fixed-point arithmetic.
pub mod fixed;

/// Points, rectangles and clip regions.
pub mod geometry;

/// Pixel formats, channel masks and palettes.
pub mod format;

/// Surfaces: pixel buffers with format, stride and clip.
pub mod surface;

// ============================================================================
// Drawing Modules
// ============================================================================

/// Primitive rasterizers.
pub mod render;

/// Bitmap fonts and glyph caching.
pub mod text;

/// Reusable drawing state.
pub mod context;

/// Zoom and rotate+zoom resampling.
pub mod rotozoom;

/// Surface export.
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for softgfx operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust
/// use softgfx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::context::DrawContext;
    pub use crate::error::{Error, Result};
    pub use crate::format::{Palette, PixelFormat, PixelKind};
    pub use crate::geometry::{ClipRect, Point, Rect};
    pub use crate::output::PngEncoder;
    pub use crate::render::{
        aacircle, aaellipse, aaline, aapolygon, aatrigon, arc, bezier, circle, ellipse, fill_rect, filled_circle,
        filled_ellipse, filled_pie, filled_polygon, filled_trigon, hline, line, pie, pixel, polygon, rectangle,
        trigon, vline,
    };
    pub use crate::rotozoom::{rotozoom_surface, rotozoom_surface_xy, zoom_surface, Filter};
    pub use crate::surface::{PixelBuffer, Surface};
    pub use crate::text::{Font, GlyphCache};
}
