//! Primitive rasterizers.
//!
//! Every drawing function takes the destination surface first and a color
//! last, clips against the surface's clip rectangle and brackets its pixel
//! access with one lock of the underlying buffer. Off-clip geometry is a
//! successful no-op.
//!
//! # Algorithms
//!
//! - **Bresenham's line** with a direct-store fast path for opaque colors
//! - **Wu's antialiased line** with a 16.16 error accumulator
//! - **Midpoint circle** and a scaled quadrant walk for ellipses
//! - **Even-odd scanline fill** for polygons, pies and trigons
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod bezier;
mod clip;
mod ellipse;
mod line;
mod pie;
mod pixel;
mod polygon;
mod span;

pub use bezier::{bezier, evaluate_bezier};
pub use clip::clip_line;
pub use ellipse::{aacircle, aaellipse, circle, ellipse, filled_circle, filled_ellipse};
pub use line::{aaline, line};
pub use pie::{arc, filled_pie, pie};
pub use pixel::{fast_pixel, fast_pixel_nolock, fast_pixel_rgba, pixel, pixel_nolock, pixel_weight, pixel_weight_nolock};
pub use polygon::{aapolygon, aatrigon, filled_polygon, filled_trigon, polygon, trigon};
pub use span::{fill_rect, hline, hline_store, rectangle, vline};

pub(crate) use pie::pie_with;
pub(crate) use polygon::filled_polygon_with;
