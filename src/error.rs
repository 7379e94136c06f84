//! Error types for softgfx operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in softgfx operations.
///
/// Geometry that falls entirely outside the clip rectangle is not an error:
/// drawing calls succeed without touching the surface.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid argument to a drawing primitive (negative radius, too few vertices, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Invalid dimensions for a surface.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Pixel buffer shorter than `pitch * height`.
    #[error("Pixel buffer too small: {required} bytes required, {actual} available")]
    BufferTooSmall {
        /// Bytes needed for the declared geometry.
        required: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// Unsupported or inconsistent pixel format.
    #[error("Invalid pixel format: {0}")]
    InvalidFormat(String),

    /// The surface buffer could not be locked for direct pixel access.
    #[error("Surface lock failed: {0}")]
    Lock(String),

    /// A transient buffer could not be allocated.
    #[error("Allocation of {bytes} bytes failed")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
    },
}
