//! Explicit 32.32 fixed-point arithmetic.
//!
//! Geometry that needs fractional precision (clip slopes, ellipse coverage,
//! pie angles, Bezier evaluation and resampler sizing) runs on [`Fixed`].
//! Raw values are `i64` with 32 fractional bits; products and quotients go
//! through `i128` so intermediate results never overflow for coordinates in
//! the `i32` range.
//!
//! Transcendental functions are computed in `f64` and converted back, which
//! keeps well over the 16 fractional bits antialiasing needs.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 32;

const ONE_RAW: i64 = 1 << FRAC_BITS;
const SCALE: f64 = 4_294_967_296.0;

/// Signed 32.32 fixed-point number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i64);

impl Fixed {
    /// Zero.
    pub const ZERO: Self = Self(0);
    /// One.
    pub const ONE: Self = Self(ONE_RAW);
    /// One half.
    pub const HALF: Self = Self(ONE_RAW / 2);
    /// Pi.
    pub const PI: Self = Self((std::f64::consts::PI * SCALE) as i64);
    /// Two pi.
    pub const TWO_PI: Self = Self((std::f64::consts::TAU * SCALE) as i64);
    /// Radians per degree.
    pub const RAD_PER_DEG: Self = Self((std::f64::consts::PI / 180.0 * SCALE) as i64);

    /// Construct from the raw 32.32 bit pattern.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw 32.32 bit pattern.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Convert an integer.
    #[must_use]
    pub const fn from_int(value: i32) -> Self {
        Self((value as i64) << FRAC_BITS)
    }

    /// Convert a wide integer, saturating outside the representable range.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        Self(clamped << FRAC_BITS)
    }

    /// Convert a float, saturating outside the representable range.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self((value * SCALE) as i64)
    }

    /// Convert to a float.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE
    }

    /// Integer part, truncated toward zero.
    #[must_use]
    pub const fn to_int(self) -> i32 {
        if self.0 >= 0 {
            (self.0 >> FRAC_BITS) as i32
        } else {
            -((self.0.unsigned_abs() >> FRAC_BITS) as i64) as i32
        }
    }

    /// Largest integer not above the value.
    #[must_use]
    pub const fn floor(self) -> i32 {
        (self.0 >> FRAC_BITS) as i32
    }

    /// Smallest integer not below the value.
    #[must_use]
    pub const fn ceil(self) -> i32 {
        (self.0.saturating_add(ONE_RAW - 1) >> FRAC_BITS) as i32
    }

    /// Nearest integer, halves rounding up.
    #[must_use]
    pub const fn round(self) -> i32 {
        (self.0.saturating_add(ONE_RAW / 2) >> FRAC_BITS) as i32
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Smaller of two values.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    /// Larger of two values.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    /// Division that returns `None` for a zero divisor.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        let q = (i128::from(self.0) << FRAC_BITS) / i128::from(rhs.0);
        Some(Self(saturate(q)))
    }

    /// Exact quotient of two wide integers; `None` for a zero denominator.
    #[must_use]
    pub fn ratio(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        Some(Self(saturate((i128::from(num) << FRAC_BITS) / i128::from(den))))
    }

    /// Square root; negative input yields zero.
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        Self::from_f64(self.to_f64().sqrt())
    }

    /// Sine of an angle in radians.
    #[must_use]
    pub fn sin(self) -> Self {
        Self::from_f64(self.to_f64().sin())
    }

    /// Cosine of an angle in radians.
    #[must_use]
    pub fn cos(self) -> Self {
        Self::from_f64(self.to_f64().cos())
    }

    /// Integer power by repeated multiplication.
    #[must_use]
    pub fn powi(self, exp: u32) -> Self {
        let mut acc = Self::ONE;
        for _ in 0..exp {
            acc = acc * self;
        }
        acc
    }
}

/// Convert degrees to radians.
#[must_use]
pub fn deg_to_rad(degrees: Fixed) -> Fixed {
    degrees * Fixed::RAD_PER_DEG
}

#[inline]
fn saturate(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

impl Add for Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(saturate((i128::from(self.0) * i128::from(rhs.0)) >> FRAC_BITS))
    }
}

/// Division by zero saturates toward the sign of the dividend; use
/// [`Fixed::checked_div`] where a zero divisor is meaningful.
impl Div for Fixed {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self.checked_div(rhs).unwrap_or(if self.0 < 0 {
            Self(i64::MIN)
        } else {
            Self(i64::MAX)
        })
    }
}

impl From<i32> for Fixed {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}
