//! 64-bit floating point numbers with unsigned provenance hints.
//!
//! `Num` differs from a bare `f64` in three ways:
//!
//! - `NaN` is a single canonical value and equal to itself.
//! - `-0` and `0` are distinct: unequal, hashed apart, and `-0 < 0`.
//! - `NaN` orders after every other number, so `Num` is `Ord`.
//!
//! Fuzzy comparison is available through [`Num::equivalent_to`].

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::errors::{parse_num_failed, StructureResult};
use crate::flags::NumFlags;

/// Default tolerance for [`Num::equivalent_to`].
pub const EPSILON: f64 = 1.0e-8;

/// Number value.
#[derive(Clone, Copy)]
pub struct Num {
    value: f64,
    flags: NumFlags,
}

impl Num {
    pub const ZERO: Num = Num::raw(0.0);
    pub const NEGATIVE_ZERO: Num = Num::raw(-0.0);
    pub const ONE: Num = Num::raw(1.0);
    pub const NEGATIVE_ONE: Num = Num::raw(-1.0);
    pub const NAN: Num = Num::raw(f64::NAN);

    const fn raw(value: f64) -> Num {
        Num {
            value,
            flags: NumFlags::empty(),
        }
    }

    /// Canonicalize `value`: any `NaN` payload becomes [`Num::NAN`], and the
    /// shared constants are returned for `±0` and `±1`.
    pub fn new(value: f64) -> Num {
        if value.is_nan() {
            Num::NAN
        } else if value == 0.0 {
            if value.is_sign_negative() {
                Num::NEGATIVE_ZERO
            } else {
                Num::ZERO
            }
        } else if value == 1.0 {
            Num::ONE
        } else if value == -1.0 {
            Num::NEGATIVE_ONE
        } else {
            Num::raw(value)
        }
    }

    /// A number that originated as an unsigned 32-bit integer.
    pub fn uint32(value: u32) -> Num {
        Num {
            value: f64::from(value),
            flags: NumFlags::UINT32,
        }
    }

    /// A number that originated as an unsigned 64-bit integer.
    ///
    /// Values above 2^53 lose precision; the flag keeps the rendering hint.
    #[allow(
        clippy::cast_precision_loss,
        reason = "numbers are f64; the flag records the original width"
    )]
    pub fn uint64(value: u64) -> Num {
        Num {
            value: value as f64,
            flags: NumFlags::UINT64,
        }
    }

    /// Parse decimal or exponent notation, or `NaN`.
    ///
    /// Infinite results (`Infinity`, `1e999`) are rejected.
    pub fn parse(input: &str) -> StructureResult<Num> {
        let trimmed = input.trim();
        if trimmed == "NaN" {
            return Ok(Num::NAN);
        }
        let is_numeric = trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        match trimmed.parse::<f64>() {
            Ok(value) if is_numeric && value.is_finite() => Ok(Num::new(value)),
            _ => Err(parse_num_failed(input)),
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.value
    }

    #[inline]
    pub fn flags(self) -> NumFlags {
        self.flags
    }

    pub fn is_uint32(self) -> bool {
        self.flags.contains(NumFlags::UINT32)
    }

    pub fn is_uint64(self) -> bool {
        self.flags.contains(NumFlags::UINT64)
    }

    pub fn is_nan(self) -> bool {
        self.value.is_nan()
    }

    /// Whether the number is zero (of either sign).
    pub fn is_zero(self) -> bool {
        self.value == 0.0
    }

    /// A non-negative integral value that fits an index.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "range checked before the cast"
    )]
    pub fn to_index(self) -> Option<usize> {
        let v = self.value;
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= 9_007_199_254_740_991.0 {
            Some(v as usize)
        } else {
            None
        }
    }

    /// The value as an integral `i64`, if it is one.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "range checked before the cast"
    )]
    pub fn to_i64(self) -> Option<i64> {
        let v = self.value;
        if v.is_finite() && v.fract() == 0.0 && v.abs() <= 9_007_199_254_740_991.0 {
            Some(v as i64)
        } else {
            None
        }
    }

    /// ECMAScript `ToInt32`: truncate, then wrap modulo 2^32.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap,
        reason = "wrapping into 32 bits is the point"
    )]
    pub fn to_int32(self) -> i32 {
        let v = self.value;
        if !v.is_finite() {
            return 0;
        }
        let wrapped = v.trunc().rem_euclid(4_294_967_296.0);
        (wrapped as u32) as i32
    }

    /// Tolerant comparison: `|a - b| < epsilon`, or both `NaN`.
    pub fn equivalent_to(self, that: Num, epsilon: f64) -> bool {
        if self.is_nan() || that.is_nan() {
            return self.is_nan() && that.is_nan();
        }
        self.value == that.value || (self.value - that.value).abs() < epsilon
    }

    // Arithmetic

    pub fn plus(self, that: Num) -> Num {
        Num::new(self.value + that.value)
    }

    pub fn minus(self, that: Num) -> Num {
        Num::new(self.value - that.value)
    }

    pub fn times(self, that: Num) -> Num {
        Num::new(self.value * that.value)
    }

    pub fn divide(self, that: Num) -> Num {
        Num::new(self.value / that.value)
    }

    /// Remainder with the sign of the dividend.
    pub fn modulo(self, that: Num) -> Num {
        Num::new(self.value % that.value)
    }

    pub fn negative(self) -> Num {
        Num::new(-self.value)
    }

    pub fn positive(self) -> Num {
        self
    }

    pub fn inverse(self) -> Num {
        Num::new(1.0 / self.value)
    }

    // Bitwise, over 32-bit integers

    pub fn bitwise_or(self, that: Num) -> Num {
        Num::new(f64::from(self.to_int32() | that.to_int32()))
    }

    pub fn bitwise_xor(self, that: Num) -> Num {
        Num::new(f64::from(self.to_int32() ^ that.to_int32()))
    }

    pub fn bitwise_and(self, that: Num) -> Num {
        Num::new(f64::from(self.to_int32() & that.to_int32()))
    }

    pub fn bitwise_not(self) -> Num {
        Num::new(f64::from(!self.to_int32()))
    }

    /// Linear interpolation, `u` in `[0, 1]`.
    pub fn lerp(self, that: Num, u: f64) -> Num {
        Num::new(self.value + (that.value - self.value) * u)
    }

    fn canonical_bits(self) -> u64 {
        if self.value.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.value.to_bits()
        }
    }
}

impl Default for Num {
    fn default() -> Self {
        Num::ZERO
    }
}

impl From<f64> for Num {
    fn from(value: f64) -> Self {
        Num::new(value)
    }
}

impl From<f32> for Num {
    fn from(value: f32) -> Self {
        Num::new(f64::from(value))
    }
}

impl From<i32> for Num {
    fn from(value: i32) -> Self {
        Num::new(f64::from(value))
    }
}

impl From<i64> for Num {
    #[allow(
        clippy::cast_precision_loss,
        reason = "numbers are f64 by definition"
    )]
    fn from(value: i64) -> Self {
        Num::new(value as f64)
    }
}

impl From<u32> for Num {
    fn from(value: u32) -> Self {
        Num::uint32(value)
    }
}

impl From<u64> for Num {
    fn from(value: u64) -> Self {
        Num::uint64(value)
    }
}

impl From<usize> for Num {
    #[allow(
        clippy::cast_precision_loss,
        reason = "numbers are f64 by definition"
    )]
    fn from(value: usize) -> Self {
        Num::new(value as f64)
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_bits() == other.canonical_bits()
    }
}

impl Eq for Num {}

impl Hash for Num {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bits().hash(state);
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Num {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_nan(), other.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.value.total_cmp(&other.value),
        }
    }
}
