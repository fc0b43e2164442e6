//! Fixed-point numeric types for the quoting engine.
//!
//! All money-path arithmetic uses `i64` raw units with six implied decimal
//! places (`SCALE` = 1_000_000). Intermediate products are widened to `i128`
//! and divisions truncate toward zero, multiplication always before division,
//! so identical integer inputs produce bit-identical outputs on every run.
//! No floating point anywhere in this module.

use crate::error::CoreError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of raw units per whole unit (six implied decimals).
pub const SCALE: i64 = 1_000_000;

/// Parts-per-million denominator for spread offsets.
pub const PPM: i64 = 1_000_000;

fn parse_fixed(s: &str) -> Result<i64, CoreError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CoreError::InvalidFixed("empty string".to_string()));
    }

    let (negative, rest) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rest, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(CoreError::InvalidFixed(format!("not a number: {s}")));
    }
    if int_part.len() > 19 {
        return Err(CoreError::InvalidFixed(format!("out of range: {s}")));
    }

    let mut raw: i128 = 0;
    for b in int_part.bytes() {
        if !b.is_ascii_digit() {
            return Err(CoreError::InvalidFixed(format!("bad digit in {s}")));
        }
        raw = raw * 10 + i128::from(b - b'0');
    }
    raw *= i128::from(SCALE);

    // Fractional digits past the sixth place are truncated, not rounded.
    let mut unit = i128::from(SCALE);
    for b in frac_part.bytes().take(6) {
        if !b.is_ascii_digit() {
            return Err(CoreError::InvalidFixed(format!("bad digit in {s}")));
        }
        unit /= 10;
        raw += i128::from(b - b'0') * unit;
    }
    if frac_part.len() > 6 && !frac_part.bytes().skip(6).all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidFixed(format!("bad digit in {s}")));
    }

    if negative {
        raw = -raw;
    }
    i64::try_from(raw).map_err(|_| CoreError::InvalidFixed(format!("out of range: {s}")))
}

fn format_fixed(raw: i64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sign = if raw < 0 { "-" } else { "" };
    let abs = raw.unsigned_abs();
    let int = abs / SCALE as u64;
    let frac = abs % SCALE as u64;
    if frac == 0 {
        write!(f, "{sign}{int}")
    } else {
        let digits = format!("{frac:06}");
        write!(f, "{sign}{int}.{}", digits.trim_end_matches('0'))
    }
}

macro_rules! fixed_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            pub const ZERO: Self = Self(0);

            /// Construct from raw units at `SCALE` precision.
            pub const fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Construct from a whole number of units.
            pub const fn from_units(units: i64) -> Self {
                Self(units * SCALE)
            }

            pub const fn raw(self) -> i64 {
                self.0
            }

            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }

            pub const fn is_positive(self) -> bool {
                self.0 > 0
            }

            pub const fn is_negative(self) -> bool {
                self.0 < 0
            }

            pub const fn abs(self) -> Self {
                Self(self.0.abs())
            }
        }

        impl std::ops::Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl std::ops::Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                format_fixed(self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_fixed(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    };
}

fixed_type! {
    /// A price in quote currency.
    Px
}

fixed_type! {
    /// A signed base-asset quantity. Positive is long, negative is short.
    Qty
}

fixed_type! {
    /// A signed quote-currency amount (P&L, cost basis).
    Usd
}

impl Px {
    /// Price shifted down by `ppm` parts-per-million of itself.
    ///
    /// The delta is `raw * ppm / 1_000_000` with the product widened to
    /// `i128` and the division truncating, matching the bid side of the
    /// ladder formula exactly.
    pub fn offset_down(self, ppm: u32) -> Px {
        Px(self.0 - self.ppm_delta(ppm))
    }

    /// Price shifted up by `ppm` parts-per-million of itself.
    pub fn offset_up(self, ppm: u32) -> Px {
        Px(self.0 + self.ppm_delta(ppm))
    }

    fn ppm_delta(self, ppm: u32) -> i64 {
        let d = i128::from(self.0) * i128::from(ppm) / i128::from(PPM);
        // For ppm below 1_000_000 (enforced by config validation), |d| is
        // strictly less than |raw|, so the narrowing cast cannot wrap.
        d as i64
    }
}
