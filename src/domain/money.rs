//! Fixed-point currency types.
//!
//! Wire values are integers in 10^-9 units ("rao"); this module exposes them
//! as fixed-point decimals, following the precision-safety approach of
//! `utils::balance_newtypes::Rao`/`Tao` (values up to 2^53 rao convert to
//! `f64` exactly; `Display` never goes through a lossy float).

use crate::core::constants::RAOPERTAO;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

macro_rules! fixed_point_currency {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            rao: u128,
        }

        impl $name {
            pub const fn from_rao(rao: u128) -> Self {
                Self { rao }
            }

            pub const fn as_rao(self) -> u128 {
                self.rao
            }

            /// Lossy for values beyond 2^53 rao; use `as_rao` for exact
            /// comparisons and arithmetic.
            pub fn as_f64(self) -> f64 {
                self.rao as f64 / RAOPERTAO as f64
            }

            pub fn from_f64(value: f64) -> Self {
                Self {
                    rao: (value.max(0.0) * RAOPERTAO as f64).round() as u128,
                }
            }

            pub fn saturating_add(self, other: Self) -> Self {
                Self {
                    rao: self.rao.saturating_add(other.rao),
                }
            }

            pub fn saturating_sub(self, other: Self) -> Self {
                Self {
                    rao: self.rao.saturating_sub(other.rao),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let whole = self.rao / RAOPERTAO;
                let frac = self.rao % RAOPERTAO;
                write!(f, "{whole}.{frac:09}")
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, other: Self) -> Self {
                self.saturating_add(other)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, other: Self) -> Self {
                self.saturating_sub(other)
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::from_rao(0), |a, b| a.saturating_add(b))
            }
        }

        impl From<u128> for $name {
            fn from(rao: u128) -> Self {
                Self::from_rao(rao)
            }
        }
    };
}

fixed_point_currency!(Tao);
fixed_point_currency!(Alpha);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_nine_decimals() {
        assert_eq!(Tao::from_rao(1_500_000_000).to_string(), "1.500000000");
        assert_eq!(Tao::from_rao(0).to_string(), "0.000000000");
    }

    #[test]
    fn saturating_add_does_not_overflow() {
        let max = Tao::from_rao(u128::MAX);
        assert_eq!(max.saturating_add(Tao::from_rao(1)), max);
    }

    #[test]
    fn round_trips_through_f64_for_small_values() {
        let t = Tao::from_rao(42_000_000_000);
        assert_eq!(Tao::from_f64(t.as_f64()).as_rao(), t.as_rao());
    }
}
