//! Fixed-point amount types for protocol arithmetic.
//!
//! Three scales are used throughout the protocol, each a distinct newtype
//! over `U256` so that scale-mismatched arithmetic does not compile:
//! - [`Wad`]: 18 decimals, token quantities (collateral, debt units)
//! - [`Ray`]: 27 decimals, ratios and prices (rates, auction prices)
//! - [`Rad`]: 45 decimals, high-precision accumulators (tabs, balances)
//!
//! Mixed multiplication follows fixed re-scale rules: the result keeps the
//! scale of the left operand and the product is divided by the right
//! operand's unit, truncating. Same-scale division is `a * unit / b`,
//! truncating. All conversions between scales are explicit; narrowing ones
//! truncate, widening ones are lossless.

use alloy::primitives::{U256, U512};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// 1e18, the [`Wad`] unit.
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 1e27, the [`Ray`] unit.
pub const RAY: U256 = U256::from_limbs([11_515_845_246_265_065_472, 54_210_108, 0, 0]);

/// 1e45, the [`Rad`] unit.
pub const RAD: U256 = U256::from_limbs([
    802_379_605_485_813_760,
    16_178_822_382_532_126_880,
    2_938_735,
    0,
]);

/// 1e9, the gap between the wad and ray scales.
const E9: U256 = U256::from_limbs([1_000_000_000, 0, 0, 0]);

fn widen(x: U256) -> U512 {
    let mut limbs = [0u64; 8];
    limbs[..4].copy_from_slice(x.as_limbs());
    U512::from_limbs(limbs)
}

/// Multiply then divide at full width, truncating the quotient.
/// Intermediate products of two rad-scale values exceed 256 bits, so all
/// re-scaling arithmetic runs through 512-bit integers.
fn mul_div(a: U256, b: U256, unit: U256) -> U256 {
    let wide = widen(a) * widen(b) / widen(unit);
    let limbs = wide.as_limbs();
    assert!(
        limbs[4..].iter().all(|limb| *limb == 0),
        "fixed-point overflow"
    );
    U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]])
}

macro_rules! amount_type {
    ($name:ident, $unit:ident, $decimals:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(U256);

        impl $name {
            /// The multiplicative identity at this scale.
            pub const ONE: Self = Self($unit);

            /// Zero.
            pub fn zero() -> Self {
                Self(U256::ZERO)
            }

            /// Wrap a raw fixed-point integer without scaling.
            pub const fn from_raw(raw: U256) -> Self {
                Self(raw)
            }

            /// Scale up a whole number.
            pub fn from_num(n: u64) -> Self {
                Self(U256::from(n) * $unit)
            }

            /// The underlying fixed-point integer.
            pub const fn raw(&self) -> U256 {
                self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Subtraction clamped at zero, for quantities that may
            /// transiently exceed their ceiling.
            pub fn saturating_sub(self, rhs: Self) -> Self {
                Self(self.0.saturating_sub(rhs.0))
            }

            /// Approximate value for display and logging only.
            pub fn to_f64(&self) -> f64 {
                let mut value = 0f64;
                for (i, limb) in self.0.as_limbs().iter().enumerate() {
                    value += *limb as f64 * 2f64.powi(64 * i as i32);
                }
                value / 10f64.powi($decimals)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Div for $name {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                Self(mul_div(self.0, $unit, rhs.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let int = self.0 / $unit;
                let frac = self.0 % $unit;
                write!(f, "{int}.{frac:0>width$}", width = $decimals as usize)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }
    };
}

amount_type!(Wad, WAD, 18, "Token quantity, 18 decimals.");
amount_type!(Ray, RAY, 27, "Ratio or price, 27 decimals.");
amount_type!(Rad, RAD, 45, "High-precision accumulator, 45 decimals.");

impl Wad {
    /// One raw unit (1e-18): the factor that reads a wei count as a
    /// native-token wad.
    pub const WEI: Wad = Wad(U256::from_limbs([1, 0, 0, 0]));

    /// Truncate a ray to wad precision.
    pub fn from_ray(r: Ray) -> Self {
        Wad(r.0 / E9)
    }

    /// Truncate a rad to wad precision.
    pub fn from_rad(d: Rad) -> Self {
        Wad(d.0 / RAY)
    }

    /// Convert from a float, truncating below 1e-18. For configuration
    /// and scenario ingestion only; computation paths stay in fixed point.
    pub fn from_f64(value: f64) -> Self {
        if value <= 0.0 {
            return Self::zero();
        }
        Wad(U256::from((value * 1e18) as u128))
    }
}

impl Ray {
    /// Widen a wad losslessly.
    pub fn from_wad(w: Wad) -> Self {
        Ray(w.0 * E9)
    }

    /// Truncate a rad to ray precision.
    pub fn from_rad(d: Rad) -> Self {
        Ray(d.0 / WAD)
    }

    /// Convert from a float; precision capped at 18 decimals.
    pub fn from_f64(value: f64) -> Self {
        Self::from_wad(Wad::from_f64(value))
    }
}

impl Rad {
    /// Widen a wad losslessly.
    pub fn from_wad(w: Wad) -> Self {
        Rad(w.0 * RAY)
    }

    /// Widen a ray losslessly.
    pub fn from_ray(r: Ray) -> Self {
        Rad(r.0 * WAD)
    }

    /// Convert from a float; precision capped at 18 decimals.
    pub fn from_f64(value: f64) -> Self {
        Self::from_wad(Wad::from_f64(value))
    }
}

// Mixed multiplication. The result keeps the left operand's scale and the
// product is truncated by the right operand's unit.

impl Mul<Wad> for Wad {
    type Output = Wad;
    fn mul(self, rhs: Wad) -> Wad {
        Wad(mul_div(self.0, rhs.0, WAD))
    }
}

impl Mul<Ray> for Wad {
    type Output = Wad;
    fn mul(self, rhs: Ray) -> Wad {
        Wad(mul_div(self.0, rhs.0, RAY))
    }
}

impl Mul<Ray> for Ray {
    type Output = Ray;
    fn mul(self, rhs: Ray) -> Ray {
        Ray(mul_div(self.0, rhs.0, RAY))
    }
}

impl Mul<Wad> for Ray {
    type Output = Ray;
    fn mul(self, rhs: Wad) -> Ray {
        Ray(mul_div(self.0, rhs.0, WAD))
    }
}

impl Mul<Wad> for Rad {
    type Output = Rad;
    fn mul(self, rhs: Wad) -> Rad {
        Rad(mul_div(self.0, rhs.0, WAD))
    }
}

impl Mul<Ray> for Rad {
    type Output = Rad;
    fn mul(self, rhs: Ray) -> Rad {
        Rad(mul_div(self.0, rhs.0, RAY))
    }
}

impl Mul<Rad> for Rad {
    type Output = Rad;
    fn mul(self, rhs: Rad) -> Rad {
        Rad(mul_div(self.0, rhs.0, RAD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pow10(exp: u64) -> U256 {
        U256::from(10u64).pow(U256::from(exp))
    }

    #[test]
    fn unit_constants_are_powers_of_ten() {
        assert_eq!(WAD, pow10(18));
        assert_eq!(RAY, pow10(27));
        assert_eq!(RAD, pow10(45));
    }

    #[test]
    fn whole_number_construction() {
        assert_eq!(Wad::from_num(3).raw(), U256::from(3) * WAD);
        assert_eq!(Ray::from_num(1), Ray::ONE);
        assert_eq!(Rad::from_num(0), Rad::zero());
    }

    #[test]
    fn mul_truncates_not_rounds() {
        // 2/3 truncates at wad precision
        let two = Wad::from_num(2);
        let three = Wad::from_num(3);
        let q = two / three;
        assert_eq!(q.raw(), U256::from(666_666_666_666_666_666u64));

        // 0.666...666 * 3 = 1.999...998, truncation is preserved
        let back = q * three;
        assert_eq!(back.raw(), U256::from(1_999_999_999_999_999_998u64));
    }

    #[test]
    fn wad_times_ray_truncates_at_ray_unit() {
        // 10 wad * 0.95 ray = 9.5 wad exactly
        let lot = Wad::from_num(10);
        let discount = Ray::from_raw(U256::from(95) * pow10(25));
        assert_eq!((lot * discount).raw(), U256::from(95) * pow10(17));
    }

    #[test]
    fn rad_division_keeps_high_precision() {
        // 500 / 142.5 at rad precision
        let balance = Rad::from_num(500);
        let price = Rad::from_raw(U256::from(1425) * pow10(44));
        let amount = Wad::from_rad(balance / price);
        assert_eq!(amount.raw(), U256::from(3_508_771_929_824_561_403u64));
    }

    #[test]
    fn explicit_conversions() {
        let w = Wad::from_num(7);
        assert_eq!(Wad::from_ray(Ray::from_wad(w)), w);
        assert_eq!(Wad::from_rad(Rad::from_wad(w)), w);
        assert_eq!(Ray::from_rad(Rad::from_ray(Ray::from_wad(w))), Ray::from_wad(w));

        // narrowing truncates
        let r = Ray::from_raw(U256::from(1_999_999_999u64));
        assert_eq!(Wad::from_ray(r).raw(), U256::from(1u64));
    }

    #[test]
    fn wei_factor_converts_wei_counts() {
        // 100 gwei held as a wei count becomes 1e-7 native token
        let wei_count = Wad::from_raw(U256::from(100_000_000_000u64) * WAD);
        let native = wei_count * Wad::WEI;
        assert_eq!(native.raw(), U256::from(100_000_000_000u64));
    }

    #[test]
    fn saturating_sub_clamps() {
        let a = Rad::from_num(1);
        let b = Rad::from_num(2);
        assert_eq!(a.saturating_sub(b), Rad::zero());
        assert_eq!(b.saturating_sub(a), Rad::from_num(1));
    }

    #[test]
    fn display_pads_fraction() {
        assert_eq!(Wad::from_num(1).to_string(), "1.000000000000000000");
        assert_eq!(
            Wad::from_raw(U256::from(1_500_000_000_000_000_000u64)).to_string(),
            "1.500000000000000000"
        );
        assert_eq!(Wad::WEI.to_string(), "0.000000000000000001");
    }

    #[test]
    fn from_f64_truncates_and_clamps() {
        assert_eq!(Wad::from_f64(-1.0), Wad::zero());
        assert_eq!(Wad::from_f64(1.0), Wad::ONE);
        assert_eq!(Ray::from_f64(2.0), Ray::from_num(2));
        assert_eq!(Rad::from_f64(2.0), Rad::from_num(2));
    }

    proptest! {
        #[test]
        fn one_is_multiplicative_identity(raw in any::<u128>()) {
            let w = Wad::from_raw(U256::from(raw));
            prop_assert_eq!(w * Wad::ONE, w);
            prop_assert_eq!(w * Ray::ONE, w);
            let r = Ray::from_raw(U256::from(raw));
            prop_assert_eq!(r * Ray::ONE, r);
            let d = Rad::from_raw(U256::from(raw));
            prop_assert_eq!(d * Rad::ONE, d);
        }

        #[test]
        fn widening_conversions_round_trip(raw in any::<u128>()) {
            let w = Wad::from_raw(U256::from(raw));
            prop_assert_eq!(Wad::from_ray(Ray::from_wad(w)), w);
            prop_assert_eq!(Wad::from_rad(Rad::from_wad(w)), w);
            let r = Ray::from_raw(U256::from(raw));
            prop_assert_eq!(Ray::from_rad(Rad::from_ray(r)), r);
        }

        #[test]
        fn whole_number_products_are_exact(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let exact = Wad::from_num(a) * Wad::from_num(b);
            prop_assert_eq!(exact.raw(), U256::from(a) * U256::from(b) * WAD);
        }
    }
}
