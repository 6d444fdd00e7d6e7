// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scale-preserving decimal arithmetic
//!
//! A decimal is an unscaled [`BigInt`] plus a scale, so `1.0` and `1.00` are
//! distinct values that compare equal in magnitude. Results keep the scale
//! rules of `java.math.BigDecimal`: sums align to the larger scale, products
//! add scales, and quotients keep the dividend's scale.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

/// Adjusted exponents below this print in scientific notation
const PLAIN_EXPONENT_FLOOR: i64 = -6;

fn pow10(exponent: i64) -> BigInt {
    let exponent = usize::try_from(exponent).unwrap_or_default();
    num_traits::pow(BigInt::from(10), exponent)
}

/// Unscaled value of `value` expressed at `scale`, which must not be below
/// the value's own scale
fn rescaled(value: &BigDecimal, scale: i64) -> BigInt {
    let (digits, own) = value.as_bigint_and_exponent();
    digits * pow10(scale - own)
}

/// `numerator / denominator` rounded half-to-even. The denominator must be
/// non-zero.
pub fn divide_half_even(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.is_zero() {
        return quotient;
    }
    let step = if (numerator.sign() == Sign::Minus) == (denominator.sign() == Sign::Minus) {
        BigInt::from(1)
    } else {
        BigInt::from(-1)
    };
    let twice: BigInt = remainder.abs() * 2;
    match twice.cmp(&denominator.abs()) {
        Ordering::Greater => quotient + step,
        Ordering::Equal if !(&quotient % BigInt::from(2)).is_zero() => quotient + step,
        _ => quotient,
    }
}

pub fn add(left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
    let scale = left.fractional_digit_count().max(right.fractional_digit_count());
    BigDecimal::new(rescaled(left, scale) + rescaled(right, scale), scale)
}

pub fn subtract(left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
    let scale = left.fractional_digit_count().max(right.fractional_digit_count());
    BigDecimal::new(rescaled(left, scale) - rescaled(right, scale), scale)
}

pub fn multiply(left: &BigDecimal, right: &BigDecimal) -> BigDecimal {
    let (l, ls) = left.as_bigint_and_exponent();
    let (r, rs) = right.as_bigint_and_exponent();
    BigDecimal::new(l * r, ls + rs)
}

/// Quotient at the dividend's scale, rounded half-to-even. `None` when the
/// divisor is zero.
pub fn divide(left: &BigDecimal, right: &BigDecimal) -> Option<BigDecimal> {
    let (l, ls) = left.as_bigint_and_exponent();
    let (r, rs) = right.as_bigint_and_exponent();
    if r.is_zero() {
        return None;
    }
    let quotient = if rs >= 0 {
        divide_half_even(&(l * pow10(rs)), &r)
    } else {
        divide_half_even(&l, &(r * pow10(-rs)))
    };
    Some(BigDecimal::new(quotient, ls))
}

/// Nearest integer, ties to even
pub fn round_half_even(value: &BigDecimal) -> BigInt {
    let (digits, scale) = value.as_bigint_and_exponent();
    if scale <= 0 {
        digits * pow10(-scale)
    } else {
        divide_half_even(&digits, &pow10(scale))
    }
}

/// Equal digits at equal scale
pub fn identical(left: &BigDecimal, right: &BigDecimal) -> bool {
    left.as_bigint_and_exponent() == right.as_bigint_and_exponent()
}

/// Canonical text: plain notation for moderate exponents, otherwise
/// `d.dddE±n`
pub fn format(value: &BigDecimal, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let (digits, scale) = value.as_bigint_and_exponent();
    if digits.sign() == Sign::Minus {
        f.write_str("-")?;
    }
    let coefficient = digits.abs().to_string();
    let length = i64::try_from(coefficient.len()).unwrap_or(i64::MAX);
    let adjusted = length - 1 - scale;

    if scale >= 0 && adjusted >= PLAIN_EXPONENT_FLOOR {
        if scale == 0 {
            return f.write_str(&coefficient);
        }
        if length > scale {
            let split = coefficient.len() - usize::try_from(scale).unwrap_or_default();
            let (whole, fraction) = coefficient.split_at(split);
            return write!(f, "{whole}.{fraction}");
        }
        let zeros = usize::try_from(scale - length).unwrap_or_default();
        return write!(f, "0.{}{coefficient}", "0".repeat(zeros));
    }

    let (first, rest) = coefficient.split_at(1);
    f.write_str(first)?;
    if !rest.is_empty() {
        write!(f, ".{rest}")?;
    }
    if adjusted >= 0 {
        write!(f, "E+{adjusted}")
    } else {
        write!(f, "E{adjusted}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    struct Shown<'a>(&'a BigDecimal);

    impl fmt::Display for Shown<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            format(self.0, f)
        }
    }

    fn show(value: &BigDecimal) -> String {
        Shown(value).to_string()
    }

    #[rstest]
    #[case(7, 2, 4)]
    #[case(5, 2, 2)]
    #[case(-5, 2, -2)]
    #[case(-7, 2, -4)]
    #[case(7, -2, -4)]
    #[case(10, 3, 3)]
    #[case(6, 3, 2)]
    fn integer_division_ties_to_even(#[case] n: i64, #[case] d: i64, #[case] expected: i64) {
        assert_eq!(
            divide_half_even(&BigInt::from(n), &BigInt::from(d)),
            BigInt::from(expected)
        );
    }

    #[test]
    fn sums_align_scales() {
        assert_eq!(show(&add(&dec("1.5"), &dec("2.25"))), "3.75");
        assert_eq!(show(&subtract(&dec("1.0"), &dec("1.00"))), "0.00");
    }

    #[test]
    fn products_add_scales() {
        assert_eq!(show(&multiply(&dec("1.0"), &dec("2.50"))), "2.500");
        assert_eq!(
            show(&multiply(&dec("1000000000000000.0"), &dec("1000000000000000.0"))),
            "1000000000000000000000000000000.00"
        );
        assert_eq!(
            show(&multiply(&dec("0.00000000000000000001"), &dec("0.00000000000000000001"))),
            "1E-40"
        );
    }

    #[test]
    fn quotients_keep_dividend_scale() {
        assert_eq!(divide(&dec("1.0"), &dec("3.0")).map(|q| show(&q)).unwrap(), "0.3");
        assert_eq!(divide(&dec("2.00"), &dec("3")).map(|q| show(&q)).unwrap(), "0.67");
        assert!(divide(&dec("1.0"), &dec("0.000")).is_none());
    }

    #[rstest]
    #[case("0", "0")]
    #[case("-1.50", "-1.50")]
    #[case("0.000001", "0.000001")]
    #[case("0.0000001", "1E-7")]
    #[case("-0.00000012", "-1.2E-7")]
    #[case("123456789012345678901234567890.5", "123456789012345678901234567890.5")]
    fn canonical_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(show(&dec(input)), expected);
    }

    #[test]
    fn identity_is_scale_sensitive() {
        assert!(identical(&dec("1.0"), &dec("1.0")));
        assert!(!identical(&dec("1.0"), &dec("1.00")));
    }

    #[rstest]
    #[case("2.5", 2)]
    #[case("3.5", 4)]
    #[case("-2.5", -2)]
    #[case("1.49", 1)]
    #[case("7", 7)]
    fn rounding_to_integer(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(round_half_even(&dec(input)), BigInt::from(expected));
    }
}
