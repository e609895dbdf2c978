use crate::errors::{PricingError, PricingResult};
use std::cmp::Ordering;

/// Basis points in one whole (100%).
pub const FULL_BPS: u32 = 10_000;

/// Exact rational number used for borrow-rate interpolation.
///
/// Always stored reduced with a positive denominator, so derived equality
/// is value equality. Values are intermediates only and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: i128,
    denominator: i128,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { numerator: 0, denominator: 1 };
    pub const ONE: Fraction = Fraction { numerator: 1, denominator: 1 };

    pub fn new(numerator: i128, denominator: i128) -> PricingResult<Self> {
        if denominator == 0 {
            return Err(PricingError::DivisionByZero);
        }

        let (numerator, denominator) = if denominator < 0 {
            (
                numerator.checked_neg().ok_or(PricingError::Overflow)?,
                denominator.checked_neg().ok_or(PricingError::Overflow)?,
            )
        } else {
            (numerator, denominator)
        };

        let divisor = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()) as i128;
        Ok(Self {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        })
    }

    /// `bps / 10000`
    pub fn from_bps(bps: u32) -> Self {
        let divisor = gcd(bps as u128, FULL_BPS as u128) as i128;
        Self {
            numerator: bps as i128 / divisor,
            denominator: FULL_BPS as i128 / divisor,
        }
    }

    #[inline]
    pub fn numerator(&self) -> i128 {
        self.numerator
    }

    #[inline]
    pub fn denominator(&self) -> i128 {
        self.denominator
    }

    /// `numerator * 10000 / denominator`, truncated toward zero.
    /// Fails with `Overflow` when the result does not fit a `u32` (including
    /// negative values).
    pub fn to_bps(&self) -> PricingResult<u32> {
        let scaled = self
            .numerator
            .checked_mul(FULL_BPS as i128)
            .ok_or(PricingError::Overflow)?;
        u32::try_from(scaled / self.denominator).map_err(|_| PricingError::Overflow)
    }

    /// Value as a percentage, e.g. `1200/10000` -> `12.0`.
    pub fn to_percent(&self) -> f64 {
        self.numerator as f64 * 100.0 / self.denominator as f64
    }

    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn checked_add(self, other: Self) -> PricingResult<Self> {
        let lhs = self
            .numerator
            .checked_mul(other.denominator)
            .ok_or(PricingError::Overflow)?;
        let rhs = other
            .numerator
            .checked_mul(self.denominator)
            .ok_or(PricingError::Overflow)?;
        let denominator = self
            .denominator
            .checked_mul(other.denominator)
            .ok_or(PricingError::Overflow)?;
        Self::new(lhs.checked_add(rhs).ok_or(PricingError::Overflow)?, denominator)
    }

    pub fn checked_sub(self, other: Self) -> PricingResult<Self> {
        let negated = Self {
            numerator: other.numerator.checked_neg().ok_or(PricingError::Overflow)?,
            denominator: other.denominator,
        };
        self.checked_add(negated)
    }

    pub fn checked_mul(self, scalar: i128) -> PricingResult<Self> {
        let numerator = self
            .numerator
            .checked_mul(scalar)
            .ok_or(PricingError::Overflow)?;
        Self::new(numerator, self.denominator)
    }

    pub fn checked_div(self, scalar: i128) -> PricingResult<Self> {
        if scalar == 0 {
            return Err(PricingError::DivisionByZero);
        }
        let denominator = self
            .denominator
            .checked_mul(scalar)
            .ok_or(PricingError::Overflow)?;
        Self::new(self.numerator, denominator)
    }

    #[inline]
    pub fn is_greater_than(&self, other: &Self) -> bool {
        *self > *other
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are positive, so cross-multiplying keeps the order.
        match (
            self.numerator.checked_mul(other.denominator),
            other.numerator.checked_mul(self.denominator),
        ) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    if a == 0 {
        1
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_rejected() {
        assert_eq!(Fraction::new(1, 0), Err(PricingError::DivisionByZero));
        assert_eq!(
            Fraction::ONE.checked_div(0),
            Err(PricingError::DivisionByZero)
        );
    }

    #[test]
    fn test_normalized_on_construction() {
        let f = Fraction::new(6, -8).unwrap();
        assert_eq!(f.numerator(), -3);
        assert_eq!(f.denominator(), 4);
        assert_eq!(Fraction::new(2, 4).unwrap(), Fraction::new(1, 2).unwrap());
        assert_eq!(Fraction::new(0, 5).unwrap(), Fraction::ZERO);
    }

    #[test]
    fn test_bps_round_trip() {
        for bps in 0..=FULL_BPS {
            assert_eq!(Fraction::from_bps(bps).to_bps().unwrap(), bps, "bps={bps}");
        }
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let third = Fraction::new(1, 3).unwrap();
        let sum = third.checked_add(third).unwrap().checked_add(third).unwrap();
        assert_eq!(sum, Fraction::ONE);

        let diff = Fraction::ONE.checked_sub(third).unwrap();
        assert_eq!(diff, Fraction::new(2, 3).unwrap());

        let scaled = third.checked_mul(900).unwrap().checked_div(8000).unwrap();
        assert_eq!(scaled, Fraction::new(3, 80).unwrap());
    }

    #[test]
    fn test_to_bps_truncates_and_rejects_negative() {
        assert_eq!(Fraction::new(1, 3).unwrap().to_bps().unwrap(), 3333);
        assert_eq!(
            Fraction::new(-1, 2).unwrap().to_bps(),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn test_ordering() {
        let a = Fraction::from_bps(8000);
        let b = Fraction::new(4, 5).unwrap();
        let c = Fraction::from_bps(8001);
        assert_eq!(a, b);
        assert!(c.is_greater_than(&a));
        assert!(!a.is_greater_than(&b));
        assert!(Fraction::ONE > c);
    }

    #[test]
    fn test_percent() {
        assert_eq!(Fraction::from_bps(1200).to_percent(), 12.0);
        assert_eq!(Fraction::new(8625, 100_000).unwrap().to_percent(), 8.625);
        assert_eq!(Fraction::ZERO.to_string(), "0/1");
    }
}
