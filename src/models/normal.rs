//! Standard normal CDF and PDF.
//!
//! The CDF is a closed-form logistic approximation:
//!
//!   N(z) = 1 / (1 + exp(-sqrt(pi) * (b1*z^5 + b2*z^3 + b3*z)))
//!
//! Premiums quoted elsewhere in the exchange are defined against this exact
//! formula, so it must not be swapped for a more accurate one. It is odd in
//! the exponent, so N(z) + N(-z) == 1. Accurate to ~1e-4 on [-5, 5]; the
//! quintic term dominates beyond |z| ~ 10 and the value stops being monotone.

const BETA1: f64 = -0.0004406;
const BETA2: f64 = 0.0418198;
const BETA3: f64 = 0.9;

#[inline]
pub fn normal_cdf(z: f64) -> f64 {
    let exponent =
        -std::f64::consts::PI.sqrt() * (BETA1 * z.powi(5) + BETA2 * z.powi(3) + BETA3 * z);
    1.0 / (1.0 + exponent.exp())
}

#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::distribution::{Continuous, ContinuousCDF, Normal};

    #[test]
    fn test_cdf_close_to_exact() {
        let normal = Normal::standard();
        for i in -500..=500 {
            let z = i as f64 / 100.0;
            let err = (normal_cdf(z) - normal.cdf(z)).abs();
            assert!(err < 1e-3, "cdf({z}) off by {err}");
        }
    }

    #[test]
    fn test_cdf_symmetric() {
        for i in -80..=80 {
            let z = i as f64 / 10.0;
            assert_relative_eq!(normal_cdf(z) + normal_cdf(-z), 1.0, epsilon = 1e-12);
        }
        assert_eq!(normal_cdf(0.0), 0.5);
    }

    #[test]
    fn test_cdf_monotonic_in_working_range() {
        let mut prev = 0.0;
        for i in -600..=600 {
            let p = normal_cdf(i as f64 / 100.0);
            assert!(p >= prev);
            prev = p;
        }
    }

    #[test]
    fn test_pdf_matches_density() {
        let normal = Normal::standard();
        for i in -40..=40 {
            let x = i as f64 / 10.0;
            assert_relative_eq!(normal_pdf(x), normal.pdf(x), epsilon = 1e-12);
        }
    }
}
