use crate::models::normal::normal_cdf;
use crate::models::{BsParams, DEFAULT_VOLATILITY};

/// European Black-Scholes premium from precomputed params.
///
/// Call = S*N(d1) - K*e^(-rT)*N(d2)
/// Put  = K*e^(-rT)*N(-d2) - S*N(-d1)
///
/// Not clamped: the CDF approximation can produce small negative values
/// near expiry or deep out of the money. Callers clamp to 0.
#[inline]
pub fn price(params: &BsParams, is_call: bool) -> f64 {
    if is_call {
        params.spot * normal_cdf(params.d1)
            - params.strike * params.discount * normal_cdf(params.d2)
    } else {
        params.strike * params.discount * normal_cdf(-params.d2)
            - params.spot * normal_cdf(-params.d1)
    }
}

/// Fallback premium when no pool data is available: r = 0, sigma = 0.5.
/// Always uses `DEFAULT_VOLATILITY`; under a `VOLATILITY` override use
/// `OptionPricer::black_scholes`, which follows the configured value.
pub fn black_scholes(spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> f64 {
    price(&BsParams::simple(spot, strike, ttl_years), is_call)
}

/// Premium with an explicit annualized rate (decimal, e.g. 0.12 for 12%).
pub fn black_scholes_with_rate(
    spot: f64,
    strike: f64,
    ttl_years: f64,
    is_call: bool,
    rate: f64,
) -> f64 {
    price(
        &BsParams::new(spot, strike, ttl_years, rate, DEFAULT_VOLATILITY),
        is_call,
    )
}

#[inline]
pub fn intrinsic_value(spot: f64, strike: f64, is_call: bool) -> f64 {
    if is_call {
        (spot - strike).max(0.0)
    } else {
        (strike - spot).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_itm_call_has_time_value() {
        let premium = black_scholes(160.0, 150.0, 0.25, true);
        assert!(premium > 10.0, "premium={premium} should exceed intrinsic 10");
        assert_relative_eq!(premium, 20.9245, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity_zero_rate() {
        for &(s, k, t) in &[
            (160.0, 150.0, 0.25),
            (100.0, 100.0, 1.0),
            (95.0, 120.0, 0.5),
            (2_000.0, 1_800.0, 30.0 / 365.0),
        ] {
            let call = black_scholes(s, k, t, true);
            let put = black_scholes(s, k, t, false);
            assert_relative_eq!(call - put, s - k, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_put_call_parity_with_rate() {
        let (s, k, t, r) = (160.0, 150.0, 0.25, 0.12);
        let call = black_scholes_with_rate(s, k, t, true, r);
        let put = black_scholes_with_rate(s, k, t, false, r);
        assert_relative_eq!(call - put, s - k * (-r * t).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_rate_raises_call_premium() {
        let base = black_scholes(160.0, 150.0, 0.25, true);
        let low = black_scholes_with_rate(160.0, 150.0, 0.25, true, 0.03);
        let high = black_scholes_with_rate(160.0, 150.0, 0.25, true, 0.12);
        assert!(base < low && low < high, "{base} {low} {high}");
    }

    #[test]
    fn test_zero_rate_matches_fallback() {
        assert_eq!(
            black_scholes_with_rate(100.0, 90.0, 0.1, false, 0.0),
            black_scholes(100.0, 90.0, 0.1, false)
        );
    }

    #[test]
    fn test_intrinsic_value() {
        assert_eq!(intrinsic_value(160.0, 150.0, true), 10.0);
        assert_eq!(intrinsic_value(160.0, 150.0, false), 0.0);
        assert_eq!(intrinsic_value(140.0, 150.0, false), 10.0);
    }
}
