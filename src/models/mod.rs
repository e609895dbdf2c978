pub mod black_scholes;
pub mod greeks;
pub mod normal;

/// Annualized volatility used for every premium and Greek.
pub const DEFAULT_VOLATILITY: f64 = 0.5;

/// Day count used to express theta per day.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Black-Scholes inputs with the shared `d1`/`d2` derivation precomputed.
/// Built once per (spot, strike, t, r, sigma) and passed to the price and
/// every Greek. Stack-allocated, Copy.
///
/// No validation: `t <= 0` or non-positive spot/strike yield NaN/inf.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct BsParams {
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub rate: f64,
    pub sigma: f64,
    // Precomputed
    pub sqrt_t: f64,
    pub sigma_sqrt_t: f64,
    pub discount: f64,
    pub d1: f64,
    pub d2: f64,
}

impl BsParams {
    #[inline]
    pub fn new(spot: f64, strike: f64, ttl_years: f64, rate: f64, sigma: f64) -> Self {
        let sqrt_t = ttl_years.sqrt();
        let sigma_sqrt_t = sigma * sqrt_t;
        let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * ttl_years) / sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;
        Self {
            spot,
            strike,
            ttl_years,
            rate,
            sigma,
            sqrt_t,
            sigma_sqrt_t,
            discount: (-rate * ttl_years).exp(),
            d1,
            d2,
        }
    }

    /// Zero rate, default volatility.
    #[inline]
    pub fn simple(spot: f64, strike: f64, ttl_years: f64) -> Self {
        Self::new(spot, strike, ttl_years, 0.0, DEFAULT_VOLATILITY)
    }
}
