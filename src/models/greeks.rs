use crate::models::normal::{normal_cdf, normal_pdf};
use crate::models::{BsParams, DAYS_PER_YEAR};

/// Option sensitivities. Displayed next to the premium; always computed at
/// r = 0 even when the premium uses the pool borrow rate.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl Greeks {
    pub fn from_params(params: &BsParams, is_call: bool) -> Self {
        Self {
            delta: delta_of(params, is_call),
            gamma: gamma_of(params),
            theta: theta_of(params, is_call),
            vega: vega_of(params),
            rho: rho_of(params, is_call),
        }
    }

    /// All Greeks at r = 0, sigma = 0.5. Quotes use `OptionPricer::greeks`,
    /// which follows a configured volatility instead.
    pub fn compute(spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> Self {
        Self::from_params(&BsParams::simple(spot, strike, ttl_years), is_call)
    }
}

#[inline]
pub fn delta_of(p: &BsParams, is_call: bool) -> f64 {
    if is_call {
        normal_cdf(p.d1)
    } else {
        -normal_cdf(-p.d1)
    }
}

#[inline]
pub fn gamma_of(p: &BsParams) -> f64 {
    normal_pdf(p.d1) / (p.spot * p.sigma_sqrt_t)
}

/// Per 1% move in volatility.
#[inline]
pub fn vega_of(p: &BsParams) -> f64 {
    p.spot * normal_pdf(p.d1) * p.sqrt_t * 0.01
}

/// Per calendar day.
#[inline]
pub fn theta_of(p: &BsParams, is_call: bool) -> f64 {
    let decay = -p.spot * normal_pdf(p.d1) * p.sigma / (2.0 * p.sqrt_t);
    let carry = p.rate * p.strike * p.discount;
    let annual = if is_call {
        decay - carry * normal_cdf(p.d2)
    } else {
        decay + carry * normal_cdf(-p.d2)
    };
    annual / DAYS_PER_YEAR
}

/// Per 1% move in rates.
#[inline]
pub fn rho_of(p: &BsParams, is_call: bool) -> f64 {
    let scale = p.strike * p.ttl_years * p.discount * 0.01;
    if is_call {
        scale * normal_cdf(p.d2)
    } else {
        -scale * normal_cdf(-p.d2)
    }
}

pub fn delta(spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> f64 {
    delta_of(&BsParams::simple(spot, strike, ttl_years), is_call)
}

pub fn gamma(spot: f64, strike: f64, ttl_years: f64) -> f64 {
    gamma_of(&BsParams::simple(spot, strike, ttl_years))
}

pub fn vega(spot: f64, strike: f64, ttl_years: f64) -> f64 {
    vega_of(&BsParams::simple(spot, strike, ttl_years))
}

pub fn theta(spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> f64 {
    theta_of(&BsParams::simple(spot, strike, ttl_years), is_call)
}

pub fn rho(spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> f64 {
    rho_of(&BsParams::simple(spot, strike, ttl_years), is_call)
}
