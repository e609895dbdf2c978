use crate::errors::{PricingError, PricingResult};
use crate::models::black_scholes::{intrinsic_value, price};
use crate::models::greeks::Greeks;
use crate::models::{BsParams, DEFAULT_VOLATILITY};
use crate::rates::{BorrowRateCurve, Fraction, MAX_UTILIZATION_RATE_BPS};
use chrono::{DateTime, Utc};

const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0;

// ── Assets ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Sol,
    Usdc,
}

impl Asset {
    #[inline]
    pub fn from_is_sol(is_sol_asset: bool) -> Self {
        if is_sol_asset {
            Self::Sol
        } else {
            Self::Usdc
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sol => write!(f, "sol"),
            Self::Usdc => write!(f, "usdc"),
        }
    }
}

/// Per-asset borrow curves, built and validated once and shared by every
/// pricing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRiskTable {
    sol: BorrowRateCurve,
    usdc: BorrowRateCurve,
}

impl AssetRiskTable {
    pub fn new(sol: BorrowRateCurve, usdc: BorrowRateCurve) -> Self {
        Self { sol, usdc }
    }

    /// SOL: 3% base, 12% at 80% utilization, 60% max.
    /// USDC: 1% base, 5% at 80% utilization, 25% max.
    pub fn standard() -> PricingResult<Self> {
        Ok(Self {
            sol: BorrowRateCurve::from_legacy_parameters(80, 3, 12, 60)?,
            usdc: BorrowRateCurve::from_legacy_parameters(80, 1, 5, 25)?,
        })
    }

    #[inline]
    pub fn curve(&self, asset: Asset) -> &BorrowRateCurve {
        match asset {
            Asset::Sol => &self.sol,
            Asset::Usdc => &self.usdc,
        }
    }
}

// ── Quotes ──

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteRequest {
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub is_call: bool,
    pub asset: Asset,
    pub token_locked: f64,
    pub token_owned: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Quote {
    pub asset: Asset,
    pub is_call: bool,
    pub utilization_pct: f64,
    pub borrow_rate_pct: f64,
    /// Clamped to >= 0; 0 once expired.
    pub premium: f64,
    pub intrinsic: f64,
    pub expired: bool,
    /// `None` once expired (d1 is undefined at t = 0).
    pub greeks: Option<Greeks>,
}

/// (token_locked / token_owned) * 100, rounded to a whole percent.
/// An empty pool reports 0.
pub fn calculate_utilization(token_locked: f64, token_owned: f64) -> f64 {
    if token_owned == 0.0 {
        0.0
    } else {
        ((token_locked / token_owned) * 100.0).round()
    }
}

/// Years from `now` to `expiry`; negative once expired.
pub fn years_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (expiry - now).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_YEAR
}

fn validate_pool(token_locked: f64, token_owned: f64) -> PricingResult<()> {
    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if valid(token_locked) && valid(token_owned) {
        Ok(())
    } else {
        Err(PricingError::InvalidInput(format!(
            "pool amounts must be finite and non-negative, got locked={token_locked} owned={token_owned}"
        )))
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pool utilization -> borrow rate -> premium and Greeks.
#[derive(Debug, Clone)]
pub struct OptionPricer {
    risk: AssetRiskTable,
    volatility: f64,
}

impl OptionPricer {
    pub fn new(risk: AssetRiskTable, volatility: f64) -> Self {
        Self { risk, volatility }
    }

    pub fn standard() -> PricingResult<Self> {
        Ok(Self::new(AssetRiskTable::standard()?, DEFAULT_VOLATILITY))
    }

    #[inline]
    pub fn risk_table(&self) -> &AssetRiskTable {
        &self.risk
    }

    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Borrow rate in percent, 2 decimals.
    pub fn calculate_borrow_rate(
        &self,
        token_locked: f64,
        token_owned: f64,
        is_sol_asset: bool,
    ) -> PricingResult<f64> {
        self.borrow_rate_for(Asset::from_is_sol(is_sol_asset), token_locked, token_owned)
    }

    pub fn borrow_rate_for(
        &self,
        asset: Asset,
        token_locked: f64,
        token_owned: f64,
    ) -> PricingResult<f64> {
        validate_pool(token_locked, token_owned)?;
        let utilization_pct = calculate_utilization(token_locked, token_owned);
        let utilization_bps = ((utilization_pct * 100.0) as u32).min(MAX_UTILIZATION_RATE_BPS);

        let rate = self
            .risk
            .curve(asset)
            .get_borrow_rate(Fraction::from_bps(utilization_bps))?;
        let rate_pct = round_2dp(rate.to_percent());

        tracing::debug!(
            asset = %asset,
            utilization_pct,
            borrow_rate_pct = rate_pct,
            "borrow rate computed"
        );
        Ok(rate_pct)
    }

    /// Black-Scholes premium with the pool borrow rate as the risk-free rate.
    /// Not clamped and not guarded against `t <= 0`.
    #[allow(clippy::too_many_arguments)]
    pub fn black_scholes_with_borrow_rate(
        &self,
        spot: f64,
        strike: f64,
        ttl_years: f64,
        is_call: bool,
        token_locked: f64,
        token_owned: f64,
        is_sol_asset: bool,
    ) -> PricingResult<f64> {
        let rate = self.calculate_borrow_rate(token_locked, token_owned, is_sol_asset)? / 100.0;
        let params = BsParams::new(spot, strike, ttl_years, rate, self.volatility);
        Ok(price(&params, is_call))
    }

    /// Premium at r = 0 and the pricer's volatility. Matches the free
    /// `black_scholes` unless `VOLATILITY` overrides the default; quotes
    /// always follow the pricer.
    pub fn black_scholes(&self, spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> f64 {
        price(&BsParams::new(spot, strike, ttl_years, 0.0, self.volatility), is_call)
    }

    /// Greeks at r = 0 and the pricer's volatility, as reported by `quote`.
    pub fn greeks(&self, spot: f64, strike: f64, ttl_years: f64, is_call: bool) -> Greeks {
        Greeks::from_params(&BsParams::new(spot, strike, ttl_years, 0.0, self.volatility), is_call)
    }

    /// (SOL rate, USDC rate) in percent.
    pub fn pool_borrow_rates(
        &self,
        sol_locked: f64,
        sol_owned: f64,
        usdc_locked: f64,
        usdc_owned: f64,
    ) -> PricingResult<(f64, f64)> {
        let sol_rate = self.borrow_rate_for(Asset::Sol, sol_locked, sol_owned)?;
        let usdc_rate = self.borrow_rate_for(Asset::Usdc, usdc_locked, usdc_owned)?;
        Ok((sol_rate, usdc_rate))
    }

    pub fn log_pool_status(
        &self,
        sol_locked: f64,
        sol_owned: f64,
        usdc_locked: f64,
        usdc_owned: f64,
    ) -> PricingResult<()> {
        let sol_util = calculate_utilization(sol_locked, sol_owned);
        let usdc_util = calculate_utilization(usdc_locked, usdc_owned);
        let (sol_rate, usdc_rate) =
            self.pool_borrow_rates(sol_locked, sol_owned, usdc_locked, usdc_owned)?;

        tracing::info!(
            sol_util_pct = sol_util,
            sol_rate_pct = sol_rate,
            usdc_util_pct = usdc_util,
            usdc_rate_pct = usdc_rate,
            "pool status"
        );
        Ok(())
    }

    /// Full quote for one option. Expired options quote a zero premium
    /// without Greeks; a negative premium from the CDF approximation is
    /// clamped to zero.
    pub fn quote(&self, req: &QuoteRequest) -> PricingResult<Quote> {
        if !req.spot.is_finite() || !req.strike.is_finite() || req.spot <= 0.0 || req.strike <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "spot and strike must be finite and positive, got spot={} strike={}",
                req.spot, req.strike
            )));
        }
        if !req.ttl_years.is_finite() {
            return Err(PricingError::InvalidInput(format!(
                "time to expiry must be finite, got {}",
                req.ttl_years
            )));
        }

        let utilization_pct = calculate_utilization(req.token_locked, req.token_owned);
        let borrow_rate_pct = self.borrow_rate_for(req.asset, req.token_locked, req.token_owned)?;
        let intrinsic = intrinsic_value(req.spot, req.strike, req.is_call);

        if req.ttl_years <= 0.0 {
            return Ok(Quote {
                asset: req.asset,
                is_call: req.is_call,
                utilization_pct,
                borrow_rate_pct,
                premium: 0.0,
                intrinsic,
                expired: true,
                greeks: None,
            });
        }

        let params = BsParams::new(
            req.spot,
            req.strike,
            req.ttl_years,
            borrow_rate_pct / 100.0,
            self.volatility,
        );
        let raw = price(&params, req.is_call);
        if raw < 0.0 {
            tracing::debug!(raw_premium = raw, "negative premium clamped to zero");
        }

        Ok(Quote {
            asset: req.asset,
            is_call: req.is_call,
            utilization_pct,
            borrow_rate_pct,
            premium: raw.max(0.0),
            intrinsic,
            expired: false,
            greeks: Some(self.greeks(req.spot, req.strike, req.ttl_years, req.is_call)),
        })
    }
}
