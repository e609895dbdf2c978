use crate::errors::{PricingError, PricingResult};
use crate::models::DEFAULT_VOLATILITY;
use crate::pricer::{AssetRiskTable, OptionPricer};
use crate::rates::{BorrowRateCurve, CurvePoint};

/// A borrow curve as written in configuration: either the four legacy
/// percentages `optimal_util,base,optimal,max` or explicit
/// `util_bps:rate_bps` knots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurveSpec {
    Legacy {
        optimal_utilization_pct: u8,
        base_rate_pct: u8,
        optimal_rate_pct: u8,
        max_rate_pct: u8,
    },
    Points(Vec<CurvePoint>),
}

impl CurveSpec {
    pub fn parse(raw: &str) -> PricingResult<Self> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

        if parts.iter().any(|p| p.contains(':')) {
            let points = parts
                .iter()
                .map(|p| {
                    let (util, rate) = p.split_once(':').ok_or_else(|| {
                        PricingError::Config(format!("expected util_bps:rate_bps, got {p:?}"))
                    })?;
                    Ok(CurvePoint::new(util.trim().parse()?, rate.trim().parse()?))
                })
                .collect::<PricingResult<Vec<_>>>()?;
            return Ok(Self::Points(points));
        }

        match parts.as_slice() {
            [optimal_util, base, optimal, max] => Ok(Self::Legacy {
                optimal_utilization_pct: optimal_util.parse()?,
                base_rate_pct: base.parse()?,
                optimal_rate_pct: optimal.parse()?,
                max_rate_pct: max.parse()?,
            }),
            _ => Err(PricingError::Config(format!(
                "expected 4 legacy percentages or util:rate points, got {raw:?}"
            ))),
        }
    }

    pub fn build(&self) -> PricingResult<BorrowRateCurve> {
        match self {
            Self::Legacy {
                optimal_utilization_pct,
                base_rate_pct,
                optimal_rate_pct,
                max_rate_pct,
            } => BorrowRateCurve::from_legacy_parameters(
                *optimal_utilization_pct,
                *base_rate_pct,
                *optimal_rate_pct,
                *max_rate_pct,
            ),
            Self::Points(points) => BorrowRateCurve::from_points(points),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub volatility: f64,
    pub sol_curve: CurveSpec,
    pub usdc_curve: CurveSpec,
}

impl AppConfig {
    pub fn from_env() -> PricingResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to the standard
    /// SOL/USDC curves.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PricingResult<Self> {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server_port = var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| PricingError::Config(format!("SERVER_PORT: {e}")))?;

        let volatility = var_or("VOLATILITY", &DEFAULT_VOLATILITY.to_string())
            .parse::<f64>()
            .map_err(|e| PricingError::Config(format!("VOLATILITY: {e}")))?;
        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(PricingError::Config(format!(
                "VOLATILITY must be positive, got {volatility}"
            )));
        }

        let sol_curve = CurveSpec::parse(&var_or("SOL_BORROW_CURVE", "80,3,12,60"))
            .map_err(|e| PricingError::Config(format!("SOL_BORROW_CURVE: {e}")))?;
        let usdc_curve = CurveSpec::parse(&var_or("USDC_BORROW_CURVE", "80,1,5,25"))
            .map_err(|e| PricingError::Config(format!("USDC_BORROW_CURVE: {e}")))?;

        Ok(Self {
            server_port,
            volatility,
            sol_curve,
            usdc_curve,
        })
    }

    /// Validates both curves; any violation aborts startup.
    pub fn risk_table(&self) -> PricingResult<AssetRiskTable> {
        Ok(AssetRiskTable::new(
            self.sol_curve.build()?,
            self.usdc_curve.build()?,
        ))
    }

    pub fn pricer(&self) -> PricingResult<OptionPricer> {
        Ok(OptionPricer::new(self.risk_table()?, self.volatility))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> PricingResult<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_match_standard_table() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.server_port, 3001);
        assert_eq!(cfg.volatility, 0.5);
        assert_eq!(cfg.risk_table().unwrap(), AssetRiskTable::standard().unwrap());
    }

    #[test]
    fn test_parse_legacy_and_points() {
        assert_eq!(
            CurveSpec::parse(" 80, 3 ,12,60").unwrap(),
            CurveSpec::Legacy {
                optimal_utilization_pct: 80,
                base_rate_pct: 3,
                optimal_rate_pct: 12,
                max_rate_pct: 60,
            }
        );

        let spec = CurveSpec::parse("0:300,8000:1200,10000:6000").unwrap();
        assert_eq!(
            spec.build().unwrap(),
            BorrowRateCurve::from_legacy_parameters(80, 3, 12, 60).unwrap()
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(CurveSpec::parse("80,3,12"), Err(PricingError::Config(_))));
        assert!(matches!(CurveSpec::parse("80,3,12,600"), Err(PricingError::Config(_))));
        assert!(matches!(CurveSpec::parse("0:300,abc"), Err(PricingError::Config(_))));
        assert!(matches!(CurveSpec::parse("0:x,10000:5"), Err(PricingError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let cfg = config(&[
            ("SERVER_PORT", "8080"),
            ("VOLATILITY", "0.8"),
            ("USDC_BORROW_CURVE", "0:100,10000:100"),
        ])
        .unwrap();
        assert_eq!(cfg.server_port, 8080);
        let pricer = cfg.pricer().unwrap();
        assert_eq!(pricer.volatility(), 0.8);
        assert_eq!(pricer.calculate_borrow_rate(90.0, 100.0, false).unwrap(), 1.0);

        assert!(config(&[("VOLATILITY", "-1")]).is_err());
        assert!(config(&[("SERVER_PORT", "http")]).is_err());
    }

    #[test]
    fn test_invalid_curve_fails_at_build() {
        let cfg = config(&[("SOL_BORROW_CURVE", "0:500,5000:100,10000:900")]).unwrap();
        assert!(matches!(cfg.risk_table(), Err(PricingError::InvalidCurve(_))));
    }
}
