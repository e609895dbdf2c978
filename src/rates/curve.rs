use crate::errors::{PricingError, PricingResult};
use crate::rates::fraction::{Fraction, FULL_BPS};

pub const MAX_UTILIZATION_RATE_BPS: u32 = FULL_BPS;

/// Number of knots a curve always holds after padding.
pub const CURVE_POINTS: usize = 11;

/// One knot of a borrow-rate curve, both axes in basis points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CurvePoint {
    pub utilization_rate_bps: u32,
    pub borrow_rate_bps: u32,
}

impl CurvePoint {
    pub const fn new(utilization_rate_bps: u32, borrow_rate_bps: u32) -> Self {
        Self {
            utilization_rate_bps,
            borrow_rate_bps,
        }
    }
}

/// Piecewise-linear utilization -> borrow rate curve.
///
/// Invariants (checked by `validate`, so every constructed curve holds them):
///   - first knot is at 0% utilization, last knot at 100%
///   - utilization strictly increases until it reaches 100%, then only repeats 100%
///   - borrow rate never decreases
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BorrowRateCurve {
    points: [CurvePoint; CURVE_POINTS],
}

impl BorrowRateCurve {
    pub fn from_points(pts: &[CurvePoint]) -> PricingResult<Self> {
        if pts.len() < 2 {
            return Err(PricingError::InvalidCurve(format!(
                "need at least 2 points, got {}",
                pts.len()
            )));
        }
        if pts.len() > CURVE_POINTS {
            return Err(PricingError::InvalidCurve(format!(
                "at most {CURVE_POINTS} points allowed, got {}",
                pts.len()
            )));
        }

        let last = pts[pts.len() - 1];
        if last.utilization_rate_bps != MAX_UTILIZATION_RATE_BPS {
            return Err(PricingError::InvalidCurve(format!(
                "last point must be at {MAX_UTILIZATION_RATE_BPS} bps utilization, got {}",
                last.utilization_rate_bps
            )));
        }

        let mut points = [last; CURVE_POINTS];
        points[..pts.len()].copy_from_slice(pts);

        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    /// Builds a curve from the four-percentage shorthand used by pool configs.
    pub fn from_legacy_parameters(
        optimal_utilization_rate_pct: u8,
        base_rate_pct: u8,
        optimal_rate_pct: u8,
        max_rate_pct: u8,
    ) -> PricingResult<Self> {
        let optimal_utilization_rate = u32::from(optimal_utilization_rate_pct) * 100;
        let base_rate = u32::from(base_rate_pct) * 100;
        let optimal_rate = u32::from(optimal_rate_pct) * 100;
        let max_rate = u32::from(max_rate_pct) * 100;

        let points: &[CurvePoint] = if optimal_utilization_rate == 0 {
            &[
                CurvePoint::new(0, optimal_rate),
                CurvePoint::new(MAX_UTILIZATION_RATE_BPS, max_rate),
            ]
        } else if optimal_utilization_rate == MAX_UTILIZATION_RATE_BPS {
            &[
                CurvePoint::new(0, base_rate),
                CurvePoint::new(MAX_UTILIZATION_RATE_BPS, optimal_rate),
            ]
        } else {
            &[
                CurvePoint::new(0, base_rate),
                CurvePoint::new(optimal_utilization_rate, optimal_rate),
                CurvePoint::new(MAX_UTILIZATION_RATE_BPS, max_rate),
            ]
        };
        Self::from_points(points)
    }

    pub fn new_flat(borrow_rate_bps: u32) -> PricingResult<Self> {
        Self::from_points(&[
            CurvePoint::new(0, borrow_rate_bps),
            CurvePoint::new(MAX_UTILIZATION_RATE_BPS, borrow_rate_bps),
        ])
    }

    pub fn validate(&self) -> PricingResult<()> {
        let pts = &self.points;

        if pts[0].utilization_rate_bps != 0 {
            return Err(PricingError::InvalidCurve(format!(
                "first point must be at 0 bps utilization, got {}",
                pts[0].utilization_rate_bps
            )));
        }
        if pts[CURVE_POINTS - 1].utilization_rate_bps != MAX_UTILIZATION_RATE_BPS {
            return Err(PricingError::InvalidCurve(format!(
                "last point must be at {MAX_UTILIZATION_RATE_BPS} bps utilization"
            )));
        }

        for window in pts.windows(2) {
            let (prev, pt) = (window[0], window[1]);

            let utilization_ok = if prev.utilization_rate_bps == MAX_UTILIZATION_RATE_BPS {
                pt.utilization_rate_bps == MAX_UTILIZATION_RATE_BPS
            } else {
                pt.utilization_rate_bps > prev.utilization_rate_bps
            };
            if !utilization_ok {
                return Err(PricingError::InvalidCurve(format!(
                    "utilization rate inconsistency: {} bps after {} bps",
                    pt.utilization_rate_bps, prev.utilization_rate_bps
                )));
            }

            if pt.borrow_rate_bps < prev.borrow_rate_bps {
                return Err(PricingError::InvalidCurve(format!(
                    "rates must be non-decreasing: {} bps after {} bps",
                    pt.borrow_rate_bps, prev.borrow_rate_bps
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn points(&self) -> &[CurvePoint; CURVE_POINTS] {
        &self.points
    }

    #[inline]
    pub fn base_rate_bps(&self) -> u32 {
        self.points[0].borrow_rate_bps
    }

    #[inline]
    pub fn max_rate_bps(&self) -> u32 {
        self.points[CURVE_POINTS - 1].borrow_rate_bps
    }

    /// Borrow rate at `utilization_rate` (1 == 100%). Utilization above 100%
    /// is clamped. Exact on knots, linear between them.
    ///
    /// Segments are bracketed with exact fraction comparisons, not truncated
    /// bps. For whole-bps inputs the two agree; a fractional input such as
    /// 8000.5 bps interpolates past the 8000 knot instead of snapping to it.
    pub fn get_borrow_rate(&self, utilization_rate: Fraction) -> PricingResult<Fraction> {
        let utilization_rate = utilization_rate.min(Fraction::ONE);

        for window in self.points.windows(2) {
            let (start_pt, end_pt) = (window[0], window[1]);
            let start = Fraction::from_bps(start_pt.utilization_rate_bps);
            let end = Fraction::from_bps(end_pt.utilization_rate_bps);

            if utilization_rate < start || utilization_rate > end {
                continue;
            }
            if utilization_rate == start {
                return Ok(Fraction::from_bps(start_pt.borrow_rate_bps));
            }
            if utilization_rate == end {
                return Ok(Fraction::from_bps(end_pt.borrow_rate_bps));
            }
            return interpolate(start_pt, end_pt, utilization_rate);
        }

        Err(PricingError::InvalidUtilization(format!(
            "no curve segment brackets {utilization_rate}"
        )))
    }
}

/// rate = start_rate + (u - start_u) * (end_rate - start_rate) / (end_u - start_u)
fn interpolate(
    start_pt: CurvePoint,
    end_pt: CurvePoint,
    utilization_rate: Fraction,
) -> PricingResult<Fraction> {
    let slope_nom = i128::from(end_pt.borrow_rate_bps) - i128::from(start_pt.borrow_rate_bps);
    if slope_nom < 0 {
        return Err(PricingError::InvalidCurve(format!(
            "negative slope between {} and {} bps",
            start_pt.utilization_rate_bps, end_pt.utilization_rate_bps
        )));
    }

    let slope_denom =
        i128::from(end_pt.utilization_rate_bps) - i128::from(start_pt.utilization_rate_bps);
    if slope_denom <= 0 {
        return Err(PricingError::InvalidCurve(format!(
            "empty segment at {} bps",
            start_pt.utilization_rate_bps
        )));
    }

    let coef = utilization_rate.checked_sub(Fraction::from_bps(start_pt.utilization_rate_bps))?;
    if coef < Fraction::ZERO {
        return Err(PricingError::InvalidUtilization(format!(
            "{utilization_rate} is below segment start"
        )));
    }

    coef.checked_mul(slope_nom)?
        .checked_div(slope_denom)?
        .checked_add(Fraction::from_bps(start_pt.borrow_rate_bps))
}
