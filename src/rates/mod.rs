pub mod curve;
pub mod fraction;

pub use curve::{BorrowRateCurve, CurvePoint, CURVE_POINTS, MAX_UTILIZATION_RATE_BPS};
pub use fraction::{Fraction, FULL_BPS};
