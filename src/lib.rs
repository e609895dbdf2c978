//! Options premium and borrow-rate engine.
//!
//! Pool utilization -> borrow-rate curve -> Black-Scholes premium and Greeks.
//! Everything under `models` and `rates` is pure and re-entrant; `server`
//! exposes it as a small JSON quote API.

pub mod config;
pub mod errors;
pub mod models;
pub mod pricer;
pub mod rates;
pub mod server;
pub mod state;

pub use errors::{PricingError, PricingResult};
pub use models::black_scholes::black_scholes;
pub use models::greeks::Greeks;
pub use pricer::{calculate_utilization, Asset, AssetRiskTable, OptionPricer, Quote, QuoteRequest};
pub use rates::{BorrowRateCurve, CurvePoint, Fraction};
