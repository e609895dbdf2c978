/// Error types for the pricing core and the quote service.
///
/// Curve construction errors are fatal at startup. Errors raised while
/// pricing are returned to the caller, which degrades them to a
/// "price unavailable" response instead of crashing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("invalid borrow rate curve: {0}")]
    InvalidCurve(String),

    #[error("invalid utilization rate: {0}")]
    InvalidUtilization(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<std::num::ParseIntError> for PricingError {
    fn from(e: std::num::ParseIntError) -> Self {
        PricingError::Config(e.to_string())
    }
}

pub type PricingResult<T> = Result<T, PricingError>;
