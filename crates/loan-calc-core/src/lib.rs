pub mod amortization;
pub mod calendar;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "export")]
pub mod export;

#[cfg(feature = "credentials")]
pub mod credentials;

pub use amortization::{compute_schedule, LoanParameters, PaymentRecord};
pub use calendar::PaymentFrequency;
pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
