pub mod schedule;
pub mod summary;

pub use schedule::{
    build_schedule, compute_schedule, AmortizationOutput, LoanParameters, PaymentRecord,
};
pub use summary::{extra_payment_savings, summarize, ExtraPaymentSavings, LoanSummary};
