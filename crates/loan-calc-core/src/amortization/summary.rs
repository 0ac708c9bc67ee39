use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::schedule::{compute_schedule, LoanParameters, PaymentRecord};
use crate::error::LoanCalcError;
use crate::types::{round_cents, Money};
use crate::LoanCalcResult;

/// Totals over a completed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub total_interest: Money,
    /// Principal plus total interest.
    pub total_cost: Money,
    pub payment_count: u32,
    /// Sum of every `total_payment` in the schedule.
    pub total_paid: Money,
    pub final_payment_date: Option<NaiveDate>,
    /// Principal as a percentage of total cost.
    pub principal_share: Decimal,
    /// Interest as a percentage of total cost; the two shares sum to 100.
    pub interest_share: Decimal,
}

/// What the extra payment buys relative to the same loan without it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentSavings {
    pub baseline_total_interest: Money,
    pub interest_saved: Money,
    pub periods_saved: u32,
}

/// Totals over `schedule`. Sums that leave the decimal range fail with
/// `ArithmeticOverflow` instead of panicking.
pub fn summarize(principal: Money, schedule: &[PaymentRecord]) -> LoanCalcResult<LoanSummary> {
    let total_interest = checked_sum(schedule.iter().map(|r| r.interest_portion), "total interest")?;
    let total_paid = checked_sum(schedule.iter().map(|r| r.total_payment), "total paid")?;
    let total_cost = principal
        .checked_add(total_interest)
        .ok_or_else(|| LoanCalcError::overflow("total cost"))?;

    let (principal_share, interest_share) = if total_cost.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let principal_share = round_cents(principal / total_cost * dec!(100))?;
        (principal_share, dec!(100) - principal_share)
    };

    Ok(LoanSummary {
        total_interest,
        total_cost,
        payment_count: schedule.len() as u32,
        total_paid,
        final_payment_date: schedule.last().map(|r| r.due_date),
        principal_share,
        interest_share,
    })
}

fn checked_sum(mut amounts: impl Iterator<Item = Money>, context: &str) -> LoanCalcResult<Money> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| LoanCalcError::overflow(context))
    })
}

/// Compare against the no-extra-payment baseline. `None` when no extra
/// payment is configured.
pub fn extra_payment_savings(
    params: &LoanParameters,
    with_extra: &LoanSummary,
) -> LoanCalcResult<Option<ExtraPaymentSavings>> {
    if params.extra_payment.is_zero() {
        return Ok(None);
    }

    let (_, baseline) = compute_schedule(&params.without_extra_payment())?;
    let baseline_summary = summarize(params.principal, &baseline)?;

    Ok(Some(ExtraPaymentSavings {
        baseline_total_interest: baseline_summary.total_interest,
        interest_saved: baseline_summary.total_interest - with_extra.total_interest,
        periods_saved: baseline_summary
            .payment_count
            .saturating_sub(with_extra.payment_count),
    }))
}
