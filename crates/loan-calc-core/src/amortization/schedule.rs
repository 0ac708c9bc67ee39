//! Amortization schedule generation.
//!
//! Produces the level periodic payment for a fixed-rate loan and the ordered
//! payment-by-payment schedule, with optional extra principal applied every
//! period. The running balance is carried unrounded; every monetary field is
//! rounded to cents only when a record is emitted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::summary::{self, ExtraPaymentSavings, LoanSummary};
use crate::calendar::{self, PaymentFrequency};
use crate::error::LoanCalcError;
use crate::time_value;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A residual balance below half a cent is swept into the current payment.
const BALANCE_EPSILON: Decimal = dec!(0.005);

/// Terms beyond this many years are allowed but flagged.
const LONG_TERM_YEARS: u32 = 30;

/// Thirty years of weekly payments.
const MAX_PREALLOCATED_PERIODS: u32 = 1560;

/// Annual rates above this percentage are allowed but flagged.
const HIGH_RATE_PERCENT: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Loan terms for a fixed-rate amortizing loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed. Must be positive.
    pub principal: Money,
    /// Annual interest rate as a percentage (5.5 = 5.5%). Zero is interest-free.
    pub annual_rate_percent: Decimal,
    /// Loan term in whole years.
    pub term_years: u32,
    /// 12 (monthly), 26 (bi-weekly) or 52 (weekly).
    pub payments_per_year: u32,
    /// Additional principal paid every period on top of the scheduled payment.
    #[serde(default)]
    pub extra_payment: Money,
    /// First accrual date; payment `n` falls due `n` periods later.
    pub start_date: NaiveDate,
}

impl LoanParameters {
    /// Check every constraint and resolve the payment frequency.
    pub fn validate(&self) -> LoanCalcResult<PaymentFrequency> {
        if self.principal <= Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "principal",
                "Principal must be positive",
            ));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "annual_rate_percent",
                "Annual rate cannot be negative",
            ));
        }
        if self.term_years == 0 {
            return Err(LoanCalcError::invalid(
                "term_years",
                "Term must be at least one year",
            ));
        }
        let frequency = PaymentFrequency::try_from(self.payments_per_year)?;
        if self.extra_payment < Decimal::ZERO {
            return Err(LoanCalcError::invalid(
                "extra_payment",
                "Extra payment cannot be negative",
            ));
        }
        Ok(frequency)
    }

    /// Same loan with no extra payment.
    pub fn without_extra_payment(&self) -> Self {
        LoanParameters {
            extra_payment: Decimal::ZERO,
            ..self.clone()
        }
    }
}

/// One period of the schedule. Monetary fields are rounded to cents.
///
/// On the final record `principal_portion` is whatever makes the principal
/// column add up to the loan amount, so it can differ by a few cents from the
/// previous record's `remaining_balance` (the gap grows with the number of
/// periods, up to about 0.20 on a 30-year weekly loan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub scheduled_payment: Money,
    pub extra_payment: Money,
    /// `principal_portion + interest_portion`; smaller than scheduled plus
    /// extra on a capped final period.
    pub total_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Full result of an amortization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub scheduled_payment: Money,
    pub frequency: PaymentFrequency,
    /// Periods in the contractual term (the schedule may be shorter).
    pub total_periods: u32,
    pub schedule: Vec<PaymentRecord>,
    pub summary: LoanSummary,
    /// Present only when an extra payment is applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<ExtraPaymentSavings>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the scheduled payment and the payment-by-payment schedule.
///
/// The schedule stops after `term_years * payments_per_year` periods or as
/// soon as the balance reaches zero, whichever comes first. The last record
/// always shows a remaining balance of exactly zero, and its principal
/// portion absorbs the cent rounding of earlier records so that the emitted
/// principal portions add up to the principal. That final principal portion
/// therefore need not equal the prior record's rounded `remaining_balance`.
///
/// Amounts too large to carry cents (about 7.9e26 and up) fail with
/// `ArithmeticOverflow`.
pub fn compute_schedule(params: &LoanParameters) -> LoanCalcResult<(Money, Vec<PaymentRecord>)> {
    let frequency = params.validate()?;
    let payments_per_year = frequency.payments_per_year();

    let rate = time_value::periodic_rate(params.annual_rate_percent, payments_per_year)?;
    let total_periods = params
        .term_years
        .checked_mul(payments_per_year)
        .ok_or_else(|| LoanCalcError::overflow("total periods"))?;
    let payment = time_value::annuity_payment(params.principal, rate, total_periods)?;
    let installment = payment
        .checked_add(params.extra_payment)
        .ok_or_else(|| LoanCalcError::overflow("installment"))?;

    let scheduled_out = round_cents(payment)?;
    let extra_out = round_cents(params.extra_payment)?;
    let principal_target = round_cents(params.principal)?;

    let mut balance = params.principal;
    let mut principal_emitted = Decimal::ZERO;
    let mut schedule = Vec::with_capacity(total_periods.min(MAX_PREALLOCATED_PERIODS) as usize);

    for payment_number in 1..=total_periods {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| LoanCalcError::overflow("periodic interest"))?;

        let mut principal_portion = (installment - interest).max(Decimal::ZERO).min(balance);
        if payment_number == total_periods || balance - principal_portion < BALANCE_EPSILON {
            principal_portion = balance;
        }
        balance -= principal_portion;

        let due_date = calendar::advance(params.start_date, frequency, payment_number)
            .ok_or_else(|| LoanCalcError::overflow("due date"))?;

        let interest_out = round_cents(interest)?;
        let principal_out = if balance.is_zero() {
            (principal_target - principal_emitted).max(Decimal::ZERO)
        } else {
            round_cents(principal_portion)?
        };
        principal_emitted += principal_out;
        let total_payment = principal_out
            .checked_add(interest_out)
            .ok_or_else(|| LoanCalcError::overflow("total payment"))?;

        schedule.push(PaymentRecord {
            payment_number,
            due_date,
            scheduled_payment: scheduled_out,
            extra_payment: extra_out,
            total_payment,
            principal_portion: principal_out,
            interest_portion: interest_out,
            remaining_balance: round_cents(balance)?,
        });

        if balance.is_zero() {
            break;
        }
    }

    log::debug!(
        "amortized {} over {} of {} {} periods, payment {}",
        params.principal,
        schedule.len(),
        total_periods,
        frequency.label().to_lowercase(),
        scheduled_out
    );

    Ok((scheduled_out, schedule))
}

/// Run the schedule and wrap it with summary, savings and warnings.
pub fn build_schedule(
    params: &LoanParameters,
) -> LoanCalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let frequency = params.validate()?;
    let total_periods = params
        .term_years
        .checked_mul(frequency.payments_per_year())
        .ok_or_else(|| LoanCalcError::overflow("total periods"))?;

    let (scheduled_payment, schedule) = compute_schedule(params)?;
    let loan_summary = summary::summarize(params.principal, &schedule)?;
    let savings = summary::extra_payment_savings(params, &loan_summary)?;

    let mut warnings: Vec<String> = Vec::new();
    if params.term_years > LONG_TERM_YEARS {
        warnings.push(format!(
            "Term of {} years exceeds the usual {LONG_TERM_YEARS}-year maximum",
            params.term_years
        ));
    }
    if params.annual_rate_percent > HIGH_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is unusually high",
            params.annual_rate_percent
        ));
    }
    if params.extra_payment >= params.principal {
        warnings.push("Extra payment alone retires the loan in the first period".into());
    }
    if (schedule.len() as u32) < total_periods {
        warnings.push(format!(
            "Loan is paid off after {} of {} scheduled payments",
            schedule.len(),
            total_periods
        ));
    }

    let output = AmortizationOutput {
        scheduled_payment,
        frequency,
        total_periods,
        schedule,
        summary: loan_summary,
        savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate level-payment amortization",
        params,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
