use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanCalcError;
use crate::types::{Money, Rate};
use crate::LoanCalcResult;

/// Convert an annual percentage (5.5 = 5.5%) into a per-period decimal rate.
pub fn periodic_rate(annual_rate_percent: Decimal, payments_per_year: u32) -> LoanCalcResult<Rate> {
    if payments_per_year == 0 {
        return Err(LoanCalcError::invalid(
            "payments_per_year",
            "Payments per year must be > 0",
        ));
    }

    (annual_rate_percent / dec!(100))
        .checked_div(Decimal::from(payments_per_year))
        .ok_or_else(|| LoanCalcError::overflow("periodic rate"))
}

/// Level payment that retires `principal` over `nper` periods at `rate`.
///
/// Uses the amortizing-annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)` and
/// falls back to straight-line `P / n` when the rate is zero (or so small that
/// the compounding factor is indistinguishable from one at 28 digits). When
/// `(1+r)^n` is too large for a Decimal the equivalent discounted form
/// `P·r / (1 − (1+r)^−n)` is used instead.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> LoanCalcResult<Money> {
    if nper == 0 {
        return Err(LoanCalcError::invalid(
            "term_years",
            "Number of periods must be > 0",
        ));
    }

    let periods = Decimal::from(nper);
    if rate.is_zero() {
        return Ok(principal / periods);
    }

    let Some(factor) = (Decimal::ONE + rate).checked_powu(u64::from(nper)) else {
        return discounted_annuity_payment(principal, rate, nper);
    };
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Ok(principal / periods);
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| LoanCalcError::overflow("scheduled payment"))
}

fn discounted_annuity_payment(principal: Money, rate: Rate, nper: u32) -> LoanCalcResult<Money> {
    let discount = Decimal::ONE
        .checked_div(Decimal::ONE + rate)
        .ok_or_else(|| LoanCalcError::overflow("discount factor"))?;
    // discount < 1, so the power can only underflow toward zero
    let discount_n = discount
        .checked_powu(u64::from(nper))
        .unwrap_or(Decimal::ZERO);

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_div(Decimal::ONE - discount_n))
        .ok_or_else(|| LoanCalcError::overflow("scheduled payment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_monthly() {
        let r = periodic_rate(dec!(6), 12).unwrap();
        assert_eq!(r, dec!(0.005));
    }

    #[test]
    fn test_periodic_rate_rejects_zero_frequency() {
        assert!(periodic_rate(dec!(6), 0).is_err());
    }

    #[test]
    fn test_annuity_payment_standard_loan() {
        let r = periodic_rate(dec!(5.5), 12).unwrap();
        let pmt = annuity_payment(dec!(25000), r, 60).unwrap();
        // 25,000 over 5 years at 5.5% ≈ 477.53/month
        assert!((pmt - dec!(477.53)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_annuity_payment_zero_rate_is_linear() {
        let pmt = annuity_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_annuity_payment_zero_periods() {
        assert!(annuity_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_annuity_payment_overflow_is_reported() {
        let err = annuity_payment(Decimal::MAX, dec!(2), 1560).unwrap_err();
        assert!(matches!(err, LoanCalcError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn test_annuity_payment_huge_compounding_factor() {
        // 1000% a year, monthly, 30 years: (1+r)^360 ≈ 1e94 does not fit.
        let r = periodic_rate(dec!(1000), 12).unwrap();
        assert!((Decimal::ONE + r).checked_powu(360).is_none());
        let pmt = annuity_payment(dec!(100000), r, 360).unwrap();
        assert!((pmt - dec!(100000) * r).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_discounted_form_matches_standard_form() {
        let r = periodic_rate(dec!(5.5), 12).unwrap();
        let standard = annuity_payment(dec!(25000), r, 60).unwrap();
        let discounted = discounted_annuity_payment(dec!(25000), r, 60).unwrap();
        assert!((standard - discounted).abs() < dec!(0.0000001));
    }
}
