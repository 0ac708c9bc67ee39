//! Payment frequencies and due-date stepping.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LoanCalcError;

/// How often a payment falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    Monthly,
    BiWeekly,
    Weekly,
}

impl PaymentFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::Weekly => 52,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "Monthly",
            PaymentFrequency::BiWeekly => "Bi-Weekly",
            PaymentFrequency::Weekly => "Weekly",
        }
    }
}

impl TryFrom<u32> for PaymentFrequency {
    type Error = LoanCalcError;

    fn try_from(payments_per_year: u32) -> Result<Self, Self::Error> {
        match payments_per_year {
            12 => Ok(PaymentFrequency::Monthly),
            26 => Ok(PaymentFrequency::BiWeekly),
            52 => Ok(PaymentFrequency::Weekly),
            other => Err(LoanCalcError::invalid(
                "payments_per_year",
                format!("must be one of 12, 26 or 52 (got {other})"),
            )),
        }
    }
}

/// Date `periods` payment periods after `anchor`.
///
/// Monthly steps are calendar months counted from the anchor, so a start on
/// the 31st lands on the last day of short months and returns to the 31st
/// whenever the month has one. Bi-weekly and weekly steps are fixed 14 and 7
/// day offsets. Returns `None` when the result falls outside chrono's range.
pub fn advance(anchor: NaiveDate, frequency: PaymentFrequency, periods: u32) -> Option<NaiveDate> {
    match frequency {
        PaymentFrequency::Monthly => anchor.checked_add_months(Months::new(periods)),
        PaymentFrequency::BiWeekly => anchor.checked_add_days(Days::new(14 * u64::from(periods))),
        PaymentFrequency::Weekly => anchor.checked_add_days(Days::new(7 * u64::from(periods))),
    }
}
