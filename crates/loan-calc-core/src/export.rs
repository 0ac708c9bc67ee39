//! Delimited-text export of a payment schedule.

use std::io;

use thiserror::Error;

use crate::amortization::PaymentRecord;
use crate::types::Money;

/// Column order of the exported file; matches the `PaymentRecord` fields.
pub const SCHEDULE_HEADERS: [&str; 8] = [
    "payment_number",
    "due_date",
    "scheduled_payment",
    "extra_payment",
    "total_payment",
    "principal_portion",
    "interest_portion",
    "remaining_balance",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Write `schedule` as CSV: one header row, one row per record, monetary
/// fields with exactly two decimals and ISO `YYYY-MM-DD` dates.
pub fn write_schedule_csv<W: io::Write>(
    writer: W,
    schedule: &[PaymentRecord],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_HEADERS)?;

    for r in schedule {
        wtr.write_record([
            r.payment_number.to_string(),
            r.due_date.format("%Y-%m-%d").to_string(),
            money(r.scheduled_payment),
            money(r.extra_payment),
            money(r.total_payment),
            money(r.principal_portion),
            money(r.interest_portion),
            money(r.remaining_balance),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render `schedule` to an in-memory CSV string.
pub fn schedule_to_csv(schedule: &[PaymentRecord]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_schedule_csv(&mut buf, schedule)?;
    Ok(String::from_utf8(buf)?)
}

fn money(amount: Money) -> String {
    format!("{:.2}", amount)
}
