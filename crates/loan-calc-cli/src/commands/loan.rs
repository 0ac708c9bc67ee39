use std::fs::File;
use std::io;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_calc_core::amortization::{build_schedule, compute_schedule, LoanParameters};
use loan_calc_core::export;
use loan_calc_core::{with_metadata, PaymentFrequency};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    BiWeekly,
    Weekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::BiWeekly => PaymentFrequency::BiWeekly,
            FrequencyArg::Weekly => PaymentFrequency::Weekly,
        }
    }
}

/// Loan terms, from flags or a JSON `LoanParameters` document
#[derive(Args)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5.5 for 5.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Extra principal paid every period
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// First accrual date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Write CSV here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl LoanArgs {
    fn into_parameters(self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return Ok(input::file::read_json(path)?);
        }
        if self.principal.is_none() {
            if let Some(data) = input::stdin::read_stdin()? {
                return Ok(serde_json::from_value(data)?);
            }
        }

        let frequency = PaymentFrequency::from(self.frequency);
        Ok(LoanParameters {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: self
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            term_years: self
                .years
                .ok_or("--years is required (or provide --input)")?,
            payments_per_year: frequency.payments_per_year(),
            extra_payment: self.extra_payment,
            start_date: self
                .start_date
                .ok_or("--start-date is required (or provide --input)")?,
        })
    }
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.into_parameters()?;
    let result = build_schedule(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.into_parameters()?;
    let frequency = params.validate()?;
    let (scheduled_payment, schedule) = compute_schedule(&params)?;
    Ok(json!({
        "result": {
            "scheduled_payment": scheduled_payment,
            "frequency": frequency.label(),
            "payment_count": schedule.len(),
        }
    }))
}

pub fn run_summary(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.into_parameters()?;
    let out = build_schedule(&params)?;
    let mut summary = serde_json::to_value(&out.result.summary)?;
    summary["scheduled_payment"] = serde_json::to_value(out.result.scheduled_payment)?;
    if let Some(savings) = &out.result.savings {
        summary["interest_saved"] = serde_json::to_value(savings.interest_saved)?;
        summary["periods_saved"] = json!(savings.periods_saved);
    }
    let wrapped = with_metadata(
        &out.methodology,
        &params,
        out.warnings,
        out.metadata.computation_time_us,
        summary,
    );
    Ok(serde_json::to_value(wrapped)?)
}

/// Writes CSV directly; returns `Null` when the CSV went to stdout so that
/// nothing else is printed.
pub fn run_export(args: ExportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.into_parameters()?;
    let (_, schedule) = compute_schedule(&params)?;

    match args.out {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("Failed to create '{}': {}", path.display(), e))?;
            export::write_schedule_csv(file, &schedule)?;
            log::info!("wrote {} rows to {}", schedule.len(), path.display());
            Ok(json!({
                "result": {
                    "path": path.display().to_string(),
                    "rows": schedule.len(),
                }
            }))
        }
        None => {
            export::write_schedule_csv(io::stdout().lock(), &schedule)?;
            Ok(Value::Null)
        }
    }
}
