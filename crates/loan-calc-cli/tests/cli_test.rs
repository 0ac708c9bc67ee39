use assert_cmd::cargo_bin;
use predicates::prelude::*;
use rust_decimal::Decimal;
use assert_cmd::Command;

fn loancalc() -> Command {
    Command::new(cargo_bin!("loancalc"))
}

const CAR_LOAN: [&str; 8] = [
    "--principal",
    "25000",
    "--rate",
    "5.5",
    "--years",
    "5",
    "--start-date",
    "2025-01-15",
];

#[test]
fn test_payment_minimal() -> Result<(), Box<dyn std::error::Error>> {
    loancalc()
        .arg("payment")
        .args(CAR_LOAN)
        .args(["--output", "minimal"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("477.53"));
    Ok(())
}

#[test]
fn test_schedule_json_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let output = loancalc()
        .arg("schedule")
        .args(CAR_LOAN)
        .write_stdin("")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 60);
    assert_eq!(value["result"]["frequency"], "monthly");
    let last_balance: Decimal = value["result"]["schedule"][59]["remaining_balance"]
        .as_str()
        .unwrap()
        .parse()?;
    assert!(last_balance.is_zero());
    Ok(())
}

#[test]
fn test_export_csv_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    loancalc()
        .arg("export")
        .args(CAR_LOAN)
        .args(["--frequency", "bi-weekly"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "payment_number,due_date,scheduled_payment,extra_payment,total_payment,principal_portion,interest_portion,remaining_balance",
        ))
        .stdout(predicate::str::contains("1,2025-01-29,"));
    Ok(())
}

#[test]
fn test_schedule_from_stdin_json() -> Result<(), Box<dyn std::error::Error>> {
    let input = r#"{
        "principal": "10000",
        "annual_rate_percent": "0",
        "term_years": 1,
        "payments_per_year": 12,
        "start_date": "2025-01-01"
    }"#;
    loancalc()
        .args(["summary", "--output", "minimal"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("833.33"));
    Ok(())
}

#[test]
fn test_invalid_frequency_in_json_fails() -> Result<(), Box<dyn std::error::Error>> {
    let input = r#"{
        "principal": "10000",
        "annual_rate_percent": "4",
        "term_years": 1,
        "payments_per_year": 10,
        "start_date": "2025-01-01"
    }"#;
    loancalc()
        .arg("schedule")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("payments_per_year"));
    Ok(())
}

#[test]
fn test_missing_flag_reports_requirement() -> Result<(), Box<dyn std::error::Error>> {
    loancalc()
        .args(["schedule", "--principal", "1000", "--rate", "5", "--years", "1"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--start-date is required"));
    Ok(())
}

#[test]
fn test_register_and_login() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = dir.path().join("users.json");
    let store = store.to_str().unwrap();

    loancalc()
        .args(["register", "--username", "erin", "--password", "pw1", "--store", store])
        .assert()
        .success()
        .stdout(predicate::str::contains("erin"));

    loancalc()
        .args(["register", "--username", "erin", "--password", "pw2", "--store", store])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already taken"));

    loancalc()
        .args(["login", "--username", "erin", "--password", "pw1", "--store", store])
        .assert()
        .success()
        .stdout(predicate::str::contains("authenticated_at"));

    loancalc()
        .args(["login", "--username", "erin", "--password", "bad", "--store", store])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
    Ok(())
}
