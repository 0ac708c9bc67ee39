use chrono::NaiveDate;
use loan_calc_core::credentials::{
    Authenticator, CredentialError, CredentialStore, JsonFileCredentialStore,
};
use loan_calc_core::export::{schedule_to_csv, write_schedule_csv, SCHEDULE_HEADERS};
use loan_calc_core::{compute_schedule, LoanParameters};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

// ===========================================================================
// CSV export
// ===========================================================================

#[test]
fn test_export_full_schedule() {
    let params = LoanParameters {
        principal: dec!(10000),
        annual_rate_percent: dec!(0),
        term_years: 1,
        payments_per_year: 12,
        extra_payment: dec!(0),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    };
    let (_, schedule) = compute_schedule(&params).unwrap();
    let csv = schedule_to_csv(&schedule).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], SCHEDULE_HEADERS.join(","));
    assert_eq!(lines[1], "1,2025-02-01,833.33,0.00,833.33,833.33,0.00,9166.67");
    assert!(lines[12].starts_with("12,2026-01-01,833.33,0.00,833.37,833.37,0.00,0.00"));
}

#[test]
fn test_export_to_file() {
    let params = LoanParameters {
        principal: dec!(2500),
        annual_rate_percent: dec!(7),
        term_years: 1,
        payments_per_year: 52,
        extra_payment: dec!(0),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    };
    let (_, schedule) = compute_schedule(&params).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.csv");
    let file = std::fs::File::create(&path).unwrap();
    write_schedule_csv(file, &schedule).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 53);
}

// ===========================================================================
// Credentials
// ===========================================================================

#[test]
fn test_file_backed_registration_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    let auth = Authenticator::new(JsonFileCredentialStore::open(&path).unwrap());
    auth.register("dana", "pa55word").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("pa55word"));

    let auth = Authenticator::new(JsonFileCredentialStore::open(&path).unwrap());
    assert!(auth.authenticate("dana", "pa55word").unwrap());
    assert!(matches!(
        auth.register("dana", "other"),
        Err(CredentialError::UsernameTaken(_))
    ));
    assert!(auth.store().get("dana").unwrap().is_some());

    let session = auth.login("dana", "pa55word").unwrap();
    assert_eq!(session.username(), "dana");
}

#[test]
fn test_two_handles_on_one_file_share_registrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("users.json");

    let first = Authenticator::new(JsonFileCredentialStore::open(&path).unwrap());
    let second = Authenticator::new(JsonFileCredentialStore::open(&path).unwrap());

    first.register("alice", "one").unwrap();
    assert!(matches!(
        second.register("alice", "two"),
        Err(CredentialError::UsernameTaken(_))
    ));
    assert!(second.authenticate("alice", "one").unwrap());
    assert!(!second.authenticate("alice", "two").unwrap());

    // Interleaved inserts from both handles must not overwrite each other.
    first.register("carol", "c").unwrap();
    second.register("bob", "b").unwrap();

    let reopened = Authenticator::new(JsonFileCredentialStore::open(&path).unwrap());
    assert!(reopened.authenticate("alice", "one").unwrap());
    assert!(reopened.authenticate("carol", "c").unwrap());
    assert!(reopened.authenticate("bob", "b").unwrap());
}
