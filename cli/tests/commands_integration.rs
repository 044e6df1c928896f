//! Integration tests for the command layer against a temporary data file.

use std::path::Path;

use chrono::NaiveDate;
use hedgebook::{Observation, OptionType};
use hedgebook_cli::commands;
use hedgebook_cli::config::Config;
use hedgebook_cli::error::Error;

fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.data_file = dir.join("hedge_data.json").display().to_string();
    config.logging.dir = dir.join("logs").display().to_string();
    config.costs.fixed_fee = 1.0;
    config.costs.percentage_fee = 0.001;
    config
}

fn observe(day: u32, delta: f64, price: f64) -> Observation {
    Observation {
        date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        underlying_price: price,
        strike_price: 100.0,
        option_price: 4.2,
        implied_volatility: 0.25,
        delta,
        expiration: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
        option_type: OptionType::Call,
        position_size: 10,
    }
}

#[test]
fn add_persists_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    assert_eq!(hedger.observations().len(), 1);
    assert_eq!(hedger.entries().len(), 1);
    assert_eq!(hedger.ledger().current_stock_units(), -500.0);
    assert!(config.data_path().exists());
}

#[test]
fn fresh_session_uses_configured_costs() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::add(&config, observe(2, 0.6, 100.0)).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    // fee = 1 + 100 * 100 * 0.001 = 11, from the [costs] config section
    assert!((hedger.transactions()[0].transaction_fee - 11.0).abs() < 1e-9);
}

#[test]
fn add_appends_to_audit_trail() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();

    let contents = std::fs::read_to_string(config.audit_path()).unwrap();
    assert!(contents.contains("\"event\":\"observation_added\""));
}

#[test]
fn edit_replays_persisted_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::add(&config, observe(2, 0.6, 100.0)).unwrap();

    commands::edit(&config, 1, observe(2, 0.8, 100.0)).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    assert_eq!(hedger.entries()[1].stock_position, -800.0);
    // Prefix untouched by the edit
    assert_eq!(hedger.entries()[0].stock_position, -500.0);
}

#[test]
fn edit_invalid_index_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();

    let err = commands::edit(&config, 5, observe(2, 0.6, 100.0)).unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(hedgebook::Error::InvalidIndex { index: 5, len: 1 })
    ));
}

#[test]
fn delete_with_force_removes_and_replays() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::add(&config, observe(2, 0.6, 100.0)).unwrap();

    commands::delete(&config, 0, true).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    assert_eq!(hedger.observations().len(), 1);
    // The surviving observation re-bootstraps
    assert_eq!(hedger.entries()[0].stock_position, -600.0);
    assert!(hedger.transactions().is_empty());
}

#[test]
fn delete_invalid_index_fails_before_prompting() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    // force=false: a prompt would hang the test if the index check came late
    let err = commands::delete(&config, 0, false).unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(hedgebook::Error::InvalidIndex { .. })
    ));
}

#[test]
fn set_capital_rewrites_history() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::set_capital(&config, 200_000.0).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    assert_eq!(hedger.entries()[0].capital, 250_000.0);
}

#[test]
fn set_costs_applies_to_later_trades() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::set_costs(&config, 5.0, 0.0).unwrap();
    commands::add(&config, observe(2, 0.6, 100.0)).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    assert_eq!(hedger.transactions()[0].transaction_fee, 5.0);
}

#[test]
fn export_then_import_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::add(&config, observe(2, 0.6, 102.0)).unwrap();
    let before = commands::open_session(&config).unwrap();

    let export_path = dir.path().join("export.json");
    commands::export(&config, Some(export_path.clone())).unwrap();

    commands::clear(&config, true).unwrap();
    assert!(
        commands::open_session(&config)
            .unwrap()
            .observations()
            .is_empty()
    );

    commands::import(&config, export_path, true).unwrap();

    let after = commands::open_session(&config).unwrap();
    assert_eq!(after.observations(), before.observations());
    assert_eq!(after.entries(), before.entries());
    assert_eq!(after.transactions(), before.transactions());
}

#[test]
fn import_rejects_malformed_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();

    let bad_path = dir.path().join("bad.json");
    std::fs::write(&bad_path, r#"{"observations": []}"#).unwrap();

    let err = commands::import(&config, bad_path, true).unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(hedgebook::Error::MissingKey(_))
    ));

    // Existing session untouched
    let hedger = commands::open_session(&config).unwrap();
    assert_eq!(hedger.observations().len(), 1);
}

#[test]
fn clear_resets_to_default_capital() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    commands::add(&config, observe(1, 0.5, 100.0)).unwrap();
    commands::clear(&config, true).unwrap();

    let hedger = commands::open_session(&config).unwrap();
    assert!(hedger.observations().is_empty());
    assert_eq!(hedger.ledger().initial_capital(), Some(100_000.0));
    assert_eq!(hedger.ledger().current_capital(), 100_000.0);
}
