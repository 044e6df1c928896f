//! Command orchestration: load session → mutate → save → report.
//!
//! Every mutating command follows the same shape. The in-memory session is
//! the source of truth: if the save at the end fails, the mutation is still
//! reported and the failure is logged to the audit trail so the divergence
//! between memory and disk is detectable.

use std::path::PathBuf;

use hedgebook::{Hedger, LedgerEntry, Observation, StockTransaction};
use log::{error, info};
use serde_json::json;

use crate::audit::AuditLog;
use crate::config::Config;
use crate::error::{Error, Result};

/// Open the session from the configured data file (empty if none saved yet).
pub fn open_session(config: &Config) -> Result<Hedger> {
    let path = config.data_path();
    let hedger = Hedger::load(&path, config.cost_model(), config.hedge_policy())?;
    if hedger.observations().is_empty() {
        info!("starting with an empty session ({})", path.display());
    } else {
        info!(
            "loaded {} observations from {}",
            hedger.observations().len(),
            path.display()
        );
    }
    Ok(hedger)
}

fn persist(hedger: &Hedger, config: &Config, audit: &mut AuditLog) -> Result<()> {
    let path = config.data_path();
    if let Err(e) = hedger.save(&path) {
        // The in-memory mutation stays applied; durable state now lags it.
        error!("save to {} failed: {e}", path.display());
        let _ = audit.log(
            "save_failed",
            json!({
                "path": path.display().to_string(),
                "error": e.to_string(),
            }),
        );
        return Err(e.into());
    }
    Ok(())
}

fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Prompt(e.to_string()))
}

/// Record a new observation and update the hedge.
pub fn add(config: &Config, observation: Observation) -> Result<()> {
    let mut hedger = open_session(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;

    let outcome = hedger.add_observation(observation);
    println!("{outcome}");

    audit.log(
        "observation_added",
        json!({
            "index": hedger.observations().len() - 1,
            "outcome": outcome.to_string(),
        }),
    )?;
    persist(&hedger, config, &mut audit)
}

/// Replace the observation at `index` and replay the ledger from there.
pub fn edit(config: &Config, index: usize, observation: Observation) -> Result<()> {
    let mut hedger = open_session(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;

    hedger.edit_observation(index, observation)?;
    println!("observation {index} updated; ledger replayed from {index}");

    audit.log("observation_edited", json!({ "index": index }))?;
    persist(&hedger, config, &mut audit)
}

/// Delete the observation at `index` and replay the ledger from scratch.
pub fn delete(config: &Config, index: usize, force: bool) -> Result<()> {
    let mut hedger = open_session(config)?;

    // Check the index before prompting so a bad one fails fast
    if hedger.store().get(index).is_none() {
        return Err(hedgebook::Error::InvalidIndex {
            index,
            len: hedger.observations().len(),
        }
        .into());
    }

    if !confirm(
        &format!("Delete observation {index} and replay the ledger?"),
        force,
    )? {
        println!("Aborted.");
        return Ok(());
    }

    let mut audit = AuditLog::open(&config.audit_path())?;
    hedger.delete_observation(index)?;
    println!("observation {index} deleted; ledger replayed from scratch");

    audit.log("observation_deleted", json!({ "index": index }))?;
    persist(&hedger, config, &mut audit)
}

/// Print the position summary, as a table or as JSON.
pub fn show_summary(config: &Config, as_json: bool) -> Result<()> {
    let hedger = open_session(config)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&hedger.summary())?);
    } else {
        print!("{}", hedger.summary());
    }
    Ok(())
}

/// Print the ledger entry history, as a table or as JSON.
pub fn show_history(config: &Config, as_json: bool) -> Result<()> {
    let hedger = open_session(config)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(hedger.entries())?);
    } else {
        display_history(hedger.entries());
    }
    Ok(())
}

/// Print the stock transaction log, as a table or as JSON.
pub fn show_transactions(config: &Config, as_json: bool) -> Result<()> {
    let hedger = open_session(config)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(hedger.transactions())?);
    } else {
        display_transactions(hedger.transactions());
    }
    Ok(())
}

/// Update cost parameters for subsequent trades.
pub fn set_costs(config: &Config, fixed: f64, percentage: f64) -> Result<()> {
    let mut hedger = open_session(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;

    hedger.set_cost_model(fixed, percentage)?;
    println!(
        "transaction costs updated: ${fixed:.2} fixed + {:.4}% of notional",
        percentage * 100.0
    );

    audit.log(
        "costs_updated",
        json!({ "fixed_fee": fixed, "percentage_fee": percentage }),
    )?;
    persist(&hedger, config, &mut audit)
}

/// Set initial capital and replay the whole ledger.
pub fn set_capital(config: &Config, amount: f64) -> Result<()> {
    let mut hedger = open_session(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;

    hedger.set_initial_capital(amount)?;
    println!("initial capital set to ${amount:.2}; ledger replayed from scratch");

    audit.log("capital_updated", json!({ "initial_capital": amount }))?;
    persist(&hedger, config, &mut audit)
}

/// Export the session document as JSON, to a file or stdout.
pub fn export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let hedger = open_session(config)?;
    let document = hedger.export_document();
    let json = serde_json::to_string_pretty(&document)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "exported {} observations to {}",
                document.observations.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Import a previously exported document, replacing all session state.
pub fn import(config: &Config, input: PathBuf, force: bool) -> Result<()> {
    let contents = std::fs::read_to_string(&input).map_err(|e| Error::DocumentRead {
        path: input.clone(),
        source: e,
    })?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;

    if !confirm("Importing replaces ALL current data. Continue?", force)? {
        println!("Aborted.");
        return Ok(());
    }

    let mut hedger = open_session(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;

    hedger.import_document(&value)?;
    println!(
        "imported {} observations from {}",
        hedger.observations().len(),
        input.display()
    );

    audit.log(
        "data_imported",
        json!({
            "source": input.display().to_string(),
            "observations": hedger.observations().len(),
        }),
    )?;
    persist(&hedger, config, &mut audit)
}

/// Clear all data, resetting to the configured default initial capital.
pub fn clear(config: &Config, force: bool) -> Result<()> {
    if !confirm("Clear ALL observations, history, and transactions?", force)? {
        println!("Aborted.");
        return Ok(());
    }

    let mut hedger = open_session(config)?;
    let mut audit = AuditLog::open(&config.audit_path())?;

    hedger.clear_all();
    println!(
        "all data cleared; initial capital reset to ${:.2}",
        config.ledger.default_initial_capital
    );

    audit.log_simple("data_cleared")?;
    persist(&hedger, config, &mut audit)
}

// === Display helpers ===

fn display_history(entries: &[LedgerEntry]) {
    if entries.is_empty() {
        println!("No ledger entries.");
        return;
    }

    println!("LEDGER HISTORY:");
    println!(
        "  {:>4}  {:10}  {:>10}  {:>7}  {:>7}  {:>12}  {:>14}",
        "#", "Date", "Price", "IV", "Delta", "Stock Pos", "Capital"
    );
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {:>4}  {:10}  {:>10.2}  {:>7.3}  {:>7.3}  {:>12.2}  {:>14.2}",
            i,
            entry.date.to_string(),
            entry.underlying_price,
            entry.implied_volatility,
            entry.delta,
            entry.stock_position,
            entry.capital,
        );
    }
}

fn display_transactions(transactions: &[StockTransaction]) {
    if transactions.is_empty() {
        println!("No transactions.");
        return;
    }

    println!("STOCK TRANSACTIONS:");
    println!(
        "  {:>4}  {:10}  {:6}  {:>10}  {:>10}  {:>12}  {:>8}",
        "#", "Date", "Action", "Shares", "Price", "Gross", "Fee"
    );
    for (i, tx) in transactions.iter().enumerate() {
        println!(
            "  {:>4}  {:10}  {:6}  {:>10.2}  {:>10.2}  {:>12.2}  {:>8.2}",
            i,
            tx.date.to_string(),
            tx.action.to_string(),
            tx.shares,
            tx.price,
            tx.gross_cost,
            tx.transaction_fee,
        );
    }
}
