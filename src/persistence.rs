//! Single-document JSON persistence for a hedging session.
//!
//! The whole session serializes to one JSON document. A missing file is not
//! an error (it simply means an empty session), while a malformed file
//! surfaces a load error and leaves the caller's in-memory state untouched.
//! Persistence is best-effort durability: the in-memory session is the
//! source of truth, and a failed save never rolls back an applied mutation.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cost_model::CostModel;
use crate::error::{Error, Result};
use crate::hedger::Hedger;
use crate::ledger::{HedgePolicy, LedgerEntry, StockTransaction};
use crate::observation::Observation;

/// Top-level keys an imported document must carry.
///
/// `cost_model` is deliberately absent: older exports omitted it, and it
/// defaults to zero fees.
pub const REQUIRED_KEYS: [&str; 6] = [
    "observations",
    "entries",
    "transactions",
    "initial_capital",
    "current_capital",
    "current_stock_units",
];

/// The persisted form of a complete hedging session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HedgeDocument {
    pub observations: Vec<Observation>,
    pub entries: Vec<LedgerEntry>,
    pub transactions: Vec<StockTransaction>,
    pub initial_capital: Option<f64>,
    pub current_capital: f64,
    pub current_stock_units: f64,
    #[serde(default)]
    pub cost_model: CostModel,
}

/// Validate and decode a JSON value into a document.
///
/// All required top-level keys are checked before any field is decoded, so a
/// failure is always attributable: `MissingKey` for an absent key,
/// `InvalidField` for an ill-typed one.
pub fn parse_document(value: &serde_json::Value) -> Result<HedgeDocument> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::InvalidField("document must be a JSON object".into()))?;

    for key in REQUIRED_KEYS {
        if !object.contains_key(key) {
            return Err(Error::MissingKey(key));
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| Error::InvalidField(e.to_string()))
}

/// Write a document to `path` as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save(document: &HedgeDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json =
        serde_json::to_string_pretty(document).map_err(|e| Error::InvalidField(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a document from `path`.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<HedgeDocument>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::Persistence(e)),
    };

    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| Error::InvalidField(format!("malformed document: {e}")))?;
    parse_document(&value).map(Some)
}

impl Hedger {
    /// Save the session's document to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        save(&self.export_document(), path)
    }

    /// Load a session from a file, or start an empty one if the file is
    /// missing.
    pub fn load(path: &Path, cost_model: CostModel, policy: HedgePolicy) -> Result<Self> {
        match load(path)? {
            Some(document) => Ok(Self::from_document(document, policy)),
            None => Ok(Self::with_policy(cost_model, policy)),
        }
    }
}
