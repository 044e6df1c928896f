//! The session controller owning the observation store and the ledger.

use crate::cost_model::CostModel;
use crate::error::{Error, Result};
use crate::ledger::{HedgeOutcome, HedgePolicy, Ledger, LedgerEntry, StockTransaction};
use crate::observation::Observation;
use crate::persistence::{self, HedgeDocument};
use crate::store::ObservationStore;
use crate::summary::Summary;

/// A delta-hedging session: one option position, its observation history,
/// and the derived hedge ledger.
///
/// `Hedger` is the single owner of all session state and the only mutation
/// path: every edit to history triggers the replay the ledger needs to stay
/// consistent. All operations validate fully before mutating; a failed
/// operation leaves the session untouched.
#[derive(Clone, Debug)]
pub struct Hedger {
    store: ObservationStore,
    ledger: Ledger,
}

impl Hedger {
    /// Create an empty session with default policy.
    pub fn new(cost_model: CostModel) -> Self {
        Self::with_policy(cost_model, HedgePolicy::default())
    }

    pub fn with_policy(cost_model: CostModel, policy: HedgePolicy) -> Self {
        Self {
            store: ObservationStore::new(),
            ledger: Ledger::with_policy(cost_model, policy),
        }
    }

    /// Rebuild a session from a persisted document.
    ///
    /// The document's arrays are taken as-is; no replay is performed.
    pub fn from_document(document: HedgeDocument, policy: HedgePolicy) -> Self {
        Self {
            store: ObservationStore::from_vec(document.observations),
            ledger: Ledger::from_parts(
                document.entries,
                document.transactions,
                document.initial_capital,
                document.current_capital,
                document.current_stock_units,
                document.cost_model,
                policy,
            ),
        }
    }

    // === Queries ===

    pub fn store(&self) -> &ObservationStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn observations(&self) -> &[Observation] {
        self.store.as_slice()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        self.ledger.entries()
    }

    pub fn transactions(&self) -> &[StockTransaction] {
        self.ledger.transactions()
    }

    pub fn summary(&self) -> Summary {
        self.ledger.summary()
    }

    // === Operations ===

    /// Record a new observation and update the hedge incrementally.
    pub fn add_observation(&mut self, observation: Observation) -> HedgeOutcome {
        let outcome = self.ledger.apply_observation(&observation);
        self.store.append(observation);
        outcome
    }

    /// Replace the observation at `index` and replay the ledger from there.
    pub fn edit_observation(&mut self, index: usize, observation: Observation) -> Result<()> {
        self.store.replace_at(index, observation)?;
        self.ledger.replay_from(self.store.as_slice(), index);
        Ok(())
    }

    /// Delete the observation at `index`.
    ///
    /// Deletion shifts every subsequent index, so the ledger is always
    /// replayed from scratch rather than from the deletion point.
    pub fn delete_observation(&mut self, index: usize) -> Result<()> {
        self.store.remove_at(index)?;
        self.ledger.replay_from(self.store.as_slice(), 0);
        Ok(())
    }

    /// Update transaction cost parameters. Applies to subsequent trades only.
    pub fn set_cost_model(&mut self, fixed_fee: f64, percentage_fee: f64) -> Result<()> {
        if !fixed_fee.is_finite() || !percentage_fee.is_finite() {
            return Err(Error::InvalidParameter(
                "cost parameters must be finite".into(),
            ));
        }
        self.ledger
            .set_cost_model(CostModel::new(fixed_fee, percentage_fee));
        Ok(())
    }

    /// Set the initial capital and replay the whole ledger against it.
    pub fn set_initial_capital(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() {
            return Err(Error::InvalidParameter(
                "initial capital must be finite".into(),
            ));
        }
        self.ledger.set_initial_capital(amount);
        self.ledger.replay_from(self.store.as_slice(), 0);
        Ok(())
    }

    /// Snapshot the full session as a persistable document.
    pub fn export_document(&self) -> HedgeDocument {
        HedgeDocument {
            observations: self.store.as_slice().to_vec(),
            entries: self.ledger.entries().to_vec(),
            transactions: self.ledger.transactions().to_vec(),
            initial_capital: self.ledger.initial_capital(),
            current_capital: self.ledger.current_capital(),
            current_stock_units: self.ledger.current_stock_units(),
            cost_model: *self.ledger.cost_model(),
        }
    }

    /// Replace all session state from an exported document.
    ///
    /// The document is validated in full (required keys present, every field
    /// well-typed) before any state changes; on failure the session is left
    /// exactly as it was.
    pub fn import_document(&mut self, value: &serde_json::Value) -> Result<()> {
        let document = persistence::parse_document(value)?;
        let policy = self.ledger.policy();
        *self = Hedger::from_document(document, policy);
        Ok(())
    }

    /// Reset to an empty session with the policy's default initial capital.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.ledger.reset();
    }
}
