//! The hedge-recalculation ledger.
//!
//! Folds a sequence of option observations into a running stock position and
//! cash balance, recording a transaction for every material adjustment. Each
//! ledger entry is fully determined by the observations before it, the cost
//! model, and the initial capital, so any suffix can be recomputed after a
//! historical edit, and a full replay reproduces incremental application
//! exactly.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cost_model::CostModel;
use crate::observation::Observation;

/// Underlying shares covered by one option contract.
pub const SHARES_PER_CONTRACT: f64 = 100.0;

/// Stock units required to delta-neutralize `contracts` option contracts.
///
/// The hedge offsets the option portfolio's price sensitivity, so the sign is
/// the opposite of the position's aggregate delta:
///
/// ```
/// use hedgebook::required_hedge_units;
///
/// assert_eq!(required_hedge_units(0.5, 10), -500.0);   // long calls → short stock
/// assert_eq!(required_hedge_units(-0.3, 5), 150.0);    // long puts → long stock
/// ```
pub fn required_hedge_units(delta: f64, contracts: i64) -> f64 {
    -delta * contracts as f64 * SHARES_PER_CONTRACT
}

/// Trade direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// One ledger row, parallel to the observation sequence (1:1, same index).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub underlying_price: f64,
    pub implied_volatility: f64,
    pub delta: f64,
    /// Stock hedge after processing this observation (signed shares)
    pub stock_position: f64,
    /// Cash balance after processing this observation
    pub capital: f64,
}

/// A recorded stock trade: the derived audit log, never a ledger input.
///
/// `entry_index` ties the trade to the ledger entry that produced it, so a
/// suffix replay can discard exactly the affected transactions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockTransaction {
    pub entry_index: usize,
    pub date: NaiveDate,
    /// Unsigned share magnitude
    pub shares: f64,
    pub price: f64,
    pub action: TradeAction,
    /// `shares * price`, before fees
    pub gross_cost: f64,
    pub transaction_fee: f64,
}

/// What `apply_observation` did. Reporting only, not persisted state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HedgeOutcome {
    /// First-ever entry: the full hedge is allocated without recording a
    /// transaction.
    Initial { units: f64, price: f64 },
    /// A material adjustment was traded.
    Adjusted {
        action: TradeAction,
        shares: f64,
        price: f64,
        fee: f64,
    },
    /// Adjustment below the materiality threshold; nothing traded.
    Unchanged,
}

impl HedgeOutcome {
    /// Returns true if a transaction was recorded.
    pub fn traded(&self) -> bool {
        matches!(self, HedgeOutcome::Adjusted { .. })
    }
}

impl fmt::Display for HedgeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HedgeOutcome::Initial { units, price } => {
                let action = if *units >= 0.0 {
                    TradeAction::Buy
                } else {
                    TradeAction::Sell
                };
                write!(
                    f,
                    "initial hedge: {} {:.2} shares at ${:.2} (no transaction recorded)",
                    action,
                    units.abs(),
                    price
                )
            }
            HedgeOutcome::Adjusted {
                action,
                shares,
                price,
                fee,
            } => write!(
                f,
                "hedge adjustment: {action} {shares:.2} shares at ${price:.2} (fee ${fee:.2})"
            ),
            HedgeOutcome::Unchanged => write!(f, "no significant hedge adjustment needed"),
        }
    }
}

/// Policy constants carried as configurable defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HedgePolicy {
    /// Capital assumed at bootstrap when none was set explicitly
    pub default_initial_capital: f64,
    /// Materiality threshold: adjustments at or below this magnitude (in
    /// shares) are not traded
    pub min_adjustment: f64,
}

impl Default for HedgePolicy {
    fn default() -> Self {
        Self {
            default_initial_capital: 100_000.0,
            min_adjustment: 0.01,
        }
    }
}

/// The hedge ledger: entries, transactions, and the running position state.
///
/// A pure fold over the observation sequence. `apply_observation` advances it
/// one step; `replay_from` rebuilds any suffix after history is edited.
#[derive(Clone, Debug)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    transactions: Vec<StockTransaction>,
    initial_capital: Option<f64>,
    current_capital: f64,
    current_stock_units: f64,
    cost_model: CostModel,
    policy: HedgePolicy,
}

impl Ledger {
    /// Create an empty ledger with default policy.
    pub fn new(cost_model: CostModel) -> Self {
        Self::with_policy(cost_model, HedgePolicy::default())
    }

    pub fn with_policy(cost_model: CostModel, policy: HedgePolicy) -> Self {
        Self {
            entries: Vec::new(),
            transactions: Vec::new(),
            initial_capital: None,
            current_capital: 0.0,
            current_stock_units: 0.0,
            cost_model,
            policy,
        }
    }

    /// Reassemble a ledger from persisted state.
    ///
    /// The caller is responsible for the arrays being consistent with the
    /// observation sequence they were derived from.
    pub fn from_parts(
        entries: Vec<LedgerEntry>,
        transactions: Vec<StockTransaction>,
        initial_capital: Option<f64>,
        current_capital: f64,
        current_stock_units: f64,
        cost_model: CostModel,
        policy: HedgePolicy,
    ) -> Self {
        Self {
            entries,
            transactions,
            initial_capital,
            current_capital,
            current_stock_units,
            cost_model,
            policy,
        }
    }

    // === Queries ===

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn transactions(&self) -> &[StockTransaction] {
        &self.transactions
    }

    /// Fixed at the first observation ever processed; `None` until then.
    pub fn initial_capital(&self) -> Option<f64> {
        self.initial_capital
    }

    #[inline]
    pub fn current_capital(&self) -> f64 {
        self.current_capital
    }

    #[inline]
    pub fn current_stock_units(&self) -> f64 {
        self.current_stock_units
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn policy(&self) -> HedgePolicy {
        self.policy
    }

    // === Mutation ===

    /// Replace the cost model. Takes effect for subsequent trades only.
    pub fn set_cost_model(&mut self, cost_model: CostModel) {
        self.cost_model = cost_model;
    }

    /// Pin the initial capital. Callers that want history to reflect the new
    /// value must replay from 0.
    pub fn set_initial_capital(&mut self, amount: f64) {
        self.initial_capital = Some(amount);
    }

    /// Reset to an empty ledger with the policy's default initial capital
    /// and a zero-cost model.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.transactions.clear();
        self.cost_model = CostModel::zero();
        self.initial_capital = Some(self.policy.default_initial_capital);
        self.current_capital = self.policy.default_initial_capital;
        self.current_stock_units = 0.0;
    }

    /// Fold one observation into the ledger.
    ///
    /// The first observation ever processed bootstraps the position: the full
    /// hedge is allocated, capital is debited at the observed price, and no
    /// transaction is recorded. Every later observation trades the difference
    /// between the required hedge and the current position, unless that
    /// difference is within the materiality threshold. An entry is appended
    /// in every case.
    pub fn apply_observation(&mut self, observation: &Observation) -> HedgeOutcome {
        let index = self.entries.len();
        let target = required_hedge_units(observation.delta, observation.position_size);

        let outcome = if self.entries.is_empty() {
            self.current_stock_units = target;
            let initial = *self
                .initial_capital
                .get_or_insert(self.policy.default_initial_capital);
            self.current_capital =
                initial - self.current_stock_units * observation.underlying_price;
            HedgeOutcome::Initial {
                units: self.current_stock_units,
                price: observation.underlying_price,
            }
        } else {
            let adjustment = target - self.current_stock_units;
            if adjustment.abs() <= self.policy.min_adjustment {
                HedgeOutcome::Unchanged
            } else {
                let fee = self.cost_model.fee(adjustment, observation.underlying_price);
                self.current_capital -= adjustment * observation.underlying_price + fee;
                self.current_stock_units = target;

                let action = if adjustment > 0.0 {
                    TradeAction::Buy
                } else {
                    TradeAction::Sell
                };
                self.transactions.push(StockTransaction {
                    entry_index: index,
                    date: observation.date,
                    shares: adjustment.abs(),
                    price: observation.underlying_price,
                    action,
                    gross_cost: adjustment.abs() * observation.underlying_price,
                    transaction_fee: fee,
                });
                HedgeOutcome::Adjusted {
                    action,
                    shares: adjustment.abs(),
                    price: observation.underlying_price,
                    fee,
                }
            }
        };

        self.entries.push(LedgerEntry {
            date: observation.date,
            underlying_price: observation.underlying_price,
            implied_volatility: observation.implied_volatility,
            delta: observation.delta,
            stock_position: self.current_stock_units,
            capital: self.current_capital,
        });

        outcome
    }

    /// Recompute all entries and transactions from `start_index` forward.
    ///
    /// Entries before `start_index` are untouched; the running state is
    /// restored from the entry just before it (or reset for a from-zero
    /// replay, where the first remaining observation bootstraps again).
    /// Replaying an empty sequence from 0 leaves an empty ledger holding
    /// only its initial capital.
    ///
    /// `start_index` must not exceed the current entry count.
    pub fn replay_from(&mut self, observations: &[Observation], start_index: usize) {
        debug_assert!(
            start_index <= self.entries.len(),
            "replay start {start_index} beyond {} entries",
            self.entries.len()
        );

        self.entries.truncate(start_index);
        self.transactions.retain(|t| t.entry_index < start_index);

        if start_index == 0 {
            self.current_stock_units = 0.0;
            self.current_capital = self.initial_capital.unwrap_or(0.0);
        } else {
            let prev = &self.entries[start_index - 1];
            self.current_stock_units = prev.stock_position;
            self.current_capital = prev.capital;
        }

        for observation in &observations[start_index..] {
            self.apply_observation(observation);
        }
    }
}
