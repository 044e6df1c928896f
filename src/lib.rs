//! # hedgebook
//!
//! A deterministic delta-hedge ledger for a single option position.
//!
//! Record option market observations (price, implied volatility, delta) and
//! hedgebook derives the stock position needed to stay delta-neutral, the
//! trades to get there, their costs, and the running cash balance. It replays
//! that derivation whenever history is edited or deleted.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use hedgebook::{CostModel, Hedger, Observation, OptionType};
//!
//! let mut hedger = Hedger::new(CostModel::new(1.0, 0.001));
//!
//! let outcome = hedger.add_observation(Observation {
//!     date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     underlying_price: 100.0,
//!     strike_price: 100.0,
//!     option_price: 4.20,
//!     implied_volatility: 0.25,
//!     delta: 0.5,
//!     expiration: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
//!     option_type: OptionType::Call,
//!     position_size: 10,
//! });
//!
//! // Long 10 calls at delta 0.5 → short 500 shares to be delta-neutral.
//! // The first observation allocates the hedge without a transaction.
//! assert!(!outcome.traded());
//! assert_eq!(hedger.ledger().current_stock_units(), -500.0);
//! assert_eq!(hedger.ledger().current_capital(), 150_000.0);
//! ```
//!
//! ## Editing history
//!
//! Ledger entries are a pure fold over the observation sequence, so editing
//! any observation replays exactly the affected suffix, and deleting one
//! replays from scratch:
//!
//! ```
//! use chrono::NaiveDate;
//! use hedgebook::{CostModel, Hedger, Observation, OptionType};
//!
//! fn observe(day: u32, delta: f64) -> Observation {
//!     Observation {
//!         date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
//!         underlying_price: 100.0,
//!         strike_price: 100.0,
//!         option_price: 4.20,
//!         implied_volatility: 0.25,
//!         delta,
//!         expiration: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
//!         option_type: OptionType::Call,
//!         position_size: 10,
//!     }
//! }
//!
//! let mut hedger = Hedger::new(CostModel::zero());
//! hedger.add_observation(observe(1, 0.5));
//! hedger.add_observation(observe(2, 0.6));
//!
//! hedger.edit_observation(1, observe(2, 0.7)).unwrap();
//! assert_eq!(hedger.entries()[1].stock_position, -700.0);
//!
//! hedger.delete_observation(0).unwrap();
//! assert_eq!(hedger.entries().len(), 1);
//! ```
//!
//! ## Persistence
//!
//! The whole session round-trips through a single JSON document:
//!
//! ```
//! use hedgebook::{CostModel, Hedger};
//!
//! let hedger = Hedger::new(CostModel::zero());
//! let value = serde_json::to_value(hedger.export_document()).unwrap();
//!
//! let mut restored = Hedger::new(CostModel::zero());
//! restored.import_document(&value).unwrap();
//! ```
//!
//! A missing file loads as an empty session; a malformed one surfaces an
//! error without touching in-memory state. See [`persistence`].
//!
//! ## Scope
//!
//! Delta and implied volatility are user-supplied inputs: hedgebook prices
//! nothing and models no risk beyond linear delta. One user, one instrument,
//! one writer.

mod cost_model;
mod error;
mod hedger;
mod ledger;
mod observation;
pub mod persistence;
mod store;
mod summary;

pub use cost_model::CostModel;
pub use error::{Error, Result};
pub use hedger::Hedger;
pub use ledger::{
    HedgeOutcome, HedgePolicy, Ledger, LedgerEntry, SHARES_PER_CONTRACT, StockTransaction,
    TradeAction, required_hedge_units,
};
pub use observation::{Observation, OptionType};
pub use persistence::HedgeDocument;
pub use store::ObservationStore;
pub use summary::Summary;
