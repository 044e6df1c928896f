//! Transaction cost modeling.

use serde::{Deserialize, Serialize};

/// Models transaction costs for stock hedge adjustments.
///
/// A trade's fee is a fixed amount plus a percentage of the traded notional:
///
/// ```
/// use hedgebook::CostModel;
///
/// let model = CostModel { fixed_fee: 1.0, percentage_fee: 0.001 };
/// // 100 shares at $100: $1 fixed + $10,000 * 0.1% = $11
/// assert_eq!(model.fee(100.0, 100.0), 11.0);
/// ```
///
/// By convention `fixed_fee >= 0` and `percentage_fee` lies in `[0, 1)`;
/// neither is enforced here. Parameter updates apply to subsequent trades
/// only: past ledger entries are never recomputed unless the caller
/// explicitly replays.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    /// Flat fee charged per trade
    pub fixed_fee: f64,
    /// Fee as a fraction of traded notional (e.g. 0.001 = 0.1%)
    pub percentage_fee: f64,
}

impl CostModel {
    /// A zero-cost model (no fees).
    pub fn zero() -> Self {
        Self {
            fixed_fee: 0.0,
            percentage_fee: 0.0,
        }
    }

    pub fn new(fixed_fee: f64, percentage_fee: f64) -> Self {
        Self {
            fixed_fee,
            percentage_fee,
        }
    }

    /// Compute the fee for trading `shares` at `price`.
    ///
    /// `shares` may be signed; only its magnitude matters.
    pub fn fee(&self, shares: f64, price: f64) -> f64 {
        self.fixed_fee + shares.abs() * price * self.percentage_fee
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::zero()
    }
}
