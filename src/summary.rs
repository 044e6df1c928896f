//! Position summary projection.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::Ledger;

/// Point-in-time summary computed from the current ledger state.
///
/// All-zero (with `latest_date = None`) when the ledger holds no entries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Current stock hedge (signed shares)
    pub stock_position: f64,
    /// Current cash balance
    pub capital: f64,
    /// Number of recorded stock transactions
    pub total_trades: usize,
    /// Unrealized stock P&L: position * (latest price − first price)
    pub stock_pnl: f64,
    /// Capital change since the initial allocation
    pub capital_pnl: f64,
    /// Capital P&L as a percentage of initial capital (0 when unset or zero)
    pub pnl_percent: f64,
    /// Latest observed underlying price
    pub current_price: f64,
    pub latest_date: Option<NaiveDate>,
}

impl Summary {
    fn empty() -> Self {
        Self {
            stock_position: 0.0,
            capital: 0.0,
            total_trades: 0,
            stock_pnl: 0.0,
            capital_pnl: 0.0,
            pnl_percent: 0.0,
            current_price: 0.0,
            latest_date: None,
        }
    }
}

impl Ledger {
    /// Project the current state into a [`Summary`].
    pub fn summary(&self) -> Summary {
        let (first, latest) = match (self.entries().first(), self.entries().last()) {
            (Some(first), Some(latest)) => (first, latest),
            _ => return Summary::empty(),
        };

        let stock_pnl =
            self.current_stock_units() * (latest.underlying_price - first.underlying_price);

        let capital_pnl = match self.initial_capital() {
            Some(initial) => latest.capital - initial,
            None => 0.0,
        };

        let pnl_percent = match self.initial_capital() {
            Some(initial) if initial != 0.0 => capital_pnl / initial * 100.0,
            _ => 0.0,
        };

        Summary {
            stock_position: self.current_stock_units(),
            capital: self.current_capital(),
            total_trades: self.transactions().len(),
            stock_pnl,
            capital_pnl,
            pnl_percent,
            current_price: latest.underlying_price,
            latest_date: Some(latest.date),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position Summary")?;
        writeln!(f, "  Stock position: {:>12.2} shares", self.stock_position)?;
        writeln!(f, "  Capital:        ${:>12.2}", self.capital)?;
        writeln!(f, "  Total trades:   {:>12}", self.total_trades)?;
        writeln!(f, "  Stock P&L:      ${:>12.2}", self.stock_pnl)?;
        writeln!(f, "  Capital P&L:    ${:>12.2}", self.capital_pnl)?;
        writeln!(f, "  P&L:            {:>12.2}%", self.pnl_percent)?;
        writeln!(f, "  Current price:  ${:>12.2}", self.current_price)?;
        match self.latest_date {
            Some(date) => writeln!(f, "  Latest date:    {date}"),
            None => writeln!(f, "  Latest date:    N/A"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_model::CostModel;
    use crate::observation::{Observation, OptionType};

    fn obs(delta: f64, price: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
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
    fn empty_ledger_summarizes_to_zero() {
        let ledger = Ledger::new(CostModel::zero());
        let summary = ledger.summary();

        assert_eq!(summary, Summary::empty());
        assert_eq!(summary.pnl_percent, 0.0);
        assert!(summary.latest_date.is_none());
    }

    #[test]
    fn stock_pnl_tracks_price_move() {
        let mut ledger = Ledger::new(CostModel::zero());
        ledger.apply_observation(&obs(0.5, 100.0)); // short 500
        ledger.apply_observation(&obs(0.5, 110.0)); // price +10, no adjustment

        let summary = ledger.summary();
        // Short position loses as the underlying rises
        assert_eq!(summary.stock_pnl, -500.0 * 10.0);
        assert_eq!(summary.current_price, 110.0);
        assert_eq!(summary.total_trades, 0);
    }

    #[test]
    fn capital_pnl_relative_to_initial() {
        let mut ledger = Ledger::new(CostModel::new(1.0, 0.001));
        ledger.apply_observation(&obs(0.5, 100.0));
        ledger.apply_observation(&obs(0.6, 100.0));

        let summary = ledger.summary();
        assert!((summary.capital_pnl - 59_989.0).abs() < 1e-9);
        assert!((summary.pnl_percent - 59.989).abs() < 1e-9);
    }

    #[test]
    fn zero_initial_capital_guards_division() {
        let mut ledger = Ledger::new(CostModel::zero());
        ledger.set_initial_capital(0.0);
        ledger.apply_observation(&obs(0.5, 100.0));

        let summary = ledger.summary();
        assert_eq!(summary.pnl_percent, 0.0);
        assert!(summary.pnl_percent.is_finite());
    }

    #[test]
    fn display_renders_na_for_empty() {
        let ledger = Ledger::new(CostModel::zero());
        let text = format!("{}", ledger.summary());
        assert!(text.contains("Latest date:    N/A"));
    }

    #[test]
    fn display_renders_latest_date() {
        let mut ledger = Ledger::new(CostModel::zero());
        ledger.apply_observation(&obs(0.5, 100.0));
        let text = format!("{}", ledger.summary());
        assert!(text.contains("2024-03-01"));
        assert!(text.contains("-500.00 shares"));
    }
}
