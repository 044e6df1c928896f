//! Option market observations, the ledger's sole input.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Contract style of the observed option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(Error::InvalidField(format!(
                "option_type must be 'call' or 'put', got '{other}'"
            ))),
        }
    }
}

/// A single option market observation, as supplied by the user.
///
/// Delta is stored as supplied (negative for puts, positive for calls by
/// convention; the sign is not validated). `position_size` is a signed
/// contract count; one contract covers 100 underlying shares.
///
/// Dates serialize as ISO-8601 calendar dates (`YYYY-MM-DD`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub underlying_price: f64,
    pub strike_price: f64,
    pub option_price: f64,
    pub implied_volatility: f64,
    pub delta: f64,
    pub expiration: NaiveDate,
    pub option_type: OptionType,
    /// Number of contracts (signed)
    pub position_size: i64,
}

impl Observation {
    /// Days remaining until expiration.
    ///
    /// Negative when the expiration precedes the observation date; no
    /// validation is applied.
    pub fn days_to_expiration(&self) -> i64 {
        (self.expiration - self.date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: NaiveDate, expiration: NaiveDate) -> Observation {
        Observation {
            date,
            underlying_price: 100.0,
            strike_price: 100.0,
            option_price: 4.2,
            implied_volatility: 0.25,
            delta: 0.5,
            expiration,
            option_type: OptionType::Call,
            position_size: 10,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_to_expiration() {
        let o = obs(ymd(2024, 3, 1), ymd(2024, 3, 31));
        assert_eq!(o.days_to_expiration(), 30);
    }

    #[test]
    fn same_day_expiration() {
        let o = obs(ymd(2024, 3, 1), ymd(2024, 3, 1));
        assert_eq!(o.days_to_expiration(), 0);
    }

    #[test]
    fn expired_observation_goes_negative() {
        let o = obs(ymd(2024, 3, 10), ymd(2024, 3, 1));
        assert_eq!(o.days_to_expiration(), -9);
    }

    #[test]
    fn option_type_parse() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("PUT".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn option_type_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&OptionType::Call).unwrap(),
            "\"call\""
        );
        let parsed: OptionType = serde_json::from_str("\"put\"").unwrap();
        assert_eq!(parsed, OptionType::Put);
    }

    #[test]
    fn dates_serialize_as_iso_calendar_dates() {
        let o = obs(ymd(2024, 3, 1), ymd(2024, 6, 21));
        let json = serde_json::to_string(&o).unwrap();
        assert!(json.contains("\"date\":\"2024-03-01\""));
        assert!(json.contains("\"expiration\":\"2024-06-21\""));

        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, o);
    }
}
