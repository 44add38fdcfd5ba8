//! Trade records produced by the signal engine.

use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub code: String,
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub sell_date: Option<NaiveDate>,
    pub sell_price: Option<f64>,
}

impl Trade {
    pub fn open(code: &str, buy_date: NaiveDate, buy_price: f64) -> Self {
        Self {
            code: code.to_string(),
            buy_date,
            buy_price,
            sell_date: None,
            sell_price: None,
        }
    }

    /// Completes the trade with the given exit bar.
    pub fn close(self, sell_date: NaiveDate, sell_price: f64) -> Self {
        Self {
            sell_date: Some(sell_date),
            sell_price: Some(sell_price),
            ..self
        }
    }

    pub fn is_open(&self) -> bool {
        self.sell_price.is_none()
    }

    /// sell - buy for a closed trade; `None` while the position is open.
    pub fn pnl(&self) -> Option<f64> {
        self.sell_price.map(|sell| sell - self.buy_price)
    }
}

/// Trades per instrument for one scan cycle, keyed by instrument code.
pub type TradeBatch = BTreeMap<String, Vec<Trade>>;

/// Next-day direction accuracy for one instrument, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub code: String,
    pub accuracy_pct: f64,
}

/// The most recent trade still open, if any.
pub fn latest_open(trades: &[Trade]) -> Option<&Trade> {
    trades.iter().rev().find(|t| t.is_open())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn open_trade_has_no_exit() {
        let t = Trade::open("HDFCBANK.NS", d(4), 1500.0);
        assert!(t.is_open());
        assert_eq!(t.pnl(), None);
        assert_eq!(t.sell_date, None);
    }

    #[test]
    fn closed_trade_pnl() {
        let t = Trade::open("HDFCBANK.NS", d(4), 1500.0).close(d(20), 1560.5);
        assert!(!t.is_open());
        assert_eq!(t.sell_date, Some(d(20)));
        assert!((t.pnl().unwrap() - 60.5).abs() < 1e-9);
    }

    #[test]
    fn losing_trade_pnl_is_negative() {
        let t = Trade::open("HDFCBANK.NS", d(4), 1500.0).close(d(5), 1400.0);
        assert!(t.pnl().unwrap() < 0.0);
    }

    #[test]
    fn latest_open_finds_last_unmatched_buy() {
        let trades = vec![
            Trade::open("X", d(1), 10.0).close(d(2), 11.0),
            Trade::open("X", d(3), 12.0),
        ];
        assert_eq!(latest_open(&trades).map(|t| t.buy_date), Some(d(3)));
    }

    #[test]
    fn latest_open_none_when_all_closed() {
        let trades = vec![Trade::open("X", d(1), 10.0).close(d(2), 11.0)];
        assert!(latest_open(&trades).is_none());
        assert!(latest_open(&[]).is_none());
    }
}
