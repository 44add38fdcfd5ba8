//! Daily OHLCV bar representation and price series checks.

use crate::domain::error::ScanError;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: Option<f64>,
    pub volume: i64,
}

impl OhlcvBar {
    /// Price used for signals and features: adjusted close, falling back to close.
    pub fn price(&self) -> f64 {
        self.adj_close.unwrap_or(self.close)
    }
}

/// Checks that bar dates are strictly increasing.
pub fn validate_series(code: &str, bars: &[OhlcvBar]) -> Result<(), ScanError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            let reason = if pair[1].date == pair[0].date {
                format!("duplicate date {}", pair[1].date)
            } else {
                format!("{} follows {}", pair[1].date, pair[0].date)
            };
            return Err(ScanError::InvalidSeries {
                code: code.to_string(),
                reason,
            });
        }
    }
    Ok(())
}

/// Price column of a series, in bar order.
pub fn prices(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(OhlcvBar::price).collect()
}
