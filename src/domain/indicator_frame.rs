//! Price series augmented with the indicator columns used by the engine and scorer.

use crate::domain::indicator::{
    MacdPoint, RSI_PERIOD, SMA_FAST_PERIOD, SMA_SLOW_PERIOD, calculate_macd_default,
    calculate_rsi, calculate_sma,
};
use crate::domain::ohlcv::{OhlcvBar, prices};
use chrono::NaiveDate;

/// One source bar with its derived columns. Absent values lack lookback.
#[derive(Debug, Clone)]
pub struct FrameRow {
    pub date: NaiveDate,
    pub price: f64,
    pub volume: i64,
    pub rsi: Option<f64>,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub macd: Option<MacdPoint>,
}

/// A fully defined row for the signal engine: RSI(14), SMA(20) and SMA(50).
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRow {
    pub date: NaiveDate,
    pub price: f64,
    pub rsi: f64,
    pub sma_fast: f64,
    pub sma_slow: f64,
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub code: String,
    pub rows: Vec<FrameRow>,
}

impl IndicatorFrame {
    pub fn from_bars(code: &str, bars: &[OhlcvBar]) -> Self {
        let closes = prices(bars);
        let rsi = calculate_rsi(&closes, RSI_PERIOD);
        let sma_fast = calculate_sma(&closes, SMA_FAST_PERIOD);
        let sma_slow = calculate_sma(&closes, SMA_SLOW_PERIOD);
        let macd = calculate_macd_default(&closes);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| FrameRow {
                date: bar.date,
                price: closes[i],
                volume: bar.volume,
                rsi: defined(rsi[i]),
                sma_fast: defined(sma_fast[i]),
                sma_slow: defined(sma_slow[i]),
                macd: macd.get(i).copied().filter(|m| {
                    m.line.is_finite() && m.signal.is_finite() && m.histogram.is_finite()
                }),
            })
            .collect();

        Self {
            code: code.to_string(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows where RSI and both SMAs are defined, in date order.
    pub fn strategy_rows(&self) -> Vec<StrategyRow> {
        self.rows
            .iter()
            .filter_map(|row| {
                Some(StrategyRow {
                    date: row.date,
                    price: row.price,
                    rsi: row.rsi?,
                    sma_fast: row.sma_fast?,
                    sma_slow: row.sma_slow?,
                })
            })
            .filter(|row| row.price.is_finite())
            .collect()
    }
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
