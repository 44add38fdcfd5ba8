//! RSI + moving-average crossover signal engine.
//!
//! Buy when flat, RSI(14) < 30 and SMA(20) crosses above SMA(50).
//! Sell when open and SMA(20) crosses below SMA(50).
//!
//! A crossover compares bar `i` with bar `i - 1`: the earlier bar must be
//! at-or-on the near side (`<=` / `>=`) and the current bar strictly past it.
//! A position still open when the rows run out stays open.

use crate::domain::error::ScanError;
use crate::domain::indicator_frame::{IndicatorFrame, StrategyRow};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::trade::Trade;

pub const OVERSOLD_RSI: f64 = 30.0;

/// Bars needed before the slow SMA has a full window.
pub const MIN_STRATEGY_BARS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    Open(Trade),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalEvent {
    /// A position was opened; carries the new open trade.
    Buy(Trade),
    /// A position was closed; carries the completed trade.
    Sell(Trade),
}

pub fn cross_above(prev: &StrategyRow, curr: &StrategyRow) -> bool {
    prev.sma_fast <= prev.sma_slow && curr.sma_fast > curr.sma_slow
}

pub fn cross_below(prev: &StrategyRow, curr: &StrategyRow) -> bool {
    prev.sma_fast >= prev.sma_slow && curr.sma_fast < curr.sma_slow
}

impl PositionState {
    pub fn is_open(&self) -> bool {
        matches!(self, PositionState::Open(_))
    }

    /// Applies one bar. At most one event fires per bar.
    pub fn step(
        self,
        code: &str,
        prev: &StrategyRow,
        curr: &StrategyRow,
    ) -> (PositionState, Option<SignalEvent>) {
        match self {
            PositionState::Flat => {
                if curr.rsi < OVERSOLD_RSI && cross_above(prev, curr) {
                    let trade = Trade::open(code, curr.date, curr.price);
                    (
                        PositionState::Open(trade.clone()),
                        Some(SignalEvent::Buy(trade)),
                    )
                } else {
                    (PositionState::Flat, None)
                }
            }
            PositionState::Open(trade) => {
                if cross_below(prev, curr) {
                    let closed = trade.close(curr.date, curr.price);
                    (PositionState::Flat, Some(SignalEvent::Sell(closed)))
                } else {
                    (PositionState::Open(trade), None)
                }
            }
        }
    }
}

fn check_row(index: usize, row: &StrategyRow) -> Result<(), ScanError> {
    let fields = [
        ("price", row.price),
        ("rsi", row.rsi),
        ("sma_fast", row.sma_fast),
        ("sma_slow", row.sma_slow),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(ScanError::Computation {
                index,
                reason: format!("{} is not finite", name),
            });
        }
    }
    Ok(())
}

/// Runs the state machine over fully defined rows and returns trades in buy order.
pub fn evaluate_rows(code: &str, rows: &[StrategyRow]) -> Vec<Trade> {
    if rows.len() < 2 {
        log::warn!(
            "{}: insufficient rows after indicator calculation ({})",
            code,
            rows.len()
        );
        return Vec::new();
    }

    let mut state = PositionState::Flat;
    let mut trades = Vec::new();

    for i in 1..rows.len() {
        if let Err(e) = check_row(i - 1, &rows[i - 1]).and_then(|_| check_row(i, &rows[i])) {
            log::warn!("{}: skipping bar {} ({})", code, i, e);
            continue;
        }

        let (next, event) = state.step(code, &rows[i - 1], &rows[i]);
        state = next;

        match event {
            Some(SignalEvent::Buy(trade)) => {
                log::debug!("{}: buy at {:.2} on {}", code, trade.buy_price, trade.buy_date);
            }
            Some(SignalEvent::Sell(trade)) => {
                log::debug!("{}: sell at {:?} on {:?}", code, trade.sell_price, trade.sell_date);
                trades.push(trade);
            }
            None => {}
        }
    }

    if let PositionState::Open(trade) = state {
        trades.push(trade);
    }

    trades
}

pub fn evaluate_frame(frame: &IndicatorFrame) -> Vec<Trade> {
    evaluate_rows(&frame.code, &frame.strategy_rows())
}

/// Computes indicators for a raw series and runs the strategy over it.
pub fn run_strategy(code: &str, bars: &[OhlcvBar]) -> Vec<Trade> {
    if bars.len() < MIN_STRATEGY_BARS {
        log::warn!(
            "{}: insufficient data for strategy, need at least {} bars, got {}",
            code,
            MIN_STRATEGY_BARS,
            bars.len()
        );
        return Vec::new();
    }
    evaluate_frame(&IndicatorFrame::from_bars(code, bars))
}
