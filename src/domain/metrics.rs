//! Trade summary statistics across a scan cycle.

use crate::domain::trade::TradeBatch;

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    /// All trades, open positions included.
    pub total_trades: usize,
    pub completed_trades: usize,
    pub winning_trades: usize,
    /// Sum of P&L over completed trades.
    pub total_pnl: f64,
    /// Winning / completed, in percent; 0 when nothing completed.
    pub win_ratio_pct: f64,
}

impl TradeSummary {
    pub fn compute(batch: &TradeBatch) -> Self {
        let mut total_trades = 0usize;
        let mut completed_trades = 0usize;
        let mut winning_trades = 0usize;
        let mut total_pnl = 0.0_f64;

        for trades in batch.values() {
            total_trades += trades.len();
            for pnl in trades.iter().filter_map(|t| t.pnl()) {
                completed_trades += 1;
                total_pnl += pnl;
                if pnl > 0.0 {
                    winning_trades += 1;
                }
            }
        }

        let win_ratio_pct = if completed_trades > 0 {
            winning_trades as f64 / completed_trades as f64 * 100.0
        } else {
            0.0
        };

        TradeSummary {
            total_trades,
            completed_trades,
            winning_trades,
            total_pnl,
            win_ratio_pct,
        }
    }

    pub fn open_positions(&self) -> usize {
        self.total_trades - self.completed_trades
    }
}
