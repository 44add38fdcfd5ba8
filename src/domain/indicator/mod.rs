//! Technical indicators over a price sequence.
//!
//! Every function is pure and returns one entry per input price. Entries
//! without enough lookback are `None` rather than a sentinel value:
//! - `sma`: first `period - 1` entries absent
//! - `rsi`: first `period` entries absent
//! - `ema` / `macd`: defined from the first entry (adjusted exponential weighting)

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::{MacdPoint, calculate_macd, calculate_macd_default};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

pub const RSI_PERIOD: usize = 14;
pub const SMA_FAST_PERIOD: usize = 20;
pub const SMA_SLOW_PERIOD: usize = 50;
