//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. All three components are
//! defined from the first bar because the EMAs are observation-adjusted.

use crate::domain::indicator::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Vec<MacdPoint> {
    if prices.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return Vec::new();
    }

    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = calculate_ema(&macd_line, signal_period);

    macd_line
        .into_iter()
        .zip(signal_line)
        .map(|(line, signal)| MacdPoint {
            line,
            signal,
            histogram: line - signal,
        })
        .collect()
}

pub fn calculate_macd_default(prices: &[f64]) -> Vec<MacdPoint> {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trending_prices(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + i as f64 + (i as f64 * 0.7).sin() * 3.0)
            .collect()
    }

    #[test]
    fn macd_defined_for_every_bar() {
        let prices = trending_prices(40);
        let values = calculate_macd_default(&prices);
        assert_eq!(values.len(), 40);
    }

    #[test]
    fn macd_first_bar_is_zero() {
        let values = calculate_macd_default(&[123.0, 124.0]);
        assert_relative_eq!(values[0].line, 0.0);
        assert_relative_eq!(values[0].signal, 0.0);
        assert_relative_eq!(values[0].histogram, 0.0);
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let prices = trending_prices(60);
        for point in calculate_macd_default(&prices) {
            assert_eq!(point.histogram, point.line - point.signal);
        }
    }

    #[test]
    fn macd_line_is_fast_minus_slow() {
        let prices = trending_prices(30);
        let fast = calculate_ema(&prices, DEFAULT_FAST);
        let slow = calculate_ema(&prices, DEFAULT_SLOW);
        let values = calculate_macd_default(&prices);
        for i in 0..prices.len() {
            assert_relative_eq!(values[i].line, fast[i] - slow[i]);
        }
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let prices: Vec<f64> = (0..50).map(|i| 100.0 + 2.0 * i as f64).collect();
        let values = calculate_macd_default(&prices);
        assert!(values[49].line > 0.0);
    }

    #[test]
    fn macd_flat_prices_are_zero() {
        let values = calculate_macd_default(&[50.0; 30]);
        for point in values {
            assert_relative_eq!(point.line, 0.0, epsilon = 1e-12);
            assert_relative_eq!(point.histogram, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn macd_empty_and_zero_periods() {
        assert!(calculate_macd_default(&[]).is_empty());
        assert!(calculate_macd(&[1.0, 2.0], 0, 26, 9).is_empty());
        assert!(calculate_macd(&[1.0, 2.0], 12, 26, 0).is_empty());
    }
}
