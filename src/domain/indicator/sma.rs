//! Simple Moving Average.
//!
//! SMA[i] = mean(P[i-n+1..=i]). Warmup: first (n-1) entries are absent.

pub fn calculate_sma(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; prices.len()];
    }

    let mut values = Vec::with_capacity(prices.len());
    for i in 0..prices.len() {
        if i + 1 < period {
            values.push(None);
        } else {
            let window = &prices[i + 1 - period..=i];
            values.push(Some(window.iter().sum::<f64>() / period as f64));
        }
    }
    values
}
