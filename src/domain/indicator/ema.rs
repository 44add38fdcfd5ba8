//! Exponential Moving Average with observation-count adjustment.
//!
//! alpha = 2/(span+1). Each output is the weighted mean of all observations
//! seen so far with weights (1-alpha)^k, k = age of the observation:
//!   num[i] = P[i] + (1-alpha) * num[i-1]
//!   den[i] = 1    + (1-alpha) * den[i-1]
//!   EMA[i] = num[i] / den[i]
//! There is no hard warmup; EMA[0] = P[0].

pub fn calculate_ema(prices: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len());
    let mut num = 0.0;
    let mut den = 0.0;

    for &price in prices {
        num = price + decay * num;
        den = 1.0 + decay * den;
        values.push(num / den);
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_first_value_is_first_price() {
        let values = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(values[0], 10.0);
    }

    #[test]
    fn ema_adjusted_weights() {
        // span 3 -> alpha 0.5, decay 0.5
        let values = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert_relative_eq!(values[1], (20.0 + 0.5 * 10.0) / 1.5);
        assert_relative_eq!(values[2], (30.0 + 0.5 * 20.0 + 0.25 * 10.0) / 1.75);
    }

    #[test]
    fn ema_span_1_is_identity() {
        let prices = [3.0, 7.0, 11.0];
        let values = calculate_ema(&prices, 1);
        for (v, p) in values.iter().zip(prices.iter()) {
            assert_relative_eq!(*v, *p);
        }
    }

    #[test]
    fn ema_equal_prices() {
        let values = calculate_ema(&[100.0; 10], 12);
        for v in values {
            assert_relative_eq!(v, 100.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn ema_zero_span() {
        assert!(calculate_ema(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 12).is_empty());
    }
}
