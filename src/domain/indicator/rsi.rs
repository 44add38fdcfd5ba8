//! RSI (Relative Strength Index) over rolling means of gains and losses.
//!
//! gain[i] = max(P[i] - P[i-1], 0), loss[i] = max(P[i-1] - P[i], 0)
//! avg_gain/avg_loss = simple mean of the last n gains/losses
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); avg_loss == 0 gives 100.
//!
//! Warmup: first n entries are absent (need n price changes).

pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || prices.len() <= period {
        return vec![None; prices.len()];
    }

    let mut gains: Vec<f64> = Vec::with_capacity(prices.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(prices.len() - 1);
    for pair in prices.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = vec![None; period];
    // gains[j] is the change into price j + 1
    for i in period..prices.len() {
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        values.push(Some(rsi_from_averages(avg_gain, avg_loss)));
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rsi = 100.0 - (100.0 / (1.0 + avg_gain / avg_loss));
    rsi.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn rsi_empty_prices() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_too_short() {
        let values = calculate_rsi(&[1.0; 14], 14);
        assert_eq!(values.len(), 14);
        assert!(values.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let values = calculate_rsi(&prices, 14);

        assert_eq!(values.len(), 20);
        for (i, v) in values.iter().enumerate().take(14) {
            assert!(v.is_none(), "index {} should be undefined", i);
        }
        assert!(values[14].is_some());
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let values = calculate_rsi(&prices, 14);
        assert_relative_eq!(values[14].unwrap(), 100.0);
    }

    #[test]
    fn rsi_flat_prices_is_100() {
        let values = calculate_rsi(&[50.0; 20], 14);
        assert_relative_eq!(values[19].unwrap(), 100.0);
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let values = calculate_rsi(&prices, 14);
        assert_relative_eq!(values[14].unwrap(), 0.0);
    }

    #[test]
    fn rsi_known_calculation() {
        // changes: +2, -1, +2, -1 with period 4 -> avg_gain 1.0, avg_loss 0.5
        let prices = [10.0, 12.0, 11.0, 13.0, 12.0];
        let values = calculate_rsi(&prices, 4);
        let expected = 100.0 - 100.0 / (1.0 + 1.0 / 0.5);
        assert_relative_eq!(values[4].unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn rsi_window_rolls() {
        // window for index 5 covers changes into prices 2..=5 only
        let prices = [10.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let values = calculate_rsi(&prices, 4);
        assert_relative_eq!(values[5].unwrap(), 100.0);
        assert!(values[4].unwrap() < 100.0);
    }

    #[test]
    fn rsi_zero_period() {
        let values = calculate_rsi(&[100.0, 101.0], 0);
        assert_eq!(values, vec![None, None]);
    }

    proptest! {
        #[test]
        fn rsi_is_bounded(prices in proptest::collection::vec(1.0f64..1000.0, 15..120)) {
            for v in calculate_rsi(&prices, 14).into_iter().flatten() {
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }

        #[test]
        fn rsi_non_decreasing_window_is_100(
            start in 1.0f64..500.0,
            steps in proptest::collection::vec(0.0f64..5.0, 14..60),
        ) {
            let mut prices = vec![start];
            for step in &steps {
                let last = *prices.last().unwrap();
                prices.push(last + step);
            }
            for v in calculate_rsi(&prices, 14).into_iter().flatten() {
                prop_assert_eq!(v, 100.0);
            }
        }
    }
}
