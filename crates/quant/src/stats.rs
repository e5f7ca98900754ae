//! Statistical utilities.
//!
//! Population statistics over price series; the volatility measure
//! used for risk deltas is the population standard deviation of
//! day-over-day simple returns.

/// Calculate the mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the variance of a slice of values (population variance).
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some(sum_sq / values.len() as f64)
}

/// Calculate the standard deviation (population).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(|v| v.sqrt())
}

/// Calculate simple returns from a price series.
/// Returns (price[i] - price[i-1]) / price[i-1] for each consecutive pair.
pub fn returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return vec![];
    }

    prices
        .windows(2)
        .filter_map(|w| {
            if w[0] != 0.0 {
                Some((w[1] - w[0]) / w[0])
            } else {
                None
            }
        })
        .collect()
}

/// Volatility of a price series: population standard deviation of its
/// day-over-day simple returns. Zero when fewer than two price points
/// exist.
pub fn volatility(prices: &[f64]) -> f64 {
    let rets = returns(prices);
    if rets.is_empty() {
        return 0.0;
    }
    std_dev(&rets).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = std_dev(&values).unwrap();
        assert!((std - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_returns() {
        let prices = [100.0, 110.0, 99.0, 121.0];
        let rets = returns(&prices);
        assert_eq!(rets.len(), 3);
        assert!((rets[0] - 0.1).abs() < 0.0001); // 10% gain
        assert!((rets[1] - (-0.1)).abs() < 0.0001); // 10% loss
    }

    #[test]
    fn test_volatility_insufficient_points() {
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[100.0]), 0.0);
    }

    #[test]
    fn test_volatility_constant_series_is_zero() {
        assert_eq!(volatility(&[100.0, 100.0, 100.0]), 0.0);
    }

    #[test]
    fn test_volatility_alternating_returns() {
        // Returns are +10% and -10%: mean 0, population std dev 0.1.
        let vol = volatility(&[100.0, 110.0, 99.0]);
        assert!((vol - 0.1).abs() < 0.0001);
    }
}
