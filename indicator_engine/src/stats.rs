//! Descriptive statistics used by the summary metrics.

use crate::TRADING_DAYS_PER_YEAR;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (Bessel-corrected, denominator `n - 1`).
///
/// `None` for fewer than two values, where the estimator is undefined.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Scales a daily standard deviation to a yearly figure, in percent.
pub fn annualize_volatility_pct(daily_std_dev: f64) -> f64 {
    daily_std_dev * f64::from(TRADING_DAYS_PER_YEAR).sqrt() * 100.0
}
