//! Period-over-period simple returns.

/// Simple percentage change between consecutive values, as a fraction.
///
/// `out[0]` is always `None` (no predecessor). For `i > 0`,
/// `out[i] = (values[i] - values[i-1]) / values[i-1]`; a non-finite quotient
/// (zero predecessor) is `None` as well.
pub fn pct_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    out.push(None);
    out.extend(values.windows(2).map(|pair| {
        let change = (pair[1] - pair[0]) / pair[0];
        change.is_finite().then_some(change)
    }));
    out
}
