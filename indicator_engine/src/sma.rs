//! Simple (unweighted) trailing moving average.

use std::num::NonZeroUsize;

/// Trailing mean of `values` over `window` elements.
///
/// Element `i` of the output is the mean of `values[i + 1 - window ..= i]`, or
/// `None` while fewer than `window` values exist up to and including `i`.
/// There is no warm-up approximation over a shorter window.
pub fn simple_moving_average(values: &[f64], window: NonZeroUsize) -> Vec<Option<f64>> {
    let n = window.get();
    let mut out = vec![None; values.len()];

    for (start, slice) in values.windows(n).enumerate() {
        out[start + n - 1] = Some(slice.iter().sum::<f64>() / n as f64);
    }

    out
}
