//! Small statistics helpers used by the detectors and the
//! false-positive filter.

/// Guard against division by a vanishing mean in CV computations.
pub const CV_EPSILON: f64 = 1e-9;

/// Arithmetic mean. Empty input yields 0.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator). Fewer than two values yields 0.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Coefficient of variation: stddev / max(mean, epsilon).
///
/// Near-zero for regularized flows (constant amounts, scheduled timing),
/// which is what the false-positive filter keys on.
#[must_use]
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    std_dev(values) / mean(values).max(CV_EPSILON)
}

/// Successive differences of a sorted timestamp sequence, as f64 seconds.
#[must_use]
pub fn inter_arrival_deltas(sorted_timestamps: &[u64]) -> Vec<f64> {
    sorted_timestamps
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64)
        .collect()
}
