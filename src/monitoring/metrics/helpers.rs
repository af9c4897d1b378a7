//! Helper functions for metrics calculations

/// Value at index `floor(n * quantile)` of an ascending slice.
///
/// Returns 0 when that index falls outside the slice, which only happens for
/// an empty window (or a quantile of 1.0 or more).
pub fn index_percentile(sorted_values: &[u64], quantile: f64) -> u64 {
    let index = (sorted_values.len() as f64 * quantile).floor() as usize;
    sorted_values.get(index).copied().unwrap_or(0)
}

/// Arithmetic mean of u64 values, 0 for an empty slice
pub fn calculate_average(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
    }
}

/// Bucket a status code into its class label ("2xx", "4xx", ...)
pub(super) fn status_class(status_code: u16) -> String {
    format!("{}xx", status_code / 100)
}
