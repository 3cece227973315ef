//! Summary statistics used by the scorer

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n); 0 for an empty slice
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let sum_squares: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_squares / values.len() as f64).sqrt()
}
