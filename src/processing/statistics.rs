//! Channel reductions and robust statistics
//!
//! DCRM test sets emit a sentinel (8000 µΩ nominal) on open-circuit
//! channels, so every reduction here works on a validity-filtered view
//! of the raw values rather than the raw values themselves:
//!
//! - average / min / robust statistics: `0 < v < sentinel`
//! - max: `v < sentinel` (zero and negative readings are real)
//!
//! Robust statistics resist contact-bounce transients that would
//! otherwise dominate plain max and standard deviation: `robust_max`
//! reads the 95th-percentile sample and `trimmed_std_dev` drops the
//! top and bottom deciles before measuring spread.
//!
//! Empty filtered sets reduce to 0.0 across the board.

/// Mean of values in `(0, sentinel)`, or 0.0 if none qualify.
pub fn channel_average(values: &[f64], sentinel: f64) -> f64 {
    let valid: Vec<f64> = values
        .iter()
        .copied()
        .filter(|&v| v > 0.0 && v < sentinel)
        .collect();

    if valid.is_empty() {
        return 0.0;
    }
    valid.iter().sum::<f64>() / valid.len() as f64
}

/// Maximum of values below `sentinel`, or 0.0 if none qualify.
///
/// Unlike the other reductions this keeps zero and negative readings:
/// travel transducers legitimately report both during an operation.
pub fn channel_max(values: &[f64], sentinel: f64) -> f64 {
    values
        .iter()
        .copied()
        .filter(|&v| v < sentinel)
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        })
        .unwrap_or(0.0)
}

/// Minimum of values in `(0, sentinel)`, or 0.0 if none qualify.
pub fn channel_min(values: &[f64], sentinel: f64) -> f64 {
    values
        .iter()
        .copied()
        .filter(|&v| v > 0.0 && v < sentinel)
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.min(v)))
        })
        .unwrap_or(0.0)
}

/// Values in `(0, sentinel)`, ascending. The shared first step of the
/// robust statistics.
pub fn valid_sorted(values: &[f64], sentinel: f64) -> Vec<f64> {
    let mut valid: Vec<f64> = values
        .iter()
        .copied()
        .filter(|&v| v > 0.0 && v < sentinel)
        .collect();
    valid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    valid
}

/// 95th-percentile reading: the sorted valid sample at index
/// `floor(0.95 * n)`. Returns 0.0 when no values qualify.
pub fn robust_max(values: &[f64], sentinel: f64) -> f64 {
    let valid = valid_sorted(values, sentinel);
    if valid.is_empty() {
        return 0.0;
    }
    let idx = (valid.len() as f64 * 0.95) as usize;
    valid[idx.min(valid.len() - 1)]
}

/// Population standard deviation of the middle 80% of the sorted valid
/// values, the window `[floor(0.1n), floor(0.9n))`. Returns 0.0 when no
/// values qualify or the window is empty (single-sample sets).
pub fn trimmed_std_dev(values: &[f64], sentinel: f64) -> f64 {
    let valid = valid_sorted(values, sentinel);
    if valid.is_empty() {
        return 0.0;
    }

    let lo = (valid.len() as f64 * 0.1) as usize;
    let hi = (valid.len() as f64 * 0.9) as usize;
    if lo >= hi {
        return 0.0;
    }

    population_std_dev(&valid[lo..hi])
}

/// Population standard deviation (N divisor, not N-1) of a plain slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
