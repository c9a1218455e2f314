//! Capture constants, classifier thresholds, and comparison tolerances

use serde::{Deserialize, Serialize};

/// Fixed characteristics of the capture format
pub mod capture {
    /// Hardware "invalid reading" sentinel emitted on open channels (µΩ)
    pub const SENTINEL_INVALID: f64 = 8000.0;
    /// Nominal sampling interval at 10 kHz (ms)
    pub const SAMPLE_INTERVAL_MS: f64 = 0.1;
}

/// Default decision bounds for the rule-based health classifier
pub mod classifier_defaults {
    // === Resistance Stability (CH1-CH3) ===
    /// Trimmed std dev above this is contact instability (µΩ); healthy
    /// contacts typically sit around 15-20
    pub const TRIMMED_STD_DEV_CRITICAL: f64 = 50.0;
    /// Trimmed std dev above this warrants maintenance (µΩ)
    pub const TRIMMED_STD_DEV_MAINTENANCE: f64 = 30.0;
    /// Robust max above this is critical resistance (µΩ)
    pub const ROBUST_MAX_CRITICAL: f64 = 1000.0;
    /// Robust max above this warrants maintenance (µΩ)
    pub const ROBUST_MAX_MAINTENANCE: f64 = 500.0;

    // === Mechanism Plausibility ===
    /// Coil current average healthy band, lower bound (A)
    pub const COIL_CURRENT_AVG_MIN: f64 = 0.3;
    /// Coil current average healthy band, upper bound (A)
    pub const COIL_CURRENT_AVG_MAX: f64 = 5.0;
    /// Travel max healthy band, lower bound (mm)
    pub const TRAVEL_MAX_MIN: f64 = 80.0;
    /// Travel max healthy band, upper bound (mm)
    pub const TRAVEL_MAX_MAX: f64 = 250.0;
}

/// Per-metric deviation tolerances for the reference abnormality report
pub mod comparison_tolerances {
    /// Resistance CH1 average diff tolerance (µΩ)
    pub const RESISTANCE_AVG: f64 = 10.0;
    /// Travel T1 max diff tolerance (mm)
    pub const TRAVEL_MAX: f64 = 5.0;
    /// Velocity T1 max diff tolerance (mm/s)
    pub const VELOCITY_MAX: f64 = 0.5;
    /// Current CH1 max diff tolerance (A)
    pub const CURRENT_MAX: f64 = 5.0;
    /// Coil current C1 average diff tolerance (A)
    pub const COIL_CURRENT_AVG: f64 = 0.5;
}

/// Site-tunable classifier bounds
///
/// Defaults reproduce [`classifier_defaults`]; a config file can retune
/// them for breaker families with different travel or coil signatures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// CRITICAL when any resistance CH1-CH3 trimmed std dev exceeds this (µΩ)
    pub trimmed_std_dev_critical: f64,
    /// NEEDS_MAINTENANCE when any resistance CH1-CH3 trimmed std dev exceeds this (µΩ)
    pub trimmed_std_dev_maintenance: f64,
    /// CRITICAL when any resistance CH1-CH3 robust max exceeds this (µΩ)
    pub robust_max_critical: f64,
    /// NEEDS_MAINTENANCE when any resistance CH1-CH3 robust max exceeds this (µΩ)
    pub robust_max_maintenance: f64,
    /// Healthy coil current average band (A), checked on C1 and C2
    pub coil_current_avg_min: f64,
    pub coil_current_avg_max: f64,
    /// Healthy travel max band (mm), checked on T1-T3
    pub travel_max_min: f64,
    pub travel_max_max: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            trimmed_std_dev_critical: classifier_defaults::TRIMMED_STD_DEV_CRITICAL,
            trimmed_std_dev_maintenance: classifier_defaults::TRIMMED_STD_DEV_MAINTENANCE,
            robust_max_critical: classifier_defaults::ROBUST_MAX_CRITICAL,
            robust_max_maintenance: classifier_defaults::ROBUST_MAX_MAINTENANCE,
            coil_current_avg_min: classifier_defaults::COIL_CURRENT_AVG_MIN,
            coil_current_avg_max: classifier_defaults::COIL_CURRENT_AVG_MAX,
            travel_max_min: classifier_defaults::TRAVEL_MAX_MIN,
            travel_max_max: classifier_defaults::TRAVEL_MAX_MAX,
        }
    }
}
