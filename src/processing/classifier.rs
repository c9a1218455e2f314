//! Rule-based breaker health classification
//!
//! Maps a capture's [`ScalarMetrics`] to one of three assessment
//! labels. The rule set reads the main-contact resistance channels
//! CH1-CH3 for stability, then sanity-checks the operating mechanism
//! via coil current averages (C1, C2) and travel maxima (T1-T3).
//!
//! An earlier revision of this rule compared plain channel maxima
//! against a fixed 100 µΩ bound. Contact-bounce transients and partial
//! sentinel spillover tripped false CRITICALs on healthy breakers, so
//! the rule now reads the robust statistics instead: 95th-percentile
//! max and decile-trimmed standard deviation. The old absolute bound
//! survives only in this note.
//!
//! Classification is pure: identical metrics always produce the
//! identical label.

use crate::types::{AssessmentLabel, ClassifierThresholds, ScalarMetrics};

/// Number of resistance channels wired to main contacts; CH4-CH6 carry
/// auxiliary or unterminated probes and never drive the label.
const STABILITY_CHANNELS: usize = 3;

/// Classify a capture from its scalar metrics.
///
/// Decision order:
/// 1. No valid resistance reading on any of CH1-CH3 (`robust_max == 0`
///    across the board) short-circuits to HEALTHY. Absence of data is
///    deliberately not treated as a fault; a disconnected test lead
///    must not page anyone.
/// 2. CRITICAL on resistance instability (trimmed std dev) or absolute
///    robust-max breach.
/// 3. NEEDS_MAINTENANCE on the moderate versions of those bounds, or a
///    nonzero coil-current average outside its healthy band, or a
///    nonzero travel max outside its healthy band.
/// 4. HEALTHY otherwise.
pub fn classify(metrics: &ScalarMetrics, thresholds: &ClassifierThresholds) -> AssessmentLabel {
    let stability = &metrics.resistance[..STABILITY_CHANNELS];

    let has_data = stability.iter().any(|s| s.robust_max > 0.0);
    if !has_data {
        return AssessmentLabel::Healthy;
    }

    let high_fluctuation = stability
        .iter()
        .any(|s| s.trimmed_std_dev > thresholds.trimmed_std_dev_critical);
    let critical_resistance = stability
        .iter()
        .any(|s| s.robust_max > thresholds.robust_max_critical);

    if high_fluctuation || critical_resistance {
        tracing::debug!(
            high_fluctuation,
            critical_resistance,
            "Resistance stability breach, assessing CRITICAL"
        );
        return AssessmentLabel::Critical;
    }

    let moderate_fluctuation = stability
        .iter()
        .any(|s| s.trimmed_std_dev > thresholds.trimmed_std_dev_maintenance);
    let high_resistance = stability
        .iter()
        .any(|s| s.robust_max > thresholds.robust_max_maintenance);

    let abnormal_coil_current = metrics.coil_current[..2].iter().any(|s| {
        s.average > 0.0
            && (s.average < thresholds.coil_current_avg_min
                || s.average > thresholds.coil_current_avg_max)
    });

    let abnormal_travel = metrics.travel[..STABILITY_CHANNELS].iter().any(|s| {
        s.max > 0.0 && (s.max < thresholds.travel_max_min || s.max > thresholds.travel_max_max)
    });

    if moderate_fluctuation || high_resistance || abnormal_coil_current || abnormal_travel {
        tracing::debug!(
            moderate_fluctuation,
            high_resistance,
            abnormal_coil_current,
            abnormal_travel,
            "Moderate rule breach, assessing NEEDS_MAINTENANCE"
        );
        return AssessmentLabel::NeedsMaintenance;
    }

    AssessmentLabel::Healthy
}
