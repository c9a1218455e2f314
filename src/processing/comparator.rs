//! Reference comparison
//!
//! Diffs a test capture against a reference ("ideal") capture of the
//! same breaker. Alignment is strictly index-wise: both captures come
//! from the same test-set family at the same 10 kHz rate, so sample i
//! of each series describes the same elapsed time and no resampling or
//! interpolation is attempted. Test samples beyond the reference
//! length (or vice versa) get no diff entry.
//!
//! Scalar diff metrics are computed from each capture's reported
//! metrics as `test - reference`, and a short plain-text abnormality
//! report is derived from them for the diagnostic payload.

use crate::types::{
    comparison_tolerances, ComparisonResult, DiffMetrics, DiffSample, MetricsReport, Sample,
    CHANNEL_COUNT,
};

/// Text used when every diff metric is inside tolerance.
pub const NO_DEVIATIONS: &str = "No significant deviations from reference.";

/// Compare a test capture against a reference capture.
///
/// `test_report` and `reference_report` must be the reported metrics of
/// the respective series; they are diffed as-is so the wire-facing
/// conventions (including the min-valued "average") carry through.
pub fn compare(
    test: &[Sample],
    reference: &[Sample],
    test_report: &MetricsReport,
    reference_report: &MetricsReport,
) -> ComparisonResult {
    let diff_metrics = diff_reports(test_report, reference_report);

    ComparisonResult {
        diff_series: diff_series(test, reference),
        abnormality_report: abnormality_report(&diff_metrics),
        diff_metrics,
    }
}

/// Per-sample diffs over the overlapping index range.
fn diff_series(test: &[Sample], reference: &[Sample]) -> Vec<DiffSample> {
    let overlap = test.len().min(reference.len());
    let mut series = Vec::with_capacity(overlap);

    for i in 0..overlap {
        let t = &test[i];
        let r = &reference[i];
        let mut diff = DiffSample {
            time_ms: t.time_ms,
            coil_current_diff: [0.0; CHANNEL_COUNT],
            travel_diff: [0.0; CHANNEL_COUNT],
            resistance_diff: [0.0; CHANNEL_COUNT],
            current_diff: [0.0; CHANNEL_COUNT],
            velocity_diff: [0.0; CHANNEL_COUNT],
            reference: r.clone(),
        };

        for ch in 0..CHANNEL_COUNT {
            diff.coil_current_diff[ch] = t.coil_current[ch] - r.coil_current[ch];
            diff.travel_diff[ch] = t.travel[ch] - r.travel[ch];
            diff.resistance_diff[ch] = t.resistance[ch] - r.resistance[ch];
            diff.current_diff[ch] = t.current[ch] - r.current[ch];
            diff.velocity_diff[ch] = t.velocity[ch] - r.velocity[ch];
        }

        series.push(diff);
    }

    series
}

/// Curated scalar diffs, `test - reference` on the reported metrics.
fn diff_reports(test: &MetricsReport, reference: &MetricsReport) -> DiffMetrics {
    DiffMetrics {
        resistance_ch1_avg_diff: test.resistance_ch1_avg - reference.resistance_ch1_avg,
        travel_t1_max_diff: test.travel_t1_max - reference.travel_t1_max,
        velocity_t1_max_diff: test.velocity_t1_max - reference.velocity_t1_max,
        current_ch1_max_diff: test.current_ch1_max - reference.current_ch1_max,
        coil_current_c1_avg_diff: test.coil_current_c1_avg - reference.coil_current_c1_avg,
    }
}

/// One line per out-of-tolerance diff metric, or [`NO_DEVIATIONS`].
///
/// Advisory text for the diagnostic payload and report views; nothing
/// parses it back.
pub fn abnormality_report(diff: &DiffMetrics) -> String {
    let mut lines = Vec::new();

    if diff.resistance_ch1_avg_diff.abs() > comparison_tolerances::RESISTANCE_AVG {
        lines.push(format!(
            "Resistance CH1 average deviates {:+.2} µΩ from reference (tolerance ±{:.0} µΩ).",
            diff.resistance_ch1_avg_diff,
            comparison_tolerances::RESISTANCE_AVG
        ));
    }
    if diff.travel_t1_max_diff.abs() > comparison_tolerances::TRAVEL_MAX {
        lines.push(format!(
            "Travel T1 max deviates {:+.2} mm from reference (tolerance ±{:.0} mm).",
            diff.travel_t1_max_diff,
            comparison_tolerances::TRAVEL_MAX
        ));
    }
    if diff.velocity_t1_max_diff.abs() > comparison_tolerances::VELOCITY_MAX {
        lines.push(format!(
            "Velocity T1 max deviates {:+.2} mm/s from reference (tolerance ±{:.1} mm/s).",
            diff.velocity_t1_max_diff,
            comparison_tolerances::VELOCITY_MAX
        ));
    }
    if diff.current_ch1_max_diff.abs() > comparison_tolerances::CURRENT_MAX {
        lines.push(format!(
            "Current CH1 max deviates {:+.2} A from reference (tolerance ±{:.0} A).",
            diff.current_ch1_max_diff,
            comparison_tolerances::CURRENT_MAX
        ));
    }
    if diff.coil_current_c1_avg_diff.abs() > comparison_tolerances::COIL_CURRENT_AVG {
        lines.push(format!(
            "Coil current C1 average deviates {:+.2} A from reference (tolerance ±{:.1} A).",
            diff.coil_current_c1_avg_diff,
            comparison_tolerances::COIL_CURRENT_AVG
        ));
    }

    if lines.is_empty() {
        NO_DEVIATIONS.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time_ms: f64, resistance_ch1: f64) -> Sample {
        let mut s = Sample::at_time(time_ms);
        s.resistance[0] = resistance_ch1;
        s
    }

    #[test]
    fn test_diff_series_is_test_minus_reference() {
        let test = vec![sample(0.0, 60.0), sample(0.1, 65.0)];
        let reference = vec![sample(0.0, 50.0), sample(0.1, 50.0)];

        let result = compare(
            &test,
            &reference,
            &MetricsReport::default(),
            &MetricsReport::default(),
        );

        assert_eq!(result.diff_series.len(), 2);
        assert_eq!(result.diff_series[0].resistance_diff[0], 10.0);
        assert_eq!(result.diff_series[1].resistance_diff[0], 15.0);
        // The aligned reference sample rides along for rendering.
        assert_eq!(result.diff_series[1].reference.resistance[0], 50.0);
    }

    #[test]
    fn test_series_length_mismatch_truncates_to_overlap() {
        let test = vec![sample(0.0, 60.0), sample(0.1, 61.0), sample(0.2, 62.0)];
        let reference = vec![sample(0.0, 50.0)];

        let result = compare(
            &test,
            &reference,
            &MetricsReport::default(),
            &MetricsReport::default(),
        );
        assert_eq!(result.diff_series.len(), 1);

        let result = compare(
            &reference,
            &test,
            &MetricsReport::default(),
            &MetricsReport::default(),
        );
        assert_eq!(result.diff_series.len(), 1);
    }

    #[test]
    fn test_diff_metrics_from_reports() {
        let test_report = MetricsReport {
            travel_t1_max: 120.0,
            resistance_ch1_avg: 58.0,
            velocity_t1_max: 510.0,
            current_ch1_max: 102.0,
            coil_current_c1_avg: 2.2,
            ..MetricsReport::default()
        };
        let reference_report = MetricsReport {
            travel_t1_max: 100.0,
            resistance_ch1_avg: 50.0,
            velocity_t1_max: 500.0,
            current_ch1_max: 100.0,
            coil_current_c1_avg: 2.0,
            ..MetricsReport::default()
        };

        let result = compare(&[], &[], &test_report, &reference_report);
        let m = result.diff_metrics;
        assert_eq!(m.travel_t1_max_diff, 20.0);
        assert_eq!(m.resistance_ch1_avg_diff, 8.0);
        assert_eq!(m.velocity_t1_max_diff, 10.0);
        assert_eq!(m.current_ch1_max_diff, 2.0);
        assert!((m.coil_current_c1_avg_diff - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_abnormality_report_within_tolerance() {
        let diff = DiffMetrics {
            resistance_ch1_avg_diff: 9.9,
            travel_t1_max_diff: -4.9,
            velocity_t1_max_diff: 0.4,
            current_ch1_max_diff: 5.0,
            coil_current_c1_avg_diff: -0.5,
        };
        assert_eq!(abnormality_report(&diff), NO_DEVIATIONS);
    }

    #[test]
    fn test_abnormality_report_lists_each_breach() {
        let diff = DiffMetrics {
            resistance_ch1_avg_diff: 12.5,
            travel_t1_max_diff: -7.0,
            velocity_t1_max_diff: 0.0,
            current_ch1_max_diff: 0.0,
            coil_current_c1_avg_diff: 0.0,
        };
        let report = abnormality_report(&diff);

        assert!(report.contains("+12.50 µΩ"), "report was: {report}");
        assert!(report.contains("-7.00 mm"), "report was: {report}");
        assert_eq!(report.lines().count(), 2);
    }

    #[test]
    fn test_abnormality_report_negative_breaches_count() {
        let diff = DiffMetrics {
            resistance_ch1_avg_diff: -50.0,
            ..DiffMetrics::default()
        };
        assert!(abnormality_report(&diff).contains("-50.00"));
    }
}
