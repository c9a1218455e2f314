//! Reference comparison types: per-sample diffs and curated diff metrics

use serde::{Deserialize, Serialize};

use super::{Sample, CHANNEL_COUNT};

/// Per-sample deviation from the reference capture.
///
/// A companion to [`Sample`] rather than extra fields on it: diffs exist
/// only for indices present in both series, and keeping them separate
/// leaves the decoded series' invariants untouched. Position `i` in the
/// diff series corresponds to index `i` of the test series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiffSample {
    /// Test-series time at this index (ms)
    pub time_ms: f64,
    /// test − reference, coil current C1-C6 (A)
    pub coil_current_diff: [f64; CHANNEL_COUNT],
    /// test − reference, travel T1-T6 (mm)
    pub travel_diff: [f64; CHANNEL_COUNT],
    /// test − reference, resistance CH1-CH6 (µΩ)
    pub resistance_diff: [f64; CHANNEL_COUNT],
    /// test − reference, current CH1-CH6 (A)
    pub current_diff: [f64; CHANNEL_COUNT],
    /// test − reference, velocity T1-T6 (mm/s)
    pub velocity_diff: [f64; CHANNEL_COUNT],
    /// The aligned reference sample, carried for chart overlays
    pub reference: Sample,
}

/// Curated scalar diff metrics, one per channel group on its primary
/// channel, computed as test value − reference value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiffMetrics {
    #[serde(rename = "resistanceCH1AvgDiff")]
    pub resistance_ch1_avg_diff: f64,
    pub travel_t1_max_diff: f64,
    pub velocity_t1_max_diff: f64,
    #[serde(rename = "currentCH1MaxDiff")]
    pub current_ch1_max_diff: f64,
    pub coil_current_c1_avg_diff: f64,
}

/// Result of comparing a test capture against a reference capture.
///
/// Exists only when a reference was supplied and decoded successfully;
/// scoped to one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Index-aligned diffs, length = min(test len, reference len)
    pub diff_series: Vec<DiffSample>,
    /// Curated scalar diffs from the two captures' metrics
    pub diff_metrics: DiffMetrics,
    /// Human-readable summary of significant deviations, for the AI
    /// diagnostic payload
    pub abnormality_report: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_metrics_wire_names() {
        let metrics = DiffMetrics::default();
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json.get("resistanceCH1AvgDiff").is_some());
        assert!(json.get("travelT1MaxDiff").is_some());
        assert!(json.get("velocityT1MaxDiff").is_some());
        assert!(json.get("currentCH1MaxDiff").is_some());
        assert!(json.get("coilCurrentC1AvgDiff").is_some());
    }
}
