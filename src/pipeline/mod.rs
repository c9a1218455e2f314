//! Analysis Pipeline
//!
//! Request-scoped orchestration of the full capture analysis:
//!
//! ```text
//! STAGE 1: Decode test capture        (fatal on missing marker)
//! STAGE 2: Decode reference capture   (optional; degrades on failure)
//! STAGE 3: Derive velocity            (both series)
//! STAGE 4: Summarize                  (scalar metrics per series)
//! STAGE 5: Classify                   (rule-based assessment)
//! STAGE 6: Compare against reference  (only if stage 2 succeeded)
//! STAGE 7: AI assessment + overlay    (optional; best-effort)
//! ```
//!
//! Stages 1-6 are synchronous and allocation-only; the single await
//! point is the diagnostic-service call in stage 7. Nothing is shared
//! across requests — every analysis builds its own document and drops
//! all intermediate state with it.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ai::{AiAssessment, AiClient, AiComparison};
use crate::config::EngineConfig;
use crate::decoder::{decode_capture, DecodeError};
use crate::processing::{classify, compare, derive_velocity, summarize, synthesize_overlay};
use crate::types::{
    AnomalyOverlay, AssessmentLabel, ClassifierThresholds, ComparisonResult, DecodeReport,
    HeaderInfo, MetricsReport, WaveformSeries,
};

// ============================================================================
// Analysis Document
// ============================================================================

/// Everything one analysis produced.
///
/// The optional fields come in pairs with their error counterparts so a
/// degraded analysis is distinguishable from a clean "nothing to
/// report": a missing `comparison` with `reference_error` set means the
/// reference failed, while both absent means none was supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    /// Identifier for this analysis, also forwarded to the diagnostic
    /// service
    pub test_result_id: String,
    /// Key/value metadata from the capture preamble
    pub header_info: HeaderInfo,
    /// Decoded samples with derived velocity
    pub series: WaveformSeries,
    /// Flat per-channel metrics record
    pub scalar_metrics: MetricsReport,
    /// Rule-based health label
    pub assessment: AssessmentLabel,
    /// Decode skip/coercion counters for the test capture
    pub decode_report: DecodeReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_assessment: Option<AiAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly_overlay: Option<AnomalyOverlay>,
}

// ============================================================================
// Options
// ============================================================================

/// Analysis tunables, resolved by the caller.
///
/// The pipeline and everything below it take these as plain values;
/// only the binaries touch the global config.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    /// Time step between consecutive samples (ms)
    pub sample_interval_ms: f64,
    /// Hardware invalid-reading sentinel (µΩ)
    pub sentinel: f64,
    /// Classifier decision bounds
    pub thresholds: ClassifierThresholds,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            sample_interval_ms: crate::types::capture::SAMPLE_INTERVAL_MS,
            sentinel: crate::types::capture::SENTINEL_INVALID,
            thresholds: ClassifierThresholds::default(),
        }
    }
}

impl AnalysisOptions {
    /// Pull the analysis tunables out of a loaded engine config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            sample_interval_ms: config.analysis.sample_interval_ms,
            sentinel: config.analysis.sentinel,
            thresholds: config.analysis.thresholds,
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run stages 1-6: decode, derive, summarize, classify, compare.
///
/// Only a missing data-start marker in the *test* capture is fatal. A
/// reference that fails to decode degrades to `comparison: None` with
/// `reference_error` set.
pub fn analyze_capture(
    test_csv: &str,
    reference_csv: Option<&str>,
    options: &AnalysisOptions,
) -> Result<AnalysisDocument, DecodeError> {
    let decoded = decode_capture(test_csv, options.sample_interval_ms)?;
    let mut series = decoded.series;
    derive_velocity(&mut series);

    let metrics = summarize(&series, options.sentinel);
    let report = metrics.report();
    let assessment = classify(&metrics, &options.thresholds);

    info!(
        assessment = %assessment,
        rows = decoded.report.rows_decoded,
        skipped = decoded.report.skipped_rows,
        coerced = decoded.report.coerced_fields,
        "Capture analyzed"
    );

    let mut comparison = None;
    let mut reference_error = None;

    if let Some(reference_text) = reference_csv {
        match decode_capture(reference_text, options.sample_interval_ms) {
            Ok(reference_decoded) => {
                let mut reference_series = reference_decoded.series;
                derive_velocity(&mut reference_series);
                let reference_report = summarize(&reference_series, options.sentinel).report();

                let result = compare(&series, &reference_series, &report, &reference_report);
                info!(
                    overlap = result.diff_series.len(),
                    reference_rows = reference_series.len(),
                    "Reference comparison attached"
                );
                comparison = Some(result);
            }
            Err(e) => {
                warn!(error = %e, "Reference capture unusable, continuing without comparison");
                reference_error = Some(e.to_string());
            }
        }
    }

    Ok(AnalysisDocument {
        test_result_id: new_test_result_id(),
        header_info: decoded.header,
        series,
        scalar_metrics: report,
        assessment,
        decode_report: decoded.report,
        comparison,
        reference_error,
        ai_assessment: None,
        ai_error: None,
        anomaly_overlay: None,
    })
}

/// Run the full pipeline, including the best-effort AI stage.
///
/// `ai_client` of `None` skips stage 7 entirely; a failing service call
/// records `ai_error` and leaves the rule-based assessment standing.
pub async fn run_analysis(
    test_csv: &str,
    reference_csv: Option<&str>,
    options: &AnalysisOptions,
    ai_client: Option<&AiClient>,
) -> Result<AnalysisDocument, DecodeError> {
    let mut document = analyze_capture(test_csv, reference_csv, options)?;

    if let Some(client) = ai_client {
        let comparison_payload = document.comparison.as_ref().map(|c| AiComparison {
            abnormality_report: &c.abnormality_report,
            metrics: &c.diff_metrics,
        });

        let outcome = client
            .assess(
                &document.test_result_id,
                &document.scalar_metrics,
                comparison_payload,
            )
            .await;

        match outcome {
            Ok(assessment) => {
                info!(
                    overall_score = assessment.overall_score,
                    abnormal_ranges = assessment.abnormal_ranges.len(),
                    "AI assessment attached"
                );
                document.anomaly_overlay = Some(synthesize_overlay(&assessment.abnormal_ranges));
                document.ai_assessment = Some(assessment);
            }
            Err(e) => {
                warn!(error = %e, "AI assessment unavailable, continuing without it");
                document.ai_error = Some(e.to_string());
            }
        }
    }

    Ok(document)
}

/// Identifier for one analysis: millisecond timestamp plus a random
/// suffix to keep concurrent requests distinct.
fn new_test_result_id() -> String {
    format!(
        "dcrm-{}-{:04x}",
        chrono::Utc::now().timestamp_millis(),
        rand::random::<u16>()
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{DATA_START_MARKER, MIN_ROW_FIELDS};

    /// Render a capture with per-row channel values. Each entry of
    /// `rows` is (coil, travel, resistance, current) applied to all six
    /// channels of the respective group.
    fn capture(preamble: &str, rows: &[(f64, f64, f64, f64)]) -> String {
        let mut text = String::from(preamble);
        let mut marker = vec![""; MIN_ROW_FIELDS];
        marker[0] = DATA_START_MARKER;
        text.push_str(&marker.join(","));
        text.push('\n');

        for &(coil, travel, resistance, current) in rows {
            let mut fields = vec![String::from("0"); MIN_ROW_FIELDS];
            for ch in 0..6 {
                fields[ch] = coil.to_string();
                fields[7 + ch] = travel.to_string();
                fields[14 + 2 * ch] = resistance.to_string();
                fields[15 + 2 * ch] = current.to_string();
            }
            text.push_str(&fields.join(","));
            text.push('\n');
        }
        text
    }

    fn healthy_rows(n: usize) -> Vec<(f64, f64, f64, f64)> {
        (0..n).map(|_| (2.0, 120.0, 50.0, 100.0)).collect()
    }

    #[test]
    fn test_healthy_capture_end_to_end() {
        let text = capture("Station,Alpha\n", &healthy_rows(100));
        let document = analyze_capture(&text, None, &AnalysisOptions::default()).unwrap();

        assert_eq!(document.assessment, AssessmentLabel::Healthy);
        assert_eq!(document.series.len(), 100);
        assert_eq!(document.decode_report.rows_decoded, 100);
        assert_eq!(
            document.header_info.get("Station").map(String::as_str),
            Some("Alpha")
        );
        assert_eq!(document.scalar_metrics.travel_t1_max, 120.0);
        // Constant resistance: min == max == 50, and the reported
        // average carries the min.
        assert_eq!(document.scalar_metrics.resistance_ch1_avg, 50.0);
        assert!(document.comparison.is_none());
        assert!(document.reference_error.is_none());
    }

    #[test]
    fn test_missing_marker_is_fatal() {
        let err = analyze_capture("a,b\n1,2,3\n", None, &AnalysisOptions::default()).unwrap_err();
        assert_eq!(err, DecodeError::MissingHeaderMarker);
    }

    #[test]
    fn test_velocity_derived_in_document() {
        // Travel ramps 1 mm per 0.1 ms step from the second row on.
        let rows: Vec<_> = (0..10).map(|i| (2.0, i as f64, 50.0, 100.0)).collect();
        let text = capture("", &rows);
        let document = analyze_capture(&text, None, &AnalysisOptions::default()).unwrap();

        assert_eq!(document.series[0].velocity[0], 0.0);
        assert!((document.series[1].velocity[0] - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_unstable_resistance_is_critical() {
        let rows: Vec<_> = (0..100)
            .map(|i| {
                let r = if i % 2 == 0 { 10.0 } else { 200.0 };
                (2.0, 120.0, r, 100.0)
            })
            .collect();
        let text = capture("", &rows);
        let document = analyze_capture(&text, None, &AnalysisOptions::default()).unwrap();

        assert_eq!(document.assessment, AssessmentLabel::Critical);
    }

    #[test]
    fn test_all_sentinel_resistance_is_healthy() {
        // Open-circuit capture: no valid resistance data anywhere.
        let text = capture("", &vec![(2.0, 120.0, 8000.0, 100.0); 50]);
        let document = analyze_capture(&text, None, &AnalysisOptions::default()).unwrap();

        assert_eq!(document.assessment, AssessmentLabel::Healthy);
        assert_eq!(document.scalar_metrics.resistance_ch1_avg, 0.0);
    }

    #[test]
    fn test_reference_comparison_attached() {
        let test_text = capture("", &vec![(2.0, 120.0, 50.0, 100.0); 50]);
        let reference_text = capture("", &vec![(2.0, 100.0, 45.0, 100.0); 50]);

        let document =
            analyze_capture(&test_text, Some(&reference_text), &AnalysisOptions::default())
                .unwrap();

        let comparison = document.comparison.expect("comparison should attach");
        assert!(document.reference_error.is_none());
        assert_eq!(comparison.diff_series.len(), 50);
        assert_eq!(comparison.diff_metrics.travel_t1_max_diff, 20.0);
        assert_eq!(comparison.diff_metrics.resistance_ch1_avg_diff, 5.0);
        assert_eq!(comparison.diff_series[0].travel_diff[0], 20.0);
    }

    #[test]
    fn test_bad_reference_degrades_not_fails() {
        let test_text = capture("", &healthy_rows(20));
        let document = analyze_capture(
            &test_text,
            Some("this is not a capture"),
            &AnalysisOptions::default(),
        )
        .unwrap();

        assert_eq!(document.assessment, AssessmentLabel::Healthy);
        assert!(document.comparison.is_none());
        let err = document.reference_error.expect("error should be recorded");
        assert!(err.contains("marker"), "got: {err}");
    }

    #[tokio::test]
    async fn test_no_ai_client_skips_stage() {
        let text = capture("", &healthy_rows(20));
        let document = run_analysis(&text, None, &AnalysisOptions::default(), None)
            .await
            .unwrap();

        assert!(document.ai_assessment.is_none());
        assert!(document.ai_error.is_none());
        assert!(document.anomaly_overlay.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_ai_service_degrades() {
        let config = crate::config::AiConfig {
            enabled: true,
            endpoint: "http://127.0.0.1:1/api/v1/diagnose".to_string(),
            model: "glm-4-flash".to_string(),
            timeout_secs: 1,
        };
        let client = AiClient::new(&config);

        let text = capture("", &healthy_rows(20));
        let document = run_analysis(&text, None, &AnalysisOptions::default(), Some(&client))
            .await
            .unwrap();

        assert_eq!(document.assessment, AssessmentLabel::Healthy);
        assert!(document.ai_assessment.is_none());
        assert!(document.ai_error.is_some());
        assert!(document.anomaly_overlay.is_none());
    }

    #[test]
    fn test_document_wire_shape() {
        let text = capture("Station,Alpha\n", &healthy_rows(10));
        let document = analyze_capture(&text, None, &AnalysisOptions::default()).unwrap();
        let json = serde_json::to_value(&document).unwrap();

        assert!(json.get("headerInfo").is_some());
        assert!(json.get("scalarMetrics").is_some());
        assert_eq!(json["assessment"], "HEALTHY");
        assert!(json.get("decodeReport").is_some());
        // Absent optionals are omitted, not null.
        assert!(json.get("comparison").is_none());
        assert!(json.get("aiAssessment").is_none());
    }

    #[test]
    fn test_result_ids_are_distinct() {
        let a = new_test_result_id();
        let b = new_test_result_id();
        assert!(a.starts_with("dcrm-"));
        assert_ne!(a, b);
    }
}
