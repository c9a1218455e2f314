//! Diagnostic service HTTP client
//!
//! One JSON POST per assessment, carrying the capture's reported
//! metrics and (when a reference was analyzed) the comparison summary.
//! The response body is parsed through the fence-stripping repair path
//! in [`super::parsing`].

use serde::Serialize;
use thiserror::Error;

use crate::config::AiConfig;
use crate::types::{DiffMetrics, MetricsReport};

use super::parsing;
use super::types::AiAssessment;

/// Diagnostic client errors
#[derive(Debug, Error)]
pub enum AiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Diagnostic service returned status {0}")]
    ServerError(reqwest::StatusCode),
    #[error("Assessment document invalid: {0}")]
    Contract(#[from] serde_json::Error),
}

/// Comparison summary forwarded to the service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiComparison<'a> {
    pub abnormality_report: &'a str,
    pub metrics: &'a DiffMetrics,
}

/// Assessment request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest<'a> {
    pub test_result_id: &'a str,
    /// Model identifier from config; the service may use it to select
    /// its backing model and ignores it otherwise
    pub model: &'a str,
    pub metrics: &'a MetricsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<AiComparison<'a>>,
}

/// HTTP client for the diagnostic service
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl AiClient {
    /// Create a client from the `[ai]` config section.
    pub fn new(config: &AiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        }
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request an assessment for one analyzed capture.
    pub async fn assess(
        &self,
        test_result_id: &str,
        metrics: &MetricsReport,
        comparison: Option<AiComparison<'_>>,
    ) -> Result<AiAssessment, AiClientError> {
        let request = AiRequest {
            test_result_id,
            model: &self.model,
            metrics,
            comparison,
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AiClientError::ServerError(status));
        }

        let body = response.text().await?;
        Ok(parsing::parse_assessment(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let metrics = MetricsReport::default();
        let diff = DiffMetrics::default();
        let request = AiRequest {
            test_result_id: "dcrm-1700000000-abcd",
            model: "glm-4-flash",
            metrics: &metrics,
            comparison: Some(AiComparison {
                abnormality_report: "No significant deviations from reference.",
                metrics: &diff,
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["testResultId"], "dcrm-1700000000-abcd");
        assert_eq!(json["model"], "glm-4-flash");
        assert!(json["metrics"].get("resistanceCH1Avg").is_some());
        assert_eq!(
            json["comparison"]["abnormalityReport"],
            "No significant deviations from reference."
        );
        assert!(json["comparison"]["metrics"]
            .get("resistanceCH1AvgDiff")
            .is_some());
    }

    #[test]
    fn test_comparison_omitted_entirely_when_absent() {
        let metrics = MetricsReport::default();
        let request = AiRequest {
            test_result_id: "dcrm-1",
            model: "glm-4-flash",
            metrics: &metrics,
            comparison: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("comparison").is_none());
    }
}
