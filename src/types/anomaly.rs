//! Anomaly annotation types: abnormal ranges in, severity overlay out

use serde::{Deserialize, Serialize};

/// Channel group an abnormal range applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyCategory {
    Resistance,
    Current,
    Travel,
}

impl AnomalyCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnomalyCategory::Resistance => "resistance",
            AnomalyCategory::Current => "current",
            AnomalyCategory::Travel => "travel",
        }
    }
}

impl std::fmt::Display for AnomalyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One abnormal time range flagged by the external diagnostic classifier.
///
/// Wire names are those emitted by the diagnostic service (`start_ms`,
/// `end_ms`, `type`, `severity`, `description`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbnormalRange {
    pub start_ms: f64,
    pub end_ms: f64,
    #[serde(rename = "type")]
    pub category: AnomalyCategory,
    /// Severity in [0, 1]
    pub severity: f64,
    #[serde(default)]
    pub description: String,
}

/// Fixed-width severity buckets for chart overlays.
///
/// One severity slot per bucket per category, 0.0 where nothing was
/// flagged. Arrays share the same length as `bucket_start_ms`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyOverlay {
    /// Bucket width (ms)
    pub bucket_width_ms: f64,
    /// Start time of each bucket (ms)
    pub bucket_start_ms: Vec<f64>,
    /// Per-bucket severity for resistance anomalies
    pub resistance: Vec<f64>,
    /// Per-bucket severity for current anomalies
    pub current: Vec<f64>,
    /// Per-bucket severity for travel anomalies
    pub travel: Vec<f64>,
}

impl AnomalyOverlay {
    /// Number of buckets in the overlay.
    pub fn bucket_count(&self) -> usize {
        self.bucket_start_ms.len()
    }
}
