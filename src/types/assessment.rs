//! Breaker condition assessment label

use serde::{Deserialize, Serialize};

/// Rule-based breaker condition, from best to worst.
///
/// Produced deterministically by the classifier; identical inputs always
/// yield the identical label. Serializes in the historical wire form
/// (`HEALTHY`, `NEEDS_MAINTENANCE`, `CRITICAL`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentLabel {
    /// No rule fired, or no valid resistance data was present at all
    #[default]
    Healthy,
    /// Moderate fluctuation/resistance, or coil-current/travel out of band
    NeedsMaintenance,
    /// High resistance fluctuation or absolute resistance level
    Critical,
}

impl AssessmentLabel {
    /// Display name for reports and dashboards.
    pub fn display_name(&self) -> &'static str {
        match self {
            AssessmentLabel::Healthy => "Healthy",
            AssessmentLabel::NeedsMaintenance => "Needs Maintenance",
            AssessmentLabel::Critical => "Critical",
        }
    }

    /// Short code for logging.
    pub fn short_code(&self) -> &'static str {
        match self {
            AssessmentLabel::Healthy => "OK",
            AssessmentLabel::NeedsMaintenance => "MAINT",
            AssessmentLabel::Critical => "CRIT",
        }
    }

    /// True if the label calls for any maintenance action.
    pub fn needs_action(&self) -> bool {
        !matches!(self, AssessmentLabel::Healthy)
    }
}

impl std::fmt::Display for AssessmentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
