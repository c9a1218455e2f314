//! Assessment document returned by the diagnostic service
//!
//! The service speaks camelCase JSON with two deliberate exceptions
//! kept for compatibility with stored assessments: `abnormal_ranges`
//! and the snake_case fields inside each range. Closed string unions
//! are modeled as enums and validated during deserialization; unknown
//! extra fields are ignored.

use serde::{Deserialize, Serialize};

use crate::types::AbnormalRange;

/// Component-level health judgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentStatus {
    Healthy,
    #[serde(rename = "Observation Required")]
    ObservationRequired,
    Critical,
}

impl ComponentStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentStatus::Healthy => "Healthy",
            ComponentStatus::ObservationRequired => "Observation Required",
            ComponentStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Technical-parameter judgment (narrower scale than [`ComponentStatus`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterStatus {
    Healthy,
    Warning,
    Critical,
}

/// Recommended maintenance timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceSchedule {
    Immediate,
    #[serde(rename = "Next Outage")]
    NextOutage,
    Routine,
    #[serde(rename = "Condition Based")]
    ConditionBased,
}

/// Maintenance priority ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenancePriority {
    Critical,
    High,
    Medium,
    Low,
}

/// Score, status, and free-text reasoning for one breaker subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentScore {
    /// 0-100 health score
    pub score: f64,
    pub status: ComponentStatus,
    #[serde(default)]
    pub reasoning: String,
}

/// One measured technical parameter with unit and judgment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalParameter {
    pub value: f64,
    pub unit: String,
    pub status: ParameterStatus,
}

/// The four headline technical parameters of a DCRM assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalParameters {
    pub main_contact_resistance: TechnicalParameter,
    pub arcing_contact_resistance: TechnicalParameter,
    pub travel_overlap: TechnicalParameter,
    pub integrated_wear: TechnicalParameter,
}

/// Full assessment document.
///
/// The three component blocks, the technical parameters, and the
/// overall score are required; everything else tolerates absence so a
/// terse model response still produces a usable assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    pub arc_contacts: ComponentScore,
    pub main_contacts: ComponentScore,
    pub operating_mechanism: ComponentScore,
    pub technical_parameters: TechnicalParameters,
    /// 0-100 overall health score
    pub overall_score: f64,
    #[serde(default)]
    pub maintenance_recommendation: String,
    pub maintenance_schedule: Option<MaintenanceSchedule>,
    pub maintenance_priority: Option<MaintenancePriority>,
    pub critical_alert: Option<String>,
    pub difference_analysis: Option<String>,
    /// Abnormal time ranges feeding the chart overlay synthesis;
    /// absent or empty when the service found nothing to flag
    #[serde(rename = "abnormal_ranges", default)]
    pub abnormal_ranges: Vec<AbnormalRange>,
}
