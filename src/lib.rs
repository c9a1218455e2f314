//! DCRM Engine: Circuit-Breaker Contact Diagnostics
//!
//! Analysis engine for Dynamic Contact Resistance Measurement captures
//! recorded during breaker operating cycles.
//!
//! ## Architecture
//!
//! - **Decoder**: Positional CSV decode of six-channel test-set captures
//! - **Processing**: Velocity derivation, robust statistics, rule-based
//!   classification, reference comparison, anomaly overlays
//! - **Pipeline**: Per-request orchestration producing one analysis document
//! - **AI Module**: Best-effort client for the external diagnostic service
//! - **API**: Axum HTTP surface (capture upload, overlay re-bucketing)

pub mod ai;
pub mod api;
pub mod config;
pub mod decoder;
pub mod pipeline;
pub mod processing;
pub mod types;

// Re-export engine configuration
pub use config::EngineConfig;

// Re-export the pipeline surface
pub use pipeline::{analyze_capture, run_analysis, AnalysisDocument, AnalysisOptions};

// Re-export commonly used types
pub use types::{
    AbnormalRange, AnomalyCategory, AnomalyOverlay, AssessmentLabel, ChannelStats,
    ClassifierThresholds, ComparisonResult, DecodeReport, DiffMetrics, DiffSample, HeaderInfo,
    MetricsReport, Sample, ScalarMetrics, WaveformSeries, CHANNEL_COUNT,
};

// Re-export decoder entry points
pub use decoder::{decode_capture, DecodeError, DecodedCapture};

// Re-export AI client components
pub use ai::{AiAssessment, AiClient, AiClientError};
