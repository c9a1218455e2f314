//! Shared data structures for DCRM waveform analysis
//!
//! This module defines the core types for the analysis pipeline:
//! - Capture: Sample, HeaderInfo, DecodeReport (decoder outputs)
//! - Metrics: ChannelStats, ScalarMetrics, MetricsReport (summarizer outputs)
//! - Assessment: AssessmentLabel (classifier output)
//! - Comparison: DiffSample, DiffMetrics, ComparisonResult (comparator outputs)
//! - Anomaly: AbnormalRange, AnomalyOverlay (overlay synthesizer I/O)
//! - Thresholds: capture constants and tunable classifier bounds

mod anomaly;
mod assessment;
mod comparison;
mod metrics;
mod sample;
mod thresholds;

pub use anomaly::*;
pub use assessment::*;
pub use comparison::*;
pub use metrics::*;
pub use sample::*;
pub use thresholds::*;
