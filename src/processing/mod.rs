//! Waveform processing - derivation, summarization, classification, comparison
//!
//! Every function in this module tree is pure: series and thresholds go
//! in, values come out. Configuration is resolved by the caller (the
//! analysis pipeline) so the math stays independently testable.

mod anomaly;
mod classifier;
mod comparator;
mod statistics;
mod summarizer;
mod velocity;

pub use anomaly::*;
pub use classifier::*;
pub use comparator::*;
pub use statistics::{
    channel_average, channel_max, channel_min, population_std_dev, robust_max, trimmed_std_dev,
    valid_sorted,
};
pub use summarizer::*;
pub use velocity::*;
