//! Series summarization
//!
//! Reduces a decoded (and velocity-derived) series to one
//! [`ChannelStats`] per channel per group. Metrics are computed once
//! per capture and treated as immutable afterwards; the classifier and
//! comparator both read from the same [`ScalarMetrics`] value.

use crate::processing::statistics::{
    channel_average, channel_max, channel_min, robust_max, trimmed_std_dev,
};
use crate::types::{ChannelStats, Sample, ScalarMetrics, CHANNEL_COUNT};

/// Reduce a series to scalar metrics for all five channel groups.
///
/// `sentinel` is the hardware invalid-reading marker (8000 nominal);
/// every reduction filters against it as described in
/// [`crate::processing::statistics`].
pub fn summarize(series: &[Sample], sentinel: f64) -> ScalarMetrics {
    ScalarMetrics {
        coil_current: group_stats(series, |s| &s.coil_current, sentinel),
        travel: group_stats(series, |s| &s.travel, sentinel),
        resistance: group_stats(series, |s| &s.resistance, sentinel),
        current: group_stats(series, |s| &s.current, sentinel),
        velocity: group_stats(series, |s| &s.velocity, sentinel),
    }
}

/// All five reductions for one channel's raw values.
pub fn channel_stats(values: &[f64], sentinel: f64) -> ChannelStats {
    ChannelStats {
        average: channel_average(values, sentinel),
        min: channel_min(values, sentinel),
        max: channel_max(values, sentinel),
        robust_max: robust_max(values, sentinel),
        trimmed_std_dev: trimmed_std_dev(values, sentinel),
    }
}

fn group_stats(
    series: &[Sample],
    field: fn(&Sample) -> &[f64; CHANNEL_COUNT],
    sentinel: f64,
) -> [ChannelStats; CHANNEL_COUNT] {
    let mut stats = [ChannelStats::default(); CHANNEL_COUNT];
    for (ch, slot) in stats.iter_mut().enumerate() {
        let values: Vec<f64> = series.iter().map(|s| field(s)[ch]).collect();
        *slot = channel_stats(&values, sentinel);
    }
    stats
}
