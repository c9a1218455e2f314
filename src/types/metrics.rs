//! Scalar metrics types: per-channel statistics and the flat wire report

use serde::{Deserialize, Serialize};

use super::CHANNEL_COUNT;

/// Filtered scalar statistics for one channel.
///
/// All reductions exclude the hardware out-of-range sentinel; see the
/// summarizer for the exact filter applied to each statistic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    /// Mean of in-range positive values (0 if none)
    pub average: f64,
    /// Minimum of in-range positive values (0 if none)
    pub min: f64,
    /// Maximum of sub-sentinel values, zero/negative allowed (0 if none)
    pub max: f64,
    /// 95th-percentile value of the in-range positive set (0 if none).
    /// Deliberately not the true maximum, so a single spiked sample
    /// cannot dominate the metric.
    pub robust_max: f64,
    /// Population standard deviation of the 10th-90th percentile slice
    /// of the in-range positive set (0 if the slice is empty)
    pub trimmed_std_dev: f64,
}

/// Full per-capture statistics, one [`ChannelStats`] per channel per group.
///
/// Derived once by the summarizer and immutable thereafter. The classifier
/// reads the resistance robust statistics and the coil-current/travel
/// scalars; everything else feeds the wire report and diff metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScalarMetrics {
    pub coil_current: [ChannelStats; CHANNEL_COUNT],
    pub travel: [ChannelStats; CHANNEL_COUNT],
    pub resistance: [ChannelStats; CHANNEL_COUNT],
    pub current: [ChannelStats; CHANNEL_COUNT],
    pub velocity: [ChannelStats; CHANNEL_COUNT],
}

impl ScalarMetrics {
    /// Flatten into the conventional wire-form record.
    ///
    /// Field names and semantics match the historical persisted shape,
    /// including the `resistanceCHxAvg` fields being populated from the
    /// channel **minimum** rather than the mean.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            resistance_ch1_avg: self.resistance[0].min,
            resistance_ch2_avg: self.resistance[1].min,
            resistance_ch3_avg: self.resistance[2].min,
            resistance_ch4_avg: self.resistance[3].min,
            resistance_ch5_avg: self.resistance[4].min,
            resistance_ch6_avg: self.resistance[5].min,
            travel_t1_max: self.travel[0].max,
            travel_t2_max: self.travel[1].max,
            travel_t3_max: self.travel[2].max,
            travel_t4_max: self.travel[3].max,
            travel_t5_max: self.travel[4].max,
            travel_t6_max: self.travel[5].max,
            current_ch1_max: self.current[0].max,
            current_ch2_max: self.current[1].max,
            current_ch3_max: self.current[2].max,
            current_ch4_max: self.current[3].max,
            current_ch5_max: self.current[4].max,
            current_ch6_max: self.current[5].max,
            coil_current_c1_avg: self.coil_current[0].average,
            coil_current_c2_avg: self.coil_current[1].average,
            coil_current_c3_avg: self.coil_current[2].average,
            coil_current_c4_avg: self.coil_current[3].average,
            coil_current_c5_avg: self.coil_current[4].average,
            coil_current_c6_avg: self.coil_current[5].average,
            velocity_t1_max: self.velocity[0].max,
            velocity_t2_max: self.velocity[1].max,
            velocity_t3_max: self.velocity[2].max,
            velocity_t4_max: self.velocity[3].max,
            velocity_t5_max: self.velocity[4].max,
            velocity_t6_max: self.velocity[5].max,
        }
    }
}

/// Flat per-capture metrics record in the historical wire shape.
///
/// This is what gets persisted downstream, returned to the dashboard as
/// `scalarMetrics`, and sent to the AI diagnostic service as `metrics`.
///
/// Naming note: `resistance_chX_avg` carries the filtered channel
/// **minimum**. The name is a long-standing convention in the stored data
/// and every consumer expects it, so it is preserved verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    #[serde(rename = "resistanceCH1Avg")]
    pub resistance_ch1_avg: f64,
    #[serde(rename = "resistanceCH2Avg")]
    pub resistance_ch2_avg: f64,
    #[serde(rename = "resistanceCH3Avg")]
    pub resistance_ch3_avg: f64,
    #[serde(rename = "resistanceCH4Avg")]
    pub resistance_ch4_avg: f64,
    #[serde(rename = "resistanceCH5Avg")]
    pub resistance_ch5_avg: f64,
    #[serde(rename = "resistanceCH6Avg")]
    pub resistance_ch6_avg: f64,

    pub travel_t1_max: f64,
    pub travel_t2_max: f64,
    pub travel_t3_max: f64,
    pub travel_t4_max: f64,
    pub travel_t5_max: f64,
    pub travel_t6_max: f64,

    #[serde(rename = "currentCH1Max")]
    pub current_ch1_max: f64,
    #[serde(rename = "currentCH2Max")]
    pub current_ch2_max: f64,
    #[serde(rename = "currentCH3Max")]
    pub current_ch3_max: f64,
    #[serde(rename = "currentCH4Max")]
    pub current_ch4_max: f64,
    #[serde(rename = "currentCH5Max")]
    pub current_ch5_max: f64,
    #[serde(rename = "currentCH6Max")]
    pub current_ch6_max: f64,

    pub coil_current_c1_avg: f64,
    pub coil_current_c2_avg: f64,
    pub coil_current_c3_avg: f64,
    pub coil_current_c4_avg: f64,
    pub coil_current_c5_avg: f64,
    pub coil_current_c6_avg: f64,

    pub velocity_t1_max: f64,
    pub velocity_t2_max: f64,
    pub velocity_t3_max: f64,
    pub velocity_t4_max: f64,
    pub velocity_t5_max: f64,
    pub velocity_t6_max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_uses_min_for_resistance_avg() {
        let mut metrics = ScalarMetrics::default();
        metrics.resistance[0] = ChannelStats {
            average: 75.0,
            min: 48.0,
            max: 120.0,
            robust_max: 110.0,
            trimmed_std_dev: 4.0,
        };

        let report = metrics.report();
        // The conventional "average" field carries the minimum.
        assert_eq!(report.resistance_ch1_avg, 48.0);
    }

    #[test]
    fn test_report_wire_names() {
        let report = MetricsReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("resistanceCH1Avg").is_some());
        assert!(json.get("travelT1Max").is_some());
        assert!(json.get("currentCH6Max").is_some());
        assert!(json.get("coilCurrentC1Avg").is_some());
        assert!(json.get("velocityT1Max").is_some());
        // No snake_case leakage
        assert!(json.get("resistance_ch1_avg").is_none());
    }
}
