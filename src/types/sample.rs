//! Decoded capture types: Sample, WaveformSeries, HeaderInfo, DecodeReport

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of channels in each measurement group.
///
/// DCRM test sets record six parallel channels per quantity; a breaker
/// under test occupies one or more of them depending on interrupter count.
pub const CHANNEL_COUNT: usize = 6;

/// Key/value pairs harvested from the capture preamble
/// (station name, breaker ID, test date, operator, …).
pub type HeaderInfo = BTreeMap<String, String>;

/// One decoded time step across all channel groups.
///
/// The four raw groups come straight off the test set; `velocity` is
/// derived from `travel` by finite differencing after decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Time since data start (ms). Fixed 0.1 ms step at the nominal
    /// 10 kHz sampling rate.
    pub time_ms: f64,
    /// Trip/close coil current C1-C6 (A)
    pub coil_current: [f64; CHANNEL_COUNT],
    /// Contact travel T1-T6 (mm)
    pub travel: [f64; CHANNEL_COUNT],
    /// Dynamic contact resistance CH1-CH6 (µΩ)
    pub resistance: [f64; CHANNEL_COUNT],
    /// Injected measurement current CH1-CH6 (A)
    pub current: [f64; CHANNEL_COUNT],
    /// Contact velocity T1-T6 (mm/s), derived from travel
    #[serde(default)]
    pub velocity: [f64; CHANNEL_COUNT],
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            time_ms: 0.0,
            coil_current: [0.0; CHANNEL_COUNT],
            travel: [0.0; CHANNEL_COUNT],
            resistance: [0.0; CHANNEL_COUNT],
            current: [0.0; CHANNEL_COUNT],
            velocity: [0.0; CHANNEL_COUNT],
        }
    }
}

impl Sample {
    /// Create a sample at the given time with all channels zeroed.
    pub fn at_time(time_ms: f64) -> Self {
        Self {
            time_ms,
            ..Self::default()
        }
    }
}

/// Chronologically ordered decoded capture.
///
/// Owned by a single analysis request; after the derive stage the only
/// further additions are the optional companion diff samples.
pub type WaveformSeries = Vec<Sample>;

/// Counters describing how a decode went.
///
/// A clean decode has zero skips and zero coercions; anything else is a
/// recovered degradation that callers can log or surface, distinct from
/// a healthy result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DecodeReport {
    /// Data rows accepted into the series
    pub rows_decoded: usize,
    /// Data rows dropped for having fewer than the required field count
    pub skipped_rows: usize,
    /// Fields that were empty or unparsable and became 0.0
    pub coerced_fields: usize,
}

impl DecodeReport {
    /// True when every row parsed without skips or field coercions.
    pub fn is_clean(&self) -> bool {
        self.skipped_rows == 0 && self.coerced_fields == 0
    }
}
