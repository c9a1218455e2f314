//! Anomaly window synthesis
//!
//! The external diagnostic service annotates a capture with abnormal
//! time ranges per category (resistance, current, travel). Chart
//! overlays want fixed-width severity buckets instead of free ranges,
//! so this module rasterizes the ranges onto a 10 ms grid.
//!
//! Bucket starts run from 0 to the timeline bound in 10 ms steps,
//! where the bound is the largest range end (at least 500 ms so short
//! annotation sets still render a full-width strip). A range fills
//! every bucket index in `floor(start/10)..=floor(end/10)`; because
//! the bound is itself a range end, that top index always exists.
//! Overlapping ranges of one category overwrite in input order — last
//! write wins, deliberately, so the service can refine earlier
//! annotations by appending.

use crate::types::{AbnormalRange, AnomalyCategory, AnomalyOverlay};

/// Fixed overlay bucket width (ms)
pub const BUCKET_WIDTH_MS: f64 = 10.0;
/// Minimum timeline the overlay spans (ms)
pub const MIN_TIMELINE_MS: f64 = 500.0;

/// Rasterize abnormal ranges into per-category severity buckets.
///
/// Severities are clamped to `[0, 1]` on the way in; ranges with
/// `end_ms < start_ms` fill nothing.
pub fn synthesize_overlay(ranges: &[AbnormalRange]) -> AnomalyOverlay {
    let bound_ms = ranges
        .iter()
        .map(|r| r.end_ms)
        .fold(MIN_TIMELINE_MS, f64::max);

    let bucket_count = (bound_ms / BUCKET_WIDTH_MS) as usize + 1;

    let mut overlay = AnomalyOverlay {
        bucket_width_ms: BUCKET_WIDTH_MS,
        bucket_start_ms: (0..bucket_count)
            .map(|i| i as f64 * BUCKET_WIDTH_MS)
            .collect(),
        resistance: vec![0.0; bucket_count],
        current: vec![0.0; bucket_count],
        travel: vec![0.0; bucket_count],
    };

    for range in ranges {
        if range.end_ms < range.start_ms || range.end_ms < 0.0 {
            tracing::warn!(
                start_ms = range.start_ms,
                end_ms = range.end_ms,
                category = %range.category,
                "Degenerate abnormal range, skipping"
            );
            continue;
        }

        let severity = range.severity.clamp(0.0, 1.0);
        let first = (range.start_ms.max(0.0) / BUCKET_WIDTH_MS) as usize;
        let last = (range.end_ms.max(0.0) / BUCKET_WIDTH_MS) as usize;

        let buckets = match range.category {
            AnomalyCategory::Resistance => &mut overlay.resistance,
            AnomalyCategory::Current => &mut overlay.current,
            AnomalyCategory::Travel => &mut overlay.travel,
        };

        for bucket in &mut buckets[first..=last.min(bucket_count - 1)] {
            *bucket = severity;
        }
    }

    overlay
}
