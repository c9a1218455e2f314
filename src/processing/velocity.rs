//! Contact velocity derivation
//!
//! Velocity is not captured by the test set; it is finite-differenced
//! from the travel transducer channels after decode. At the nominal
//! 0.1 ms step a 0.05 mm travel delta reads as 500 mm/s, so the signal
//! is noisy by construction and downstream consumers apply the robust
//! reductions rather than trusting single samples.

use crate::types::{Sample, CHANNEL_COUNT};

/// Backward-difference each travel channel into its velocity channel,
/// in mm/s.
///
/// `velocity[0]` is pinned to 0 for every channel. For `i > 0`,
/// `velocity[i] = (travel[i] - travel[i-1]) / dt` with `dt` in seconds.
/// A non-positive time delta leaves that sample's velocity at its
/// decoded default instead of dividing.
pub fn derive_velocity(series: &mut [Sample]) {
    if let Some(first) = series.first_mut() {
        first.velocity = [0.0; CHANNEL_COUNT];
    }

    for i in 1..series.len() {
        // [f64; 6] is Copy, so lift the previous row's fields out
        // before borrowing the current row mutably.
        let prev_travel = series[i - 1].travel;
        let prev_time_ms = series[i - 1].time_ms;

        let sample = &mut series[i];
        let dt_s = (sample.time_ms - prev_time_ms) / 1000.0;
        if dt_s <= 0.0 {
            continue;
        }

        for ch in 0..CHANNEL_COUNT {
            sample.velocity[ch] = (sample.travel[ch] - prev_travel[ch]) / dt_s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_at(time_ms: f64, travel: [f64; 6]) -> Sample {
        Sample {
            travel,
            ..Sample::at_time(time_ms)
        }
    }

    #[test]
    fn test_empty_and_single_sample() {
        let mut empty: Vec<Sample> = vec![];
        derive_velocity(&mut empty);

        let mut single = vec![sample_at(0.0, [10.0; 6])];
        derive_velocity(&mut single);
        assert_eq!(single[0].velocity, [0.0; 6]);
    }

    #[test]
    fn test_first_sample_pinned_to_zero() {
        let mut series = vec![sample_at(0.0, [0.0; 6]), sample_at(0.1, [1.0; 6])];
        series[0].velocity = [99.0; 6];
        derive_velocity(&mut series);
        assert_eq!(series[0].velocity, [0.0; 6]);
    }

    #[test]
    fn test_constant_ramp() {
        // 0.05 mm per 0.1 ms step is 500 mm/s.
        let mut series: Vec<Sample> = (0..5)
            .map(|i| sample_at(i as f64 * 0.1, [i as f64 * 0.05; 6]))
            .collect();
        derive_velocity(&mut series);

        for sample in &series[1..] {
            for ch in 0..CHANNEL_COUNT {
                assert!(
                    (sample.velocity[ch] - 500.0).abs() < 1e-6,
                    "channel {ch} at {} ms: {}",
                    sample.time_ms,
                    sample.velocity[ch]
                );
            }
        }
    }

    #[test]
    fn test_channels_differenced_independently() {
        let mut series = vec![
            sample_at(0.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            sample_at(0.1, [0.1, 0.2, 0.0, -0.1, 1.0, 0.05]),
        ];
        derive_velocity(&mut series);

        let v = series[1].velocity;
        assert!((v[0] - 1000.0).abs() < 1e-6);
        assert!((v[1] - 2000.0).abs() < 1e-6);
        assert_eq!(v[2], 0.0);
        assert!((v[3] + 1000.0).abs() < 1e-6);
        assert!((v[4] - 10000.0).abs() < 1e-6);
        assert!((v[5] - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_positive_dt_leaves_default() {
        let mut series = vec![
            sample_at(0.1, [0.0; 6]),
            sample_at(0.1, [5.0; 6]),
            sample_at(0.0, [9.0; 6]),
            sample_at(0.2, [9.1; 6]),
        ];
        derive_velocity(&mut series);

        assert_eq!(series[1].velocity, [0.0; 6], "zero dt must not divide");
        assert_eq!(series[2].velocity, [0.0; 6], "negative dt must not divide");
        // Recovery once time moves forward again: dt = 0.2 ms.
        assert!((series[3].velocity[0] - 500.0).abs() < 1e-6);
    }
}
