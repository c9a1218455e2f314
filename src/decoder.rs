//! DCRM Capture Decoder
//!
//! Parses raw CSV text exported by DCRM test sets into a typed
//! [`WaveformSeries`]. The format is loosely structured:
//!
//! **Preamble** — a variable number of `key,value,key,value,…` lines
//! carrying test metadata (station, breaker ID, date). Timestamp-like
//! tokens (containing `:`) are never keys.
//!
//! **Marker row** — the header row whose cell `Coil Current C1 (A)`
//! marks the data boundary. Data rows begin on the next line.
//!
//! **Data rows** — ≥26 comma-separated fields in a fixed positional
//! layout (columns 6 and 13 are spacers):
//!
//! | columns           | channel group      |
//! |-------------------|--------------------|
//! | 0-5               | coil current C1-C6 |
//! | 7-12              | travel T1-T6       |
//! | 14,16,18,20,22,24 | resistance CH1-CH6 |
//! | 15,17,19,21,23,25 | current CH1-CH6    |
//!
//! Rows with fewer than 26 fields are skipped, and unparsable or empty
//! fields coerce to 0.0; both degradations are counted in the returned
//! [`DecodeReport`]. Only a missing marker row fails the decode.
//!
//! # Usage
//!
//! ```ignore
//! use dcrm_engine::decoder::decode_capture;
//!
//! let text = std::fs::read_to_string("capture.csv")?;
//! let decoded = decode_capture(&text, 0.1)?;
//! println!("{} samples", decoded.series.len());
//! ```

use thiserror::Error;

use crate::types::{DecodeReport, HeaderInfo, Sample, WaveformSeries, CHANNEL_COUNT};

// ============================================================================
// Format Constants
// ============================================================================

/// Header cell marking the data boundary. The line after the row
/// containing this cell is the first data row.
pub const DATA_START_MARKER: &str = "Coil Current C1 (A)";

/// Minimum fields a data row must have to be accepted.
pub const MIN_ROW_FIELDS: usize = 26;

/// Coil current C1-C6 column indices
const COIL_CURRENT_COLS: [usize; CHANNEL_COUNT] = [0, 1, 2, 3, 4, 5];
/// Contact travel T1-T6 column indices (column 6 is a spacer)
const TRAVEL_COLS: [usize; CHANNEL_COUNT] = [7, 8, 9, 10, 11, 12];
/// Resistance CH1-CH6 column indices (interleaved with current, column 13 is a spacer)
const RESISTANCE_COLS: [usize; CHANNEL_COUNT] = [14, 16, 18, 20, 22, 24];
/// Current CH1-CH6 column indices
const CURRENT_COLS: [usize; CHANNEL_COUNT] = [15, 17, 19, 21, 23, 25];

/// Cap on per-row warn logs so a corrupt file cannot flood the log.
const MAX_ROW_WARNINGS: usize = 10;

// ============================================================================
// Errors
// ============================================================================

/// Fatal decode failures. Everything else recovers with counters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The data-start marker row is absent; the input is not a DCRM
    /// capture and no partial series is returned.
    #[error("data-start marker \"{DATA_START_MARKER}\" not found in capture")]
    MissingHeaderMarker,
}

// ============================================================================
// Decoded Capture
// ============================================================================

/// Fully decoded capture: preamble metadata, sample series, and decode
/// counters.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCapture {
    /// Key/value metadata from the preamble
    pub header: HeaderInfo,
    /// Decoded samples in chronological order
    pub series: WaveformSeries,
    /// Skip/coercion counters for this decode
    pub report: DecodeReport,
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode raw CSV text into a [`DecodedCapture`].
///
/// `sample_interval_ms` is the time step assigned to consecutive accepted
/// rows (0.1 ms at the nominal 10 kHz sampling rate). Time is assigned
/// from the accepted-row index, so the returned series is dense:
/// `series[i].time_ms == i * sample_interval_ms` regardless of skips.
pub fn decode_capture(text: &str, sample_interval_ms: f64) -> Result<DecodedCapture, DecodeError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let marker_idx = lines
        .iter()
        .position(|line| is_marker_row(line))
        .ok_or(DecodeError::MissingHeaderMarker)?;

    let header = parse_preamble(&lines[..marker_idx]);

    let mut series: WaveformSeries = Vec::with_capacity(lines.len().saturating_sub(marker_idx + 1));
    let mut skipped_rows = 0usize;
    let mut coerced_fields = 0usize;

    for (row_num, line) in lines[marker_idx + 1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < MIN_ROW_FIELDS {
            if skipped_rows < MAX_ROW_WARNINGS {
                tracing::warn!(
                    row = row_num,
                    fields = fields.len(),
                    "Data row below minimum field count, skipping"
                );
            }
            skipped_rows += 1;
            continue;
        }

        let time_ms = series.len() as f64 * sample_interval_ms;
        series.push(parse_row(&fields, time_ms, &mut coerced_fields));
    }

    let report = DecodeReport {
        rows_decoded: series.len(),
        skipped_rows,
        coerced_fields,
    };

    tracing::info!(
        rows = report.rows_decoded,
        skipped = report.skipped_rows,
        coerced = report.coerced_fields,
        header_keys = header.len(),
        "Capture decoded"
    );

    Ok(DecodedCapture {
        header,
        series,
        report,
    })
}

/// True if any trimmed cell of the line equals the data-start marker.
fn is_marker_row(line: &str) -> bool {
    line.split(',').any(|cell| cell.trim() == DATA_START_MARKER)
}

/// Harvest key/value pairs from the preamble lines.
///
/// Tokens are trimmed and empties dropped before pairing; a pair is
/// stored unless its key contains `:` (timestamp tokens are not keys).
fn parse_preamble(lines: &[&str]) -> HeaderInfo {
    let mut header = HeaderInfo::new();

    for line in lines {
        let parts: Vec<&str> = line
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() < 2 {
            continue;
        }

        for pair in parts.chunks(2) {
            if let [key, value] = pair {
                if !key.contains(':') {
                    header.insert((*key).to_string(), (*value).to_string());
                }
            }
        }
    }

    header
}

/// Parse one accepted data row into a [`Sample`] at the given time.
fn parse_row(fields: &[&str], time_ms: f64, coerced_fields: &mut usize) -> Sample {
    let mut sample = Sample::at_time(time_ms);

    for ch in 0..CHANNEL_COUNT {
        sample.coil_current[ch] = field_f64(fields, COIL_CURRENT_COLS[ch], coerced_fields);
        sample.travel[ch] = field_f64(fields, TRAVEL_COLS[ch], coerced_fields);
        sample.resistance[ch] = field_f64(fields, RESISTANCE_COLS[ch], coerced_fields);
        sample.current[ch] = field_f64(fields, CURRENT_COLS[ch], coerced_fields);
    }

    sample
}

/// Soft-fail numeric field parse: empty, unparsable, or non-finite
/// fields become 0.0 and bump the coercion counter.
///
/// `"NaN".parse::<f64>()` succeeds in Rust, so finiteness is checked
/// explicitly to keep NaN and infinity out of the series.
fn field_f64(fields: &[&str], idx: usize, coerced_fields: &mut usize) -> f64 {
    let raw = fields.get(idx).map_or("", |s| s.trim());

    if raw.is_empty() {
        *coerced_fields += 1;
        return 0.0;
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            *coerced_fields += 1;
            0.0
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
