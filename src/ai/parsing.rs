//! Diagnostic response parsing with repair
//!
//! Models wrap JSON in markdown fences and truncate long documents at
//! the token limit, so the raw body goes through two cleanup steps
//! before deserialization: fence stripping, then — only if the first
//! parse fails — a closing-token repair that appends the terminators a
//! truncated document is most likely missing.

use super::types::AiAssessment;

/// Strip markdown code fences from a model response body.
pub fn clean_payload(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Append the closers a truncated assessment document usually lacks.
///
/// If the document breaks off inside a string value (last `"` after the
/// last `}`), close the string and its object too; otherwise just close
/// the trailing array and the root object.
pub fn repair_truncated(json: &str) -> String {
    let last_quote = json.rfind('"').map_or(-1, |i| i as i64);
    let last_brace = json.rfind('}').map_or(-1, |i| i as i64);

    let mut repaired = json.to_string();
    if last_quote > last_brace {
        repaired.push_str("\"}] }");
    } else {
        repaired.push_str("] }");
    }
    repaired
}

/// Parse a raw response body into an [`AiAssessment`].
///
/// Tries the cleaned body first, then the repaired body. On double
/// failure the first parse error is returned; it describes the actual
/// document rather than the repair artifact.
pub fn parse_assessment(raw: &str) -> Result<AiAssessment, serde_json::Error> {
    let cleaned = clean_payload(raw);

    match serde_json::from_str(&cleaned) {
        Ok(assessment) => Ok(assessment),
        Err(first_err) => {
            tracing::warn!(error = %first_err, "Assessment parse failed, attempting repair");
            let repaired = repair_truncated(&cleaned);
            serde_json::from_str(&repaired).map_err(|_| first_err)
        }
    }
}
