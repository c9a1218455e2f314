//! Diagnostic service integration
//!
//! The engine can forward a capture's metrics (and reference
//! comparison, when present) to an external AI diagnostic service and
//! attach the returned component-health assessment to the analysis.
//! The exchange is best-effort end to end: transport failures, non-2xx
//! statuses, and malformed response documents all degrade to "no
//! assessment" without failing the analysis.

mod client;
mod parsing;
mod types;

pub use client::*;
pub use parsing::*;
pub use types::*;
