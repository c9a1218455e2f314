//! DCRM Engine - Circuit-Breaker Contact Diagnostics
//!
//! Analysis service for Dynamic Contact Resistance Measurement captures.
//!
//! # Usage
//!
//! ```bash
//! # Start the HTTP API (bind address from config, --addr to override)
//! ./dcrm-engine serve
//!
//! # One-shot offline analysis with a reference capture
//! ./dcrm-engine analyze test.csv --reference baseline.csv
//!
//! # Full JSON document including the AI assessment
//! ./dcrm-engine analyze test.csv --ai --json
//! ```
//!
//! # Environment Variables
//!
//! - `DCRM_CONFIG`: Path to the engine config TOML (default: ./dcrm_config.toml)
//! - `DCRM_SERVER_ADDR`: HTTP bind address override
//! - `DCRM_CORS_ORIGINS`: Comma-separated CORS origins for development
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use dcrm_engine::ai::AiClient;
use dcrm_engine::api::{create_app, ApiState};
use dcrm_engine::config::{self, EngineConfig};
use dcrm_engine::pipeline::{run_analysis, AnalysisDocument, AnalysisOptions};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "dcrm-engine")]
#[command(about = "DCRM Circuit-Breaker Contact Diagnostics Engine")]
#[command(version)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server
    Serve {
        /// Override the server address (default from config, e.g. "0.0.0.0:8080")
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Analyze a capture file offline and print the result
    Analyze {
        /// Path to the test capture CSV
        test: PathBuf,

        /// Reference capture CSV to compare against
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Request an assessment from the configured AI diagnostic service
        #[arg(long)]
        ai: bool,

        /// Print the full JSON analysis document instead of the summary
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Serve Mode
// ============================================================================

async fn run_serve(addr_override: Option<String>) -> Result<()> {
    let config = config::get();
    let addr = addr_override
        .or_else(|| std::env::var("DCRM_SERVER_ADDR").ok())
        .unwrap_or_else(|| config.server.addr.clone());

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  DCRM Engine - Circuit-Breaker Contact Diagnostics");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");
    if config.ai.enabled {
        info!("🧠 AI diagnostics: enabled ({})", config.ai.endpoint);
    } else {
        info!("🧠 AI diagnostics: disabled (rule-based assessment only)");
    }
    info!("");

    let state = ApiState::from_config(config);
    let app = create_app(state);

    info!("🌐 Starting HTTP server on {}...", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("✓ HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("🛑 Received Ctrl+C, initiating shutdown...");
        })
        .await
        .context("HTTP server error")?;

    info!("");
    info!("✓ DCRM Engine shutdown complete");
    Ok(())
}

// ============================================================================
// Analyze Mode
// ============================================================================

async fn run_analyze(
    test: PathBuf,
    reference: Option<PathBuf>,
    ai: bool,
    json: bool,
) -> Result<()> {
    let config = config::get();
    let options = AnalysisOptions::from_config(config);

    let test_csv = std::fs::read_to_string(&test)
        .with_context(|| format!("Failed to read {}", test.display()))?;
    let reference_csv = match &reference {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let ai_client = ai.then(|| AiClient::new(&config.ai));
    let document = run_analysis(
        &test_csv,
        reference_csv.as_deref(),
        &options,
        ai_client.as_ref(),
    )
    .await
    .with_context(|| format!("Failed to analyze {}", test.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print_summary(&document);
    }

    Ok(())
}

/// Human-readable console summary of one analysis document.
fn print_summary(document: &AnalysisDocument) {
    let m = &document.scalar_metrics;

    println!();
    println!("  Test result: {}", document.test_result_id);
    for (key, value) in &document.header_info {
        println!("    {key}: {value}");
    }
    println!();
    println!("  Assessment:  {}", document.assessment);
    println!(
        "  Samples:     {} ({} rows skipped, {} fields coerced)",
        document.decode_report.rows_decoded,
        document.decode_report.skipped_rows,
        document.decode_report.coerced_fields
    );
    println!();
    println!("  Channel            CH1        CH2        CH3");
    println!(
        "  Resistance (µΩ)    {:<10.2} {:<10.2} {:<10.2}",
        m.resistance_ch1_avg, m.resistance_ch2_avg, m.resistance_ch3_avg
    );
    println!(
        "  Travel max (mm)    {:<10.2} {:<10.2} {:<10.2}",
        m.travel_t1_max, m.travel_t2_max, m.travel_t3_max
    );
    println!(
        "  Current max (A)    {:<10.2} {:<10.2} {:<10.2}",
        m.current_ch1_max, m.current_ch2_max, m.current_ch3_max
    );
    println!(
        "  Coil avg (A)       {:<10.2} {:<10.2} {:<10.2}",
        m.coil_current_c1_avg, m.coil_current_c2_avg, m.coil_current_c3_avg
    );
    println!(
        "  Velocity max (mm/s){:<10.2} {:<10.2} {:<10.2}",
        m.velocity_t1_max, m.velocity_t2_max, m.velocity_t3_max
    );

    if let Some(comparison) = &document.comparison {
        println!();
        println!("  Reference comparison:");
        for line in comparison.abnormality_report.lines() {
            println!("    {line}");
        }
    }
    if let Some(err) = &document.reference_error {
        println!();
        println!("  Reference capture unusable: {err}");
    }

    if let Some(assessment) = &document.ai_assessment {
        println!();
        println!("  AI assessment:");
        println!("    Overall score:       {:.0}/100", assessment.overall_score);
        println!(
            "    Arc contacts:        {:.0} ({})",
            assessment.arc_contacts.score, assessment.arc_contacts.status
        );
        println!(
            "    Main contacts:       {:.0} ({})",
            assessment.main_contacts.score, assessment.main_contacts.status
        );
        println!(
            "    Operating mechanism: {:.0} ({})",
            assessment.operating_mechanism.score, assessment.operating_mechanism.status
        );
        if !assessment.maintenance_recommendation.is_empty() {
            println!(
                "    Recommendation:      {}",
                assessment.maintenance_recommendation
            );
        }
        if let Some(alert) = &assessment.critical_alert {
            println!("    CRITICAL ALERT:      {alert}");
        }
    }
    if let Some(err) = &document.ai_error {
        println!();
        println!("  AI assessment unavailable: {err}");
    }

    println!();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    config::init(EngineConfig::load());

    match args.command {
        Command::Serve { addr } => run_serve(addr).await,
        Command::Analyze {
            test,
            reference,
            ai,
            json,
        } => run_analyze(test, reference, ai, json).await,
    }
}
