//! Options Analytics Binary
//!
//! Reads one JSON analysis request and writes the JSON result to stdout.
//!
//! # Usage
//!
//! ```bash
//! options-analytics request.json
//! echo '{"kind": "single", "contract": {...}}' | options-analytics -
//! ```
//!
//! # Environment Variables
//!
//! - `OPTIONS_ANALYTICS_CONFIG`: YAML config path (default: built-in defaults)
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)

use std::io::Read;

use anyhow::{Context, Result};
use chrono::Utc;
use options_analytics::config::{AnalyticsConfig, load_config};
use options_analytics::dto::AnalysisRequestDto;
use options_analytics::telemetry::init_tracing;
use options_analytics::{ErrorPayload, MultiLegCombinator};

fn main() -> Result<()> {
    load_dotenv();

    let config = match std::env::var("OPTIONS_ANALYTICS_CONFIG") {
        Ok(path) if !path.is_empty() => load_config(Some(path.as_str()))
            .with_context(|| format!("loading configuration from {path}"))?,
        _ => AnalyticsConfig::default(),
    };

    init_tracing(&config.observability.logging)
        .map_err(|e| anyhow::anyhow!(e))
        .context("initializing tracing")?;

    let source = std::env::args().nth(1).unwrap_or_else(|| "-".to_string());
    let raw = read_request(&source)?;
    let request: AnalysisRequestDto =
        serde_json::from_str(&raw).context("parsing analysis request")?;

    let combinator = MultiLegCombinator::new(config).context("building analyzer")?;
    match request.execute(&combinator, Utc::now()) {
        Ok(response) => {
            let out = serde_json::to_string_pretty(&response).context("encoding response")?;
            println!("{out}");
            Ok(())
        }
        Err(e) => {
            let payload = ErrorPayload::from(&e);
            tracing::error!(code = %payload.code, "Analysis rejected");
            let out = serde_json::to_string(&payload).context("encoding error")?;
            eprintln!("{out}");
            std::process::exit(1);
        }
    }
}

fn read_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading request from {source}"))
    }
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
