//! Arguments of the service provisioning command

use std::time::Duration;

use clap::Parser;

use super::common::OutputFormat;
use crate::config::poll;
use crate::provision::{ProvisionOptions, RetryPolicy};

/// Arguments for 'cfservice'
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
        cfctl cfservice postgres small db1\n  \
        cfctl cfservice postgres small db1 --params '{\"version\": \"15\"}' -o json\n  \
        cfctl cfservice redis dev cache --timeout 300")]
pub struct ServiceArgs {
    /// Service offering, e.g. postgres
    pub offering: String,

    /// Plan of the offering
    pub plan: String,

    /// Name of the service instance
    pub name: String,

    /// Broker parameters for the instance (JSON object)
    #[arg(long, value_parser = parse_json_object)]
    pub params: Option<serde_json::Value>,

    /// Broker parameters for the service key (JSON object)
    #[arg(long, value_parser = parse_json_object)]
    pub key_params: Option<serde_json::Value>,

    /// Polls per pass before giving up
    #[arg(long, default_value_t = poll::MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,

    /// Delay between polls in milliseconds
    #[arg(long, default_value_t = poll::DELAY_MS)]
    pub interval_ms: u64,

    /// Give up a poll pass after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl ServiceArgs {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.attempts,
            delay: Duration::from_millis(self.interval_ms),
            deadline: self.timeout.map(Duration::from_secs),
        }
    }

    pub fn provision_options(&self) -> ProvisionOptions {
        ProvisionOptions {
            parameters: self.params.clone(),
            key_parameters: self.key_params.clone(),
        }
    }
}

/// Parse a JSON object given on the command line
pub fn parse_json_object(s: &str) -> std::result::Result<serde_json::Value, String> {
    let value: serde_json::Value =
        serde_json::from_str(s).map_err(|e| format!("invalid JSON: {}", e))?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    Ok(value)
}
