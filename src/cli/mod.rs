//! CLI argument parsing

mod common;
mod service;

use clap::{Parser, Subcommand};

pub use common::{OutputArgs, OutputFormat};
pub use service::{parse_json_object, ServiceArgs};

use crate::config::{cf, defaults, logging};

/// cfctl - helper commands for Cloud Foundry developers
#[derive(Parser, Debug)]
#[command(name = "cfctl")]
#[command(version)]
#[command(about = "Helper commands for developers working against Cloud Foundry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = defaults::LOG_LEVEL)]
    pub log_level: String,

    /// Logger preset (development, production)
    #[arg(long, global = true, env = logging::ENV_VAR, default_value = "development")]
    pub env: String,

    /// Path or name of the cf executable
    #[arg(long, global = true, env = cf::BINARY_ENV_VAR, default_value = cf::BINARY)]
    pub cf_bin: String,

    /// Do not show progress spinners
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log a message at several levels and greet
    Hello {
        /// Message to greet with
        message: String,
    },

    /// Show the version of the installed cf CLI
    Cfversion,

    /// Print the current OAuth token
    Cfoauth,

    /// Show API endpoint, user, org and space currently targeted
    Cftarget(OutputArgs),

    /// Show the targeted space together with its org and space GUIDs
    Cfspace(OutputArgs),

    /// Get or create a managed service and its key, then print the credentials
    Cfservice(ServiceArgs),
}
