//! cfctl - helper commands for developers working against Cloud Foundry
//!
//! Wraps the `cf` CLI: every call goes through the external binary, the v3
//! API is reached with `cf curl`. The target (endpoint, user, org, space) is
//! resolved once per session, and managed services together with their keys
//! are provisioned with bounded polling of their last operation.
//!
//! # Example
//!
//! ```bash
//! # Show what the cf CLI currently targets
//! cfctl cftarget
//!
//! # Same, with org and space GUIDs, as JSON
//! cfctl cfspace -o json
//!
//! # Get or create a postgres instance and print its key's credentials
//! cfctl cfservice postgres small db1
//! ```

pub mod cf;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod provision;
pub mod ui;

pub use cf::{CfApi, CfCli, CfSession, CommandRunner, SpaceInfo, Target};
pub use cli::{Cli, Command, OutputFormat, ServiceArgs};
pub use commands::{execute, run_command};
pub use error::{CfError, Result};
pub use logging::{init_logger, LogPreset};
pub use output::output_record;
pub use provision::{ProvisionOptions, RetryPolicy};
