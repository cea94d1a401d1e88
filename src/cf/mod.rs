//! Cloud Foundry access through the cf CLI
//!
//! Everything goes through the external `cf` binary: plain subcommands for
//! version, authorization and target, and `cf curl` for the v3 API.

pub mod api;
pub mod config_file;
pub mod models;
pub mod runner;
mod session;
pub mod target;
#[cfg(test)]
pub(crate) mod testing;
pub mod traits;

pub use api::{build_query, CfApi};
pub use models::{
    BindingDetails, LastOperation, OperationState, Organization, ServiceCredentialBinding,
    ServiceInstance, ServicePlan, Space,
};
pub use runner::{command_line, quote_arg, CfCli, CommandOutput, CommandRunner};
pub use session::CfSession;
pub use target::{CliVersion, SpaceInfo, Target};
pub use traits::{AsyncResource, ListResponse};
