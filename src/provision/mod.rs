//! Service provisioning
//!
//! Get-or-create for service instances and their keys, both provisioned
//! asynchronously by the control plane and observed through bounded polling.

mod keys;
mod policy;
mod poller;
mod service;

use log::info;

pub use keys::service_key_body;
pub use policy::{PollState, RetryPolicy};
pub use service::service_instance_body;

use crate::cf::CfSession;
use crate::config::poll;
use crate::error::Result;

/// Optional parameters passed to the service broker
#[derive(Debug, Clone, Default)]
pub struct ProvisionOptions {
    /// Parameters for creating the instance
    pub parameters: Option<serde_json::Value>,
    /// Parameters for creating the service key
    pub key_parameters: Option<serde_json::Value>,
}

/// Name of the key provisioned for an instance
pub fn service_key_name(instance_name: &str) -> String {
    format!("{}{}", instance_name, poll::KEY_SUFFIX)
}

impl CfSession {
    /// Make sure the instance and its key exist and return the key's credentials
    pub async fn get_or_provision_service(
        &self,
        offering: &str,
        plan: &str,
        name: &str,
        options: &ProvisionOptions,
    ) -> Result<serde_json::Value> {
        let instance = self
            .get_or_create_service(offering, plan, name, options.parameters.as_ref())
            .await?;
        info!("Service '{}' is ready ({})", instance.name, instance.guid);

        let key_name = service_key_name(&instance.name);
        self.get_or_create_service_key(&instance, &key_name, options.key_parameters.as_ref())
            .await
    }
}
