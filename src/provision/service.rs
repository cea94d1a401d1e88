//! Get-or-create for managed service instances

use log::info;

use crate::cf::{CfSession, ServiceInstance, ServicePlan};
use crate::config::api;
use crate::error::{CfError, Result};

impl CfSession {
    /// Poll the service instance named `name` in the targeted space
    ///
    /// `None` when no such instance exists.
    pub async fn get_service(&self, name: &str) -> Result<Option<ServiceInstance>> {
        info!("Getting service '{}'", name);
        let space = self.resolve_space_info().await?;
        self.poll_until_terminal(
            api::SERVICE_INSTANCES,
            &[
                ("names", name),
                ("space_guids", space.space_guid.as_str()),
                ("organization_guids", space.org_guid.as_str()),
            ],
            name,
        )
        .await
    }

    /// Find the plan `plan` of `offering` available in the targeted space
    pub async fn find_service_plan(&self, offering: &str, plan: &str) -> Result<ServicePlan> {
        let space = self.resolve_space_info().await?;
        let plans: Vec<ServicePlan> = self
            .api()
            .list(
                api::SERVICE_PLANS,
                &[
                    ("names", plan),
                    ("space_guids", space.space_guid.as_str()),
                    ("organization_guids", space.org_guid.as_str()),
                    ("service_offering_names", offering),
                ],
            )
            .await?;
        plans.into_iter().next().ok_or_else(|| {
            CfError::NotFound(format!(
                "No service plans found for offering '{}' and plan '{}'",
                offering, plan
            ))
        })
    }

    /// Return the existing instance `name`, or create it and wait until it
    /// has succeeded
    pub async fn get_or_create_service(
        &self,
        offering: &str,
        plan: &str,
        name: &str,
        parameters: Option<&serde_json::Value>,
    ) -> Result<ServiceInstance> {
        if let Some(instance) = self.get_service(name).await? {
            return Ok(instance);
        }

        info!("Creating service '{}' - please be patient...", name);
        let space = self.resolve_space_info().await?;
        let service_plan = self.find_service_plan(offering, plan).await?;

        let body = service_instance_body(
            offering,
            name,
            &space.space_guid,
            &service_plan.guid,
            parameters,
        );
        self.api()
            .request(api::SERVICE_INSTANCES, None, Some(&body))
            .await?;

        self.get_service(name)
            .await?
            .ok_or_else(|| CfError::NotFound(format!("Could not create service '{}'", name)))
    }
}

/// Creation body for a managed service instance
pub fn service_instance_body(
    offering: &str,
    name: &str,
    space_guid: &str,
    plan_guid: &str,
    parameters: Option<&serde_json::Value>,
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "type": "managed",
        "name": name,
        "tags": [offering],
        "relationships": {
            "space": {"data": {"guid": space_guid}},
            "service_plan": {"data": {"guid": plan_guid}}
        }
    });
    if let Some(parameters) = parameters {
        body["parameters"] = parameters.clone();
    }
    body
}
