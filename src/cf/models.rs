//! Typed Cloud Controller v3 responses

use serde::{Deserialize, Serialize};

use super::traits::AsyncResource;

/// Asynchronous operation state reported in `last_operation.state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationState {
    Initial,
    InProgress,
    Succeeded,
    Failed,
    /// Anything the control plane sends that we do not know
    Unknown(String),
}

impl From<String> for OperationState {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "initial" => OperationState::Initial,
            "in progress" | "in_progress" => OperationState::InProgress,
            "succeeded" => OperationState::Succeeded,
            "failed" => OperationState::Failed,
            _ => OperationState::Unknown(raw),
        }
    }
}

impl From<OperationState> for String {
    fn from(state: OperationState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for OperationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationState::Initial => write!(f, "initial"),
            OperationState::InProgress => write!(f, "in progress"),
            OperationState::Succeeded => write!(f, "succeeded"),
            OperationState::Failed => write!(f, "failed"),
            OperationState::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// `last_operation` block of an asynchronous resource
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LastOperation {
    pub state: OperationState,
    #[serde(rename = "type", default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Organization from `/v3/organizations`
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub guid: String,
    pub name: String,
}

/// Space from `/v3/spaces`
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub guid: String,
    pub name: String,
}

/// Service plan from `/v3/service_plans`
#[derive(Debug, Clone, Deserialize)]
pub struct ServicePlan {
    pub guid: String,
    pub name: String,
}

/// Service instance from `/v3/service_instances`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceInstance {
    pub guid: String,
    pub name: String,
    pub last_operation: LastOperation,
}

/// Service credential binding ("service key")
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceCredentialBinding {
    pub guid: String,
    pub name: String,
    pub last_operation: LastOperation,
}

/// Response of `/v3/service_credential_bindings/{guid}/details`
#[derive(Debug, Clone, Deserialize)]
pub struct BindingDetails {
    pub credentials: serde_json::Value,
}

impl AsyncResource for ServiceInstance {
    const KIND: &'static str = "service";

    fn state(&self) -> &OperationState {
        &self.last_operation.state
    }
}

impl AsyncResource for ServiceCredentialBinding {
    const KIND: &'static str = "service key";

    fn state(&self) -> &OperationState {
        &self.last_operation.state
    }
}
