//! Common traits and wrappers for Cloud Controller resources

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::models::OperationState;

/// Resources created asynchronously and observed through their last operation
pub trait AsyncResource: DeserializeOwned {
    /// Label used in messages (e.g. "service", "service key")
    const KIND: &'static str;

    /// State of the last operation reported by the control plane
    fn state(&self) -> &OperationState;
}

/// Generic v3 list response
///
/// Only `resources` is required; pagination is ignored because every
/// lookup here filters by name.
#[derive(Deserialize, Debug)]
pub struct ListResponse<T> {
    pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_resources(self) -> Vec<T> {
        self.resources
    }
}
