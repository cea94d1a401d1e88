//! Owned session state shared by all cf operations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;

use super::api::CfApi;
use super::config_file::resolve_cf_home;
use super::runner::{CfCli, CommandRunner};
use super::target::{SpaceInfo, Target};
use crate::provision::RetryPolicy;

/// One cf session: the runner, where to find the cf config, the retry
/// policy for asynchronous operations and the write-once target caches
pub struct CfSession {
    api: CfApi,
    cf_home: PathBuf,
    policy: RetryPolicy,
    pub(crate) target: OnceCell<Target>,
    pub(crate) space_info: OnceCell<SpaceInfo>,
}

impl CfSession {
    /// Create a session over any command runner
    pub fn new(runner: Arc<dyn CommandRunner>, cf_home: PathBuf) -> Self {
        Self {
            api: CfApi::new(runner),
            cf_home,
            policy: RetryPolicy::default(),
            target: OnceCell::new(),
            space_info: OnceCell::new(),
        }
    }

    /// Create a session running `binary`, with CF home taken from the environment
    pub fn from_env(binary: &str) -> Self {
        Self::new(Arc::new(CfCli::new(binary)), resolve_cf_home())
    }

    /// Replace the retry policy used by polling loops
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &CfApi {
        &self.api
    }

    pub fn cf_home(&self) -> &Path {
        &self.cf_home
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[cfg(test)]
impl CfSession {
    /// Session over a scripted runner with an empty CF home and no poll delay
    pub fn test_session(
        runner: Arc<dyn CommandRunner>,
        cf_home: &tempfile::TempDir,
    ) -> Self {
        Self::new(runner, cf_home.path().to_path_buf())
            .with_retry_policy(RetryPolicy::immediate(crate::config::poll::MAX_ATTEMPTS))
    }
}
