//! Polling loop for asynchronously provisioned resources

use log::{debug, warn};
use tokio::time::{sleep, Instant};

use super::policy::PollState;
use crate::cf::{AsyncResource, CfSession};
use crate::error::{CfError, Result};

impl CfSession {
    /// Poll the first resource of a list until it is terminal
    ///
    /// Returns `None` when no resource exists, the resource once it has
    /// succeeded, and fails on `failed` or when the retry policy runs out.
    /// Each call is a fresh pass with the full budget.
    pub(crate) async fn poll_until_terminal<T: AsyncResource>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        name: &str,
    ) -> Result<Option<T>> {
        let policy = self.retry_policy();
        let started = Instant::now();
        let mut state = PollState::start();

        loop {
            let found: Option<(T, serde_json::Value)> = self.api().find_first(path, query).await?;
            state = state.next(
                found.as_ref().map(|(resource, _)| resource.state()),
                policy,
                started.elapsed(),
            );
            debug!("{} '{}': {:?}", T::KIND, name, state);

            match state {
                PollState::Absent => return Ok(None),
                PollState::Ready => return Ok(found.map(|(resource, _)| resource)),
                PollState::Failed => {
                    let payload = found
                        .map(|(_, raw)| serde_json::to_string_pretty(&raw))
                        .transpose()?
                        .unwrap_or_default();
                    return Err(CfError::RemoteFailure {
                        kind: T::KIND.to_string(),
                        name: name.to_string(),
                        payload,
                    });
                }
                PollState::TimedOut { attempts } => {
                    return Err(CfError::Timeout(format!(
                        "Timeout occurred while getting {} '{}' after {} attempts",
                        T::KIND,
                        name,
                        attempts
                    )));
                }
                PollState::Unrecognized { state: ref raw, .. } => {
                    warn!(
                        "Unsupported server response state '{}'. Waiting for next response.",
                        raw
                    );
                }
                PollState::Pending { .. } => {}
            }

            sleep(policy.pause(started.elapsed())).await;
        }
    }
}
