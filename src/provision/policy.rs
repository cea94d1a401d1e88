//! Retry policy and the pure poll state transition

use std::time::Duration;

use crate::cf::OperationState;
use crate::config::poll;

/// How long to keep polling an asynchronous resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Polls per pass, including the first one
    pub max_attempts: u32,
    /// Sleep between polls
    pub delay: Duration,
    /// Optional wall-clock bound per pass
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: poll::MAX_ATTEMPTS,
            delay: Duration::from_millis(poll::DELAY_MS),
            deadline: None,
        }
    }
}

impl RetryPolicy {
    /// Policy without delay between polls
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
            deadline: None,
        }
    }

    /// Sleep before the next poll, cut short so it ends at the deadline
    pub fn pause(&self, elapsed: Duration) -> Duration {
        match self.deadline {
            Some(deadline) => self.delay.min(deadline.saturating_sub(elapsed)),
            None => self.delay,
        }
    }

    fn exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        attempts >= self.max_attempts || self.deadline.is_some_and(|d| elapsed >= d)
    }
}

/// Where a poll pass stands after the latest observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Still waiting; `attempts` polls done so far
    Pending { attempts: u32 },
    /// The last observation was not recognized; keep waiting
    Unrecognized { attempts: u32, state: String },
    /// No such resource
    Absent,
    /// Resource reached `succeeded`
    Ready,
    /// Resource reached `failed`
    Failed,
    /// Budget used up while still non-terminal
    TimedOut { attempts: u32 },
}

impl PollState {
    /// State before the first poll
    pub fn start() -> Self {
        PollState::Pending { attempts: 0 }
    }

    /// Polls performed so far in this pass
    pub fn attempts(&self) -> u32 {
        match self {
            PollState::Pending { attempts }
            | PollState::Unrecognized { attempts, .. }
            | PollState::TimedOut { attempts } => *attempts,
            _ => 0,
        }
    }

    /// Apply one observation; `observed` is `None` when the resource does
    /// not exist
    pub fn next(
        self,
        observed: Option<&OperationState>,
        policy: &RetryPolicy,
        elapsed: Duration,
    ) -> PollState {
        let attempts = self.attempts() + 1;
        let Some(state) = observed else {
            return PollState::Absent;
        };

        match state {
            OperationState::Succeeded => PollState::Ready,
            OperationState::Failed => PollState::Failed,
            _ if policy.exhausted(attempts, elapsed) => PollState::TimedOut { attempts },
            OperationState::Initial | OperationState::InProgress => {
                PollState::Pending { attempts }
            }
            OperationState::Unknown(raw) => PollState::Unrecognized {
                attempts,
                state: raw.clone(),
            },
        }
    }
}
