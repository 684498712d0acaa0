//! Retry / fallback state machine.
//!
//! State is `(endpoint, attempt)`. Each attempt yields an [`AttemptOutcome`]; [`RetryState::advance`]
//! maps it to the next [`Step`]. No I/O happens here, so the transition table is tested directly.
//!
//! | outcome        | not last attempt                          | last attempt  |
//! |----------------|-------------------------------------------|---------------|
//! | `Content`      | done                                      | done          |
//! | `Empty`        | same endpoint, no wait                    | next endpoint |
//! | `RateLimited`  | same endpoint, `Retry-After` or backoff   | next endpoint |
//! | `Failed`       | same endpoint, backoff                    | next endpoint |
//!
//! Waits are capped by [`RetryPolicy::max_backoff`]. Past the last endpoint the step is `Exhausted`.

use std::time::Duration;

/// Attempt budget and backoff curve shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// `initial_backoff * 2^attempt`, capped at `max_backoff`.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    fn is_last_attempt(&self, attempt: u32) -> bool {
        attempt + 1 >= self.max_attempts.max(1)
    }
}

/// Classified result of one attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Non-empty rewritten text.
    Content(String),
    /// HTTP 200 but blank content.
    Empty,
    /// HTTP 429, with the parsed `Retry-After` if the server sent one.
    RateLimited(Option<Duration>),
    /// Any other network or HTTP failure.
    Failed,
}

/// What the client does next.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Return this content to the caller.
    Done(String),
    /// Sleep `wait`, then attempt `next`.
    Attempt { next: RetryState, wait: Duration },
    /// Every endpoint used its budget.
    Exhausted,
}

/// Position in the endpoint list and attempt counter for that endpoint (both zero-based).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    pub endpoint: usize,
    pub attempt: u32,
}

impl RetryState {
    pub fn advance(self, outcome: AttemptOutcome, policy: &RetryPolicy, endpoints: usize) -> Step {
        let last = policy.is_last_attempt(self.attempt);
        match outcome {
            AttemptOutcome::Content(content) => Step::Done(content),
            _ if last => self.next_endpoint(endpoints),
            AttemptOutcome::Empty => self.same_endpoint(Duration::ZERO),
            AttemptOutcome::RateLimited(retry_after) => {
                let wait = retry_after
                    .unwrap_or_else(|| policy.backoff_for(self.attempt))
                    .min(policy.max_backoff);
                self.same_endpoint(wait)
            }
            AttemptOutcome::Failed => self.same_endpoint(policy.backoff_for(self.attempt)),
        }
    }

    fn same_endpoint(self, wait: Duration) -> Step {
        Step::Attempt {
            next: RetryState {
                endpoint: self.endpoint,
                attempt: self.attempt + 1,
            },
            wait,
        }
    }

    fn next_endpoint(self, endpoints: usize) -> Step {
        if self.endpoint + 1 < endpoints {
            Step::Attempt {
                next: RetryState {
                    endpoint: self.endpoint + 1,
                    attempt: 0,
                },
                wait: Duration::ZERO,
            }
        } else {
            Step::Exhausted
        }
    }
}
