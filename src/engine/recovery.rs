//! What to do when a batch fails.
//!
//! Authorization and quota failures end the run. Every other failure asks a
//! [`RecoveryPrompt`] for a decision, and [`RecoveryMachine`] enforces the
//! per-batch retry ceiling on top of whatever the prompt answers.

use std::fmt;
use std::time::Duration;

use crate::translation::ProviderFailure;

/// Retries allowed per batch before a requested retry turns into a skip.
pub const MAX_RETRIES: u32 = 3;

/// Wait before retrying a rate-limited batch.
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(60);

/// How a provider failure is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Ends the run without asking.
    Fatal,
    /// Recoverable; a retry waits first.
    RateLimited,
    /// Recoverable; a retry is immediate.
    Transient,
}

impl FailureClass {
    pub const fn of(failure: &ProviderFailure) -> Self {
        match failure {
            ProviderFailure::Unauthorized | ProviderFailure::QuotaExceeded => Self::Fatal,
            ProviderFailure::RateLimited => Self::RateLimited,
            ProviderFailure::Other(_) => Self::Transient,
        }
    }
}

/// Answer to a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Retry,
    Skip,
    Abort,
}

/// Result of any user-facing decision. `Cancel` means the user quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDecision<T> {
    Proceed(T),
    Cancel,
}

/// Zero-based batch index within a run of `total` batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPosition {
    pub index: usize,
    pub total: usize,
}

impl BatchPosition {
    /// One-based batch number used in messages and reports.
    pub const fn number(self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for BatchPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number(), self.total)
    }
}

/// Source of recovery decisions.
pub trait RecoveryPrompt {
    fn choose(
        &mut self,
        failure: &ProviderFailure,
        batch: BatchPosition,
    ) -> UserDecision<RecoveryAction>;
}

/// Answers every failure the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub RecoveryAction);

impl RecoveryPrompt for FixedPolicy {
    fn choose(&mut self, _: &ProviderFailure, _: BatchPosition) -> UserDecision<RecoveryAction> {
        UserDecision::Proceed(self.0)
    }
}

/// Retry ceiling and rate-limit backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub rate_limit_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            rate_limit_delay: RATE_LIMIT_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Retrying,
    Skipping,
    Aborted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    Unauthorized,
    QuotaExceeded,
    UserRequested,
}

/// What the scheduler does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Send the same batch again after `delay`.
    Retry { delay: Duration },
    /// Leave the batch outstanding. `coerced` is set when the retry ceiling
    /// turned a requested retry into a skip.
    Skip { coerced: bool },
    Abort(AbortReason),
    Cancel,
}

/// Per-run failure state. The retry counter is per batch.
#[derive(Debug)]
pub struct RecoveryMachine {
    policy: RetryPolicy,
    state: RunState,
    retries: u32,
}

impl RecoveryMachine {
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: RunState::Running,
            retries: 0,
        }
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Retries spent on the current batch.
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Resets the retry counter for a new batch.
    pub const fn start_batch(&mut self) {
        self.retries = 0;
        self.state = RunState::Running;
    }

    /// Returns to `Running` after a retry wait or a skip.
    pub const fn resume(&mut self) {
        if matches!(self.state, RunState::Retrying | RunState::Skipping) {
            self.state = RunState::Running;
        }
    }

    /// Decides how to continue after `failure` on `batch`.
    pub fn on_failure<R: RecoveryPrompt + ?Sized>(
        &mut self,
        failure: &ProviderFailure,
        batch: BatchPosition,
        prompt: &mut R,
    ) -> Transition {
        let class = FailureClass::of(failure);
        if class == FailureClass::Fatal {
            self.state = RunState::Aborted;
            let reason = if *failure == ProviderFailure::Unauthorized {
                AbortReason::Unauthorized
            } else {
                AbortReason::QuotaExceeded
            };
            return Transition::Abort(reason);
        }

        match prompt.choose(failure, batch) {
            UserDecision::Cancel => {
                self.state = RunState::Cancelled;
                Transition::Cancel
            }
            UserDecision::Proceed(RecoveryAction::Abort) => {
                self.state = RunState::Aborted;
                Transition::Abort(AbortReason::UserRequested)
            }
            UserDecision::Proceed(RecoveryAction::Skip) => {
                self.state = RunState::Skipping;
                Transition::Skip { coerced: false }
            }
            UserDecision::Proceed(RecoveryAction::Retry)
                if self.retries >= self.policy.max_retries =>
            {
                self.state = RunState::Skipping;
                Transition::Skip { coerced: true }
            }
            UserDecision::Proceed(RecoveryAction::Retry) => {
                self.retries += 1;
                self.state = RunState::Retrying;
                let delay = if class == FailureClass::RateLimited {
                    self.policy.rate_limit_delay
                } else {
                    Duration::ZERO
                };
                Transition::Retry { delay }
            }
        }
    }
}
