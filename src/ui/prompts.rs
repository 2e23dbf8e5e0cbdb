//! Interactive recovery decisions for failed batches.

use inquire::Select;
use std::fmt;
use std::time::Duration;

use super::{BatchProgress, Style, decision};
use crate::engine::{BatchPosition, RecoveryAction, RecoveryPrompt, UserDecision};
use crate::translation::ProviderFailure;

/// One entry of the recovery menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryChoice {
    action: Option<RecoveryAction>,
    wait: Option<Duration>,
}

impl RecoveryChoice {
    /// `None` means quit.
    pub const fn action(self) -> Option<RecoveryAction> {
        self.action
    }
}

impl fmt::Display for RecoveryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.action, self.wait) {
            (Some(RecoveryAction::Retry), Some(wait)) => {
                write!(f, "Wait {}s and retry", wait.as_secs())
            }
            (Some(RecoveryAction::Retry), None) => f.write_str("Retry batch"),
            (Some(RecoveryAction::Skip), _) => f.write_str("Skip this batch"),
            (Some(RecoveryAction::Abort), _) => f.write_str("Abort translation"),
            (None, _) => f.write_str("Quit (keep progress for later)"),
        }
    }
}

/// Menu entries for `failure`. Rate limits lead with the wait-and-retry option.
pub fn recovery_options(
    failure: &ProviderFailure,
    rate_limit_delay: Duration,
) -> Vec<RecoveryChoice> {
    let choice = |action, wait| RecoveryChoice { action, wait };
    if *failure == ProviderFailure::RateLimited {
        vec![
            choice(Some(RecoveryAction::Retry), Some(rate_limit_delay)),
            choice(Some(RecoveryAction::Skip), None),
            choice(Some(RecoveryAction::Abort), None),
            choice(None, None),
        ]
    } else {
        vec![
            choice(Some(RecoveryAction::Skip), None),
            choice(Some(RecoveryAction::Retry), None),
            choice(Some(RecoveryAction::Abort), None),
            choice(None, None),
        ]
    }
}

/// Asks the user what to do with a failed batch.
pub struct InteractiveRecovery {
    progress: BatchProgress,
    rate_limit_delay: Duration,
}

impl InteractiveRecovery {
    pub const fn new(progress: BatchProgress, rate_limit_delay: Duration) -> Self {
        Self {
            progress,
            rate_limit_delay,
        }
    }
}

impl RecoveryPrompt for InteractiveRecovery {
    fn choose(
        &mut self,
        failure: &ProviderFailure,
        batch: BatchPosition,
    ) -> UserDecision<RecoveryAction> {
        let message = if *failure == ProviderFailure::RateLimited {
            format!("Rate limit exceeded for batch {batch}")
        } else {
            format!("Translation error for batch {batch}. Choose action:")
        };
        let options = recovery_options(failure, self.rate_limit_delay);

        let answer = self
            .progress
            .suspend(|| decision(Select::new(&message, options).prompt()));

        match answer {
            Ok(UserDecision::Proceed(choice)) => {
                choice.action().map_or(UserDecision::Cancel, UserDecision::Proceed)
            }
            Ok(UserDecision::Cancel) => UserDecision::Cancel,
            Err(e) => {
                crate::warn!(
                    "{} Could not ask for a decision ({e}), stopping here",
                    Style::warning("Warning:")
                );
                UserDecision::Cancel
            }
        }
    }
}
