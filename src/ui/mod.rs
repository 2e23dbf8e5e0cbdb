use anyhow::Result;
use inquire::InquireError;

mod progress;
mod prompts;
mod spinner;
mod style;

pub use progress::BatchProgress;
pub use prompts::{InteractiveRecovery, RecoveryChoice, recovery_options};
pub use spinner::Spinner;
pub use style::Style;

use crate::engine::UserDecision;

/// Check if the inquire error is a user cancellation/interruption.
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Turns a prompt result into a decision, mapping Ctrl+C and Escape to [`UserDecision::Cancel`].
pub fn decision<T>(result: Result<T, InquireError>) -> Result<UserDecision<T>, InquireError> {
    match result {
        Ok(value) => Ok(UserDecision::Proceed(value)),
        Err(e) if is_prompt_cancelled(&e) => Ok(UserDecision::Cancel),
        Err(e) => Err(e),
    }
}

/// Wraps a function that uses interactive prompts and handles user cancellation gracefully.
///
/// If the user cancels the prompt (Ctrl+C or Escape), this function prints a newline
/// to clean up the terminal and returns `Ok(())` instead of propagating the error.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Ok(()) => Ok(()),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            eprintln!();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_prompt_cancellation_ok() {
        let result = handle_prompt_cancellation(|| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_handle_prompt_cancellation_operation_canceled() {
        let result = handle_prompt_cancellation(|| Err(InquireError::OperationCanceled.into()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_handle_prompt_cancellation_other_error() {
        let result = handle_prompt_cancellation(|| Err(anyhow::anyhow!("Some other error")));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("Some other error"));
    }

    #[test]
    fn test_is_prompt_cancelled() {
        assert!(is_prompt_cancelled(&InquireError::OperationCanceled));
        assert!(is_prompt_cancelled(&InquireError::OperationInterrupted));
        assert!(!is_prompt_cancelled(&InquireError::Custom("test".into())));
    }

    #[test]
    fn test_decision_maps_cancellation() {
        assert!(matches!(
            decision(Ok::<_, InquireError>(3)),
            Ok(UserDecision::Proceed(3))
        ));
        assert!(matches!(
            decision::<u8>(Err(InquireError::OperationInterrupted)),
            Ok(UserDecision::Cancel)
        ));
        assert!(decision::<u8>(Err(InquireError::NotTTY)).is_err());
    }
}
