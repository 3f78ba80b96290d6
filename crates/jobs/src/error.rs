//! Handler and command errors.

use jobcfg_core::ConfigError;
use thiserror::Error;

/// Failure reported by a command builder or by the command context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command was built from an inconsistent set of parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The context refused or failed to run the command.
    #[error("command rejected: {0}")]
    Rejected(String),
}

impl CommandError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Failure of one job attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("no job handler registered for type `{0}`")]
    UnknownHandler(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_keep_their_message() {
        let err: JobError = ConfigError::UnknownSelector("byNothing".into()).into();
        assert_eq!(
            err.to_string(),
            "unexpected job handler configuration for property `by`: byNothing"
        );
    }

    #[test]
    fn unknown_handler_names_the_type() {
        let err = JobError::UnknownHandler("timer-start-event".into());
        assert!(err.to_string().contains("timer-start-event"));
    }
}
