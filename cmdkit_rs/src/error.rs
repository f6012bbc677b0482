//! Typed errors raised by the command layer.
//!
//! Handlers return `anyhow::Result`, so any error type can flow out of a
//! command. Errors that know how to explain themselves to a user are
//! [`CliError`]s; the error exit path looks for one anywhere in the chain.

use thiserror::Error;

use crate::colors::Painter;

#[derive(Debug, Error)]
pub enum CliError {
    /// Programmer error in a command definition (bad usage string, missing
    /// handler for the requested output mode).
    #[error("{0}")]
    Configuration(String),

    /// First token on the command line matches no registered command.
    #[error("command {command} was not found")]
    CommandNotFound {
        command: String,
        suggestion: Option<String>,
    },

    /// Error raised by a command with a message meant for the user.
    #[error("{0}")]
    Message(String),
}

impl CliError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Human-readable report, `None` when the error has nothing to say
    /// beyond the generic hint.
    pub fn report(&self, painter: &Painter) -> Option<String> {
        match self {
            CliError::Configuration(_) => None,
            CliError::CommandNotFound {
                command,
                suggestion,
            } => {
                let mut lines = vec![
                    format!(
                        "warning: '{}' is not a valid command.",
                        painter.header(command)
                    ),
                    "use '--help' for additional information.".to_string(),
                ];
                if let Some(suggestion) = suggestion {
                    lines.push(format!("Did you mean {}?", painter.header(suggestion)));
                }
                Some(painter.warn(&lines.join("\n")))
            }
            CliError::Message(message) => Some(message.clone()),
        }
    }

    /// First `CliError` in the chain of `err`, if any.
    pub fn find_in(err: &anyhow::Error) -> Option<&CliError> {
        err.chain().find_map(|cause| cause.downcast_ref::<CliError>())
    }
}
