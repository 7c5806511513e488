//! Error types for command dispatch and the individual handlers.

use crate::lexer::LexingError;
use std::io;
use thiserror::Error;

/// Failures reported by a single command handler.
///
/// Every variant renders as a short, human-readable cause; the command name is
/// added by [`ShellError::Failed`].
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required argument was not given at all.
    #[error("missing {0}")]
    MissingOperand(&'static str),

    /// Only flags were given where at least one target is required.
    #[error("missing {0}")]
    MissingTarget(&'static str),

    /// The argument does not name a usable file-system object.
    #[error("'{target}' {reason}")]
    InvalidTarget { target: String, reason: &'static str },

    /// The delegated executable is not on the search path.
    #[error("command not found. Please ensure it's installed.")]
    NotFound { program: String },

    /// The delegated executable ran and reported failure.
    #[error("{}", exit_message(.code, .stderr))]
    NonZeroExit { code: Option<i32>, stderr: String },

    /// Any other failure to start or wait for a delegated executable.
    #[error("unexpected error: {0}")]
    Unexpected(String),

    /// A platform call made directly by a handler failed.
    #[error("{source}: '{target}'")]
    Os {
        target: String,
        #[source]
        source: io::Error,
    },

    /// Some targets of a batch operation failed; the rest were processed.
    #[error("{failed} of {total} targets failed")]
    PartialFailure { failed: usize, total: usize },

    /// Writing to the command's output stream failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn exit_message(code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim();
    match code {
        _ if !stderr.is_empty() => stderr.to_string(),
        Some(code) => format!("exited with status {code}"),
        None => "exited with an unknown status".to_string(),
    }
}

/// Failures surfaced by the interpreter for one input line.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("[Error] -> could not parse input: {0}")]
    Parse(#[from] LexingError),

    #[error("[Error] -> '{0}' either doesn't exist or is disallowed in this environment.")]
    UnknownCommand(String),

    #[error("[{command}] -> {source}")]
    Failed {
        command: String,
        #[source]
        source: CommandError,
    },

    /// The handler panicked; the loop keeps running.
    #[error("Error while running the command {command}:\n>> {message}")]
    Crashed { command: String, message: String },
}
