use crate::env::Environment;
use crate::error::CommandError;
use std::io::Write;

/// Object-safe trait for every command the shell can execute.
///
/// Implemented by the direct handlers in `builtin` and by the delegating
/// handlers in `delegated`. Handlers write user-facing text to `stdout`;
/// delegated programs running in inherit mode write to the terminal directly.
pub trait Command {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name(&self) -> &'static str;

    /// Executes the command with the arguments that followed its name.
    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError>;
}
