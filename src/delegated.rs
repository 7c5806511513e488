//! Commands backed by an external program on the search path.

use crate::args::classify;
use crate::command::Command;
use crate::env::Environment;
use crate::error::CommandError;
use crate::external::{invoke, invoke_with_stdin, Capture};
use std::fs;
use std::io::Write;
use std::process::Stdio;

/// Pass the raw arguments through to a program of the same name.
///
/// Captured output is copied to the handler's stdout on success.
pub struct Passthrough {
    name: &'static str,
    capture: Capture,
    /// Set when at least one argument is required; names what is missing.
    operand: Option<&'static str>,
}

impl Passthrough {
    /// An interactive or streaming program sharing the terminal.
    pub const fn inherit(name: &'static str) -> Self {
        Self {
            name,
            capture: Capture::Inherit,
            operand: None,
        }
    }

    /// A program whose output is buffered and reported uniformly.
    pub const fn captured(name: &'static str, operand: &'static str) -> Self {
        Self {
            name,
            capture: Capture::Output,
            operand: Some(operand),
        }
    }
}

impl Command for Passthrough {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        if let (Some(operand), true) = (self.operand, args.is_empty()) {
            return Err(CommandError::MissingOperand(operand));
        }

        let output = invoke(env, self.name, args, self.capture)?;
        stdout.write_all(output.stdout.as_bytes())?;
        Ok(())
    }
}

/// Remove files through the system `rm`, reporting what was removed.
///
/// `rm` keeps the terminal's stdin, so `-i` prompts still reach the user. Only
/// targets that are gone afterwards are reported.
pub struct Rm;

impl Rm {
    fn remove(
        args: &[String],
        env: &Environment,
        stdout: &mut dyn Write,
        stdin: Stdio,
    ) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::MissingOperand("operand"));
        }

        let (flags, targets) = classify(args);
        if targets.is_empty() {
            return Err(CommandError::MissingTarget("target to remove"));
        }

        let argv: Vec<&str> = flags.iter().chain(&targets).map(String::as_str).collect();
        let output = invoke_with_stdin(env, "rm", &argv, Capture::Output, stdin)?;
        stdout.write_all(output.stdout.as_bytes())?;

        let removed: Vec<&str> = targets
            .iter()
            .filter(|target| fs::symlink_metadata(env.resolve(target)).is_err())
            .map(String::as_str)
            .collect();
        if !removed.is_empty() {
            writeln!(stdout, "Removed: {}", removed.join(", "))?;
        }
        Ok(())
    }
}

impl Command for Rm {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        Self::remove(args, env, stdout, Stdio::inherit())
    }
}
