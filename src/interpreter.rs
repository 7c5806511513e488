use crate::env::Environment;
use crate::error::ShellError;
use crate::lexer;
use crate::prompt;
use crate::registry::Registry;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

/// A restricted interactive shell.
///
/// The interpreter owns the [`Environment`] and the command [`Registry`]. Each
/// input line is split into words, the first word is looked up in the registry,
/// and the matching handler runs with the remaining words. Names that are not
/// registered are rejected before anything is executed.
///
/// Example
/// ```
/// use restricted_shell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// sh.execute_line(r#"echo "hello   world""#, &mut out).unwrap();
/// assert_eq!(out, b"hello   world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    registry: Registry,
}

impl Interpreter {
    pub fn new(env: Environment, registry: Registry) -> Self {
        Self { env, registry }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Parse and run a single input line.
    ///
    /// Blank lines do nothing. Errors are returned rather than printed so the
    /// caller decides where they go; the REPL prints them and keeps going.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write) -> Result<(), ShellError> {
        let words = lexer::split_into_words(line)?;
        match words.split_first() {
            Some((name, args)) => self.dispatch(name, args, stdout),
            None => Ok(()),
        }
    }

    /// Run a registered command by name.
    ///
    /// A panic inside the handler is caught and reported as
    /// [`ShellError::Crashed`].
    pub fn dispatch(
        &mut self,
        name: &str,
        args: &[String],
        stdout: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let Some(cmd) = self.registry.lookup(name) else {
            tracing::debug!(name, "rejected command outside the allow-list");
            return Err(ShellError::UnknownCommand(name.to_string()));
        };

        tracing::debug!(name, ?args, "dispatching");
        let env = &mut self.env;
        match panic::catch_unwind(AssertUnwindSafe(|| cmd.run(args, env, stdout))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(ShellError::Failed {
                command: name.to_string(),
                source,
            }),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(name, %message, "command panicked");
                Err(ShellError::Crashed {
                    command: name.to_string(),
                    message,
                })
            }
        }
    }

    /// Read-Eval-Print Loop over the terminal.
    ///
    /// Runs until `exit` is executed or input ends. Command failures are
    /// printed and never stop the loop.
    pub fn repl(&mut self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = io::stdout();

        while !self.env.should_exit() {
            let prompt = prompt::render(&prompt::hostname(), &self.env);
            match rl.readline(&prompt) {
                Ok(line) => {
                    if let Err(err) = self.execute_line(&line, &mut stdout) {
                        writeln!(stdout, "{err}")?;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => self.dispatch("exit", &[], &mut stdout)?,
                Err(err) => return Err(err.into()),
            }
            stdout.flush()?;
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// An interpreter over the current process state and the standard
    /// command set.
    fn default() -> Self {
        Self::new(Environment::new(), Registry::default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
