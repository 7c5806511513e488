//! A restricted interactive command shell.
//!
//! Only a fixed allow-list of commands can run. Each input line is split into
//! words with shell-style quoting, the first word is looked up in the
//! [`Registry`], and the matching handler either performs the operation
//! in-process (`cd`, `mkdir`, `touch`, ...) or delegates to an external program
//! (`ls`, `rm`, `ping`, ...) through a single invocation path that never goes
//! through a shell interpreter.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`] and
//! [`env`] expose the handler trait and the state handlers operate on.

pub mod args;
mod builtin;
pub mod command;
mod delegated;
pub mod env;
pub mod error;
pub mod external;
mod interpreter;
pub mod lexer;
pub mod prompt;
mod registry;

pub use error::{CommandError, ShellError};
pub use interpreter::Interpreter;
pub use registry::Registry;
