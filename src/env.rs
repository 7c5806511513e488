use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Process-scoped state shared by every command handler.
///
/// The environment contains:
/// - the working directory used to resolve relative paths and to launch
///   delegated programs;
/// - a snapshot of the process variables, used for the executable search path;
/// - a flag that the REPL loop checks to know when to terminate.
///
/// The OS-level working directory of the shell process is never changed; `cd`
/// and `rmdir` are the only callers of [`Environment::set_current_dir`].
#[derive(Debug, Clone)]
pub struct Environment {
    vars: HashMap<String, String>,
    current_dir: PathBuf,
    should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut env = Self::with_current_dir(current_dir);
        env.vars = unicode_vars(stdenv::vars_os());
        env
    }

    /// Build an environment rooted at `dir` with no variables captured.
    pub fn with_current_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            vars: HashMap::new(),
            current_dir: fs::canonicalize(&dir).unwrap_or(dir),
            should_exit: false,
        }
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub(crate) fn set_current_dir(&mut self, dir: PathBuf) {
        tracing::debug!(from = %self.current_dir.display(), to = %dir.display(), "working directory changed");
        self.current_dir = dir;
    }

    /// Resolve `path` against the working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.current_dir.join(path)
    }

    /// Get the value of an environment variable from the captured snapshot.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable in the snapshot.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub(crate) fn request_exit(&mut self) {
        self.should_exit = true;
    }
}

/// Keep only variables whose name and value are valid Unicode.
fn unicode_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> HashMap<String, String> {
    vars.into_iter()
        .filter_map(|(key, val)| Some((key.into_string().ok()?, val.into_string().ok()?)))
        .collect()
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
