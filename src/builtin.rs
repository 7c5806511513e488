//! Commands implemented in-process, without spawning a child.

use crate::args::classify;
use crate::command::Command;
use crate::env::Environment;
use crate::error::CommandError;
use std::ffi::CString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

fn os_error(target: &str) -> impl FnOnce(io::Error) -> CommandError + '_ {
    move |source| CommandError::Os {
        target: target.to_string(),
        source,
    }
}

/// Print the current working directory.
pub struct Pwd;

impl Command for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(
        &self,
        _args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        writeln!(stdout, "Current Directory -> {}", env.current_dir().display())?;
        Ok(())
    }
}

/// Change the working directory. Unlike most shells there is no implicit
/// `$HOME` target: an operand is required.
pub struct Cd;

impl Command for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        _stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let target = args.first().ok_or(CommandError::MissingOperand("operand"))?;

        let canonical = fs::canonicalize(env.resolve(target)).map_err(os_error(target))?;
        if !canonical.is_dir() {
            return Err(CommandError::InvalidTarget {
                target: target.clone(),
                reason: "is not a directory",
            });
        }

        env.set_current_dir(canonical);
        Ok(())
    }
}

/// Write the arguments to standard output, separated by spaces.
pub struct Echo;

impl Command for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn run(
        &self,
        args: &[String],
        _env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        writeln!(stdout, "{}", args.join(" "))?;
        Ok(())
    }
}

/// Create directories, including any missing parents.
pub struct Mkdir;

impl Command for Mkdir {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::MissingOperand("operand"));
        }

        for dir in args {
            fs::create_dir_all(env.resolve(dir)).map_err(os_error(dir))?;
            writeln!(stdout, "Directory '{dir}' created successfully.")?;
        }
        Ok(())
    }
}

/// Remove an empty directory.
///
/// Removing the working directory itself is allowed: the working directory
/// first moves to the parent.
pub struct Rmdir;

impl Command for Rmdir {
    fn name(&self) -> &'static str {
        "rmdir"
    }

    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let target = args
            .first()
            .ok_or(CommandError::MissingOperand("directory name"))?;

        let path = env.resolve(target);
        if !path.is_dir() {
            return Err(CommandError::InvalidTarget {
                target: target.clone(),
                reason: "is not a valid directory or does not exist.",
            });
        }

        let canonical = fs::canonicalize(&path).map_err(os_error(target))?;
        let cwd = fs::canonicalize(env.current_dir())
            .unwrap_or_else(|_| env.current_dir().to_path_buf());

        let removal = if canonical == cwd {
            let parent = canonical.parent().unwrap_or(&canonical).to_path_buf();
            env.set_current_dir(parent);
            writeln!(
                stdout,
                "Changed directory to parent before removing '{target}'."
            )?;
            canonical.as_path()
        } else {
            path.as_path()
        };

        fs::remove_dir(removal).map_err(os_error(target))?;
        writeln!(stdout, "Directory '{target}' removed successfully.")?;
        Ok(())
    }
}

/// Update file access and modification times, creating missing files unless
/// `-c` is given.
///
/// Every target is attempted; the call fails afterwards if any of them failed.
pub struct Touch;

impl Touch {
    fn touch(path: &Path, create: bool) -> io::Result<()> {
        if create {
            OpenOptions::new().create(true).append(true).open(path)?;
        }

        let c_path = CString::new(path.as_os_str().as_bytes())?;
        // SAFETY: `c_path` is NUL-terminated and outlives the call; null `times`
        // sets both timestamps to the current time.
        let rc = unsafe { libc::utimensat(libc::AT_FDCWD, c_path.as_ptr(), std::ptr::null(), 0) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Command for Touch {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(CommandError::MissingOperand("file name"));
        }

        let (flags, targets) = classify(args);
        if targets.is_empty() {
            return Err(CommandError::MissingTarget("target file name"));
        }

        let no_create = flags.iter().any(|flag| flag == "-c");
        let mut failed = 0;

        for target in &targets {
            let path = env.resolve(target);
            if no_create && !path.exists() {
                writeln!(stdout, "[touch] -> '{target}' does not exist.")?;
                failed += 1;
                continue;
            }
            if let Err(e) = Self::touch(&path, !no_create) {
                writeln!(stdout, "[touch] -> error with target: '{target}': {e}")?;
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(CommandError::PartialFailure {
                failed,
                total: targets.len(),
            });
        }
        Ok(())
    }
}

/// Clear the terminal screen.
pub struct Clear;

impl Command for Clear {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn run(
        &self,
        _args: &[String],
        _env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        write!(stdout, "\x1b[2J\x1b[1;1H")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Exit shell process.
///
/// The REPL loop stops once the current cycle finishes.
pub struct Exit;

impl Command for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn run(
        &self,
        _args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), CommandError> {
        writeln!(stdout, "Exiting...")?;
        env.request_exit();
        Ok(())
    }
}
