use crate::env::Environment;
use crate::error::CommandError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// How the standard streams of a delegated program are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Buffer stdout and stderr for the caller; stdin stays with the terminal
    /// so the program can still prompt.
    Output,
    /// Share the terminal with the child (interactive programs).
    Inherit,
}

/// Text produced by a successful invocation. Both fields are empty in
/// [`Capture::Inherit`] mode.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` with `args` as a direct argument vector and wait for it.
///
/// No shell is involved. The program is resolved against the environment's
/// `PATH`, runs in the environment's working directory, and every failure is
/// returned as a [`CommandError`]:
/// - missing executable: [`CommandError::NotFound`];
/// - non-zero exit (or death by signal): [`CommandError::NonZeroExit`];
/// - anything else: [`CommandError::Unexpected`].
pub fn invoke<S: AsRef<OsStr>>(
    env: &Environment,
    program: &str,
    args: &[S],
    capture: Capture,
) -> Result<Output, CommandError> {
    invoke_with_stdin(env, program, args, capture, Stdio::inherit())
}

/// Like [`invoke`], with an explicit source for the child's stdin.
pub(crate) fn invoke_with_stdin<S: AsRef<OsStr>>(
    env: &Environment,
    program: &str,
    args: &[S],
    capture: Capture,
    stdin: Stdio,
) -> Result<Output, CommandError> {
    let search_paths = env.get_var("PATH").unwrap_or_default();
    let Some(executable) =
        find_command_path(OsStr::new(search_paths), env.current_dir(), Path::new(program))
    else {
        tracing::warn!(program, "executable not found on search path");
        return Err(CommandError::NotFound {
            program: program.to_string(),
        });
    };

    tracing::debug!(program, executable = %executable.display(), ?capture, "spawning");
    let mut cmd = std::process::Command::new(executable.as_ref());
    cmd.args(args).current_dir(env.current_dir()).stdin(stdin);

    let result = match capture {
        Capture::Output => cmd
            .output()
            .map(|out| (out.status, Some((out.stdout, out.stderr)))),
        Capture::Inherit => cmd.status().map(|status| (status, None)),
    };

    let (status, captured) = result.map_err(|e| spawn_error(program, e))?;
    let output = captured
        .map(|(stdout, stderr)| Output {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
        .unwrap_or_default();

    if status.success() {
        Ok(output)
    } else {
        let code = status.code().or_else(|| terminated_by_signal(status));
        tracing::debug!(program, ?code, "child exited unsuccessfully");
        Err(CommandError::NonZeroExit {
            code,
            stderr: output.stderr,
        })
    }
}

fn spawn_error(program: &str, e: io::Error) -> CommandError {
    match e.kind() {
        io::ErrorKind::NotFound => CommandError::NotFound {
            program: program.to_string(),
        },
        _ => CommandError::Unexpected(e.to_string()),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    exit_status.signal().map(|signal| 128 + signal)
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> Option<i32> {
    None
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh` or `./foo`): resolved
///   against `current_dir` and returned if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    current_dir: &Path,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        // Empty path -> not found
        (None, None) => None,
        (Some(x), None) if !path.starts_with(".") => {
            find_in_path(search_paths, x.as_os_str()).map(Cow::Owned)
        }
        _ => {
            let joined = current_dir.join(path);
            joined.is_file().then_some(Cow::Owned(joined))
        }
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(cmd))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.is_file() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    fn env_with_path(path: &str) -> Environment {
        let mut env = Environment::with_current_dir(std::env::temp_dir());
        env.set_var("PATH", path);
        env
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr(""), Path::new("/"), path)
            .expect("Expected to find /bin/sh via absolute path");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute_nonexisting() {
        let res = find_command_path(osstr("/bin"), Path::new("/"), Path::new("/bin/nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_single_component_found_in_path() {
        let found = find_command_path(osstr("/nowhere:/bin"), Path::new("/"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn test_single_component_not_found_in_path() {
        let res = find_command_path(osstr("/bin"), Path::new("/"), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    fn test_relative_paths_resolve_against_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        File::create(dir.path().join("bin").join("tool")).unwrap();
        File::create(dir.path().join("foo")).unwrap();

        let found = find_command_path(osstr(""), dir.path(), Path::new("bin/tool"))
            .expect("Expected to find relative 'bin/tool'");
        assert_eq!(found.as_ref(), dir.path().join("bin/tool"));

        let found = find_command_path(osstr(""), dir.path(), Path::new("./foo"))
            .expect("Expected to find './foo'");
        assert!(found.as_ref().ends_with("foo"));

        // A bare name is never looked up in the working directory.
        assert!(find_command_path(osstr(""), dir.path(), Path::new("foo")).is_none());
    }

    #[test]
    fn test_empty_path_is_none() {
        let res = find_command_path(osstr("/bin"), Path::new("/"), Path::new(""));
        assert!(res.is_none(), "Empty path should not resolve to anything");
    }

    #[test]
    #[cfg(unix)]
    fn test_invoke_captures_stdout() {
        let env = env_with_path("/usr/bin:/bin");
        let out = invoke(&env, "sh", &["-c", "echo hello"], Capture::Output).unwrap();
        assert_eq!(out.stdout, "hello\n");
        assert!(out.stderr.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_invoke_runs_in_environment_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = Environment::with_current_dir(dir.path());
        env.set_var("PATH", "/usr/bin:/bin");
        let out = invoke(&env, "sh", &["-c", "pwd"], Capture::Output).unwrap();
        assert_eq!(out.stdout.trim(), env.current_dir().to_string_lossy());
    }

    #[test]
    #[cfg(unix)]
    fn test_invoke_non_zero_exit_carries_stderr() {
        let env = env_with_path("/usr/bin:/bin");
        let err = invoke(&env, "sh", &["-c", "echo boom >&2; exit 3"], Capture::Output)
            .unwrap_err();
        match err {
            CommandError::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_invoke_inherit_non_zero_exit_has_empty_cause() {
        let env = env_with_path("/usr/bin:/bin");
        let err = invoke(&env, "sh", &["-c", "exit 2"], Capture::Inherit).unwrap_err();
        assert!(matches!(
            err,
            CommandError::NonZeroExit { code: Some(2), ref stderr } if stderr.is_empty()
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_path_search_skips_non_executable_files() {
        let shadow = tempfile::tempdir().unwrap();
        File::create(shadow.path().join("sh")).unwrap();

        let search = format!("{}:/bin", shadow.path().display());
        let found = find_command_path(osstr(&search), Path::new("/"), Path::new("sh"))
            .expect("Expected to skip the non-executable 'sh' and find /bin/sh");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn test_invoke_non_executable_file_is_unexpected() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        fs::write(&tool, "#!/bin/sh\necho never\n").unwrap();

        let env = env_with_path(&dir.path().to_string_lossy());
        let err = invoke(&env, &tool.to_string_lossy(), &[] as &[&str], Capture::Output)
            .unwrap_err();
        match err {
            CommandError::Unexpected(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_invoke_with_closed_stdin_reads_eof() {
        let env = env_with_path("/usr/bin:/bin");
        let out = invoke_with_stdin(
            &env,
            "sh",
            &["-c", "read line || echo eof"],
            Capture::Output,
            Stdio::null(),
        )
        .unwrap();
        assert_eq!(out.stdout, "eof\n");
    }

    #[test]
    fn test_invoke_missing_program_is_not_found() {
        let empty = tempfile::tempdir().unwrap();
        let env = env_with_path(&empty.path().to_string_lossy());
        let err = invoke(&env, "sh", &["-c", "true"], Capture::Output).unwrap_err();
        assert!(matches!(err, CommandError::NotFound { ref program } if program == "sh"));
    }
}
