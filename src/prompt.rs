use crate::env::Environment;
use std::ffi::CStr;

/// The machine's network node name, as reported by `uname(2)`.
pub fn hostname() -> String {
    // SAFETY: `utsname` is plain old data, so an all-zero value is valid, and
    // `uname` only writes NUL-terminated strings into it.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } != 0 {
        tracing::warn!(error = %std::io::Error::last_os_error(), "uname failed");
        return "localhost".to_string();
    }
    let nodename = unsafe { CStr::from_ptr(uts.nodename.as_ptr()) };
    nodename.to_string_lossy().into_owned()
}

/// Render `@{host}:{cwd}$  `.
pub fn render(host: &str, env: &Environment) -> String {
    format!("@{}:{}$  ", host, env.current_dir().display())
}
