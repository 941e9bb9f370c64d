/// Exit status of a program that could not be found.
pub const NOT_FOUND: i32 = 127;
/// Exit status of a program that exists but could not be executed.
pub const NOT_EXECUTABLE: i32 = 126;
/// Exit status of a command whose redirection could not be set up.
pub const REDIRECT_FAILED: i32 = 1;

/// Convert an OS process status into shell-style exit code semantics.
///
/// On Unix, processes terminated by signal map to `128 + signal`.
pub fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
