#[cfg(unix)]
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
#[cfg(unix)]
use std::process::{Command, Stdio};

/// Run `osh -t` with at most `max_fds` open file descriptors.
#[cfg(unix)]
fn run_shell_with_fd_limit(lines: &[&str], max_fds: libc::rlim_t) -> std::process::Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_osh"));
    command
        .arg("-t")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    unsafe {
        command.pre_exec(move || {
            let limit = libc::rlimit {
                rlim_cur: max_fds,
                rlim_max: max_fds,
            };
            if libc::setrlimit(libc::RLIMIT_NOFILE, &limit) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    let mut child = command.spawn().expect("spawn osh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        for line in lines {
            writeln!(stdin, "{line}").expect("write line");
        }
    }

    child.wait_with_output().expect("wait output")
}

#[cfg(unix)]
#[test]
fn pipe_exhaustion_aborts_the_shell() {
    // Only stdin, stdout, stderr and one spare descriptor: no room for a pipe.
    let output = run_shell_with_fd_limit(&["echo a | cat", "echo SHOULD_NOT_RUN"], 4);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "stderr was: {stderr}");
    assert!(stderr.contains("osh: failed to create pipe"), "stderr was: {stderr}");
    assert!(!stdout.contains("SHOULD_NOT_RUN"), "stdout was: {stdout}");
    assert!(!stdout.contains('a'), "stdout was: {stdout}");
}

#[cfg(unix)]
#[test]
fn fatal_error_is_reported_once() {
    let output = run_shell_with_fd_limit(&["echo a | cat"], 4);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr.matches("failed to create pipe").count(),
        1,
        "stderr was: {stderr}"
    );
}
