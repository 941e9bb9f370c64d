use std::io::Write;
use std::process::{Command, Stdio};

fn run_shell(lines: &[&str]) -> std::process::Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_osh"))
        .arg("-t")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn osh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        for line in lines {
            writeln!(stdin, "{line}").expect("write line");
        }
    }

    child.wait_with_output().expect("wait output")
}

#[test]
fn always_chain_runs_everything() {
    let output = run_shell(&["false ; echo one ; false ; echo two"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "one\ntwo\n");
}

#[test]
fn and_skips_after_failure() {
    let output = run_shell(&["false && echo SHOULD_NOT_RUN", "echo next line"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("SHOULD_NOT_RUN"), "stdout was: {stdout}");
    assert!(stdout.contains("next line"), "stdout was: {stdout}");
}

#[test]
fn or_skips_after_success() {
    let output = run_shell(&["true || echo SHOULD_NOT_RUN"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.is_empty(), "stdout was: {stdout}");
}

#[test]
fn or_runs_after_failure() {
    let output = run_shell(&["false || echo fallback"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "fallback\n");
}

#[test]
fn broken_chain_stops_the_rest_of_the_line() {
    // The chain ends at the first closed gate; later operators are not consulted.
    let output = run_shell(&["false && echo skipped || echo ALSO_SKIPPED"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.is_empty(), "stdout was: {stdout}");
}

#[test]
fn missing_program_does_not_kill_the_shell() {
    let output = run_shell(&["osh-no-such-program-xyz || echo RECOVERED", "echo ALIVE"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stdout.contains("RECOVERED"), "stdout was: {stdout}");
    assert!(stdout.contains("ALIVE"), "stdout was: {stdout}");
    assert!(
        stderr.contains("osh-no-such-program-xyz: command not found"),
        "stderr was: {stderr}"
    );
}

#[test]
fn missing_program_exit_status_is_127() {
    let output = run_shell(&["osh-no-such-program-xyz"]);
    assert_eq!(output.status.code(), Some(127));
}

#[test]
fn parse_error_is_reported_and_loop_continues() {
    let output = run_shell(&["echo hi &&", "echo ALIVE"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("osh: syntax error"), "stderr was: {stderr}");
    assert_eq!(stdout, "ALIVE\n");
}

#[test]
fn background_operator_is_rejected() {
    let output = run_shell(&["sleep 5 &"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not supported"), "stderr was: {stderr}");
}

#[test]
fn exit_stops_reading_lines() {
    let output = run_shell(&["echo before", "exit", "echo AFTER_EXIT"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "before\n");
}

#[test]
fn shell_exit_status_is_last_command_status() {
    let output = run_shell(&["true", "sh -c 'exit 7'"]);
    assert_eq!(output.status.code(), Some(7));

    let output = run_shell(&["false", "true"]);
    assert!(output.status.success());
}

#[cfg(unix)]
#[test]
fn signal_death_is_reported_as_128_plus_signal() {
    let output = run_shell(&["sh -c 'kill -TERM $$'"]);
    assert_eq!(output.status.code(), Some(128 + 15));
}

#[test]
fn quoted_operators_are_plain_arguments() {
    let output = run_shell(&[r#"echo "a && b" '|' \; done"#]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "a && b | ; done\n");
}

#[test]
fn interactive_mode_prints_prompt() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_osh"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn osh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        writeln!(stdin, "echo hello").expect("write line");
    }

    let output = child.wait_with_output().expect("wait output");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("osh> "), "stdout was: {stdout}");
    assert!(stdout.contains("hello\n"), "stdout was: {stdout}");
}

#[test]
fn interactive_mode_honours_line_limit() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_osh"))
        .args(["--max-lines", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn osh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        for line in ["echo one", "echo two", "echo THREE"] {
            writeln!(stdin, "{line}").expect("write line");
        }
    }

    let output = child.wait_with_output().expect("wait output");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("two"), "stdout was: {stdout}");
    assert!(!stdout.contains("THREE"), "stdout was: {stdout}");
}

#[test]
fn invalid_utf8_line_does_not_stop_the_shell() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_osh"))
        .arg("-t")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn osh");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(b"echo before\necho caf\xe9\necho AFTER\n")
            .expect("write lines");
    }

    let output = child.wait_with_output().expect("wait output");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("before"), "stdout was: {stdout}");
    assert!(stdout.contains("caf"), "stdout was: {stdout}");
    assert!(stdout.contains("AFTER"), "stdout was: {stdout}");
    assert!(output.status.success(), "status was: {:?}", output.status);
}
