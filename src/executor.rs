use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use os_pipe::{PipeReader, PipeWriter};
use tracing::debug;

use crate::ast::{ChainMode, CommandDescriptor, InputMode, OutputMode, WriteMode};
use crate::error::ExecError;
use crate::status;

/// Bookkeeping for one `execute` call. Never outlives the call.
struct ExecutionState {
    /// Chain mode declared by the previous descriptor.
    previous_chain: ChainMode,
    /// Exit code of the most recently completed child.
    previous_status: i32,
    /// Read end of the pipe written by the previous descriptor.
    carry: Option<PipeReader>,
}

impl ExecutionState {
    fn new() -> Self {
        Self {
            previous_chain: ChainMode::Always,
            previous_status: 0,
            carry: None,
        }
    }

    /// Whether the next descriptor may run given the previous outcome.
    fn gate_open(&self) -> bool {
        match self.previous_chain {
            ChainMode::Always => true,
            ChainMode::OnSuccess => self.previous_status == 0,
            ChainMode::OnFail => self.previous_status != 0,
        }
    }
}

/// Check the pairing rules the parser is expected to uphold.
///
/// Every `FromPipe` descriptor must directly follow a `ToPipe` one, and no
/// program name may be empty.
pub fn validate(sequence: &[CommandDescriptor]) -> Result<(), ExecError> {
    for (index, descriptor) in sequence.iter().enumerate() {
        if descriptor.program.is_empty() {
            return Err(ExecError::InvalidSequence {
                index,
                reason: "empty program name",
            });
        }

        if descriptor.input == InputMode::FromPipe {
            let upstream = index
                .checked_sub(1)
                .map(|prev| &sequence[prev].output);
            if upstream != Some(&OutputMode::ToPipe) {
                return Err(ExecError::InvalidSequence {
                    index,
                    reason: "pipe input without an upstream pipe",
                });
            }
        }
    }
    Ok(())
}

/// Run `sequence` in order, one child at a time.
///
/// Returns the exit code of the last child that ran (0 if none ran). Child
/// failures, including a missing program or an unopenable redirection file,
/// come back as exit codes and feed the chain gating. Only an invalid
/// sequence or OS resource exhaustion produce an `Err`, and either one
/// abandons the rest of the sequence.
pub fn execute(sequence: &[CommandDescriptor]) -> Result<i32, ExecError> {
    validate(sequence)?;

    let mut state = ExecutionState::new();

    for (index, descriptor) in sequence.iter().enumerate() {
        if !state.gate_open() {
            debug!(
                index,
                chain = ?state.previous_chain,
                status = state.previous_status,
                "chain broken, skipping remaining commands"
            );
            break;
        }

        // Taken unconditionally: a carry nobody reads is closed at the end of
        // this iteration.
        let carry_in = state.carry.take();

        let (next_carry, pipe_out) = if descriptor.output == OutputMode::ToPipe {
            let (reader, writer) = os_pipe::pipe().map_err(|e| {
                debug!(program = %descriptor.program, "pipe allocation failed: {e}");
                ExecError::Pipe(e)
            })?;
            (Some(reader), Some(writer))
        } else {
            (None, None)
        };

        state.previous_status = run_descriptor(index, descriptor, carry_in, pipe_out)?;
        state.previous_chain = descriptor.chain;
        state.carry = next_carry;
    }

    Ok(state.previous_status)
}

/// Spawn one descriptor and block until it exits.
///
/// The pipe ends passed in are moved into the child's stdio configuration,
/// which is dropped before waiting, so the parent holds no copy of them while
/// the child runs.
fn run_descriptor(
    index: usize,
    descriptor: &CommandDescriptor,
    carry_in: Option<PipeReader>,
    pipe_out: Option<PipeWriter>,
) -> Result<i32, ExecError> {
    let program = &descriptor.program;

    let stdout: Stdio = match (&descriptor.output, pipe_out) {
        (OutputMode::ToFile(path, mode), _) => match open_output(path, *mode) {
            Ok(file) => file.into(),
            Err(e) => return Ok(redirect_failed(path, &e)),
        },
        (OutputMode::ToPipe, Some(writer)) => writer.into(),
        (OutputMode::ToPipe, None) => {
            return Err(ExecError::InvalidSequence {
                index,
                reason: "pipe output without a pipe",
            });
        }
        (OutputMode::Inherit, _) => Stdio::inherit(),
    };

    let stdin: Stdio = match (&descriptor.input, carry_in) {
        (InputMode::FromFile(path), _) => match File::open(path) {
            Ok(file) => file.into(),
            Err(e) => return Ok(redirect_failed(path, &e)),
        },
        (InputMode::FromPipe, Some(reader)) => reader.into(),
        (InputMode::FromPipe, None) => {
            return Err(ExecError::InvalidSequence {
                index,
                reason: "pipe input without an upstream pipe",
            });
        }
        (InputMode::Inherit, _) => Stdio::inherit(),
    };

    let mut command = Command::new(program);
    command.args(&descriptor.arguments).stdin(stdin).stdout(stdout);

    debug!(index, %program, args = ?descriptor.arguments, "spawning");
    let spawned = command.spawn();
    // Release the parent's copies of any pipe ends and files now.
    drop(command);

    let mut child = match spawned {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("osh: {program}: command not found");
            return Ok(status::NOT_FOUND);
        }
        Err(e) if is_resource_exhaustion(&e) => {
            debug!(%program, "spawn failed: {e}");
            return Err(ExecError::Spawn {
                program: program.clone(),
                source: e,
            });
        }
        Err(e) => {
            eprintln!("osh: {program}: {e}");
            return Ok(status::NOT_EXECUTABLE);
        }
    };

    // Blocks until the child exits, before any consumer of its pipe starts.
    // A producer that fills the pipe buffer therefore never finishes; the
    // strictly sequential model accepts that.
    let exit_status = child.wait().map_err(|source| ExecError::Wait {
        program: program.clone(),
        source,
    })?;
    let code = status::exit_code(exit_status);
    debug!(index, %program, code, "child exited");
    Ok(code)
}

/// Open a redirection target for writing, creating it if absent.
fn open_output(path: &Path, mode: WriteMode) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Truncate => options.write(true).truncate(true),
        WriteMode::Append => options.append(true),
    };
    options.open(path)
}

fn redirect_failed(path: &Path, err: &io::Error) -> i32 {
    eprintln!("osh: {}: {err}", path.display());
    status::REDIRECT_FAILED
}

/// Spawn errors that mean the OS is out of processes, memory or descriptors.
#[cfg(unix)]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EAGAIN | libc::ENOMEM | libc::EMFILE | libc::ENFILE)
    )
}

#[cfg(not(unix))]
fn is_resource_exhaustion(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::OutOfMemory
}
