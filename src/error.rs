use std::io;

use thiserror::Error;

/// Syntax problems found while turning a line into descriptors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error near unexpected token `{0}'")]
    UnexpectedToken(String),

    #[error("syntax error: expected command after `{0}'")]
    MissingCommand(String),

    #[error("syntax error: expected filename after `{0}'")]
    MissingRedirectTarget(String),

    #[error("syntax error: redirection without a command")]
    RedirectWithoutCommand,

    #[error("ambiguous {0} redirect")]
    AmbiguousRedirect(&'static str),

    #[error("syntax error: unterminated {0} quote")]
    UnterminatedQuote(&'static str),

    #[error("background execution (`&') is not supported")]
    Background,
}

/// Failures that abort a whole `execute` call.
///
/// Anything that only affects one child (missing program, unreadable file)
/// is an exit status instead.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("invalid command sequence at position {index}: {reason}")]
    InvalidSequence { index: usize, reason: &'static str },

    #[error("failed to create pipe: {0}")]
    Pipe(#[source] io::Error),

    #[error("{program}: failed to spawn process: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program}: failed to wait for process: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    /// Whether the shell itself should stop after this error.
    ///
    /// A malformed sequence only spoils one line; running out of pipes,
    /// processes or the ability to wait does not get better on the next one.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExecError::InvalidSequence { .. })
    }
}
