use std::io::IsTerminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the default log filter.
pub const LOG_ENV: &str = "OSH_LOG";

/// Command-line options for `osh`.
#[derive(Parser, Debug)]
#[command(name = "osh", version, about = "A sequential command-chain shell")]
pub struct Options {
    /// Test mode: no prompt, no line limit, no trailing newline.
    #[arg(short = 't', long = "test")]
    pub test_mode: bool,

    /// Maximum number of lines read in interactive mode.
    #[arg(long, default_value_t = 25)]
    pub max_lines: usize,

    /// Log filter (e.g. `osh=debug`); overrides OSH_LOG.
    #[arg(long)]
    pub log: Option<String>,
}

impl Options {
    /// How many lines the loop may read, `None` meaning no limit.
    pub fn line_limit(&self) -> Option<usize> {
        if self.test_mode { None } else { Some(self.max_lines) }
    }
}

/// Install the stderr log subscriber.
///
/// `--log` wins over `OSH_LOG`; with neither set only warnings are shown.
pub fn init_logging(options: &Options) {
    let filter = match &options.log {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
