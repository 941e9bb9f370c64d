use std::path::PathBuf;

/// Controls whether the *next* descriptor runs, based on this one's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChainMode {
    /// `;` (or end of line): run the next command unconditionally.
    #[default]
    Always,
    /// `&&`: run the next command only if this one exited with 0.
    OnSuccess,
    /// `||`: run the next command only if this one exited non-zero.
    OnFail,
}

/// How an output file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `>`
    Truncate,
    /// `>>`
    Append,
}

/// Where a command reads standard input from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Inherit,
    FromFile(PathBuf),
    /// Read end of the pipe opened by the preceding descriptor.
    FromPipe,
}

/// Where a command writes standard output to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Inherit,
    ToFile(PathBuf, WriteMode),
    /// Write end of a fresh pipe consumed by the following descriptor.
    ToPipe,
}

/// One fully parsed command: program, arguments and stream wiring.
///
/// A line like `sort < in.txt | uniq && echo ok` produces three descriptors;
/// the `&&` lands on the second one as [`ChainMode::OnSuccess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub program: String,
    pub arguments: Vec<String>,
    pub input: InputMode,
    pub output: OutputMode,
    pub chain: ChainMode,
}

impl CommandDescriptor {
    /// A descriptor that inherits every stream and always continues.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: Vec::new(),
            input: InputMode::Inherit,
            output: OutputMode::Inherit,
            chain: ChainMode::Always,
        }
    }

    pub fn args<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    pub fn input(mut self, input: InputMode) -> Self {
        self.input = input;
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn chain(mut self, chain: ChainMode) -> Self {
        self.chain = chain;
        self
    }
}
