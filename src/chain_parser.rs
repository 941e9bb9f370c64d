use crate::ast::{ChainMode, CommandDescriptor, InputMode, OutputMode};
use crate::error::ParseError;
use crate::parser::{self, Operator, Token};
use crate::redirect::extract_redirections;

/// Parse one input line into the ordered descriptors the executor runs.
///
/// An empty or blank line yields an empty sequence.
pub fn parse_line(input: &str) -> Result<Vec<CommandDescriptor>, ParseError> {
    parse_chain(parser::tokenize(input)?)
}

/// Split tokens on control operators (`|`, `&&`, `||`, `;`) into descriptors.
///
/// The operator after a command becomes that command's [`ChainMode`]; a `|`
/// sets [`OutputMode::ToPipe`] on the left side and [`InputMode::FromPipe`]
/// on the right side. A trailing `;` is accepted, any other trailing
/// operator is an error.
pub fn parse_chain(tokens: Vec<Token>) -> Result<Vec<CommandDescriptor>, ParseError> {
    let mut descriptors = Vec::new();
    let mut segment: Vec<Token> = Vec::new();
    // Control operator that ended the previous segment.
    let mut last_operator: Option<Operator> = None;

    for token in tokens {
        let operator = match token {
            Token::Operator(
                op @ (Operator::Pipe | Operator::And | Operator::Or | Operator::Semicolon),
            ) => op,
            other => {
                segment.push(other);
                continue;
            }
        };

        if segment.is_empty() {
            return Err(ParseError::UnexpectedToken(operator.to_string()));
        }

        let piped_in = last_operator == Some(Operator::Pipe);
        descriptors.push(build_descriptor(
            std::mem::take(&mut segment),
            piped_in,
            Some(operator),
        )?);
        last_operator = Some(operator);
    }

    if segment.is_empty() {
        return match last_operator {
            None | Some(Operator::Semicolon) => Ok(descriptors),
            Some(op) => Err(ParseError::MissingCommand(op.to_string())),
        };
    }

    let piped_in = last_operator == Some(Operator::Pipe);
    descriptors.push(build_descriptor(segment, piped_in, None)?);
    Ok(descriptors)
}

fn build_descriptor(
    segment: Vec<Token>,
    piped_in: bool,
    terminator: Option<Operator>,
) -> Result<CommandDescriptor, ParseError> {
    let (words, redirections) = extract_redirections(segment)?;
    let mut words = words.into_iter();
    let Some(program) = words.next() else {
        return Err(ParseError::RedirectWithoutCommand);
    };

    let input = match (piped_in, redirections.input) {
        (true, Some(_)) => return Err(ParseError::AmbiguousRedirect("input")),
        (true, None) => InputMode::FromPipe,
        (false, Some(path)) => InputMode::FromFile(path),
        (false, None) => InputMode::Inherit,
    };

    let piped_out = terminator == Some(Operator::Pipe);
    let output = match (piped_out, redirections.output) {
        (true, Some(_)) => return Err(ParseError::AmbiguousRedirect("output")),
        (true, None) => OutputMode::ToPipe,
        (false, Some((path, mode))) => OutputMode::ToFile(path, mode),
        (false, None) => OutputMode::Inherit,
    };

    let chain = match terminator {
        Some(Operator::And) => ChainMode::OnSuccess,
        Some(Operator::Or) => ChainMode::OnFail,
        _ => ChainMode::Always,
    };

    Ok(CommandDescriptor::new(program)
        .args(words)
        .input(input)
        .output(output)
        .chain(chain))
}
