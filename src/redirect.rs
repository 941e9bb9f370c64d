use std::path::PathBuf;

use crate::ast::WriteMode;
use crate::error::ParseError;
use crate::parser::{Operator, Token};

/// File redirections collected from one command segment.
///
/// When the same stream is redirected twice the later one wins, as in `sh`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FileRedirections {
    pub input: Option<PathBuf>,
    pub output: Option<(PathBuf, WriteMode)>,
}

/// Separate redirect operators from regular arguments.
///
/// `tokens` must be a single command segment: control operators (`|`, `&&`,
/// `||`, `;`) are split off by the caller. Returns the plain words and the
/// redirections, or an error when an operator has no file name after it.
pub fn extract_redirections(
    tokens: Vec<Token>,
) -> Result<(Vec<String>, FileRedirections), ParseError> {
    let mut words = Vec::new();
    let mut redirections = FileRedirections::default();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) => words.push(word),
            Token::Operator(op @ Operator::Input) => {
                redirections.input = Some(expect_filename(tokens.next(), op)?);
            }
            Token::Operator(op @ Operator::Output) => {
                let path = expect_filename(tokens.next(), op)?;
                redirections.output = Some((path, WriteMode::Truncate));
            }
            Token::Operator(op @ Operator::Append) => {
                let path = expect_filename(tokens.next(), op)?;
                redirections.output = Some((path, WriteMode::Append));
            }
            Token::Operator(op) => return Err(ParseError::UnexpectedToken(op.to_string())),
        }
    }

    Ok((words, redirections))
}

fn expect_filename(token: Option<Token>, operator: Operator) -> Result<PathBuf, ParseError> {
    match token {
        Some(Token::Word(path)) => Ok(PathBuf::from(path)),
        Some(Token::Operator(op)) => Err(ParseError::UnexpectedToken(op.to_string())),
        None => Err(ParseError::MissingRedirectTarget(operator.to_string())),
    }
}
