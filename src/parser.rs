use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::ParseError;

/// A control or redirection operator recognised outside of quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `|`
    Pipe,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `;`
    Semicolon,
    /// `<`
    Input,
    /// `>`
    Output,
    /// `>>`
    Append,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operator::Pipe => "|",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Semicolon => ";",
            Operator::Input => "<",
            Operator::Output => ">",
            Operator::Append => ">>",
        };
        f.write_str(text)
    }
}

/// A lexical unit of an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word with quoting already removed.
    Word(String),
    Operator(Operator),
}

/// States for the tokenizer state machine.
enum State {
    /// Between tokens: whitespace is skipped
    Normal,
    /// Building a word: whitespace or an operator ends it
    InWord,
    /// Inside double quotes: whitespace and operators are literal
    InDoubleQuote,
    /// Inside single quotes: everything is literal
    InSingleQuote,
}

fn is_operator_start(ch: char) -> bool {
    matches!(ch, '|' | '&' | ';' | '<' | '>')
}

/// Consume the rest of an operator whose first character is `first`.
fn read_operator(first: char, chars: &mut Peekable<Chars<'_>>) -> Result<Operator, ParseError> {
    let op = match first {
        '|' if chars.next_if_eq(&'|').is_some() => Operator::Or,
        '|' => Operator::Pipe,
        '&' if chars.next_if_eq(&'&').is_some() => Operator::And,
        '&' => return Err(ParseError::Background),
        ';' => Operator::Semicolon,
        '<' => Operator::Input,
        '>' if chars.next_if_eq(&'>').is_some() => Operator::Append,
        '>' => Operator::Output,
        other => unreachable!("not an operator character: {other:?}"),
    };
    Ok(op)
}

/// Tokenize a line into words and operators.
///
/// Quotes and backslashes make operator characters part of a word, so
/// `echo "a|b"` is two words and no pipe.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = State::Normal;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match (&state, ch) {
            // ── Normal state: between tokens ──
            (State::Normal, ' ' | '\t') => {}
            (State::Normal, '"') => state = State::InDoubleQuote,
            (State::Normal, '\'') => state = State::InSingleQuote,
            (State::Normal, '\\') => {
                current.push(chars.next().unwrap_or('\\'));
                state = State::InWord;
            }
            (State::Normal, c) if is_operator_start(c) => {
                tokens.push(Token::Operator(read_operator(c, &mut chars)?));
            }
            (State::Normal, c) => {
                current.push(c);
                state = State::InWord;
            }

            // ── InWord state: building a token ──
            (State::InWord, ' ' | '\t') => {
                tokens.push(Token::Word(std::mem::take(&mut current)));
                state = State::Normal;
            }
            (State::InWord, '"') => state = State::InDoubleQuote,
            (State::InWord, '\'') => state = State::InSingleQuote,
            (State::InWord, '\\') => current.push(chars.next().unwrap_or('\\')),
            (State::InWord, c) if is_operator_start(c) => {
                tokens.push(Token::Word(std::mem::take(&mut current)));
                tokens.push(Token::Operator(read_operator(c, &mut chars)?));
                state = State::Normal;
            }
            (State::InWord, c) => current.push(c),

            // ── InDoubleQuote state: inside "..." ──
            (State::InDoubleQuote, '"') => state = State::InWord,
            (State::InDoubleQuote, '\\') => {
                match chars.next_if(|&c| matches!(c, '"' | '\\' | '$' | '`')) {
                    Some(escaped) => current.push(escaped),
                    None => current.push('\\'),
                }
            }
            (State::InDoubleQuote, c) => current.push(c),

            // ── InSingleQuote state: inside '...' ──
            (State::InSingleQuote, '\'') => state = State::InWord,
            (State::InSingleQuote, c) => current.push(c),
        }
    }

    match state {
        // A closed quote leaves us InWord, so `""` still yields an empty word.
        State::InWord => tokens.push(Token::Word(current)),
        State::Normal => {}
        State::InDoubleQuote => return Err(ParseError::UnterminatedQuote("double")),
        State::InSingleQuote => return Err(ParseError::UnterminatedQuote("single")),
    }

    Ok(tokens)
}
