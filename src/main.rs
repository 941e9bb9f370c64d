mod ast;
mod chain_parser;
mod config;
mod error;
mod executor;
mod parser;
mod redirect;
mod status;

use std::io::{self, BufRead, Write};

use clap::Parser;

use crate::config::Options;

const PROMPT: &str = "osh> ";

fn main() {
    let options = Options::parse();
    config::init_logging(&options);

    let mut stdin = io::stdin().lock();
    let mut buffer = Vec::new();
    let mut stdout = io::stdout();
    let mut last_exit_code: i32 = 0;
    let mut lines_read = 0;

    loop {
        if options.line_limit().is_some_and(|limit| lines_read >= limit) {
            tracing::debug!(lines_read, "line limit reached");
            break;
        }

        if !options.test_mode {
            print!("{PROMPT}");
            if stdout.flush().is_err() {
                break;
            }
        }

        let input = match read_line(&mut stdin, &mut buffer) {
            Ok(None) => break,
            Ok(Some(line)) => line,
            Err(error) => {
                eprintln!("Error reading input: {error}");
                break;
            }
        };
        lines_read += 1;

        let trimmed = input.trim();
        if trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        let descriptors = match chain_parser::parse_line(trimmed) {
            Ok(descriptors) => descriptors,
            Err(error) => {
                eprintln!("osh: {error}");
                last_exit_code = 2;
                continue;
            }
        };

        match executor::execute(&descriptors) {
            Ok(code) => last_exit_code = code,
            Err(error) if error.is_fatal() => {
                eprintln!("osh: {error}");
                std::process::exit(1);
            }
            Err(error) => {
                eprintln!("osh: {error}");
                last_exit_code = 2;
            }
        }
    }

    if !options.test_mode {
        println!();
    }

    std::process::exit(last_exit_code);
}

/// Read one line as raw bytes, decoding invalid UTF-8 lossily.
///
/// Returns `None` at end of input. Only an I/O error is an `Err`.
fn read_line(reader: &mut impl BufRead, buffer: &mut Vec<u8>) -> io::Result<Option<String>> {
    buffer.clear();
    if reader.read_until(b'\n', buffer)? == 0 {
        return Ok(None);
    }
    if buffer.ends_with(b"\n") {
        buffer.pop();
        if buffer.ends_with(b"\r") {
            buffer.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buffer).into_owned()))
}
