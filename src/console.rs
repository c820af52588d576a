//! Console input for the terminal host.

use std::path::PathBuf;

use thiserror::Error;

pub const HELP: &str = "\
Commands:
  select <path>   choose the file to upload
  upload [path]   upload the chosen (or given) file
  get <n>         download file number <n> from the list
  refresh         reload the file list
  help            show this help
  quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Select(PathBuf),
    Upload(Option<PathBuf>),
    Get(usize),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty input")]
    Empty,
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Not a row number: {0}")]
    BadNumber(String),
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (cmd, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    match cmd.to_lowercase().as_str() {
        "select" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("path"));
            }
            Ok(ConsoleCommand::Select(PathBuf::from(rest)))
        }
        "upload" => Ok(ConsoleCommand::Upload(
            (!rest.is_empty()).then(|| PathBuf::from(rest)),
        )),
        "get" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("n"));
            }
            rest.parse()
                .map(ConsoleCommand::Get)
                .map_err(|_| ParseError::BadNumber(rest.to_string()))
        }
        "refresh" | "ls" => Ok(ConsoleCommand::Refresh),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}
