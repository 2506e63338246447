//! Line commands understood by the interactive form

use std::path::PathBuf;
use std::str::FromStr;

use finqa_core::{DocumentField, FactField};
use thiserror::Error;

pub const HELP: &str = "\
Commands (indices start at 0):
  prompt <text>                 set the prompt
  answer <text>                 set the answer
  fact add                      add a supporting fact
  fact <i> fact <text>          set a fact's text
  fact <i> source <text>        set a fact's source
  fact remove <i>               remove a supporting fact
  doc add                       add a document
  doc <i> link <url>            set the SEC page link
  doc <i> date <YYYY-MM-DD>     set the publication date
  doc <i> file <path>           attach the PDF
  doc <i> nofile                detach the PDF
  doc remove <i>                remove a document
  show                          print the form
  errors                        list every field error
  check                         explain what submit would do
  submit                        submit the form
  instructions                  print the annotator instructions
  help                          this text
  quit                          leave";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid index: {0}")]
    InvalidIndex(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetPrompt(String),
    SetAnswer(String),
    AddFact,
    SetFact {
        index: usize,
        field: FactField,
        value: String,
    },
    RemoveFact(usize),
    AddDocument,
    SetDocument {
        index: usize,
        field: DocumentField,
        value: String,
    },
    AttachFile {
        index: usize,
        path: PathBuf,
    },
    DetachFile(usize),
    RemoveDocument(usize),
    Show,
    Errors,
    Check,
    Submit,
    Instructions,
    Help,
    Quit,
}

/// Split off the first word; the remainder keeps its inner spacing
fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

fn parse_index(word: &str) -> Result<usize, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidIndex(word.to_string()))
}

fn parse_fact(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str = "fact add | fact <i> fact|source <text> | fact remove <i>";

    let (first, rest) = split_word(rest);
    match first {
        "add" => Ok(Command::AddFact),
        "remove" => Ok(Command::RemoveFact(parse_index(rest.trim())?)),
        "" => Err(CommandError::Usage(USAGE)),
        index => {
            let index = parse_index(index)?;
            let (field, value) = split_word(rest);
            let field = FactField::parse(field).ok_or(CommandError::Usage(USAGE))?;
            Ok(Command::SetFact {
                index,
                field,
                value: value.to_string(),
            })
        }
    }
}

fn parse_document(rest: &str) -> Result<Command, CommandError> {
    const USAGE: &str =
        "doc add | doc <i> link|date <text> | doc <i> file <path> | doc <i> nofile | doc remove <i>";

    let (first, rest) = split_word(rest);
    match first {
        "add" => Ok(Command::AddDocument),
        "remove" => Ok(Command::RemoveDocument(parse_index(rest.trim())?)),
        "" => Err(CommandError::Usage(USAGE)),
        index => {
            let index = parse_index(index)?;
            let (field, value) = split_word(rest);
            let field = match field {
                "link" => DocumentField::SecPageLink,
                "date" => DocumentField::DatePublished,
                "file" if value.is_empty() => return Err(CommandError::Usage(USAGE)),
                "file" => {
                    return Ok(Command::AttachFile {
                        index,
                        path: PathBuf::from(value),
                    })
                }
                "nofile" => return Ok(Command::DetachFile(index)),
                other => match DocumentField::parse(other) {
                    Some(DocumentField::File) | None => return Err(CommandError::Usage(USAGE)),
                    Some(field) => field,
                },
            };
            Ok(Command::SetDocument {
                index,
                field,
                value: value.to_string(),
            })
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (head, rest) = split_word(line);
        match head {
            "prompt" => Ok(Command::SetPrompt(rest.to_string())),
            "answer" => Ok(Command::SetAnswer(rest.to_string())),
            "fact" => parse_fact(rest),
            "doc" => parse_document(rest),
            "show" => Ok(Command::Show),
            "errors" => Ok(Command::Errors),
            "check" => Ok(Command::Check),
            "submit" => Ok(Command::Submit),
            "instructions" => Ok(Command::Instructions),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
