use std::error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "\
Available commands:
- insert x
- delete x
- search x
- successor x
- predecessor x
- sort
- min
- max
- height
- len
- save PATH
- load PATH
- help
- exit (end program)";

/// A single line of input to the shell.
#[derive(Debug, PartialEq)]
pub enum Command {
    Insert(i64),
    Delete(i64),
    Search(i64),
    Successor(i64),
    Predecessor(i64),
    Sort,
    Min,
    Max,
    Height,
    Len,
    Save(PathBuf),
    Load(PathBuf),
    Help,
    Exit,
}

#[derive(Debug, PartialEq)]
pub enum ParseCommandError {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidKey(String),
}

impl error::Error for ParseCommandError {}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCommandError::Empty => write!(f, "empty command"),
            ParseCommandError::UnknownCommand(name) => write!(f, "unknown command `{}`", name),
            ParseCommandError::MissingArgument(name) => {
                write!(f, "`{}` expects an argument", name)
            },
            ParseCommandError::InvalidKey(token) => write!(f, "`{}` is not an integer", token),
        }
    }
}

fn parse_key(token: Option<&str>, name: &'static str) -> Result<i64, ParseCommandError> {
    let token = token.ok_or(ParseCommandError::MissingArgument(name))?;
    token
        .parse()
        .map_err(|_| ParseCommandError::InvalidKey(token.to_string()))
}

fn parse_path(token: Option<&str>, name: &'static str) -> Result<PathBuf, ParseCommandError> {
    token
        .map(PathBuf::from)
        .ok_or(ParseCommandError::MissingArgument(name))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(ParseCommandError::Empty)?.to_lowercase();
        let argument = tokens.next();

        let command = match name.as_str() {
            "insert" => Command::Insert(parse_key(argument, "insert")?),
            "delete" => Command::Delete(parse_key(argument, "delete")?),
            "search" => Command::Search(parse_key(argument, "search")?),
            "successor" => Command::Successor(parse_key(argument, "successor")?),
            "predecessor" => Command::Predecessor(parse_key(argument, "predecessor")?),
            "sort" => Command::Sort,
            "min" => Command::Min,
            "max" => Command::Max,
            "height" => Command::Height,
            "len" => Command::Len,
            "save" => Command::Save(parse_path(argument, "save")?),
            "load" => Command::Load(parse_path(argument, "load")?),
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ => return Err(ParseCommandError::UnknownCommand(name)),
        };
        Ok(command)
    }
}
