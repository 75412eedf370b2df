/// Commands accepted by the terminal shell.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the whole page.
    Show,
    /// List the inputs only.
    Fields,
    /// Change one input; the value may contain spaces and may be empty.
    Set { name: String, value: String },
    /// Fill every input with example values.
    Example,
    /// Validate and request a prediction.
    Submit,
    /// Print the raw JSON of the latest result.
    Raw,
    /// Fetch the model metadata again.
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand(String),
    MissingFeatureName,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => f.write_str("empty command"),
            ParseError::UnknownCommand(cmd) => {
                write!(f, "unknown command '{}', type 'help' for a list", cmd)
            }
            ParseError::MissingFeatureName => f.write_str("usage: set <feature> <value>"),
        }
    }
}

pub const HELP: &str = "\
Commands:
  show                   print the page
  fields                 list the inputs
  set <feature> <value>  change one input (omit the value to clear it)
  example                fill every input with example values
  submit                 evaluate risk (Ctrl-C cancels a running evaluation)
  raw                    print the raw response of the latest evaluation
  reload                 fetch the model metadata again (clears the inputs)
  help                   show this help
  quit                   leave the shell";

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "show" | "page" => Ok(Command::Show),
        "fields" | "inputs" => Ok(Command::Fields),
        "example" | "fill" => Ok(Command::Example),
        "submit" | "evaluate" => Ok(Command::Submit),
        "raw" => Ok(Command::Raw),
        "reload" | "refresh" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "set" => {
            let rest = rest.trim_start();
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, value.trim_end_matches(['\r', '\n'])),
                None => (rest.trim_end(), ""),
            };
            if name.is_empty() {
                return Err(ParseError::MissingFeatureName);
            }
            Ok(Command::Set {
                name: name.to_string(),
                value: value.to_string(),
            })
        }
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}
