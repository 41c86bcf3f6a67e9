//! Parsing of the commands typed into the terminal front end.

use crate::types::{ParseFilterError, TodoId, VisibilityFilter};
use std::str::FromStr;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add <text>                      add a todo
  toggle <id>                     toggle a todo between active and completed
  filter <all|active|completed>   choose which todos are shown
  show                            render the app again
  dump                            print the state as JSON
  metrics                         print store metrics (needs TODO_METRICS=1)
  help                            print this help
  quit | exit                     leave";

/// A parsed command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Add a todo with this text
    Add(String),
    /// Toggle the todo with this id
    Toggle(TodoId),
    /// Switch the visibility filter
    Filter(VisibilityFilter),
    /// Render the app again
    Show,
    /// Print the state as JSON
    Dump,
    /// Print the Prometheus metrics
    Metrics,
    /// Print the help text
    Help,
    /// Leave the loop
    Quit,
}

/// Command parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line held nothing but whitespace
    #[error("empty command")]
    Empty,

    /// The first word is not a known command
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// The command needs an argument that was not given
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// Description of the missing argument
        argument: &'static str,
    },

    /// The id is not a non-negative integer
    #[error("invalid todo id `{0}`")]
    InvalidId(String),

    /// The filter name is not known
    #[error(transparent)]
    InvalidFilter(#[from] ParseFilterError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "add",
                        argument: "the todo text",
                    });
                }
                Ok(Self::Add(rest.to_string()))
            }
            "toggle" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "toggle",
                        argument: "a todo id",
                    });
                }
                parse_id(rest).map(Self::Toggle)
            }
            "filter" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "filter",
                        argument: "all, active or completed",
                    });
                }
                Ok(Self::Filter(rest.parse()?))
            }
            "show" => Ok(Self::Show),
            "dump" => Ok(Self::Dump),
            "metrics" => Ok(Self::Metrics),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// Accepts `3` as well as `#3`, the way ids are rendered
fn parse_id(raw: &str) -> Result<TodoId, CommandError> {
    raw.strip_prefix('#')
        .unwrap_or(raw)
        .parse::<u64>()
        .map(TodoId::new)
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_the_rest_of_the_line() {
        assert_eq!(
            "add  buy milk and eggs ".parse(),
            Ok(Command::Add("buy milk and eggs".to_string()))
        );
    }

    #[test]
    fn parses_toggle_with_or_without_hash() {
        assert_eq!("toggle 3".parse(), Ok(Command::Toggle(TodoId::new(3))));
        assert_eq!("TOGGLE #12".parse(), Ok(Command::Toggle(TodoId::new(12))));
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!(
            "filter active".parse(),
            Ok(Command::Filter(VisibilityFilter::ShowActive))
        );
        assert_eq!(
            "filter SHOW_COMPLETED".parse(),
            Ok(Command::Filter(VisibilityFilter::ShowCompleted))
        );
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!("show".parse(), Ok(Command::Show));
        assert_eq!("dump".parse(), Ok(Command::Dump));
        assert_eq!("metrics".parse(), Ok(Command::Metrics));
        assert_eq!("help".parse(), Ok(Command::Help));
        assert_eq!("?".parse(), Ok(Command::Help));
        assert_eq!("quit".parse(), Ok(Command::Quit));
        assert_eq!(" exit ".parse(), Ok(Command::Quit));
    }

    #[test]
    fn reports_errors() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "remove 1".parse::<Command>(),
            Err(CommandError::Unknown("remove".to_string()))
        );
        assert_eq!(
            "add".parse::<Command>(),
            Err(CommandError::MissingArgument {
                command: "add",
                argument: "the todo text",
            })
        );
        assert_eq!(
            "toggle x".parse::<Command>(),
            Err(CommandError::InvalidId("x".to_string()))
        );
        assert_eq!(
            "filter some".parse::<Command>(),
            Err(CommandError::InvalidFilter(ParseFilterError("some".to_string())))
        );
    }

    #[test]
    fn help_lists_every_command() {
        for word in ["add", "toggle", "filter", "show", "dump", "metrics", "help", "quit"] {
            assert!(HELP.contains(word), "help is missing `{word}`");
        }
    }
}
