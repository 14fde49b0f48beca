//! Parsing of the lines typed at the prompt.

use cardsync::{Command, GameId};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    /// Redraw the current view.
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("'{0}' needs an argument, e.g. '{0} {1}'")]
    MissingArgument(&'static str, &'static str),

    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  list                 refresh the lobby
  create               open a new table
  name NAME            set your player name
  join GAME_ID         sit down at a table
  leave                stand up
  bet AMOUNT           raise by AMOUNT chips
  call | fold          betting actions
  reveal               show your hand to the table
  show                 redraw the table
  quit";

/// Parses one prompt line. Blank lines are `Ok(None)`.
pub fn parse_input(line: &str) -> Result<Option<Input>, ParseError> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let rest = parts.collect::<Vec<_>>().join(" ");
    let arg = |name, example| {
        if rest.is_empty() {
            Err(ParseError::MissingArgument(name, example))
        } else {
            Ok(rest.clone())
        }
    };

    let input = match word.to_lowercase().as_str() {
        "list" | "games" => Input::Command(Command::RequestGameList),
        "create" | "new" => Input::Command(Command::CreateGame),
        "name" => Input::Command(Command::SetName(arg("name", "Alice")?)),
        "join" => Input::Command(Command::JoinGame(GameId::new(arg("join", "game-1")?))),
        "leave" => Input::Command(Command::LeaveGame),
        "bet" | "raise" => Input::Command(Command::PlaceBet(arg("bet", "50")?)),
        "call" => Input::Command(Command::Call),
        "fold" => Input::Command(Command::Fold),
        "reveal" => Input::Command(Command::RequestReveal),
        "show" | "state" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(ParseError::Unknown(other.to_owned())),
    };
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_input("   "), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(
            parse_input("list"),
            Ok(Some(Input::Command(Command::RequestGameList)))
        );
        assert_eq!(parse_input("FOLD"), Ok(Some(Input::Command(Command::Fold))));
        assert_eq!(parse_input("quit"), Ok(Some(Input::Quit)));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse_input("join g1"),
            Ok(Some(Input::Command(Command::JoinGame(GameId::new("g1")))))
        );
        assert_eq!(
            parse_input("name Alice Smith"),
            Ok(Some(Input::Command(Command::SetName("Alice Smith".into()))))
        );
        // Amount validation happens in the client, not here.
        assert_eq!(
            parse_input("bet -5"),
            Ok(Some(Input::Command(Command::PlaceBet("-5".into()))))
        );
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            parse_input("join"),
            Err(ParseError::MissingArgument("join", "game-1"))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_input("dance"),
            Err(ParseError::Unknown("dance".into()))
        );
    }
}
