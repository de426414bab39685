use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents all user commands the session understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Quit,

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    ToggleCollapse,
    ToggleHidden,
    ToggleGitMode,
    ClearFilters,
    Copy,
    ExportText,
    ExportSvg,

    // Editing
    BeginAnnotation,
    BeginSearch,
    InputChar(char),
    Backspace,
    Commit,
    Cancel,

    /// Several commands applied in order
    Sequence(Vec<Command>),
}

impl Command {
    /// Parse a command from its script name.
    ///
    /// Besides the plain names, `type:TEXT` types characters into the active
    /// input, and `search:TERM` / `annotate:TEXT` run a whole edit and commit it.
    pub fn from_string(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        if let Some(text) = trimmed.strip_prefix("type:") {
            return Ok(Command::Sequence(text.chars().map(Command::InputChar).collect()));
        }
        if let Some(term) = trimmed.strip_prefix("search:") {
            return Ok(Self::edit(Command::BeginSearch, term));
        }
        if let Some(text) = trimmed.strip_prefix("annotate:") {
            return Ok(Self::edit(Command::BeginAnnotation, text));
        }

        match trimmed.to_lowercase().as_str() {
            "quit" | "q" => Ok(Command::Quit),
            "up" | "k" => Ok(Command::MoveUp),
            "down" | "j" => Ok(Command::MoveDown),
            "page_up" => Ok(Command::PageUp),
            "page_down" => Ok(Command::PageDown),
            "home" => Ok(Command::Home),
            "end" => Ok(Command::End),
            "toggle_collapse" | "space" => Ok(Command::ToggleCollapse),
            "toggle_hidden" => Ok(Command::ToggleHidden),
            "toggle_git" | "git" | "g" => Ok(Command::ToggleGitMode),
            "clear_filters" => Ok(Command::ClearFilters),
            "copy" | "c" => Ok(Command::Copy),
            "export_text" | "s" => Ok(Command::ExportText),
            "export_svg" | "p" => Ok(Command::ExportSvg),
            "annotate" | "i" => Ok(Command::BeginAnnotation),
            "search" | "/" => Ok(Command::BeginSearch),
            "backspace" => Ok(Command::Backspace),
            "commit" | "enter" => Ok(Command::Commit),
            "cancel" | "escape" | "esc" => Ok(Command::Cancel),
            _ => Err(format!("Unknown command: {}", s)),
        }
    }

    /// Parse a comma-separated command list
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Command::from_string)
            .collect()
    }

    fn edit(begin: Command, text: &str) -> Command {
        let mut commands = vec![begin];
        commands.extend(text.chars().map(Command::InputChar));
        commands.push(Command::Commit);
        Command::Sequence(commands)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Quit => write!(f, "quit"),
            Command::MoveUp => write!(f, "up"),
            Command::MoveDown => write!(f, "down"),
            Command::PageUp => write!(f, "page_up"),
            Command::PageDown => write!(f, "page_down"),
            Command::Home => write!(f, "home"),
            Command::End => write!(f, "end"),
            Command::ToggleCollapse => write!(f, "toggle_collapse"),
            Command::ToggleHidden => write!(f, "toggle_hidden"),
            Command::ToggleGitMode => write!(f, "toggle_git"),
            Command::ClearFilters => write!(f, "clear_filters"),
            Command::Copy => write!(f, "copy"),
            Command::ExportText => write!(f, "export_text"),
            Command::ExportSvg => write!(f, "export_svg"),
            Command::BeginAnnotation => write!(f, "annotate"),
            Command::BeginSearch => write!(f, "search"),
            Command::InputChar(c) => write!(f, "type:{}", c),
            Command::Backspace => write!(f, "backspace"),
            Command::Commit => write!(f, "commit"),
            Command::Cancel => write!(f, "cancel"),
            Command::Sequence(commands) => {
                let parts: Vec<String> = commands.iter().map(Command::to_string).collect();
                write!(f, "[{}]", parts.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_string() {
        assert_eq!(Command::from_string("quit").unwrap(), Command::Quit);
        assert_eq!(Command::from_string("q").unwrap(), Command::Quit);
        assert_eq!(Command::from_string("j").unwrap(), Command::MoveDown);
        assert_eq!(Command::from_string("UP").unwrap(), Command::MoveUp);
        assert_eq!(Command::from_string("toggle_collapse").unwrap(), Command::ToggleCollapse);
        assert_eq!(Command::from_string("esc").unwrap(), Command::Cancel);
        assert!(Command::from_string("invalid").is_err());
    }

    #[test]
    fn test_search_shorthand() {
        let command = Command::from_string("search:ab").unwrap();
        assert_eq!(
            command,
            Command::Sequence(vec![
                Command::BeginSearch,
                Command::InputChar('a'),
                Command::InputChar('b'),
                Command::Commit,
            ])
        );
    }

    #[test]
    fn test_annotate_keeps_case_and_spaces() {
        let command = Command::from_string("annotate:Hi there").unwrap();
        match command {
            Command::Sequence(commands) => {
                assert_eq!(commands.len(), 10);
                assert_eq!(commands[1], Command::InputChar('H'));
                assert_eq!(commands[3], Command::InputChar(' '));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_list() {
        let commands = Command::parse_list("down, toggle_collapse,,git").unwrap();
        assert_eq!(
            commands,
            vec![Command::MoveDown, Command::ToggleCollapse, Command::ToggleGitMode]
        );
        assert!(Command::parse_list("down,nope").is_err());
    }

    #[test]
    fn test_display_round_trip_for_simple_commands() {
        for command in [Command::MoveDown, Command::ExportSvg, Command::ToggleGitMode, Command::Commit] {
            assert_eq!(Command::from_string(&command.to_string()).unwrap(), command);
        }
    }
}
