use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Mode};
use crate::command::Command;
use crate::executor::Executor;

pub fn handle_event(event: Event, app: &mut App) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            if let Some(command) = key_to_command(key, app.mode) {
                Executor::execute(app, command);
            }
        }
        Event::Resize(_, _) => {
            // The next draw picks up the new size
            app.clamp_cursor();
        }
        _ => {}
    }
}

/// Translate a key press into a command for the given mode
pub fn key_to_command(key: KeyEvent, mode: Mode) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match mode {
        Mode::Navigation => navigation_command(key.code),
        Mode::AnnotationEdit | Mode::SearchEdit => edit_command(key.code),
    }
}

fn navigation_command(code: KeyCode) -> Option<Command> {
    let command = match code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Up | KeyCode::Char('k') => Command::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Command::MoveDown,
        KeyCode::PageUp => Command::PageUp,
        KeyCode::PageDown => Command::PageDown,
        KeyCode::Home => Command::Home,
        KeyCode::End => Command::End,
        KeyCode::Char(' ') => Command::ToggleCollapse,
        KeyCode::Enter => Command::ToggleHidden,
        KeyCode::Char('i') => Command::BeginAnnotation,
        KeyCode::Char('/') => Command::BeginSearch,
        KeyCode::Char('g') => Command::ToggleGitMode,
        KeyCode::Esc => Command::ClearFilters,
        KeyCode::Char('c') => Command::Copy,
        KeyCode::Char('s') => Command::ExportText,
        KeyCode::Char('p') => Command::ExportSvg,
        _ => return None,
    };
    Some(command)
}

fn edit_command(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char(c) => Some(Command::InputChar(c)),
        KeyCode::Backspace => Some(Command::Backspace),
        KeyCode::Enter => Some(Command::Commit),
        KeyCode::Esc => Some(Command::Cancel),
        _ => None,
    }
}
