use crate::app::{App, Mode};
use crate::command::Command;

/// Applies commands to a live session
pub struct Executor;

impl Executor {
    /// Apply a command in the context of the current mode.
    ///
    /// Returns `false` when the command has no meaning in that mode.
    pub fn execute(app: &mut App, command: Command) -> bool {
        log::debug!("executor: {} in {:?}", command, app.mode);
        if let Command::Sequence(commands) = command {
            return Self::execute_sequence(app, commands);
        }
        match app.mode {
            Mode::Navigation => Self::execute_navigation(app, command),
            Mode::AnnotationEdit | Mode::SearchEdit => Self::execute_edit(app, command),
        }
    }

    fn execute_navigation(app: &mut App, command: Command) -> bool {
        app.clear_status();
        match command {
            Command::Quit => app.quit(),
            Command::MoveUp => {
                app.move_up();
            }
            Command::MoveDown => {
                app.move_down();
            }
            Command::PageUp => app.page_up(),
            Command::PageDown => app.page_down(),
            Command::Home => app.go_to_top(),
            Command::End => app.go_to_bottom(),
            Command::ToggleCollapse => {
                app.toggle_collapse();
            }
            Command::ToggleHidden => {
                app.toggle_hidden();
            }
            Command::ToggleGitMode => app.toggle_git_mode(),
            Command::ClearFilters | Command::Cancel => app.clear_filters(),
            Command::Copy => app.copy_to_clipboard(),
            Command::ExportText => app.export_text(),
            Command::ExportSvg => app.export_svg(),
            Command::BeginAnnotation => {
                app.begin_annotation();
            }
            Command::BeginSearch => app.begin_search(),
            Command::InputChar(_) | Command::Backspace | Command::Commit | Command::Sequence(_) => return false,
        }
        true
    }

    fn execute_edit(app: &mut App, command: Command) -> bool {
        let editing_annotation = app.mode == Mode::AnnotationEdit;
        match command {
            Command::Quit => app.quit(),
            Command::InputChar(c) => app.input_char(c),
            Command::Backspace => app.input_backspace(),
            Command::Commit if editing_annotation => app.commit_annotation(),
            Command::Commit => app.commit_search(),
            Command::Cancel if editing_annotation => app.cancel_annotation(),
            Command::Cancel => app.cancel_search(),
            _ => return false,
        }
        true
    }

    fn execute_sequence(app: &mut App, commands: Vec<Command>) -> bool {
        let mut applied = true;
        for command in commands {
            if app.should_quit {
                break;
            }
            applied &= Self::execute(app, command);
        }
        applied
    }
}
