use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

use crate::app::App;
use crate::command::Command;
use crate::error::Result;
use crate::executor::Executor;
use crate::ui;

/// Render one frame of `app` into an off-screen buffer
pub fn render_frame(app: &mut App, width: u16, height: u16) -> Result<Buffer> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;

    terminal.draw(|frame| {
        ui::draw(frame, app);
    })?;

    Ok(terminal.backend().buffer().clone())
}

/// Apply `commands`, then render a frame as plain text
pub fn generate_screenshot(app: &mut App, commands: Vec<Command>, width: u16, height: u16) -> Result<String> {
    // Lay the viewport out once so paging sees the real height
    render_frame(app, width, height)?;
    for command in commands {
        Executor::execute(app, command);
    }
    let buffer = render_frame(app, width, height)?;
    Ok(buffer_to_string(&buffer))
}

pub fn buffer_to_string(buffer: &Buffer) -> String {
    let mut result = String::new();

    for y in 0..buffer.area().height {
        let mut skip = 0;
        for x in 0..buffer.area().width {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            let symbol = buffer[(x, y)].symbol();
            if symbol.is_empty() {
                result.push(' ');
            } else {
                result.push_str(symbol);
                // Wide glyphs occupy the following cell too
                skip = crate::render::display_width(symbol).saturating_sub(1);
            }
        }
        result.push('\n');
    }

    result
}
