use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::app::{App, Mode};
use crate::render::{self, RowContext};
use crate::updater::CURRENT_VERSION;

const HELP_NAVIGATION: &str = "[Spc] Toggle  [Ent] Hide/Show  [i] Comment  [/] Search  [Esc] Clear";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let mut constraints = Vec::new();
    if app.update_available.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if app.limit_reached {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1)); // project header
    constraints.push(Constraint::Min(0)); // tree
    constraints.push(Constraint::Length(3)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    if let Some(latest) = app.update_available.clone() {
        draw_update_banner(frame, app, &latest, chunks[next]);
        next += 1;
    }
    if app.limit_reached {
        draw_limit_warning(frame, app, chunks[next]);
        next += 1;
    }
    draw_header(frame, app, chunks[next]);
    draw_tree(frame, app, chunks[next + 1]);
    match app.mode {
        Mode::Navigation => draw_navigation_footer(frame, app, chunks[next + 2]),
        Mode::AnnotationEdit | Mode::SearchEdit => draw_input_footer(frame, app, chunks[next + 2]),
    }
}

fn draw_update_banner(frame: &mut Frame, app: &App, latest: &str, area: Rect) {
    let text = format!(
        " Update available: v{} (current v{}) ",
        latest, CURRENT_VERSION
    );
    let banner = Paragraph::new(fit_with_dots(&text, area.width as usize)).style(app.theme.update_banner);
    frame.render_widget(banner, area);
}

fn draw_limit_warning(frame: &mut Frame, app: &App, area: Rect) {
    let limits = &app.config.limits;
    let text = format!(
        "[!] Safety Limit Reached: Only showing first {} files / {} levels deep.",
        limits.max_nodes, limits.max_depth
    );
    let warning = Paragraph::new(fit_with_dots(&text, area.width as usize)).style(app.theme.warning);
    frame.render_widget(warning, area);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Line::from(vec![
        Span::styled("Project: ", app.theme.dimmed),
        Span::styled(
            app.tree.name.clone(),
            app.theme.normal.add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_tree(frame: &mut Frame, app: &mut App, area: Rect) {
    app.viewport_height = area.height as usize;
    app.ensure_cursor_visible();

    if app.visible_count() == 0 {
        let message = if app.filter.is_active() {
            "No matching files"
        } else {
            "No files found"
        };
        frame.render_widget(Paragraph::new(message).style(app.theme.dimmed), area);
        return;
    }

    let ctx = RowContext {
        filter: &app.filter,
        cursor: app.cursor,
        width: area.width as usize,
        theme: &app.theme,
    };
    let window = app.scroll_offset..app.scroll_offset + area.height as usize;
    let lines = render::interactive_lines(&app.tree, &ctx, window);
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_navigation_footer(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let status = match (&app.status_message, app.selected_path()) {
        (Some(message), _) => message.clone(),
        (None, Some(path)) => format!("PATH: {}", path.display()),
        (None, None) => "(No selection)".to_string(),
    };
    let status_style = if app.filter.git_mode {
        app.theme.git_status_bar
    } else {
        app.theme.status_bar
    };
    let git_hint = if app.filter.git_mode {
        "[g] All Files"
    } else {
        "[g] Git Changes"
    };

    let lines = vec![
        Line::from(Span::styled(fit_with_dots(&status, width), status_style)),
        Line::from(Span::styled(fit_with_dots(HELP_NAVIGATION, width), app.theme.help_text)),
        Line::from(Span::styled(
            fit_with_dots(
                &format!("{}  [c] Copy  [s] Save Txt  [p] Save SVG  [q] Quit", git_hint),
                width,
            ),
            app.theme.help_text,
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let (label, hint) = match app.mode {
        Mode::AnnotationEdit => (
            "Adding comment for selected file:",
            "[Enter] Save  [Esc] Cancel",
        ),
        _ => ("Search:", "[Enter] Keep filter  [Esc] Clear search"),
    };

    let prompt = "> ";
    let room = width.saturating_sub(prompt.len() + 1);
    let shown = tail_to_width(&app.input, room);

    let lines = vec![
        Line::from(Span::styled(fit_with_dots(label, width), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(vec![Span::raw(prompt), Span::styled(shown.clone(), app.theme.normal)]),
        Line::from(Span::styled(fit_with_dots(hint, width), app.theme.input_hint)),
    ];
    frame.render_widget(Paragraph::new(lines), area);

    if area.height > 1 && width > 0 {
        let column = (prompt.len() + render::display_width(&shown)).min(width - 1);
        frame.set_cursor_position((area.x + column as u16, area.y + 1));
    }
}

/// Cut `text` to `width` columns, marking the cut with `...`
fn fit_with_dots(text: &str, width: usize) -> String {
    if render::display_width(text) <= width {
        return text.to_string();
    }
    if width <= 3 {
        return render::clip_to_width(text, width);
    }
    format!("{}...", render::clip_to_width(text, width - 3))
}

/// Longest grapheme-aligned suffix of `text` fitting in `width` columns
fn tail_to_width(text: &str, width: usize) -> String {
    let mut start = text.len();
    for (index, _) in text.grapheme_indices(true).rev() {
        if render::display_width(&text[index..]) > width {
            break;
        }
        start = index;
    }
    text[start..].to_string()
}
