use ratatui::style::{Color, Modifier, Style};

/// Styles used by the interactive frame
#[derive(Debug, Clone)]
pub struct Theme {
    // Tree rows
    pub normal: Style,
    pub dimmed: Style,
    pub selected: Style,
    pub hidden: Style,
    pub selected_hidden: Style,
    pub annotation: Style,
    pub search_match: Style,
    pub git_modified: Style,
    pub git_added: Style,

    // Bars
    pub status_bar: Style,
    pub git_status_bar: Style,
    pub warning: Style,
    pub update_banner: Style,
    pub help_text: Style,
    pub input_hint: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            normal: Style::default().fg(Color::Indexed(255)),
            dimmed: Style::default().fg(Color::Indexed(240)),
            selected: Style::default().fg(Color::Indexed(212)).add_modifier(Modifier::BOLD),
            hidden: Style::default().fg(Color::Indexed(240)).add_modifier(Modifier::CROSSED_OUT),
            selected_hidden: Style::default()
                .fg(Color::Indexed(175))
                .add_modifier(Modifier::BOLD | Modifier::CROSSED_OUT),
            annotation: Style::default().fg(Color::Indexed(246)).add_modifier(Modifier::ITALIC),
            search_match: Style::default().fg(Color::Rgb(0xff, 0xff, 0x00)).add_modifier(Modifier::BOLD),
            git_modified: Style::default().fg(Color::Rgb(0xeb, 0xcb, 0x8b)).add_modifier(Modifier::BOLD),
            git_added: Style::default().fg(Color::Rgb(0xa3, 0xbe, 0x8c)).add_modifier(Modifier::BOLD),

            status_bar: Style::default().fg(Color::Indexed(255)).bg(Color::Indexed(57)),
            git_status_bar: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(0xd0, 0x87, 0x70))
                .add_modifier(Modifier::BOLD),
            warning: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(0xff, 0xff, 0x00))
                .add_modifier(Modifier::BOLD),
            update_banner: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x00, 0x5f, 0xff))
                .add_modifier(Modifier::BOLD),
            help_text: Style::default().fg(Color::Gray),
            input_hint: Style::default().fg(Color::DarkGray),
        }
    }
}

/// Colour set for SVG exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgTheme {
    pub name: &'static str,
    pub background: &'static str,
    pub text: &'static str,
    pub tree: &'static str,
    pub folder: &'static str,
    pub comment: &'static str,
    pub git_modified: &'static str,
    pub git_added: &'static str,
}

impl SvgTheme {
    pub fn dark() -> Self {
        Self {
            name: "Dark",
            background: "#282a36",
            text: "#f8f8f2",
            tree: "#6272a4",
            folder: "#8be9fd",
            comment: "#6272a4",
            git_modified: "#f1fa8c",
            git_added: "#50fa7b",
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light",
            background: "#ffffff",
            text: "#24292e",
            tree: "#d1d5da",
            folder: "#0366d6",
            comment: "#6a737d",
            git_modified: "#b08800",
            git_added: "#22863a",
        }
    }
}
