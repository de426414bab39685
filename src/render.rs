//! Tree drawing for the interactive frame and for exports
//!
//! All targets draw the rows yielded by [`cursor::traverse`]; they differ in
//! the hidden-node policy, width handling and output format.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::fmt::Write as _;
use std::ops::{ControlFlow, Range};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::cursor::{self, Row};
use crate::filter::{FilterState, Projection};
use crate::theme::{SvgTheme, Theme};
use crate::tree::{GitStatus, TreeNode};

pub const CURSOR_MARKER: &str = "> ";
pub const NO_CURSOR_MARKER: &str = "  ";
pub const ELLIPSIS: char = '…';

pub const SVG_LINE_HEIGHT: usize = 24;
pub const SVG_CHAR_WIDTH: usize = 10;
pub const SVG_PADDING: usize = 60;
pub const SVG_MIN_WIDTH: usize = 600;
const SVG_FONT_FAMILY: &str =
    "'Consolas', 'Monaco', 'Microsoft YaHei', 'PingFang SC', 'WenQuanYi Micro Hei', monospace";

/// `  # text`, or nothing for an empty annotation
pub fn annotation_suffix(annotation: &str) -> String {
    if annotation.is_empty() {
        String::new()
    } else {
        format!("  # {}", annotation)
    }
}

fn dir_icon(node: &TreeNode) -> &'static str {
    if node.collapsed {
        "▶ "
    } else {
        "▼ "
    }
}

/// Icon column of the interactive view; files get blank padding
pub fn interactive_icon(node: &TreeNode) -> &'static str {
    if node.is_dir {
        dir_icon(node)
    } else {
        "  "
    }
}

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Longest grapheme-aligned prefix of `text` fitting in `width` columns.
/// The prefix is measured as a whole, the same way rows are.
pub fn clip_to_width(text: &str, width: usize) -> String {
    let mut clipped = String::new();
    for grapheme in text.graphemes(true) {
        let kept = clipped.len();
        clipped.push_str(grapheme);
        if display_width(&clipped) > width {
            clipped.truncate(kept);
            break;
        }
    }
    clipped
}

/// Shorten `text` to at most `width` columns, ending with one ellipsis
pub fn ellipsize(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut shortened = clip_to_width(text, width - 1);
    shortened.push(ELLIPSIS);
    shortened
}

/// Name, status tag and annotation suffix after fitting them into a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowContent {
    pub name: String,
    pub status_tag: String,
    pub annotation: String,
}

impl RowContent {
    pub fn width(&self) -> usize {
        display_width(&self.name) + display_width(&self.status_tag) + display_width(&self.annotation)
    }
}

/// Fit the row content into `available` columns.
///
/// With one column or less nothing is shown. Otherwise the annotation goes
/// first, then the status tag, and as a last resort the name is cut down
/// with a trailing ellipsis.
pub fn fit_row_content(name: &str, status_tag: &str, annotation: &str, available: usize) -> RowContent {
    if available <= 1 {
        return RowContent {
            name: String::new(),
            status_tag: String::new(),
            annotation: String::new(),
        };
    }

    let name_width = display_width(name);
    let tag_width = display_width(status_tag);
    if name_width + tag_width + display_width(annotation) <= available {
        return RowContent {
            name: name.to_string(),
            status_tag: status_tag.to_string(),
            annotation: annotation.to_string(),
        };
    }
    if name_width + tag_width <= available {
        return RowContent {
            name: name.to_string(),
            status_tag: status_tag.to_string(),
            annotation: String::new(),
        };
    }
    let name = if name_width <= available {
        name.to_string()
    } else {
        ellipsize(name, available)
    };
    RowContent {
        name,
        status_tag: String::new(),
        annotation: String::new(),
    }
}

/// Inputs of one interactive frame
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub filter: &'a FilterState,
    pub cursor: usize,
    /// Frame width in columns
    pub width: usize,
    pub theme: &'a Theme,
}

fn status_style(theme: &Theme, status: GitStatus) -> Option<Style> {
    match status {
        GitStatus::Modified => Some(theme.git_modified),
        GitStatus::Added => Some(theme.git_added),
        GitStatus::None => None,
    }
}

fn interactive_line(row: &Row<'_, '_>, ctx: &RowContext<'_>) -> Line<'static> {
    let node = row.node;
    let theme = ctx.theme;
    let is_selected = row.rank == ctx.cursor;
    let is_hidden = node.hidden || row.under_hidden;

    let marker = if is_selected { CURSOR_MARKER } else { NO_CURSOR_MARKER };
    let tree_part = format!("{}{}", row.prefix(), row.connector());
    let icon = interactive_icon(node);
    let decoration_width = display_width(marker) + display_width(&tree_part) + display_width(icon);

    if decoration_width >= ctx.width {
        let decoration = format!("{}{}{}", marker, tree_part, icon);
        return Line::from(Span::styled(clip_to_width(&decoration, ctx.width), theme.dimmed));
    }

    // One column of slack keeps the row off the frame edge
    let available = ctx.width - decoration_width - 1;
    let content = fit_row_content(
        &node.name,
        node.git_status.tag(),
        &annotation_suffix(&node.annotation),
        available,
    );

    let mut name_style = if is_hidden { theme.hidden } else { theme.normal };
    if !is_selected && !is_hidden {
        if let Some(style) = status_style(theme, node.git_status) {
            name_style = style;
        }
        if ctx.filter.is_direct_match(node) {
            name_style = theme.search_match;
        }
    }
    if is_selected {
        name_style = if is_hidden { theme.selected_hidden } else { theme.selected };
    }
    let tag_style = if is_hidden {
        theme.hidden
    } else {
        status_style(theme, node.git_status).unwrap_or(theme.normal)
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(tree_part, theme.dimmed),
        Span::raw(icon),
        Span::styled(content.name, name_style),
    ];
    if !content.status_tag.is_empty() {
        spans.push(Span::styled(content.status_tag, tag_style));
    }
    if !content.annotation.is_empty() {
        spans.push(Span::styled(content.annotation, theme.annotation));
    }
    Line::from(spans)
}

/// Styled rows of the interactive projection whose rank falls in `window`
pub fn interactive_lines(root: &TreeNode, ctx: &RowContext<'_>, window: Range<usize>) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(window.len());
    let projection = Projection::interactive(ctx.filter);
    let _ = cursor::traverse(root, &projection, |row| {
        if row.rank >= window.end {
            return ControlFlow::Break(());
        }
        if row.rank >= window.start {
            lines.push(interactive_line(row, ctx));
        }
        ControlFlow::Continue(())
    });
    lines
}

/// Plain-text tree of the export projection, root name first
pub fn export_text(root: &TreeNode, filter: &FilterState) -> String {
    let mut out = String::new();
    out.push_str(&root.name);
    out.push('\n');

    let _ = cursor::traverse(root, &Projection::export(filter), |row| {
        let node = row.node;
        out.push_str(&row.prefix());
        out.push_str(row.connector());
        out.push_str(&node.name);
        if filter.git_mode {
            out.push_str(node.git_status.tag());
        }
        out.push_str(&annotation_suffix(&node.annotation));
        out.push('\n');
        ControlFlow::<()>::Continue(())
    });
    out
}

/// Text export wrapped in a fenced block, ready to paste into documents
pub fn clipboard_text(root: &TreeNode, filter: &FilterState) -> String {
    format!("```text\n{}```", export_text(root, filter))
}

pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// SVG picture of the export projection
pub fn export_svg(root: &TreeNode, filter: &FilterState, theme: &SvgTheme) -> String {
    let mut body = String::new();
    let mut line_count = 1;
    let mut longest = root.name.chars().count();

    let _ = write!(body, r#"<text x="0" y="0" class="folder">{}</text>"#, escape_xml(&root.name));

    let _ = cursor::traverse(root, &Projection::export(filter), |row| {
        let node = row.node;
        let y = line_count * SVG_LINE_HEIGHT;
        line_count += 1;

        let tree_part = format!("{}{}", row.prefix(), row.connector());
        let icon = if node.is_dir { dir_icon(node) } else { "" };
        let tag = if filter.git_mode { node.git_status.tag() } else { "" };
        let annotation = annotation_suffix(&node.annotation);

        let mut name_class = if node.is_dir { "folder" } else { "text" };
        let tag_class = match node.git_status {
            GitStatus::Modified => "git-mod",
            GitStatus::Added => "git-add",
            GitStatus::None => "",
        };
        if filter.git_mode && !tag_class.is_empty() {
            name_class = tag_class;
        }

        let _ = write!(body, r#"<text x="0" y="{}">"#, y);
        let _ = write!(body, r#"<tspan class="tree">{}</tspan>"#, escape_xml(&tree_part));
        if !icon.is_empty() {
            let _ = write!(body, r#"<tspan class="tree">{}</tspan>"#, icon);
        }
        let _ = write!(body, r#"<tspan class="{}">{}</tspan>"#, name_class, escape_xml(&node.name));
        if !tag.is_empty() {
            let _ = write!(body, r#"<tspan class="{}">{}</tspan>"#, tag_class, escape_xml(tag));
        }
        if !annotation.is_empty() {
            let _ = write!(body, r#"<tspan class="comment">{}</tspan>"#, escape_xml(&annotation));
        }
        body.push_str("</text>");

        let row_chars = tree_part.chars().count()
            + icon.chars().count()
            + node.name.chars().count()
            + tag.chars().count()
            + annotation.chars().count();
        longest = longest.max(row_chars);
        ControlFlow::<()>::Continue(())
    });

    let width = (longest * SVG_CHAR_WIDTH + SVG_PADDING).max(SVG_MIN_WIDTH);
    let height = line_count * SVG_LINE_HEIGHT + SVG_PADDING;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        width, height
    );
    let _ = write!(svg, r#"<rect width="100%" height="100%" fill="{}" />"#, theme.background);
    let _ = write!(
        svg,
        "<style>\
text {{ font-family: {}; font-size: 14px; white-space: pre; }}\
.tree {{ fill: {}; }}\
.text {{ fill: {}; }}\
.folder {{ fill: {}; font-weight: bold; }}\
.comment {{ fill: {}; font-style: italic; }}\
.git-mod {{ fill: {}; font-weight: bold; }}\
.git-add {{ fill: {}; font-weight: bold; }}\
</style>",
        SVG_FONT_FAMILY,
        theme.tree,
        theme.text,
        theme.folder,
        theme.comment,
        theme.git_modified,
        theme.git_added
    );
    svg.push_str(r#"<g transform="translate(30, 40)">"#);
    svg.push_str(&body);
    svg.push_str("</g></svg>");
    svg
}
