use std::fs;
use std::path::{Path, PathBuf};

use crate::async_task::{SaveDebouncer, Task};
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::Config;
use crate::cursor;
use crate::error::Result;
use crate::filter::{FilterState, Projection};
use crate::render;
use crate::store;
use crate::theme::{SvgTheme, Theme};
use crate::tree::TreeNode;

pub const ANNOTATION_CHAR_LIMIT: usize = 156;
pub const SEARCH_CHAR_LIMIT: usize = 50;

/// Input mode of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigation,
    AnnotationEdit,
    SearchEdit,
}

pub struct App {
    pub root_path: PathBuf,
    pub tree: TreeNode,
    pub filter: FilterState,
    pub mode: Mode,
    pub should_quit: bool,

    // Viewport
    pub cursor: usize,
    pub scroll_offset: usize,
    pub viewport_height: usize,

    /// Text being edited in AnnotationEdit or SearchEdit
    pub input: String,

    // Status
    pub limit_reached: bool,
    pub status_message: Option<String>,
    /// Latest released version when it differs from the running one
    pub update_available: Option<String>,

    pub debouncer: SaveDebouncer,
    pending_tasks: Vec<Task>,

    pub config: Config,
    pub theme: Theme,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(root_path: PathBuf, tree: TreeNode, config: Config) -> Self {
        Self {
            root_path,
            tree,
            filter: FilterState::default(),
            mode: Mode::Navigation,
            should_quit: false,

            cursor: 0,
            scroll_offset: 0,
            viewport_height: 20,

            input: String::new(),

            limit_reached: false,
            status_message: None,
            update_available: None,

            debouncer: SaveDebouncer::default(),
            pending_tasks: Vec::new(),

            config,
            theme: Theme::default(),
            clipboard: Box::new(SystemClipboard),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn projection(&self) -> Projection<'_> {
        Projection::interactive(&self.filter)
    }

    pub fn visible_count(&self) -> usize {
        cursor::count_visible(&self.tree, &self.projection())
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        cursor::locate(&self.tree, &self.projection(), self.cursor)
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected_node().map(|node| node.path.as_path())
    }

    /// Tasks queued since the last call, for the main loop to dispatch
    pub fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.pending_tasks)
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn request_save(&mut self) {
        let generation = self.debouncer.bump();
        log::debug!("app: save requested, generation {}", generation);
        self.pending_tasks.push(Task::ScheduleSave {
            generation,
            delay: self.config.debounce(),
        });
    }

    /// Write the config file right away
    pub fn save_now(&self) -> Result<()> {
        store::save(&self.root_path, &self.tree)
    }

    // Cursor movement

    pub fn move_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.ensure_cursor_visible();
        true
    }

    pub fn move_down(&mut self) -> bool {
        if self.cursor + 1 >= self.visible_count() {
            return false;
        }
        self.cursor += 1;
        self.ensure_cursor_visible();
        true
    }

    fn page_size(&self) -> usize {
        self.viewport_height.saturating_sub(1).max(1)
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.page_size());
        self.ensure_cursor_visible();
    }

    pub fn page_down(&mut self) {
        let last = self.visible_count().saturating_sub(1);
        self.cursor = (self.cursor + self.page_size()).min(last);
        self.ensure_cursor_visible();
    }

    pub fn go_to_top(&mut self) {
        self.cursor = 0;
        self.ensure_cursor_visible();
    }

    pub fn go_to_bottom(&mut self) {
        self.cursor = self.visible_count().saturating_sub(1);
        self.ensure_cursor_visible();
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.scroll_offset = 0;
    }

    /// Keep the cursor on an existing row and inside the viewport
    pub fn clamp_cursor(&mut self) {
        let count = self.visible_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
        self.ensure_cursor_visible();
    }

    pub fn ensure_cursor_visible(&mut self) {
        let height = self.viewport_height.max(1);
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }

    // Tree mutations

    pub fn toggle_collapse(&mut self) -> bool {
        let filter = self.filter.clone();
        let changed = cursor::toggle_collapse_at(&mut self.tree, &Projection::interactive(&filter), self.cursor);
        if changed {
            self.request_save();
            self.clamp_cursor();
        }
        changed
    }

    pub fn toggle_hidden(&mut self) -> bool {
        let filter = self.filter.clone();
        let changed = cursor::toggle_hidden_at(&mut self.tree, &Projection::interactive(&filter), self.cursor);
        if changed {
            self.request_save();
        }
        changed
    }

    // Annotation editing

    pub fn begin_annotation(&mut self) -> bool {
        let annotation = match self.selected_node() {
            Some(node) => node.annotation.clone(),
            None => return false,
        };
        self.input = annotation;
        self.mode = Mode::AnnotationEdit;
        true
    }

    pub fn commit_annotation(&mut self) {
        if self.mode != Mode::AnnotationEdit {
            return;
        }
        let annotation = std::mem::take(&mut self.input);
        let filter = self.filter.clone();
        if let Some(node) = cursor::locate_mut(&mut self.tree, &Projection::interactive(&filter), self.cursor) {
            node.annotation = annotation;
            self.request_save();
            self.status_message = Some("Comment saved!".to_string());
        }
        self.mode = Mode::Navigation;
    }

    pub fn cancel_annotation(&mut self) {
        self.input.clear();
        self.mode = Mode::Navigation;
        self.status_message = Some("Cancelled.".to_string());
    }

    // Search editing

    pub fn begin_search(&mut self) {
        self.input = self.filter.search_term.clone();
        self.mode = Mode::SearchEdit;
    }

    pub fn commit_search(&mut self) {
        self.mode = Mode::Navigation;
        self.input.clear();
        self.reset_cursor();
    }

    pub fn cancel_search(&mut self) {
        self.mode = Mode::Navigation;
        self.input.clear();
        self.filter.search_term.clear();
        self.reset_cursor();
    }

    /// Append to the active input; the search term follows the buffer live
    pub fn input_char(&mut self, c: char) {
        let limit = match self.mode {
            Mode::AnnotationEdit => ANNOTATION_CHAR_LIMIT,
            Mode::SearchEdit => SEARCH_CHAR_LIMIT,
            Mode::Navigation => return,
        };
        if self.input.chars().count() < limit {
            self.input.push(c);
        }
        self.sync_search();
    }

    pub fn input_backspace(&mut self) {
        if self.mode == Mode::Navigation {
            return;
        }
        self.input.pop();
        self.sync_search();
    }

    fn sync_search(&mut self) {
        if self.mode == Mode::SearchEdit {
            self.filter.search_term = self.input.clone();
            self.reset_cursor();
        }
    }

    // Filters

    pub fn toggle_git_mode(&mut self) {
        self.filter.git_mode = !self.filter.git_mode;
        self.reset_cursor();
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.reset_cursor();
    }

    // Exports

    pub fn copy_to_clipboard(&mut self) {
        let text = render::clipboard_text(&self.tree, &self.filter);
        self.status_message = Some(match self.clipboard.copy(&text) {
            Ok(()) => "Copied to clipboard".to_string(),
            Err(e) => {
                log::warn!("clipboard: {}", e);
                format!("Copy failed: {}", e)
            }
        });
    }

    pub fn export_text(&mut self) {
        let path = self.config.export.text_path();
        let text = render::export_text(&self.tree, &self.filter);
        self.status_message = Some(match fs::write(&path, text) {
            Ok(()) => format!("Saved to {}", path.display()),
            Err(e) => {
                log::warn!("export: {}: {}", path.display(), e);
                format!("Save failed: {}", e)
            }
        });
    }

    pub fn export_svg(&mut self) {
        let dark_path = self.config.export.svg_dark_path();
        let light_path = self.config.export.svg_light_path();
        let dark = render::export_svg(&self.tree, &self.filter, &SvgTheme::dark());
        let light = render::export_svg(&self.tree, &self.filter, &SvgTheme::light());

        let written = fs::write(&dark_path, dark).and_then(|_| fs::write(&light_path, light));
        self.status_message = Some(match written {
            Ok(()) => format!("Saved {} and {}", dark_path.display(), light_path.display()),
            Err(e) => {
                log::warn!("export: svg: {}", e);
                format!("Save failed: {}", e)
            }
        });
    }

    /// Persist synchronously and stop the session
    pub fn quit(&mut self) {
        if let Err(e) = self.save_now() {
            log::error!("app: final save failed: {}", e);
        }
        self.should_quit = true;
    }
}
