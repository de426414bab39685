// Library module containing testable functions from main.rs

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::app::App;
use crate::async_task::{Task, TaskResult};
use crate::command::Command;
use crate::config::Config;
use crate::error::{Result, TreemarkError};
use crate::filter::FilterState;
use crate::git_utils;
use crate::render;
use crate::screenshot;
use crate::store;
use crate::theme::SvgTheme;
use crate::tree::{apply_git_status, TreeNode};
use crate::updater::CURRENT_VERSION;
use crate::walker::{self, IgnoreRules, WalkOptions};

pub fn handle_task_result(app: &mut App, result: TaskResult) {
    match result {
        TaskResult::SaveDue { generation } => {
            if app.debouncer.is_current(generation) {
                match app.save_now() {
                    Ok(()) => log::debug!("💾 save: generation {} written", generation),
                    Err(e) => log::error!("💾 save: generation {} failed: {}", generation, e),
                }
            } else {
                log::debug!(
                    "💾 save: generation {} superseded by {}",
                    generation,
                    app.debouncer.generation()
                );
            }
        }
        TaskResult::UpdateChecked { available, latest } => {
            log::info!("update: latest {} (available: {})", latest, available);
            if available {
                app.update_available = Some(latest);
            }
        }
        TaskResult::UpdateCheckFailed => {}
    }
}

/// Background work queued when an interactive session starts. The update
/// check only runs when an endpoint is configured.
pub fn startup_tasks(config: &Config) -> Vec<Task> {
    match &config.update_url {
        Some(url) => vec![Task::CheckForUpdate {
            url: url.clone(),
            current_version: CURRENT_VERSION.to_string(),
        }],
        None => Vec::new(),
    }
}

/// Flush the tree state when the event loop ended without a regular quit,
/// then hand back the loop's outcome
pub fn close_session(app: &mut App, outcome: Result<()>) -> Result<()> {
    if let Err(e) = &outcome {
        log::error!("main: event loop failed: {}", e);
    }
    if !app.should_quit {
        if let Err(e) = app.save_now() {
            log::error!("💾 save: final flush failed: {}", e);
        }
    }
    outcome
}

/// Absolute form of `path`, which must name a readable directory
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let absolute = path
        .canonicalize()
        .map_err(|_| TreemarkError::InvalidRoot(path.to_path_buf()))?;
    if !absolute.is_dir() {
        return Err(TreemarkError::InvalidRoot(path.to_path_buf()));
    }
    Ok(absolute)
}

/// Ask for confirmation of a full scan; only `y` or `yes` proceed
pub fn confirm_force<R: BufRead, W: Write>(root: &Path, input: &mut R, output: &mut W) -> Result<bool> {
    writeln!(
        output,
        "Force mode ignores .gitignore and scans every file under {} without limits.",
        root.display()
    )?;
    write!(output, "This can take a long time on large trees. Continue? [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Scanning options from the config limits, or no limits in force mode
pub fn walk_options(root: &Path, config: &Config, force: bool) -> WalkOptions {
    if force {
        return WalkOptions::unlimited();
    }
    WalkOptions {
        ignore: IgnoreRules::from_root(root),
        max_nodes: Some(config.limits.max_nodes),
        max_depth: Some(config.limits.max_depth),
    }
}

/// Scan the tree, mark git changes and merge the persisted state
pub fn load_tree(root: &Path, options: &WalkOptions) -> Result<(TreeNode, bool)> {
    let outcome = walker::walk(root, options)?;
    let mut tree = outcome.tree;
    let statuses = git_utils::load_git_status(root);
    apply_git_status(&mut tree, root, &statuses);
    store::load(root, &mut tree);
    Ok((tree, outcome.limit_reached))
}

/// Write a text or SVG export without starting the TUI. Returns written paths.
pub fn run_export(
    tree: &TreeNode,
    filter: &FilterState,
    svg: bool,
    output: Option<&Path>,
    config: &Config,
) -> Result<Vec<PathBuf>> {
    if !svg {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.export.text_path());
        fs::write(&path, render::export_text(tree, filter))?;
        return Ok(vec![path]);
    }

    let (dark_path, light_path) = match output {
        Some(stem) => (
            stem.with_file_name(format!("{}_dark.svg", file_stem(stem))),
            stem.with_file_name(format!("{}_light.svg", file_stem(stem))),
        ),
        None => (config.export.svg_dark_path(), config.export.svg_light_path()),
    };
    fs::write(&dark_path, render::export_svg(tree, filter, &SvgTheme::dark()))?;
    fs::write(&light_path, render::export_svg(tree, filter, &SvgTheme::light()))?;
    Ok(vec![dark_path, light_path])
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "treemark".to_string())
}

/// Apply a comma-separated command list and render one frame as text
pub fn run_screenshot(app: &mut App, commands: Option<&str>, width: u16, height: u16) -> Result<String> {
    let commands = match commands {
        Some(list) => Command::parse_list(list).map_err(TreemarkError::Generic)?,
        None => Vec::new(),
    };
    screenshot::generate_screenshot(app, commands, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/a.go"), "").unwrap();
        fs::write(temp.path().join("src/b.go"), "").unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();
        temp
    }

    fn session(temp: &TempDir) -> App {
        let root = resolve_root(temp.path()).unwrap();
        let config = Config::default();
        let (tree, limit_reached) = load_tree(&root, &walk_options(&root, &config, false)).unwrap();
        let mut app = App::new(root, tree, config);
        app.limit_reached = limit_reached;
        app
    }

    #[test]
    fn test_resolve_root_rejects_files() {
        let temp = project();
        assert!(resolve_root(temp.path()).is_ok());
        assert!(matches!(
            resolve_root(&temp.path().join("README.md")),
            Err(TreemarkError::InvalidRoot(_))
        ));
        assert!(resolve_root(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_confirm_force_answers() {
        let root = Path::new("/tmp");
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut output = Vec::new();
            let confirmed = confirm_force(root, &mut Cursor::new(answer), &mut output).unwrap();
            assert_eq!(confirmed, expected, "answer {:?}", answer);
            assert!(String::from_utf8(output).unwrap().contains("[y/N]"));
        }
    }

    #[test]
    fn test_stale_save_is_skipped() {
        let temp = project();
        let mut app = session(&temp);

        // README.md sorts before src
        app.move_down();
        app.toggle_collapse();
        app.toggle_hidden();
        let generations: Vec<u64> = app
            .take_tasks()
            .into_iter()
            .map(|task| match task {
                Task::ScheduleSave { generation, .. } => generation,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(generations, vec![1, 2]);

        handle_task_result(&mut app, TaskResult::SaveDue { generation: 1 });
        assert!(!store::config_path(temp.path()).exists());

        handle_task_result(&mut app, TaskResult::SaveDue { generation: 2 });
        let saved = store::read_config(temp.path());
        assert!(saved.nodes["src"].collapsed);
        assert!(saved.nodes["src"].hidden);
    }

    #[test]
    fn test_failed_event_loop_still_flushes() {
        let temp = project();
        let mut app = session(&temp);

        app.move_down();
        assert!(app.toggle_hidden());
        assert_eq!(app.take_tasks().len(), 1);

        let outcome = close_session(&mut app, Err(TreemarkError::Generic("read failed".to_string())));
        assert!(matches!(outcome, Err(TreemarkError::Generic(_))));
        assert!(store::read_config(temp.path()).nodes["src"].hidden);
    }

    #[test]
    fn test_close_after_quit_keeps_saved_state() {
        let temp = project();
        let mut app = session(&temp);

        app.move_down();
        app.toggle_collapse();
        app.quit();
        assert!(close_session(&mut app, Ok(())).is_ok());
        assert!(store::read_config(temp.path()).nodes["src"].collapsed);
    }

    #[test]
    fn test_update_check_is_opt_in() {
        let mut config = Config::default();
        assert!(startup_tasks(&config).is_empty());

        config.update_url = Some("https://example.invalid/releases/latest".to_string());
        assert_eq!(
            startup_tasks(&config),
            vec![Task::CheckForUpdate {
                url: "https://example.invalid/releases/latest".to_string(),
                current_version: CURRENT_VERSION.to_string(),
            }]
        );
    }

    #[test]
    fn test_update_results() {
        let temp = project();
        let mut app = session(&temp);

        handle_task_result(&mut app, TaskResult::UpdateCheckFailed);
        assert!(app.update_available.is_none());
        handle_task_result(
            &mut app,
            TaskResult::UpdateChecked {
                available: false,
                latest: "0.1.0".to_string(),
            },
        );
        assert!(app.update_available.is_none());
        handle_task_result(
            &mut app,
            TaskResult::UpdateChecked {
                available: true,
                latest: "9.9.9".to_string(),
            },
        );
        assert_eq!(app.update_available.as_deref(), Some("9.9.9"));
    }

    #[test]
    fn test_run_export_svg_uses_stem() {
        let temp = project();
        let app = session(&temp);
        let written = run_export(
            &app.tree,
            &FilterState::default(),
            true,
            Some(&temp.path().join("picture.svg")),
            &app.config,
        )
        .unwrap();
        assert_eq!(
            written,
            vec![temp.path().join("picture_dark.svg"), temp.path().join("picture_light.svg")]
        );
        assert!(written.iter().all(|path| path.exists()));
    }

    #[test]
    fn test_run_export_text_respects_search() {
        let temp = project();
        let app = session(&temp);
        let output = temp.path().join("tree.txt");
        run_export(&app.tree, &FilterState::new("b.go", false), false, Some(&output), &app.config).unwrap();

        let text = fs::read_to_string(output).unwrap();
        let root_name = app.tree.name.clone();
        assert_eq!(text, format!("{}\n└── src\n    └── b.go\n", root_name));
    }

    #[test]
    fn test_run_screenshot_rejects_unknown_command() {
        let temp = project();
        let mut app = session(&temp);
        assert!(run_screenshot(&mut app, Some("down,bogus"), 40, 10).is_err());
        let screen = run_screenshot(&mut app, Some("down,down"), 60, 12).unwrap();
        assert!(screen.contains("  ├──   README.md"));
        assert!(screen.contains(">     ├──   a.go"));
    }
}
