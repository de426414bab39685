use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, path::PathBuf, time::Duration};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use treemark::app::App;
use treemark::async_task::{self, Task, TaskResult};
use treemark::cli::{Cli, Commands, ExportFormat};
use treemark::config::Config;
use treemark::error::{Result, TreemarkError};
use treemark::filter::FilterState;
use treemark::tree::TreeNode;
use treemark::updater::CURRENT_VERSION;
use treemark::{event, main_lib, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger only if TREEMARK_LOG environment variable is set
    if let Ok(log_file) = std::env::var("TREEMARK_LOG") {
        match fs::OpenOptions::new().create(true).append(true).open(&log_file) {
            Ok(file) => {
                env_logger::Builder::new()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .filter_level(log::LevelFilter::Debug)
                    .init();
                log::info!("treemark {} starting up", CURRENT_VERSION);
            }
            Err(e) => eprintln!("Cannot open log file {}: {}", log_file, e),
        }
    }

    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(max_nodes) = cli.max_nodes {
        config.limits.max_nodes = max_nodes;
    }
    if let Some(max_depth) = cli.max_depth {
        config.limits.max_depth = max_depth;
    }
    if cli.update_url.is_some() {
        config.update_url = cli.update_url.clone();
    }

    let root = match main_lib::resolve_root(&cli.target_path()) {
        Ok(root) => root,
        Err(e) => exit_with(e),
    };

    if cli.force && !cli.yes {
        let confirmed = main_lib::confirm_force(&root, &mut io::stdin().lock(), &mut io::stdout())?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let options = main_lib::walk_options(&root, &config, cli.force);
    let (tree, limit_reached) = match main_lib::load_tree(&root, &options) {
        Ok(loaded) => loaded,
        Err(e) => exit_with(e),
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_interactive(root, tree, limit_reached, config).await,
        Commands::Export {
            format,
            search,
            git,
            output,
        } => {
            let filter = FilterState::new(search.as_deref().unwrap_or(""), git);
            let written = main_lib::run_export(
                &tree,
                &filter,
                format == ExportFormat::Svg,
                output.as_deref(),
                &config,
            )?;
            for path in written {
                println!("Saved to: {}", path.display());
            }
            Ok(())
        }
        Commands::Screenshot {
            width,
            height,
            command,
            output,
        } => {
            let mut app = App::new(root, tree, config);
            app.limit_reached = limit_reached;
            let screen = main_lib::run_screenshot(&mut app, command.as_deref(), width, height)?;
            match output {
                Some(path) => {
                    fs::write(&path, screen)?;
                    println!("Screenshot saved to: {}", path.display());
                }
                None => print!("{}", screen),
            }
            Ok(())
        }
    }
}

/// Fatal startup errors end the process before the terminal is touched
fn exit_with(error: TreemarkError) -> ! {
    log::error!("fatal: {}", error);
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

async fn run_interactive(root: PathBuf, tree: TreeNode, limit_reached: bool, config: Config) -> Result<()> {
    let mut app = App::new(root, tree, config);
    app.limit_reached = limit_reached;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup async task channels
    let cancel = CancellationToken::new();
    let (task_sender, task_receiver) = mpsc::channel::<Task>(32);
    let (result_sender, mut result_receiver) = mpsc::channel::<TaskResult>(32);
    let worker_handle = tokio::spawn(async_task::run_worker(task_receiver, result_sender, cancel.clone()));

    for task in main_lib::startup_tasks(&app.config) {
        log::info!("📤 main: sending startup task {:?}", task);
        if let Err(e) = task_sender.send(task).await {
            log::error!("📤 main: failed to send startup task: {}", e);
        }
    }

    let result = event_loop(&mut terminal, &mut app, &task_sender, &mut result_receiver).await;
    let result = main_lib::close_session(&mut app, result);

    // Pending timers are dropped; the final state is already on disk
    cancel.cancel();
    let _ = worker_handle.await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    task_sender: &mpsc::Sender<Task>,
    result_receiver: &mut mpsc::Receiver<TaskResult>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if crossterm::event::poll(tick_rate)? {
            let event = crossterm::event::read()?;
            event::handle_event(event, app);
        }

        for task in app.take_tasks() {
            if let Err(e) = task_sender.send(task).await {
                log::error!("📤 main: failed to send task: {}", e);
            }
        }

        while let Ok(result) = result_receiver.try_recv() {
            log::debug!("📨 main: received {:?}", result);
            main_lib::handle_task_result(app, result);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
