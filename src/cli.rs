use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "treemark")]
#[command(version)]
#[command(about = "Browse, annotate and export a directory tree")]
pub struct Cli {
    /// Directory to browse (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Directory to browse; takes precedence over the positional path
    #[arg(short = 'p', long = "path", value_name = "DIR")]
    pub path_flag: Option<PathBuf>,

    /// Ignore .gitignore and scan without node or depth limits
    #[arg(short, long, global = true)]
    pub force: bool,

    /// Skip the confirmation prompt of --force
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Maximum number of scanned nodes, root included
    #[arg(long, global = true)]
    pub max_nodes: Option<usize>,

    /// Maximum directory depth below the root
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Releases endpoint used for the update check
    #[arg(long, global = true)]
    pub update_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive TUI (default)
    Run,
    /// Write the filtered tree without starting the TUI
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        /// Search term applied before exporting
        #[arg(long)]
        search: Option<String>,
        /// Only keep paths with git changes
        #[arg(long)]
        git: bool,
        /// Output file; for svg the stem of the dark and light files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render one frame as text after applying commands
    Screenshot {
        /// Terminal width for rendering
        #[arg(long, default_value = "100")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "30")]
        height: u16,
        /// Comma-separated commands (e.g. "down,toggle_collapse,search:a")
        #[arg(short = 'x', long)]
        command: Option<String>,
        /// Output file for the screenshot (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Svg,
}

impl Cli {
    /// `--path` wins over the positional argument, which wins over `.`
    pub fn target_path(&self) -> PathBuf {
        self.path_flag
            .clone()
            .or_else(|| self.path.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
