use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telecue_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "telecue")]
#[command(author, version, about = "A terminal teleprompter with smooth looping auto-scroll")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script to present (shorthand for `run`), `-` reads stdin
    file: Option<PathBuf>,

    /// Use this configuration file instead of ~/.config/telecue/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Present a script
    Run {
        /// Script file, `-` reads stdin
        file: PathBuf,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Write a configuration file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

fn restore_terminal() {
    use crossterm::{
        event::{DisableFocusChange, PopKeyboardEnhancementFlags},
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(
        std::io::stdout(),
        PopKeyboardEnhancementFlags,
        DisableFocusChange,
        LeaveAlternateScreen
    );
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level));

    if to_file {
        let log_path = config.log_path();
        if let Some(dir) = log_path.parent() {
            std::fs::create_dir_all(dir).ok();
        }
        if let Ok(file) = std::fs::File::create(&log_path) {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false),
                )
                .init();
        }
        // Without a log file the TUI runs silently
        return;
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);

    let command = match (cli.command, cli.file) {
        (Some(command), _) => command,
        (None, Some(file)) => Commands::Run { file },
        (None, None) => {
            anyhow::bail!("No script given.\nUsage: telecue <FILE>  (use - to read stdin)")
        }
    };

    // Handle commands
    match command {
        Commands::Run { file } => {
            // Load configuration
            let config = AppConfig::load_from(&config_path)?;
            init_logging(&config, true);
            commands::run::run(config, config_path, &file).await
        }
        Commands::Config { action } => {
            // These must work even when the file does not parse
            init_logging(&AppConfig::default(), false);
            match action {
                ConfigAction::Path => commands::config::path(&config_path),
                ConfigAction::Init { force } => commands::config::init(&config_path, force),
            }
        }
    }
}
