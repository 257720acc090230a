//! Phone Simulator CLI - drive the simulated phone from the terminal.
//!
//! Every built-in app is reachable as a subcommand. Durable state lives in the
//! same SQLite store and notes directory a graphical front-end would use, so
//! the CLI doubles as an inspection and scripting tool.

mod commands;

use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use ps_core::config::{AppConfig, ConfigHandle};
use ps_core::error::PsResult;
use ps_core::logging;
use ps_services::ServiceRegistry;

/// Phone Simulator - a home screen and a handful of apps in your terminal.
#[derive(Parser)]
#[command(
    name = "phonesim",
    version,
    about = "Phone Simulator CLI",
    long_about = "A command-line front-end for the phone simulator.\n\
                  Read and send messages, manage contacts and notes, use the calculator,\n\
                  and inspect the status bar and notification center."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the home screen, or launch an app by name.
    Home {
        /// App to tap (e.g. "Notes", "Camera").
        #[arg(short, long)]
        launch: Option<String>,
    },
    /// Read and send messages.
    Messages {
        #[command(subcommand)]
        action: commands::messages::MessagesAction,
    },
    /// List, search and add contacts.
    Contacts {
        #[command(subcommand)]
        action: commands::contacts::ContactsAction,
    },
    /// Manage notes.
    Notes {
        #[command(subcommand)]
        action: commands::notes::NotesAction,
    },
    /// Press calculator keys, e.g. `phonesim calc 7 + 3 =`.
    Calc {
        /// Keys to press in order.
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
        /// Print the display after every key.
        #[arg(long)]
        steps: bool,
    },
    /// View and change settings.
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Open the notification center.
    Notifications {
        #[command(subcommand)]
        action: commands::notifications::NotificationsAction,
    },
    /// Show or record app usage.
    Usage {
        #[command(subcommand)]
        action: commands::usage::UsageAction,
    },
    /// Render the status bar.
    Status {
        /// Keep the status bar mounted and redraw it for this many seconds.
        #[arg(short, long)]
        watch: Option<u64>,
    },
    /// Database management commands.
    Db {
        #[command(subcommand)]
        action: commands::db::DbAction,
    },
}

impl Commands {
    /// App name recorded in usage statistics, for commands that open an app.
    fn app_name(&self) -> Option<&'static str> {
        match self {
            Commands::Messages { .. } => Some("Messages"),
            Commands::Contacts { .. } => Some("Contacts"),
            Commands::Notes { .. } => Some("Notes"),
            Commands::Calc { .. } => Some("Calculator"),
            Commands::Settings { .. } => Some("Settings"),
            Commands::Notifications { .. } => Some("Notifications"),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> PsResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_file(std::path::Path::new(path))?,
        None => AppConfig::load_default()?,
    };

    // Initialize logging
    let log_level = if cli.verbose { "debug".to_string() } else { config.logging.level.clone() };
    let log_dir = config.effective_log_dir()?;
    let _guard = logging::init_logging(&log_level, &log_dir, config.logging.json_output)?;

    let config_handle = ConfigHandle::new(config);
    info!("{} CLI v{}", ps_core::constants::APP_NAME, ps_core::constants::APP_VERSION);

    let mut registry = ServiceRegistry::from_config(config_handle).await?;
    registry.register_all();
    registry.init_all().await?;

    let app_name = cli.command.app_name();
    let started = Instant::now();

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Home { launch } => commands::home::run(&registry, launch, cli.format).await,
        Commands::Messages { action } => commands::messages::run(&registry, action, cli.format).await,
        Commands::Contacts { action } => commands::contacts::run(&registry, action, cli.format).await,
        Commands::Notes { action } => commands::notes::run(&registry, action, cli.format).await,
        Commands::Calc { keys, steps } => commands::calc::run(keys, steps, cli.format),
        Commands::Settings { action } => commands::settings::run(&registry, action, cli.format).await,
        Commands::Notifications { action } => {
            commands::notifications::run(&registry, action, cli.format).await
        }
        Commands::Usage { action } => commands::usage::run(&registry, action, cli.format).await,
        Commands::Status { watch } => commands::status::run(&mut registry, watch, cli.format).await,
        Commands::Db { action } => commands::db::run(&registry, action, cli.format).await,
    };

    if let (Some(app), true) = (app_name, result.is_ok()) {
        let elapsed = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        if let Err(e) = registry.store.update_app_usage(app, elapsed).await {
            warn!("failed to record usage for {app}: {e}");
        }
    }

    registry.shutdown_all().await?;
    result
}
