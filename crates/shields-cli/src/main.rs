mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::Context;

#[derive(Parser)]
#[command(name = "shields")]
#[command(about = "Privacy preferences and opt-in usage statistics", long_about = None)]
struct Cli {
    /// Data directory (defaults to the platform local data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or change privacy preferences
    Privacy {
        #[command(subcommand)]
        action: Option<PrivacyAction>,
    },
    /// Usage statistics
    Telemetry {
        #[command(subcommand)]
        action: TelemetryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum PrivacyAction {
    /// List preference rows as stored, including policy flags
    Stored,
    /// Toggle a preference as if the user clicked it
    Set {
        /// Preference key (e.g., `ad_block`)
        key: String,
        /// New value (true/false)
        value: String,
    },
    /// Pin a preference by policy, or lift the policy
    Policy {
        /// Preference key (e.g., `safe_browsing`)
        key: String,
        /// Value enforced by the policy (true/false)
        value: String,
        /// Remove the policy instead of applying it
        #[arg(long)]
        lift: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TelemetryAction {
    /// Show opt-in state and identity age
    Status,
    /// Record an app start event
    AppStart,
    /// Send a bare named event
    Send {
        /// Event name
        event: String,
    },
    /// List recorded events
    Events {
        /// Only show the most recent N events
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., `telemetry.token`)
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., `telemetry.token`)
        key: String,
        /// Value to set (empty clears optional values)
        value: String,
    },
    /// List all configuration
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let ctx = Context::resolve(cli.data_dir)?;
    log::debug!("Data dir: {}", ctx.data_dir.display());
    log::debug!("Command: {:?}", cli.command);

    match cli.command {
        Commands::Privacy { action } => match action {
            None => commands::privacy::handle_privacy_show(&ctx),
            Some(PrivacyAction::Stored) => commands::privacy::handle_privacy_stored(&ctx),
            Some(PrivacyAction::Set { key, value }) => {
                commands::privacy::handle_privacy_set(&ctx, &key, &value)
            }
            Some(PrivacyAction::Policy { key, value, lift }) => {
                commands::privacy::handle_privacy_policy(&ctx, &key, &value, lift)
            }
        },
        Commands::Telemetry { action } => match action {
            TelemetryAction::Status => commands::telemetry::handle_status(&ctx),
            TelemetryAction::AppStart => commands::telemetry::handle_app_start(&ctx),
            TelemetryAction::Send { event } => commands::telemetry::handle_send(&ctx, &event),
            TelemetryAction::Events { limit } => commands::telemetry::handle_events(&ctx, limit),
        },
        Commands::Config { action } => match action {
            ConfigAction::Get { key } => commands::config::handle_config_get(&ctx, &key),
            ConfigAction::Set { key, value } => {
                commands::config::handle_config_set(&ctx, &key, &value)
            }
            ConfigAction::List => commands::config::handle_config_list(&ctx),
        },
    }
}
