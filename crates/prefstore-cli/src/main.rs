//! # Prefstore CLI
//!
//! Command-line interface for inspecting and editing Prefstore settings files.
//!
//! ## Commands
//!
//! - `prefstore get <app>` - Show settings merged over the configured defaults
//! - `prefstore set <app> <json>` - Merge keys into the stored settings
//! - `prefstore save <app> <json>` - Replace the stored settings
//! - `prefstore delete <app>` - Delete the settings file (or one instance)
//! - `prefstore path <app>` - Show where the settings file lives
//! - `prefstore instances <app>` - List instances with stored settings
//!
//! ## Example Usage
//!
//! ```bash
//! # Update one global key
//! prefstore set demo '{"theme": "dark"}'
//!
//! # Replace one instance's settings
//! prefstore save demo '{"port": 8080}' --instance 11111111-1111-1111-1111-111111111111
//!
//! # Read them back as JSON
//! prefstore get demo --instance 11111111-1111-1111-1111-111111111111 -o json
//! ```

mod app;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Prefstore - per-application settings files
#[derive(Parser)]
#[command(name = "prefstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the settings files
    #[arg(long, global = true, env = "PREFSTORE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show settings merged over the configured defaults
    Get {
        /// Application name
        app: String,

        /// Instance id (UUID) to read instead of the global scope
        #[arg(short, long)]
        instance: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Merge keys into the stored settings
    Set {
        /// Application name
        app: String,

        /// JSON object with the keys to update
        content: String,

        /// Instance id (UUID) to update instead of the global scope
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Replace the stored settings
    Save {
        /// Application name
        app: String,

        /// JSON object with the complete settings
        content: String,

        /// Instance id (UUID) to replace instead of the global scope
        #[arg(short, long)]
        instance: Option<String>,
    },

    /// Delete the settings file, or a single instance
    Delete {
        /// Application name
        app: String,

        /// Only remove this instance's settings
        #[arg(short, long)]
        instance: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the settings file location
    Path {
        /// Application name
        app: String,
    },

    /// List instances that have stored settings
    Instances {
        /// Application name
        app: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    // Load configuration
    let mut config = app::load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    // Execute command
    match cli.command {
        Commands::Get {
            app,
            instance,
            output,
        } => commands::get::run(&config, &app, instance.as_deref(), output),
        Commands::Set {
            app,
            content,
            instance,
        } => commands::set::run(&config, &app, &content, instance.as_deref()),
        Commands::Save {
            app,
            content,
            instance,
        } => commands::save::run(&config, &app, &content, instance.as_deref()),
        Commands::Delete { app, instance, yes } => {
            commands::delete::run(&config, &app, instance.as_deref(), yes)
        }
        Commands::Path { app } => commands::path::run(&config, &app),
        Commands::Instances { app } => commands::instances::run(&config, &app),
    }
}
