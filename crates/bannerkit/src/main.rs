//! bannerkit CLI - banner editor with live preview and embeddable HTML export.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "bannerkit")]
#[command(about = "Edit a banner and export it as embeddable HTML")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to banner.toml config file
    #[arg(short, long, default_value = "banner.toml", global = true)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default banner.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        yes: bool,
    },

    /// Start the banner editor in the browser
    Edit {
        /// Port to listen on (defaults to config or 7777)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,

        /// Reload the banner when the config file changes
        #[arg(short, long)]
        watch: bool,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Print or write the embed code
    Generate {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// HTML-escape field values
        #[arg(long)]
        escape: bool,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Copy the embed code to the clipboard
    Copy {
        /// HTML-escape field values
        #[arg(long)]
        escape: bool,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Write a standalone HTML page showing the preview
    Preview {
        /// Output file
        #[arg(short, long, default_value = "banner-preview.html")]
        output: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,
    },
}

/// Per-invocation overrides of the banner fields.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Banner title
    #[arg(long)]
    title: Option<String>,

    /// Banner subtitle
    #[arg(long)]
    subtitle: Option<String>,

    /// Image URL
    #[arg(long, conflicts_with = "image_file")]
    image_url: Option<String>,

    /// Local image file, embedded as a data URI
    #[arg(long)]
    image_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Edit {
            port,
            no_open,
            watch,
            fields,
        } => {
            commands::edit::run(&cli.config, port, no_open, watch, fields).await?;
        }
        Commands::Generate {
            output,
            escape,
            fields,
        } => {
            commands::generate::run(&cli.config, output, escape, fields).await?;
        }
        Commands::Copy { escape, fields } => {
            commands::copy::run(&cli.config, escape, fields).await?;
        }
        Commands::Preview { output, fields } => {
            commands::preview::run(&cli.config, output, fields).await?;
        }
    }

    Ok(())
}
