use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "dropship",
    about = "dropship — deploy a single Python or JavaScript file",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a source file as Python or JavaScript
    Detect {
        /// Source file to classify
        file: PathBuf,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Write the deployable project for a source file without deploying it.
    ///
    /// The language is detected from the file contents unless --lang is given.
    Scaffold {
        /// Source file to scaffold
        file: PathBuf,
        /// Output directory (created if missing)
        #[arg(short, long)]
        out: PathBuf,
        /// Deployment id used for the app name (default: freshly generated)
        #[arg(long)]
        id: Option<String>,
        /// Override the detected language (python, javascript)
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Deploy a source file and print its live URL.
    ///
    /// Set DROPSHIP_SIMULATE=1 to skip the hosting platform.
    Deploy {
        /// Source file to deploy
        file: PathBuf,
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dropship=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect { file, format } => commands::detect::detect(&file, &format),
        Commands::Scaffold { file, out, id, lang } => {
            commands::scaffold::scaffold(&file, &out, id.as_deref(), lang.as_deref())
        }
        Commands::Deploy { file, config } => commands::deploy::deploy(&file, config.as_deref()),
    }
}
