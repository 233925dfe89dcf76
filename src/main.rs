//! StudyDesk CLI - serve the study desk API and manage its stores

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studydesk::config::{self, StudyDeskConfig};
use studydesk::storage::Stores;
use studydesk::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "studydesk")]
#[command(version)]
#[command(about = "Study desk backend - chat, file, chapter and quiz question stores over HTTP")]
#[command(long_about = r#"
StudyDesk keeps five SQLite-backed collections and serves them as a JSON API:
  • Chat messages
  • Files and folders
  • Chapters and their quiz questions (with cascade delete)

Example usage:
  studydesk init --data-dir ./data
  studydesk serve --port 5001
  studydesk stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./studydesk.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Directory holding the store databases
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Address to listen on
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write a config file and create every store
    Init {
        /// Directory holding the store databases
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the number of records in each store
    Stats {
        /// Directory holding the store databases
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Serve { data_dir, host, port } => {
            let settings = file_config.merge(data_dir, host, port).resolve()?;
            studydesk::server::start_server(settings).await?;
        }

        Commands::Init { data_dir, force } => {
            let config_path = cli.config.unwrap_or_else(config::default_config_path);
            let data_dir = data_dir.unwrap_or_else(|| file_config.data_dir());
            let config = StudyDeskConfig {
                data_dir: Some(data_dir.to_string_lossy().to_string()),
                ..file_config
            };

            config::write_config(&config_path, &config, force)?;
            let layout = config.layout();
            Stores::open(&layout)?;

            ui::header("StudyDesk initialized");
            ui::info("Config", &config_path.display().to_string());
            ui::info("Data", &layout.data_dir().display().to_string());
            ui::success("All stores ready");
        }

        Commands::Stats { data_dir, format } => {
            let layout = file_config.merge(data_dir, None, None).layout();
            let stores = Stores::open(&layout)?;
            let stats = stores.stats()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "{} StudyDesk Statistics ({})",
                    Icons::STATS,
                    layout.data_dir().display()
                );
                let rows: Vec<(String, String)> = stats
                    .rows()
                    .into_iter()
                    .map(|(name, count)| (name.to_string(), count.to_string()))
                    .collect();
                println!("{}", ui::stats_table(&rows));
            }
        }
    }

    Ok(())
}
