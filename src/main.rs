use clap::{Parser, Subcommand};
use scholarship_scraper::apis::ExtractorRegistry;
use scholarship_scraper::config::Config;
use scholarship_scraper::ingestion::{DirectoryPageSource, HttpPageSource, PageSource};
use scholarship_scraper::logging;
use scholarship_scraper::pipeline::{Pipeline, RunReport};
use scholarship_scraper::storage::{ScholarshipStore, SqliteStore};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "scholarship_scraper")]
#[command(about = "Scholarship listing ingestion into a deduplicated store")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one ingestion pass and print the JSON summary
    Run {
        /// Only these source ids (comma-separated)
        #[arg(long)]
        sources: Option<String>,
        /// SQLite database path
        #[arg(long)]
        db: Option<String>,
        /// Read saved pages from this directory instead of fetching
        #[arg(long)]
        pages_dir: Option<PathBuf>,
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// List the sources with a dedicated extractor
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    logging::init_logging(&config.log_dir);

    match cli.command {
        Commands::Sources => {
            for source_id in ExtractorRegistry::new().list_sources() {
                println!("{source_id}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run {
            sources,
            db,
            pages_dir,
            batch_size,
        } => {
            if let Some(db) = db {
                config.database_path = db;
            }
            if let Some(dir) = pages_dir {
                config.pages_dir = Some(dir);
            }
            if let Some(size) = batch_size {
                config.batch_size = size.max(1);
            }

            let store: Arc<dyn ScholarshipStore> = match SqliteStore::open(&config.database_path) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Cannot open scholarship store at {}: {}", config.database_path, e);
                    let failure = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                        "timestamp": chrono::Utc::now(),
                    });
                    println!("{}", serde_json::to_string_pretty(&failure)?);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let pages: Arc<dyn PageSource> = match &config.pages_dir {
                Some(dir) => {
                    info!("Reading saved pages from {}", dir.display());
                    Arc::new(DirectoryPageSource::new(dir))
                }
                None => Arc::new(HttpPageSource::from_config(&config)?),
            };

            let only: Option<Vec<String>> =
                sources.map(|list| list.split(',').map(|s| s.trim().to_string()).collect());
            let selected = config.selected_sources(only.as_deref());
            if selected.is_empty() {
                warn!("No enabled sources selected");
            }

            let pipeline = Pipeline::from_config(&config, pages, store);
            let outcome = pipeline.run(&selected).await;
            if !outcome.run_logged {
                warn!("Run summary was not persisted");
            }

            println!("{}", RunReport::from_summary(&outcome.summary).to_json()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
