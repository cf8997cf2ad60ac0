use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use product_sheet_crawler_lib::application;
use product_sheet_crawler_lib::infrastructure::{AppConfig, init_logging_with_config, logging};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "product-sheet-crawler")]
#[command(about = "Crawl product listings into a spreadsheet", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the seed URLs and write the product table (default)
    Crawl(CrawlArgs),

    /// Write the default configuration to a file
    InitConfig {
        /// Destination, defaults to the per-user config path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(clap::Args, Default)]
struct CrawlArgs {
    /// Seed spreadsheet
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output spreadsheet
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_else(|| Command::Crawl(CrawlArgs::default())) {
        Command::Crawl(args) => crawl(args).await,
        Command::InitConfig { config, force } => init_config(config, force).await,
    }
}

async fn crawl(args: CrawlArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(input) = args.input {
        config.crawl.input_path = input;
    }
    if let Some(output) = args.output {
        config.output.path = output;
    }

    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;
    logging::log_system_info();

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping crawl");
            ctrl_c.cancel();
        }
    });

    match application::run(&config, cancel).await {
        Ok(report) => {
            info!(
                "Done: {} seeds, {} pages visited, {} failed, {} rows written to {}",
                report.seeds,
                report.pages_visited,
                report.failed_pages.len(),
                report.export.written,
                report.output_path.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Crawl failed: {:#}", e);
            Err(e)
        }
    }
}

async fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = path.or_else(AppConfig::default_path) else {
        bail!("No config directory available; pass --config");
    };
    if path.exists() && !force {
        bail!("{} already exists; use --force to overwrite", path.display());
    }

    AppConfig::default().save(&path).await?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
