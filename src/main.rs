use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logo_fetcher::{
    config::{defaults::DEFAULT_CONFIG_FILE, load_websites, Config},
    logo_assets::{CacheIndexStore, LogoAssetStorage},
    resolver::LogoResolver,
    services::{
        find_small_images, find_uncached, sync_index_from_storage, LogoDownloader,
        LogoFetchPipeline,
    },
    utils::{BrowserHttpClient, DelayPolicy, HttpFetcher},
};

#[derive(Parser)]
#[command(name = "logo-fetcher")]
#[command(version)]
#[command(about = "Resolve, download and cache a logo for every domain in a list")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Domain list (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    websites: Option<PathBuf>,

    /// Logo storage directory (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    storage_dir: Option<PathBuf>,

    /// Cache index file (overrides config file)
    #[arg(short, long, value_name = "FILE")]
    index: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch logos for every uncached domain (default)
    Fetch,
    /// List domains that have no stored logo file
    Uncached,
    /// Add index entries for stored files the index does not know about
    SyncIndex,
    /// List raster logos smaller than a threshold
    SmallImages {
        /// Minimum width and height in pixels (overrides config file)
        #[arg(short, long)]
        threshold: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("logo_fetcher={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting logo fetcher v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    if let Some(websites) = cli.websites {
        config.paths.websites = websites;
    }
    if let Some(storage_dir) = cli.storage_dir {
        config.paths.storage_dir = storage_dir;
    }
    if let Some(index) = cli.index {
        config.paths.index_file = index;
    }

    let storage = LogoAssetStorage::new(&config.paths.storage_dir);

    match cli.command.unwrap_or(Command::Fetch) {
        Command::Fetch => run_fetch(&config, storage).await,
        Command::Uncached => {
            let websites = load_websites(&config.paths.websites)?;
            for domain in find_uncached(&websites.websites, &storage).await? {
                println!("{domain}");
            }
            Ok(())
        }
        Command::SyncIndex => {
            let mut index = CacheIndexStore::load(&config.paths.index_file).await?;
            let added = sync_index_from_storage(&storage, &mut index).await?;
            info!("Added {} entries to {}", added.len(), index.path().display());
            Ok(())
        }
        Command::SmallImages { threshold } => {
            let threshold = threshold.unwrap_or(config.housekeeping.small_image_threshold);
            for image in find_small_images(&storage, threshold).await? {
                println!("{} ({}x{})", image.file_name, image.width, image.height);
            }
            Ok(())
        }
    }
}

async fn run_fetch(config: &Config, storage: LogoAssetStorage) -> Result<()> {
    let websites = load_websites(&config.paths.websites)?;
    let index = CacheIndexStore::load(&config.paths.index_file).await?;
    storage.ensure_storage_dir().await?;
    info!(
        "Storing logos in {} with index {}",
        storage.logo_dir().display(),
        index.path().display()
    );

    let fetcher: Arc<dyn HttpFetcher> = Arc::new(BrowserHttpClient::new(
        &config.request,
        config.headers.clone(),
    )?);
    let delays = DelayPolicy::new(config.delays.clone());

    let mut pipeline = LogoFetchPipeline::new(
        storage,
        index,
        LogoResolver::new(fetcher.clone(), &config.request, delays.clone()),
        LogoDownloader::new(fetcher, &config.request, delays.clone()),
        delays,
    );

    let stats = pipeline.run(&websites.websites).await;
    println!("{stats}");
    Ok(())
}
