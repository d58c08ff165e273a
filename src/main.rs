use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use crate::cache::file_cache::FileCache;
use crate::cli::Cli;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::ConfigurationError;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::report::Summary;
use crate::task::Pipeline;
use crate::transcoder::ImageTranscoder;

mod cache;
mod cli;
mod config;
mod dispatcher;
mod error;
mod fetcher;
mod image;
mod input;
mod logging;
mod provider;
mod report;
mod retry;
mod task;
mod transcoder;
mod work_item;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("placepix: {}", e);
    }

    match run(&cli).await {
        Ok(summary) => println!("\n{}", summary),
        Err(e) => {
            error!("{}", e);
            eprintln!("placepix: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<Summary, ConfigurationError> {
    let config = Config::load(cli.config.as_deref(), &cli.overrides())?;
    let items = input::read_work_items(&cli.input)?;
    info!("Total rows: {}", items.len());

    let cache = FileCache::open(&config.output_dir, config.format).map_err(|source| {
        ConfigurationError::OutputDirectory {
            path: config.output_dir.clone(),
            source,
        }
    })?;
    info!("Writing {} artifacts to {:?}", config.format.mime(), cache.catalog());

    let client = http_client(&config)?;
    let provider = provider::from_config(&config, client.clone())?;
    info!("Searching {} with {} concurrent requests", provider.name(), config.concurrency);

    let pipeline = Pipeline::new(
        provider,
        Arc::new(HttpFetcher::new(client)),
        Arc::new(ImageTranscoder),
        Arc::new(cache),
        config.artifact_spec(),
        config.retry_policy(),
        config.transcode_concurrency,
    );
    let dispatcher = Dispatcher::new(Arc::new(pipeline), config.concurrency);
    let progress = dispatcher.progress();
    let summary = dispatcher.run(items).await.summary();
    info!(
        "Processed {}/{} rows, {} outcomes recorded",
        progress.completed(),
        progress.total(),
        summary.total()
    );

    Ok(summary)
}

fn http_client(config: &Config) -> Result<reqwest::Client, ConfigurationError> {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(config.concurrency)
        .timeout(config.request_timeout())
        .user_agent(concat!("placepix/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
