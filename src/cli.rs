use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;
use crate::provider::ProviderKind;

/// Fetch one representative photo per (Country, Place) row and store it as WebP.
///
/// The provider API key is read from `PLACEPIX_API_KEY` or the config file.
#[derive(Parser, Debug)]
#[command(name = "placepix", version)]
pub struct Cli {
    /// CSV file with `Country` and `Place` columns
    pub input: PathBuf,

    /// YAML config file (defaults to ./placepix.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the images
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Image search backend: pixabay or pexels
    #[arg(short, long)]
    pub provider: Option<ProviderKind>,

    /// Maximum number of network requests in flight
    #[arg(short = 'n', long)]
    pub concurrency: Option<usize>,

    /// Log retries and cache hits
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            provider: self.provider,
            output_dir: self.output_dir.clone(),
            concurrency: self.concurrency,
        }
    }
}
