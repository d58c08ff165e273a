use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems that stop the run before any task is dispatched.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("API key is required (set PLACEPIX_API_KEY or `api_key` in the config file)")]
    MissingApiKey,

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("cannot read input file {path:?}: {source}")]
    InputUnreadable { path: PathBuf, source: io::Error },

    #[error("malformed input table: {0}")]
    MalformedInput(#[from] csv::Error),

    #[error("CSV must contain '{0}' header")]
    MissingColumn(&'static str),

    #[error("cannot prepare output directory {path:?}: {source}")]
    OutputDirectory { path: PathBuf, source: io::Error },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
