use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ConfigurationError;
use crate::fetcher::FetchError;
use crate::provider::pexels::PexelsProvider;
use crate::provider::pixabay::PixabayProvider;

pub mod pexels;
pub mod pixabay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub source_url: String,
}

/// Finds one representative photo for a text query.
#[async_trait]
pub trait ImageProvider {
    fn name(&self) -> &'static str;
    async fn search(&self, query: &str) -> Result<SearchResult, FetchError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Pixabay,
    Pexels,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pixabay" => Ok(ProviderKind::Pixabay),
            "pexels" => Ok(ProviderKind::Pexels),
            other => Err(format!("unknown provider {:?} (expected pixabay or pexels)", other)),
        }
    }
}

pub fn from_config(
    config: &Config,
    client: reqwest::Client,
) -> Result<Arc<dyn ImageProvider + Send + Sync>, ConfigurationError> {
    let provider: Arc<dyn ImageProvider + Send + Sync> = match config.provider {
        ProviderKind::Pixabay => Arc::new(PixabayProvider::new(
            client,
            &config.pixabay_endpoint,
            &config.api_key,
        )?),
        ProviderKind::Pexels => Arc::new(PexelsProvider::new(
            client,
            &config.pexels_endpoint,
            &config.api_key,
        )?),
    };
    Ok(provider)
}

/// Sends a search request and decodes a 200 JSON body; any other status is a failure.
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchError> {
    let response = request
        .header(header::ACCEPT, mime::APPLICATION_JSON.as_ref())
        .send()
        .await?;
    if response.status() != StatusCode::OK {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    let body = response.bytes().await?;
    parse_body(&body)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    if body.is_empty() {
        return Err(FetchError::EmptyPayload);
    }
    serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

pub(crate) fn first_url<I>(candidates: I) -> Result<SearchResult, FetchError>
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .next()
        .filter(|url| !url.trim().is_empty())
        .map(|source_url| SearchResult { source_url })
        .ok_or(FetchError::EmptyPayload)
}
