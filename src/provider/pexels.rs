use async_trait::async_trait;
use log::trace;
use reqwest::header;
use serde::Deserialize;
use url::Url;

use super::{first_url, get_json, ImageProvider, SearchResult};
use crate::error::ConfigurationError;
use crate::fetcher::FetchError;

#[derive(Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsSource,
}

#[derive(Deserialize)]
struct PexelsSource {
    #[serde(default)]
    original: String,
}

pub struct PexelsProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl PexelsProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Result<PexelsProvider, ConfigurationError> {
        Url::parse(endpoint).map_err(|e| {
            ConfigurationError::InvalidSetting(format!("pexels_endpoint {:?}: {}", endpoint, e))
        })?;
        Ok(PexelsProvider {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?query={}&per_page=1&orientation=landscape",
            self.endpoint,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl ImageProvider for PexelsProvider {
    fn name(&self) -> &'static str {
        "pexels"
    }

    async fn search(&self, query: &str) -> Result<SearchResult, FetchError> {
        let request = self
            .client
            .get(self.search_url(query))
            .header(header::AUTHORIZATION, self.api_key.as_str());
        let response: PexelsResponse = get_json(request).await?;
        trace!("Pexels returned {} photos for {:?}", response.photos.len(), query);
        first_url(response.photos.into_iter().map(|photo| photo.src.original))
    }
}
