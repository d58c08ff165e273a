use async_trait::async_trait;
use log::trace;
use serde::Deserialize;
use url::Url;

use super::{first_url, get_json, ImageProvider, SearchResult};
use crate::error::ConfigurationError;
use crate::fetcher::FetchError;

// The API refuses per_page below 3; only the first hit is used.
const PER_PAGE: &str = "3";

#[derive(Deserialize)]
struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Deserialize)]
struct PixabayHit {
    #[serde(rename = "largeImageURL", default)]
    large_image_url: String,
}

pub struct PixabayProvider {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl PixabayProvider {
    pub fn new(client: reqwest::Client, endpoint: &str, api_key: &str) -> Result<PixabayProvider, ConfigurationError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            ConfigurationError::InvalidSetting(format!("pixabay_endpoint {:?}: {}", endpoint, e))
        })?;
        Ok(PixabayProvider {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    fn name(&self) -> &'static str {
        "pixabay"
    }

    async fn search(&self, query: &str) -> Result<SearchResult, FetchError> {
        let request = self.client.get(self.endpoint.clone()).query(&[
            ("key", self.api_key.as_str()),
            ("q", query),
            ("image_type", "photo"),
            ("orientation", "horizontal"),
            ("per_page", PER_PAGE),
            ("safesearch", "true"),
        ]);
        let response: PixabayResponse = get_json(request).await?;
        trace!("Pixabay returned {} hits for {:?}", response.hits.len(), query);
        first_url(response.hits.into_iter().map(|hit| hit.large_image_url))
    }
}
