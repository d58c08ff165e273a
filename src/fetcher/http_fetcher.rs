use async_trait::async_trait;
use bytes::Bytes;
use log::trace;
use reqwest::header;
use reqwest::{StatusCode, Url};

use super::{FetchError, Fetchable};

pub struct HttpFetcher {
    reqwest: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(reqwest: reqwest::Client) -> HttpFetcher {
        HttpFetcher { reqwest }
    }
}

#[async_trait]
impl Fetchable for HttpFetcher {
    async fn fetch(&self, link: &str) -> Result<Bytes, FetchError> {
        let url = Url::parse(link).map_err(|_| FetchError::InvalidUrl(link.to_string()))?;
        let response = self
            .reqwest
            .get(url)
            .header(header::ACCEPT, mime::IMAGE_STAR.as_ref())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes().await?;
        trace!("Fetched {} bytes from {}", bytes.len(), link);
        if bytes.is_empty() {
            return Err(FetchError::EmptyPayload);
        }
        return Ok(bytes);
    }
}
