use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod http_fetcher;

/// Why one network attempt produced nothing usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response carried no usable payload")]
    EmptyPayload,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid URL {0:?}")]
    InvalidUrl(String),

    #[error("network admission closed")]
    Admission,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return FetchError::Malformed(format!("{:#}", err));
        }
        if let Some(status) = err.status() {
            return FetchError::Status(status.as_u16());
        }
        FetchError::Transport(format!("Error occurred while fetching data. {:#}", err))
    }
}

#[async_trait]
pub trait Fetchable {
    async fn fetch(&self, link: &str) -> Result<Bytes, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_cause() {
        assert_eq!(FetchError::Status(503).to_string(), "unexpected HTTP status 503");
        assert_eq!(
            FetchError::InvalidUrl(String::from("/photos/lima.jpg")).to_string(),
            "invalid URL \"/photos/lima.jpg\""
        );
    }
}
