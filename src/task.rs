use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, warn};
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::cache::{CacheError, CacheStore};
use crate::fetcher::{FetchError, Fetchable};
use crate::image::ArtifactSpec;
use crate::provider::{ImageProvider, SearchResult};
use crate::report::Outcome;
use crate::retry::RetryPolicy;
use crate::transcoder::{TranscodeError, Transcoder};
use crate::work_item::{CacheKey, WorkItem};

/// Components shared read-only by every task of a run.
pub struct Pipeline {
    provider: Arc<dyn ImageProvider + Send + Sync>,
    fetcher: Arc<dyn Fetchable + Send + Sync>,
    transcoder: Arc<dyn Transcoder + Send + Sync>,
    cache: Arc<dyn CacheStore + Send + Sync>,
    spec: ArtifactSpec,
    retry: RetryPolicy,
    transcodes: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(
        provider: Arc<dyn ImageProvider + Send + Sync>,
        fetcher: Arc<dyn Fetchable + Send + Sync>,
        transcoder: Arc<dyn Transcoder + Send + Sync>,
        cache: Arc<dyn CacheStore + Send + Sync>,
        spec: ArtifactSpec,
        retry: RetryPolicy,
        transcode_limit: usize,
    ) -> Pipeline {
        Pipeline {
            provider,
            fetcher,
            transcoder,
            cache,
            spec,
            retry,
            transcodes: Arc::new(Semaphore::new(transcode_limit.max(1))),
        }
    }
}

/// Failure of one download-transcode-store attempt.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("transcoding task did not finish: {0}")]
    Join(String),
}

/// Search, download, transcode and store the artifact of one [`WorkItem`].
///
/// Every network call holds one permit of the shared admission semaphore.
/// Transcoding holds a slot of the pipeline's own, separate bound, and
/// backoff sleeps hold neither.
pub struct FetchConvertTask {
    pipeline: Arc<Pipeline>,
    permits: Arc<Semaphore>,
    item: WorkItem,
}

impl FetchConvertTask {
    pub fn new(pipeline: Arc<Pipeline>, permits: Arc<Semaphore>, item: WorkItem) -> FetchConvertTask {
        FetchConvertTask {
            pipeline,
            permits,
            item,
        }
    }

    pub async fn run(&self) -> Outcome {
        let key = self.item.cache_key();
        if self.pipeline.cache.exists(&key) {
            debug!("{} already cached", key);
            return Outcome::Skipped;
        }

        let query = self.item.query();
        let found = {
            let query = query.as_str();
            self.pipeline
                .retry
                .run(&format!("search {:?}", query), move |_| self.search(query))
                .await
        };
        let source = match found {
            Ok(source) => source,
            Err(_) => return Outcome::NoImage,
        };

        let stored = {
            let key = &key;
            let url = source.source_url.as_str();
            self.pipeline
                .retry
                .run(&format!("fetch {}", url), move |_| self.fetch_and_store(key, url))
                .await
        };
        match stored {
            Ok(path) => {
                debug!("{} stored at {:?}", key, path);
                Outcome::Downloaded
            }
            Err(e) => {
                warn!("{} failed: {}", key, e);
                Outcome::Failed
            }
        }
    }

    async fn search(&self, query: &str) -> Result<SearchResult, FetchError> {
        let _permit = self.permits.acquire().await.map_err(|_| FetchError::Admission)?;
        self.pipeline.provider.search(query).await
    }

    async fn download(&self, url: &str) -> Result<Bytes, FetchError> {
        let _permit = self.permits.acquire().await.map_err(|_| FetchError::Admission)?;
        self.pipeline.fetcher.fetch(url).await
    }

    async fn fetch_and_store(&self, key: &CacheKey, url: &str) -> Result<PathBuf, StageError> {
        let raw = self.download(url).await?;
        let _slot = self
            .pipeline
            .transcodes
            .acquire()
            .await
            .map_err(|_| FetchError::Admission)?;
        let pipeline = self.pipeline.clone();
        let key = key.clone();
        tokio::task::spawn_blocking(move || -> Result<PathBuf, StageError> {
            let encoded = pipeline.transcoder.convert(&raw, &pipeline.spec)?;
            Ok(pipeline.cache.write(&key, &encoded)?)
        })
        .await
        .map_err(|e| StageError::Join(e.to_string()))?
    }
}
