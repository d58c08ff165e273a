use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::report::{Outcome, RunReport};
use crate::task::{FetchConvertTask, Pipeline};
use crate::work_item::{CacheKey, WorkItem};

/// Live completion counter of a run.
#[derive(Debug, Default)]
pub struct Progress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl Progress {
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    fn start(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn advance(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Runs one [`FetchConvertTask`] per unique work item with at most
/// `concurrency` network calls in flight.
pub struct Dispatcher {
    pipeline: Arc<Pipeline>,
    permits: Arc<Semaphore>,
    progress: Arc<Progress>,
}

impl Dispatcher {
    pub fn new(pipeline: Arc<Pipeline>, concurrency: usize) -> Dispatcher {
        Dispatcher {
            pipeline,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            progress: Arc::new(Progress::default()),
        }
    }

    pub fn progress(&self) -> Arc<Progress> {
        self.progress.clone()
    }

    pub async fn run(&self, items: Vec<WorkItem>) -> RunReport {
        let report = RunReport::new();
        self.progress.start(items.len());

        let mut seen = HashSet::with_capacity(items.len());
        let mut tasks = JoinSet::new();
        for item in items {
            let key = item.cache_key();
            if !seen.insert(key.clone()) {
                // Only the first row of a key is dispatched, so no two tasks race on one file.
                warn!("Duplicate row {:?} / {:?}, sharing artifact {}", item.region(), item.place(), key);
                self.complete(&report, &key, Outcome::Skipped);
                continue;
            }
            let task = FetchConvertTask::new(self.pipeline.clone(), self.permits.clone(), item);
            tasks.spawn(async move {
                let outcome = task.run().await;
                (key, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, outcome)) => self.complete(&report, &key, outcome),
                Err(e) => {
                    error!("Task aborted before reporting an outcome: {}", e);
                    report.record(Outcome::Failed);
                    self.progress.advance();
                }
            }
        }
        report
    }

    fn complete(&self, report: &RunReport, key: &CacheKey, outcome: Outcome) {
        report.record(outcome);
        let completed = self.progress.advance();
        info!("[{}/{}] {} -> {}", completed, self.progress.total(), key, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::tests::{pipeline, pipeline_with, png, FakeFetcher, FakeProvider, Gauge, SlowTranscoder};

    fn paris_and_tokyo() -> Vec<WorkItem> {
        vec![WorkItem::new("France", "Paris"), WorkItem::new("Japan", "Tokyo")]
    }

    #[tokio::test(start_paused = true)]
    async fn test_paris_downloaded_tokyo_has_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let provider = Arc::new(FakeProvider::new(&[("Paris, France", "https://img/paris.jpg")], gauge.clone()));
        let fetcher = Arc::new(FakeFetcher::new(vec![("https://img/paris.jpg", png(120, 80))], gauge));
        let dispatcher = Dispatcher::new(pipeline(provider.clone(), fetcher, dir.path()), 10);

        let summary = dispatcher.run(paris_and_tokyo()).await.summary();

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.no_image, 1);
        assert_eq!(summary.total(), 2);
        assert_eq!(provider.calls("Tokyo, Japan"), 3);
        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, vec![String::from("France_Paris.webp")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_run_only_skips() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let provider = Arc::new(FakeProvider::new(
            &[
                ("Paris, France", "https://img/paris.jpg"),
                ("Tokyo, Japan", "https://img/tokyo.jpg"),
            ],
            gauge.clone(),
        ));
        let fetcher = Arc::new(FakeFetcher::new(
            vec![
                ("https://img/paris.jpg", png(120, 80)),
                ("https://img/tokyo.jpg", png(80, 120)),
            ],
            gauge,
        ));
        let dispatcher = Dispatcher::new(pipeline(provider.clone(), fetcher.clone(), dir.path()), 10);

        let first = dispatcher.run(paris_and_tokyo()).await.summary();
        let stored = std::fs::read(dir.path().join("Japan_Tokyo.webp")).unwrap();
        let second = dispatcher.run(paris_and_tokyo()).await.summary();

        assert_eq!(first.downloaded, 2);
        assert_eq!(second.downloaded, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(provider.total_calls(), 2);
        assert_eq!(std::fs::read(dir.path().join("Japan_Tokyo.webp")).unwrap(), stored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_calls_never_exceed_limit() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let places: Vec<String> = (0..30).map(|i| format!("Town {}", i)).collect();
        let urls: Vec<(String, String)> = places
            .iter()
            .map(|place| (format!("{}, Freedonia", place), format!("https://img/{}.jpg", place)))
            .collect();
        let url_refs: Vec<(&str, &str)> = urls.iter().map(|(q, u)| (q.as_str(), u.as_str())).collect();
        let provider = Arc::new(FakeProvider::new(&url_refs, gauge.clone()));
        // Odd towns have no downloadable image and spend their retries inside the bound too.
        let fetcher = Arc::new(FakeFetcher::new(
            urls.iter()
                .enumerate()
                .filter(|(i, _)| i % 2 == 0)
                .map(|(_, (_, url))| (url.as_str(), png(20, 10)))
                .collect(),
            gauge.clone(),
        ));
        let dispatcher = Dispatcher::new(pipeline(provider, fetcher, dir.path()), 4);
        let items = places.iter().map(|place| WorkItem::new("Freedonia", place.as_str())).collect();

        let summary = dispatcher.run(items).await.summary();

        assert_eq!(gauge.peak(), 4);
        assert_eq!(summary.downloaded, 15);
        assert_eq!(summary.failed, 15);
        assert_eq!(summary.total(), 30);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_transcodes_never_exceed_their_own_limit() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let places: Vec<String> = (0..12).map(|i| format!("Village {}", i)).collect();
        let urls: Vec<(String, String)> = places
            .iter()
            .map(|place| (format!("{}, Ruritania", place), format!("https://img/{}.jpg", place)))
            .collect();
        let url_refs: Vec<(&str, &str)> = urls.iter().map(|(q, u)| (q.as_str(), u.as_str())).collect();
        let provider = Arc::new(FakeProvider::new(&url_refs, gauge.clone()));
        let fetcher = Arc::new(FakeFetcher::new(
            urls.iter().map(|(_, url)| (url.as_str(), png(20, 10))).collect(),
            gauge,
        ));
        let transcoder = Arc::new(SlowTranscoder::default());
        let dispatcher = Dispatcher::new(
            pipeline_with(provider, fetcher, transcoder.clone(), dir.path(), 2),
            8,
        );
        let items = places.iter().map(|place| WorkItem::new("Ruritania", place.as_str())).collect();

        let summary = dispatcher.run(items).await.summary();

        assert_eq!(summary.downloaded, 12);
        assert!(transcoder.peak() >= 1 && transcoder.peak() <= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_rows_share_one_download() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let provider = Arc::new(FakeProvider::new(&[("Paris, France", "https://img/paris.jpg")], gauge.clone()));
        let fetcher = Arc::new(FakeFetcher::new(vec![("https://img/paris.jpg", png(50, 50))], gauge));
        let dispatcher = Dispatcher::new(pipeline(provider.clone(), fetcher.clone(), dir.path()), 10);
        let items = vec![
            WorkItem::new("France", "Paris"),
            WorkItem::new("France", "Paris"),
            WorkItem::new("France", "Paris"),
        ];

        let summary = dispatcher.run(items).await.summary();

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(provider.total_calls(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_reaches_total() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let provider = Arc::new(FakeProvider::new(&[], gauge.clone()));
        let fetcher = Arc::new(FakeFetcher::new(vec![], gauge));
        let dispatcher = Dispatcher::new(pipeline(provider, fetcher, dir.path()), 2);
        let progress = dispatcher.progress();

        let summary = dispatcher.run(paris_and_tokyo()).await.summary();

        assert_eq!(summary.no_image, 2);
        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.total(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let gauge = Arc::new(Gauge::default());
        let provider = Arc::new(FakeProvider::new(&[], gauge.clone()));
        let fetcher = Arc::new(FakeFetcher::new(vec![], gauge));
        let dispatcher = Dispatcher::new(pipeline(provider, fetcher, dir.path()), 2);

        let summary = dispatcher.run(Vec::new()).await.summary();

        assert_eq!(summary.total(), 0);
    }
}
