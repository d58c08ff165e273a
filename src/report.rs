use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Terminal classification of one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Downloaded,
    Skipped,
    NoImage,
    Failed,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Downloaded => write!(f, "Downloaded"),
            Outcome::Skipped => write!(f, "Skipped"),
            Outcome::NoImage => write!(f, "No Image"),
            Outcome::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    downloaded: AtomicUsize,
    skipped: AtomicUsize,
    no_image: AtomicUsize,
    failed: AtomicUsize,
}

impl RunReport {
    pub fn new() -> RunReport {
        RunReport::default()
    }

    pub fn record(&self, outcome: Outcome) {
        let bucket = match outcome {
            Outcome::Downloaded => &self.downloaded,
            Outcome::Skipped => &self.skipped,
            Outcome::NoImage => &self.no_image,
            Outcome::Failed => &self.failed,
        };
        bucket.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> Summary {
        Summary {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            no_image: self.no_image.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub downloaded: usize,
    pub skipped: usize,
    pub no_image: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.no_image + self.failed
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Downloaded => self.downloaded,
            Outcome::Skipped => self.skipped,
            Outcome::NoImage => self.no_image,
            Outcome::Failed => self.failed,
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "========== SUMMARY ==========")?;
        for outcome in [Outcome::Downloaded, Outcome::Skipped, Outcome::NoImage, Outcome::Failed] {
            writeln!(f, "{}: {}", outcome, self.count(outcome))?;
        }
        write!(f, "=============================")
    }
}
