use std::path::Path;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;

pub const LOG_CONFIG_FILE: &str = "log4rs.yml";
const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l:<5})} {t} - {m}{n}";

#[derive(Debug, Error)]
#[error("failed to initialise logging: {0}")]
pub struct LoggingError(String);

/// Uses `log4rs.yml` when present, otherwise logs to stderr.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    let file = Path::new(LOG_CONFIG_FILE);
    if file.is_file() {
        return log4rs::init_file(file, Default::default()).map_err(|e| LoggingError(e.to_string()));
    }
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    log4rs::init_config(console_config(level)?).map_err(|e| LoggingError(e.to_string()))?;
    Ok(())
}

pub fn console_config(level: LevelFilter) -> Result<Config, LoggingError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        // Connection pool chatter drowns the per-item progress lines.
        .logger(Logger::builder().build("hyper", LevelFilter::Warn))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|e| LoggingError(e.to_string()))
}
