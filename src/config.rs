use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::image::encoder::OutputFormat;
use crate::image::ArtifactSpec;
use crate::provider::ProviderKind;
use crate::retry::RetryPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "placepix.yaml";
pub const ENV_PREFIX: &str = "PLACEPIX_";

#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: String,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub transcode_concurrency: usize,
    pub retry_limit: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub max_width: u32,
    pub quality: u8,
    pub format: OutputFormat,
    pub pixabay_endpoint: String,
    pub pexels_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        let artifact = ArtifactSpec::default();
        let retry = RetryPolicy::default();
        Config {
            provider: ProviderKind::Pixabay,
            api_key: String::new(),
            output_dir: PathBuf::from("country_images"),
            concurrency: 10,
            transcode_concurrency: thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1),
            retry_limit: retry.attempts(),
            retry_delay_ms: retry.delay().as_millis() as u64,
            request_timeout_secs: 30,
            max_width: artifact.max_width,
            quality: artifact.quality,
            format: artifact.format,
            pixabay_endpoint: String::from("https://pixabay.com/api/"),
            pexels_endpoint: String::from("https://api.pexels.com/v1"),
        }
    }
}

/// Settings given on the command line; unset fields leave lower layers alone.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
}

impl Config {
    /// Defaults, then the YAML file, then `PLACEPIX_*` variables, then overrides.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Figment {
        let file = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Config, ConfigurationError> {
        if let Some(file) = file {
            if !file.is_file() {
                return Err(ConfigurationError::InvalidSetting(format!(
                    "config file {:?} does not exist",
                    file
                )));
            }
        }
        let config: Config = Config::figment(file, overrides).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingApiKey);
        }
        if self.concurrency == 0 {
            return Err(invalid("concurrency must be at least 1"));
        }
        if self.transcode_concurrency == 0 {
            return Err(invalid("transcode_concurrency must be at least 1"));
        }
        if self.retry_limit == 0 {
            return Err(invalid("retry_limit must be at least 1"));
        }
        if self.max_width == 0 {
            return Err(invalid("max_width must be at least 1"));
        }
        if self.quality > 100 {
            return Err(invalid("quality must be between 0 and 100"));
        }
        for (name, endpoint) in [
            ("pixabay_endpoint", &self.pixabay_endpoint),
            ("pexels_endpoint", &self.pexels_endpoint),
        ] {
            if url::Url::parse(endpoint).is_err() {
                return Err(invalid(&format!("{} {:?} is not a URL", name, endpoint)));
            }
        }
        Ok(())
    }

    pub fn artifact_spec(&self) -> ArtifactSpec {
        ArtifactSpec {
            max_width: self.max_width,
            format: self.format,
            quality: self.quality,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_limit, Duration::from_millis(self.retry_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn invalid(message: &str) -> ConfigurationError {
    ConfigurationError::InvalidSetting(message.to_string())
}
