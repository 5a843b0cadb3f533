use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_log")]
    pub log: String,
    /// Overrides the region resolved by the SDK provider chain.
    #[serde(default)]
    pub region: Option<String>,
    /// Number of key lookups the enricher keeps in flight per batch.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

pub fn default_log() -> String {
    "api_logs_lambda=info".to_string()
}

pub fn default_lookup_concurrency() -> usize {
    crate::DEFAULT_LOOKUP_CONCURRENCY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log: default_log(),
            region: None,
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}

impl Settings {
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();

        if let Some(file) = path {
            builder = builder
                .add_source(File::with_name(&file.as_ref().to_string_lossy()).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("API_LOGS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|config| config.try_deserialize())
    }

    /// Lookup concurrency clamped to at least one in-flight request.
    pub fn lookup_concurrency(&self) -> usize {
        self.lookup_concurrency.max(1)
    }

    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        loader.load().await
    }
}
