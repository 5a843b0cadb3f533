use crate::error::HandlerError;
use aws_sdk_glue::types::CrawlerState;
use std::{fmt, future::Future};

/// Lifecycle state of a crawler as reported by the catalog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlJobStatus {
    Ready,
    Running,
    Stopping,
    /// A state this crate does not model, kept verbatim for logging.
    Unknown(String),
}

impl fmt::Display for CrawlJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlJobStatus::Ready => f.write_str("READY"),
            CrawlJobStatus::Running => f.write_str("RUNNING"),
            CrawlJobStatus::Stopping => f.write_str("STOPPING"),
            CrawlJobStatus::Unknown(raw) => write!(f, "UNKNOWN({raw})"),
        }
    }
}

impl From<Option<&CrawlerState>> for CrawlJobStatus {
    fn from(state: Option<&CrawlerState>) -> Self {
        match state {
            Some(CrawlerState::Ready) => CrawlJobStatus::Ready,
            Some(CrawlerState::Running) => CrawlJobStatus::Running,
            Some(CrawlerState::Stopping) => CrawlJobStatus::Stopping,
            Some(other) => CrawlJobStatus::Unknown(other.as_str().to_string()),
            None => CrawlJobStatus::Unknown(String::new()),
        }
    }
}

/// The two catalog operations the crawl lifecycle handlers need.
pub trait CrawlCatalog {
    fn start_trigger(&self, name: &str) -> impl Future<Output = Result<(), HandlerError>> + Send;

    fn crawler_status(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<CrawlJobStatus, HandlerError>> + Send;
}

#[derive(Debug, Clone)]
pub struct GlueCatalog {
    client: aws_sdk_glue::Client,
}

impl GlueCatalog {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_glue::Client::new(config),
        }
    }
}

impl CrawlCatalog for GlueCatalog {
    async fn start_trigger(&self, name: &str) -> Result<(), HandlerError> {
        self.client
            .start_trigger()
            .name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| HandlerError::dependency("activate the trigger", error))
    }

    async fn crawler_status(&self, name: &str) -> Result<CrawlJobStatus, HandlerError> {
        let output = self
            .client
            .get_crawler()
            .name(name)
            .send()
            .await
            .map_err(|error| HandlerError::dependency("get crawler", error))?;

        let crawler = output.crawler().ok_or_else(|| {
            HandlerError::dependency("get crawler", format!("no crawler named {name} returned"))
        })?;

        Ok(CrawlJobStatus::from(crawler.state()))
    }
}
