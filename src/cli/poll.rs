use super::{print_json, read_event};
use anyhow::bail;
use api_logs_lambda::{
    catalog::GlueCatalog,
    event::{IsCompleteResponse, ProvisioningEvent},
    handlers::poller,
    Settings,
};
use std::{path::PathBuf, time::Duration};
use tokio::time::{sleep, Instant};

/// Check crawler completion, optionally waiting the way the provider
/// framework does
#[derive(Debug, clap::Args)]
pub struct Cmd {
    /// Custom resource event to read the crawler name from
    #[arg(long, conflicts_with = "crawler_name")]
    event: Option<PathBuf>,
    #[arg(long)]
    crawler_name: Option<String>,
    /// Keep polling until the crawler reports complete
    #[arg(long)]
    wait: bool,
    #[arg(long, default_value = "15")]
    interval_secs: u64,
    #[arg(long, default_value = "300")]
    timeout_secs: u64,
}

impl Cmd {
    pub async fn run(&self, settings: &Settings) -> anyhow::Result<()> {
        let event: Option<ProvisioningEvent> =
            self.event.as_deref().map(read_event).transpose()?;
        if event.is_none() && self.crawler_name.is_none() {
            bail!("one of --event or --crawler-name is required");
        }

        let catalog = GlueCatalog::new(&settings.aws_config().await);
        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);

        loop {
            let response = match (&event, &self.crawler_name) {
                (Some(event), _) => poller::check(&catalog, event).await?,
                (None, Some(name)) => poller::poll(&catalog, name).await?,
                (None, None) => IsCompleteResponse::default(),
            };

            if response.is_complete || !self.wait {
                return print_json(&response);
            }
            if Instant::now() >= deadline {
                bail!("crawler did not complete within {}s", self.timeout_secs);
            }
            tracing::info!(interval_secs = self.interval_secs, "not complete yet, waiting");
            sleep(Duration::from_secs(self.interval_secs)).await;
        }
    }
}
