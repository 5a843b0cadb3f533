use super::{print_json, read_event};
use api_logs_lambda::{handlers::enricher, keys::ApiGatewayKeys, Settings};
use aws_lambda_events::firehose::KinesisFirehoseEvent;
use chrono::Utc;
use std::path::PathBuf;

/// Run the delivery stream enricher against a batch event file
#[derive(Debug, clap::Args)]
pub struct Cmd {
    #[arg(long)]
    event: PathBuf,
}

impl Cmd {
    pub async fn run(&self, settings: &Settings) -> anyhow::Result<()> {
        let event: KinesisFirehoseEvent = read_event(&self.event)?;
        let keys = ApiGatewayKeys::new(&settings.aws_config().await);

        let response = enricher::handle_event(
            &keys,
            event,
            Utc::now(),
            settings.lookup_concurrency(),
        )
        .await?;
        print_json(&response)
    }
}
