use super::{print_json, read_event};
use api_logs_lambda::{
    catalog::GlueCatalog, event::ProvisioningEvent, handlers::activator, Settings,
};
use std::path::PathBuf;

/// Run the crawler starter against a custom resource event file
#[derive(Debug, clap::Args)]
pub struct Cmd {
    #[arg(long)]
    event: PathBuf,
}

impl Cmd {
    pub async fn run(&self, settings: &Settings) -> anyhow::Result<()> {
        let event: ProvisioningEvent = read_event(&self.event)?;
        let catalog = GlueCatalog::new(&settings.aws_config().await);

        let response = activator::activate(&catalog, &event).await?;
        print_json(&response)
    }
}
