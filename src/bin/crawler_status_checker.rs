use api_logs_lambda::{
    catalog::GlueCatalog,
    event::{IsCompleteResponse, ProvisioningEvent},
    handlers::poller,
    telemetry, Settings,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

async fn function_handler(
    event: LambdaEvent<ProvisioningEvent>,
    catalog: Arc<GlueCatalog>,
) -> Result<IsCompleteResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, payload = ?event.payload, "event");

    poller::check(catalog.as_ref(), &event.payload)
        .await
        .map_err(|error| {
            tracing::error!(%error, "crawler status check failed");
            Error::from(error)
        })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::new(None::<&str>)?;
    telemetry::init_lambda(&settings);

    let catalog = Arc::new(GlueCatalog::new(&settings.aws_config().await));

    run(service_fn(move |event| {
        let catalog = Arc::clone(&catalog);
        async move { function_handler(event, catalog).await }
    }))
    .await
}
