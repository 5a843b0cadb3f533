use api_logs_lambda::{handlers::enricher, keys::ApiGatewayKeys, telemetry, Settings};
use aws_lambda_events::firehose::{KinesisFirehoseEvent, KinesisFirehoseResponse};
use chrono::Utc;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

struct Enricher {
    keys: ApiGatewayKeys,
    concurrency: usize,
}

async fn function_handler(
    event: LambdaEvent<KinesisFirehoseEvent>,
    enricher: Arc<Enricher>,
) -> Result<KinesisFirehoseResponse, Error> {
    tracing::debug!(
        request_id = %event.context.request_id,
        invocation_id = ?event.payload.invocation_id,
        "event"
    );

    enricher::handle_event(
        &enricher.keys,
        event.payload,
        Utc::now(),
        enricher.concurrency,
    )
    .await
    .map_err(|error| {
        tracing::error!(%error, "batch enrichment failed");
        Error::from(error)
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::new(None::<&str>)?;
    telemetry::init_lambda(&settings);

    let enricher = Arc::new(Enricher {
        keys: ApiGatewayKeys::new(&settings.aws_config().await),
        concurrency: settings.lookup_concurrency(),
    });

    run(service_fn(move |event| {
        let enricher = Arc::clone(&enricher);
        async move { function_handler(event, enricher).await }
    }))
    .await
}
