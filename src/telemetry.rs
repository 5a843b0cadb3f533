use crate::settings::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Subscriber for the Lambda binaries.
pub fn init_lambda(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log))
        // disable printing the name of the module in every log line.
        .with_target(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        .init();
}

/// Subscriber for running handlers from a terminal.
pub fn init_local(settings: &Settings) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(&settings.log))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
