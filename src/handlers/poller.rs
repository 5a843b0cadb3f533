use crate::{
    catalog::CrawlCatalog,
    error::HandlerError,
    event::{IsCompleteResponse, PollState, ProvisioningEvent},
};

pub const CRAWLER_NAME: &str = "CrawlerName";

/// One point-in-time look at the crawler. The caller owns the waiting.
pub async fn poll<C: CrawlCatalog>(
    catalog: &C,
    crawler_name: &str,
) -> Result<IsCompleteResponse, HandlerError> {
    if crawler_name.is_empty() {
        return Err(HandlerError::missing(CRAWLER_NAME));
    }

    tracing::info!(crawler = crawler_name, "checking crawler status");
    let status = catalog.crawler_status(crawler_name).await?;
    let state = PollState::from(&status);
    tracing::info!(crawler = crawler_name, %status, ?state, "crawler state");

    Ok(state.into())
}

/// "Is complete" entry point for a custom resource event.
///
/// A delete has nothing to wait for since activation never created anything.
pub async fn check<C: CrawlCatalog>(
    catalog: &C,
    event: &ProvisioningEvent,
) -> Result<IsCompleteResponse, HandlerError> {
    if event.is_delete() {
        tracing::info!("delete event type, reporting complete");
        return Ok(PollState::Complete.into());
    }

    let crawler_name = event.required_property(CRAWLER_NAME)?;
    poll(catalog, crawler_name).await
}
