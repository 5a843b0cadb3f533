use crate::{
    catalog::CrawlCatalog,
    error::HandlerError,
    event::{OnEventResponse, ProvisioningEvent},
};

pub const TRIGGER_NAME: &str = "TriggerName";

/// Starts the trigger named by the resource on create and update.
///
/// Delete is a no-op: starting a trigger leaves nothing behind to undo.
pub async fn activate<C: CrawlCatalog>(
    catalog: &C,
    event: &ProvisioningEvent,
) -> Result<OnEventResponse, HandlerError> {
    if event.is_delete() {
        tracing::info!("delete event type, skipping");
        return Ok(OnEventResponse::for_event(event));
    }

    let trigger_name = event.required_property(TRIGGER_NAME)?;

    tracing::info!(trigger = trigger_name, "activating the trigger");
    catalog.start_trigger(trigger_name).await?;
    tracing::info!(trigger = trigger_name, "trigger activated");

    Ok(OnEventResponse::for_event(event))
}
