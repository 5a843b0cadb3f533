//! Custom resource lifecycle events as delivered by the provisioning
//! provider framework, and the shapes it expects back.

use crate::{catalog::CrawlJobStatus, error::HandlerError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// A custom resource lifecycle notification.
///
/// Only the fields the handlers read are modelled; anything else the
/// framework adds (`ResponseURL`, `ServiceToken`, merged `Data`) is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningEvent {
    pub request_type: RequestType,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub stack_id: String,
    #[serde(default)]
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Map<String, Value>>,
}

impl ProvisioningEvent {
    pub fn new(request_type: RequestType) -> Self {
        Self {
            request_type,
            request_id: String::new(),
            stack_id: String::new(),
            logical_resource_id: String::new(),
            resource_type: String::new(),
            physical_resource_id: None,
            resource_properties: Map::new(),
            old_resource_properties: None,
        }
    }

    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.resource_properties.insert(key.to_string(), value.into());
        self
    }

    pub fn is_delete(&self) -> bool {
        self.request_type == RequestType::Delete
    }

    /// A resource property that must be a non-empty string.
    pub fn required_property(&self, key: &str) -> Result<&str, HandlerError> {
        match self.resource_properties.get(key) {
            Some(Value::String(value)) if !value.is_empty() => Ok(value),
            _ => Err(HandlerError::missing(key)),
        }
    }
}

/// Reply of the "on event" handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OnEventResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl OnEventResponse {
    /// Keeps the resource's existing physical id so the framework never
    /// treats an update as a replacement.
    pub fn for_event(event: &ProvisioningEvent) -> Self {
        Self {
            physical_resource_id: event.physical_resource_id.clone(),
            data: Map::new(),
        }
    }
}

/// Reply of the "is complete" handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsCompleteResponse {
    #[serde(rename = "IsComplete")]
    pub is_complete: bool,
}

impl From<PollState> for IsCompleteResponse {
    fn from(state: PollState) -> Self {
        Self {
            is_complete: state == PollState::Complete,
        }
    }
}

/// Where the external waiter stands with respect to a crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Pending,
    Complete,
}

impl From<&CrawlJobStatus> for PollState {
    // Stopping is the last state the crawler reports before it goes idle;
    // Ready is also what a crawler that never started looks like.
    fn from(status: &CrawlJobStatus) -> Self {
        match status {
            CrawlJobStatus::Stopping => PollState::Complete,
            _ => PollState::Pending,
        }
    }
}
