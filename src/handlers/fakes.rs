use crate::{
    catalog::{CrawlCatalog, CrawlJobStatus},
    error::HandlerError,
    keys::{KeyDirectory, KeyMetadata},
};
use std::{collections::HashMap, sync::Mutex};

#[derive(Debug, Default)]
pub struct FakeCatalog {
    fail: bool,
    status: Option<CrawlJobStatus>,
    started: Mutex<Vec<String>>,
    queried: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_status(status: CrawlJobStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().expect("poisoned mutex").clone()
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().expect("poisoned mutex").clone()
    }
}

impl CrawlCatalog for FakeCatalog {
    async fn start_trigger(&self, name: &str) -> Result<(), HandlerError> {
        self.started
            .lock()
            .expect("poisoned mutex")
            .push(name.to_string());
        if self.fail {
            return Err(HandlerError::dependency("activate the trigger", "throttled"));
        }
        Ok(())
    }

    async fn crawler_status(&self, name: &str) -> Result<CrawlJobStatus, HandlerError> {
        self.queried
            .lock()
            .expect("poisoned mutex")
            .push(name.to_string());
        if self.fail {
            return Err(HandlerError::dependency("get crawler", "not found"));
        }
        Ok(self.status.clone().unwrap_or(CrawlJobStatus::Ready))
    }
}

#[derive(Debug, Default)]
pub struct FakeKeys {
    keys: HashMap<String, KeyMetadata>,
    lookups: Mutex<Vec<String>>,
}

impl FakeKeys {
    pub fn with_key(mut self, id: &str, name: &str, description: &str) -> Self {
        self.keys.insert(
            id.to_string(),
            KeyMetadata {
                name: name.to_string(),
                description: description.to_string(),
            },
        );
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("poisoned mutex").clone()
    }
}

impl KeyDirectory for FakeKeys {
    async fn key_metadata(&self, key_id: &str) -> Result<KeyMetadata, HandlerError> {
        self.lookups
            .lock()
            .expect("poisoned mutex")
            .push(key_id.to_string());
        self.keys
            .get(key_id)
            .cloned()
            .ok_or_else(|| HandlerError::dependency(format!("get api key {key_id}"), "not found"))
    }
}
