//! Event handlers for the API access log pipeline: starting and watching
//! the catalog crawler during provisioning, and enriching log records on
//! their way through the delivery stream.

pub mod catalog;
pub mod error;
pub mod event;
pub mod handlers;
pub mod keys;
pub mod settings;
pub mod telemetry;

pub use error::HandlerError;
pub use settings::Settings;

pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 1;
