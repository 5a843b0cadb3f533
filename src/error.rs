use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single handler invocation.
///
/// Every handler returns the first of these it hits; nothing is retried or
/// compensated locally. The invoking platform decides what happens next.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{name} is required")]
    MissingParameter { name: String },
    #[error("record '{record_id}' is not a valid access log entry: {source}")]
    MalformedInput {
        record_id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to {operation}: {source}")]
    Dependency {
        operation: String,
        #[source]
        source: BoxError,
    },
}

impl HandlerError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn dependency(operation: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Dependency {
            operation: operation.into(),
            source: source.into(),
        }
    }
}
