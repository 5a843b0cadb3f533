use crate::error::HandlerError;
use std::future::Future;

/// Descriptive metadata of an API key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMetadata {
    pub name: String,
    pub description: String,
}

pub trait KeyDirectory {
    fn key_metadata(
        &self,
        key_id: &str,
    ) -> impl Future<Output = Result<KeyMetadata, HandlerError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ApiGatewayKeys {
    client: aws_sdk_apigateway::Client,
}

impl ApiGatewayKeys {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_apigateway::Client::new(config),
        }
    }
}

impl KeyDirectory for ApiGatewayKeys {
    async fn key_metadata(&self, key_id: &str) -> Result<KeyMetadata, HandlerError> {
        let output = self
            .client
            .get_api_key()
            .api_key(key_id)
            .send()
            .await
            .map_err(|error| HandlerError::dependency(format!("get api key {key_id}"), error))?;

        // keys created without a description are valid
        Ok(KeyMetadata {
            name: output.name().unwrap_or_default().to_string(),
            description: output.description().unwrap_or_default().to_string(),
        })
    }
}
