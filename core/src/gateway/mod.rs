pub(crate) mod openai_compat;
pub(crate) mod scripted;

pub use openai_compat::OpenAiCompatibleGateway;
pub use scripted::{RecordedCall, ScriptedGateway};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::tools::{InvocationRequest, ToolCatalogEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Provider error -> HTTP Status {0}: {1}")]
    ProviderError(u16, String),
    #[error("RequestError: {0}")]
    RequestError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("Model did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Request to the model was cancelled")]
    Cancelled,
}

/// The model side of a tool-calling exchange.
///
/// Given a prompt and the tool catalog, returns the invocations the model
/// asked for, in the order it listed them. Nothing about the returned
/// requests is trusted: names and arguments are checked by the dispatcher.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn request_tool_calls(
        &self,
        prompt: &str,
        catalog: &[ToolCatalogEntry],
    ) -> Result<Vec<InvocationRequest>, GatewayError>;
}

/// Calls `gateway`, giving up after `timeout` or as soon as `cancel` fires.
pub async fn request_with_deadline(
    gateway: &dyn ModelGateway,
    prompt: &str,
    catalog: &[ToolCatalogEntry],
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<Vec<InvocationRequest>, GatewayError> {
    if cancel.is_cancelled() {
        return Err(GatewayError::Cancelled);
    }

    let call = gateway.request_tool_calls(prompt, catalog);
    let bounded = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(?limit, "Model request timed out");
                    Err(GatewayError::Timeout(limit))
                }
            },
            None => call.await,
        }
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(GatewayError::Cancelled),
        result = bounded => result,
    }
}
