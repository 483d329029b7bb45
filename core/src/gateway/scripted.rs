use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{GatewayError, ModelGateway};
use crate::tools::{InvocationRequest, ToolCatalogEntry};

/// What a [`ScriptedGateway`] was asked
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub tools: Vec<String>,
}

/// A gateway that answers every prompt with the same scripted reply.
///
/// Used in tests and for running the tool pipeline without a model backend.
pub struct ScriptedGateway {
    reply: Result<Vec<InvocationRequest>, GatewayError>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    #[must_use]
    pub fn new(requests: Vec<InvocationRequest>) -> Self {
        Self {
            reply: Ok(requests),
            delay: None,
            calls: Mutex::new(vec![]),
        }
    }

    /// A gateway whose every call fails with `error`
    #[must_use]
    pub fn failing(error: GatewayError) -> Self {
        Self {
            reply: Err(error),
            delay: None,
            calls: Mutex::new(vec![]),
        }
    }

    /// Waits `delay` before answering
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn request_tool_calls(
        &self,
        prompt: &str,
        catalog: &[ToolCatalogEntry],
    ) -> Result<Vec<InvocationRequest>, GatewayError> {
        self.calls.lock().await.push(RecordedCall {
            prompt: prompt.to_string(),
            tools: catalog.iter().map(|e| e.name.clone()).collect(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;
    use serde_json::json;

    #[tokio::test]
    async fn records_prompt_and_catalog() {
        let registry = ToolRegistry::with_builtins().unwrap();
        let gateway = ScriptedGateway::new(vec![InvocationRequest::new(
            "addition",
            json!({"a": 1, "b": 1}),
        )]);

        let reply = gateway
            .request_tool_calls("What is 1 + 1?", &registry.catalog())
            .await
            .unwrap();
        assert_eq!(reply[0].name, "addition");

        let calls = gateway.calls().await;
        assert_eq!(
            calls,
            vec![RecordedCall {
                prompt: "What is 1 + 1?".to_string(),
                tools: vec!["addition".to_string(), "multiplication".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn failing_gateway_repeats_error() {
        let gateway = ScriptedGateway::failing(GatewayError::RequestError("refused".to_string()));
        for _ in 0..2 {
            assert_eq!(
                gateway.request_tool_calls("hi", &[]).await,
                Err(GatewayError::RequestError("refused".to_string()))
            );
        }
    }
}
