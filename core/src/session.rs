use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::config::SessionConfig;
use crate::dispatch::{Dispatcher, InvocationResult};
use crate::gateway::{request_with_deadline, GatewayError, ModelGateway};
use crate::tools::{InvocationRequest, ToolRegistry};

/// Requests returned by the model together with their ordered results
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub requests: Vec<InvocationRequest>,
    pub results: Vec<InvocationResult>,
}

/// One prompt → tool calls → results round trip.
///
/// The registry's catalog is sent with every prompt; the invocations the
/// model asks for are dispatched against the same registry.
pub struct ToolSession<G: ModelGateway> {
    gateway: G,
    dispatcher: Dispatcher,
    gateway_timeout: Option<Duration>,
}

impl<G: ModelGateway> ToolSession<G> {
    pub fn new(gateway: G, registry: Arc<ToolRegistry>, config: SessionConfig) -> Self {
        Self {
            gateway,
            dispatcher: Dispatcher::with_config(registry, config.dispatch),
            gateway_timeout: config.gateway_timeout,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.dispatcher.registry()
    }

    /// Sends `prompt` to the model and runs whatever it asks for.
    ///
    /// Gateway failures, timeouts and cancellation are returned as errors and
    /// no tool runs. Failures of individual invocations are part of the
    /// outcome.
    #[instrument(skip(self, prompt, cancel), fields(prompt_len = prompt.len()))]
    pub async fn run(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<SessionOutcome, crate::error::Error> {
        let catalog = self.registry().catalog();
        let requests =
            request_with_deadline(&self.gateway, prompt, &catalog, self.gateway_timeout, cancel)
                .await?;
        info!(requested = requests.len(), "Model requested tool calls");

        if cancel.is_cancelled() {
            return Err(GatewayError::Cancelled.into());
        }

        let results = self.dispatcher.dispatch(&requests).await;
        Ok(SessionOutcome { requests, results })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gateway::ScriptedGateway;
    use serde_json::json;

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::with_builtins().unwrap())
    }

    #[tokio::test]
    async fn runs_requested_calls_in_order() {
        let gateway = ScriptedGateway::new(vec![
            InvocationRequest::new("addition", json!({"a": 30, "b": 12})),
            InvocationRequest::new("subtraction", json!({"a": 50, "b": 8})),
            InvocationRequest::new("multiplication", json!({"a": 21, "b": 2})),
        ]);
        let session = ToolSession::new(gateway, registry(), SessionConfig::default());

        let outcome = session
            .run("What is 30 plus 12 and 21 times 2?", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.requests.len(), 3);
        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].value(), Some(&json!(42)));
        assert!(!outcome.results[1].is_success());
        assert_eq!(outcome.results[2].value(), Some(&json!(42)));

        let calls = session.gateway().calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tools, vec!["addition", "multiplication"]);
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let gateway = ScriptedGateway::failing(GatewayError::ProviderError(
            503,
            "loading model".to_string(),
        ));
        let session = ToolSession::new(gateway, registry(), SessionConfig::default());

        let result = session.run("hi", &CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(Error::Gateway(GatewayError::ProviderError(503, _)))
        ));
    }

    #[tokio::test]
    async fn gateway_timeout_skips_dispatch() {
        let gateway = ScriptedGateway::new(vec![InvocationRequest::new(
            "addition",
            json!({"a": 1, "b": 1}),
        )])
        .with_delay(Duration::from_secs(5));
        let config = SessionConfig {
            gateway_timeout: Some(Duration::from_millis(10)),
            ..SessionConfig::default()
        };
        let session = ToolSession::new(gateway, registry(), config);

        let result = session.run("1 + 1", &CancellationToken::new()).await;
        assert!(matches!(
            result,
            Err(Error::Gateway(GatewayError::Timeout(_)))
        ));
    }

    #[tokio::test]
    async fn cancelled_session_never_dispatches() {
        let gateway = ScriptedGateway::new(vec![InvocationRequest::new(
            "addition",
            json!({"a": 1, "b": 1}),
        )]);
        let session = ToolSession::new(gateway, registry(), SessionConfig::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = session.run("1 + 1", &cancel).await;
        assert!(matches!(result, Err(Error::Gateway(GatewayError::Cancelled))));
        assert!(session.gateway().calls().await.is_empty());
    }
}
