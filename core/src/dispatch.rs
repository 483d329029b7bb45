use futures::future::{join_all, FutureExt};
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::{DispatchConfig, ExecutionMode};
use crate::tools::{schema::validate, InvocationRequest, ToolRegistry, ValidationError};

/// Why a single invocation produced no value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationFailure {
    #[error("Unknown tool `{name}`")]
    UnknownTool { name: String },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(ValidationError),
    #[error("Execution failed: {0}")]
    ExecutionError(String),
    #[error("Timed out after {0:?}")]
    TimedOut(Duration),
}

/// Outcome of one [`InvocationRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult {
    pub request: InvocationRequest,
    pub outcome: Result<Value, InvocationFailure>,
}

impl InvocationResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&InvocationFailure> {
        self.outcome.as_ref().err()
    }
}

/// Validates and runs batches of invocation requests against a registry.
///
/// Every request yields exactly one result, in request order. Failures of
/// individual invocations (unknown tool, bad arguments, tool errors, panics,
/// timeouts) are reported inside the result and never stop the batch.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    config: DispatchConfig,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    #[must_use]
    pub fn with_config(registry: Arc<ToolRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    #[instrument(skip(self, requests), fields(requests = requests.len(), mode = ?self.config.mode))]
    pub async fn dispatch(&self, requests: &[InvocationRequest]) -> Vec<InvocationResult> {
        let results = match self.config.mode {
            ExecutionMode::Sequential => {
                let mut results = Vec::with_capacity(requests.len());
                for request in requests {
                    results.push(self.dispatch_one(request).await);
                }
                results
            }
            // join_all yields outputs in input order
            ExecutionMode::Concurrent => join_all(requests.iter().map(|r| self.dispatch_one(r))).await,
        };

        let failed = results.iter().filter(|r| !r.is_success()).count();
        debug!(succeeded = results.len() - failed, failed, "Dispatch finished");
        results
    }

    async fn dispatch_one(&self, request: &InvocationRequest) -> InvocationResult {
        let outcome = self.execute(request).await;
        match &outcome {
            Ok(value) => debug!(tool = %request.name, %value, "Invocation succeeded"),
            Err(failure) => warn!(tool = %request.name, %failure, "Invocation failed"),
        }
        InvocationResult {
            request: request.clone(),
            outcome,
        }
    }

    async fn execute(&self, request: &InvocationRequest) -> Result<Value, InvocationFailure> {
        let tool = self
            .registry
            .resolve(&request.name)
            .map_err(|_| InvocationFailure::UnknownTool {
                name: request.name.clone(),
            })?;
        let args = validate(tool.parameters(), &request.arguments)
            .map_err(InvocationFailure::InvalidArguments)?;

        let call = AssertUnwindSafe(async move { tool.invoke(args).await }).catch_unwind();
        let finished = match self.config.invocation_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| InvocationFailure::TimedOut(limit))?,
            None => call.await,
        };

        match finished {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(InvocationFailure::ExecutionError(e.to_string())),
            Err(panic) => Err(InvocationFailure::ExecutionError(panic_message(panic.as_ref()))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("tool panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("tool panicked: {s}")
    } else {
        "tool panicked".to_string()
    }
}
