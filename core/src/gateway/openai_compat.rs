use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::{GatewayError, ModelGateway};
use crate::config::{ConfigError, GatewayConfig};
use crate::tools::{InvocationRequest, ToolCatalogEntry};

/// Gateway for any server exposing an OpenAI-style `/chat/completions`
/// endpoint with tool calling: Ollama, LM Studio, llama.cpp, vLLM or OpenAI
/// itself.
pub struct OpenAiCompatibleGateway {
    api_key: Option<String>,
    api_url: String,
    client: reqwest::Client,
    model: String,
    temperature: f64,
    max_tokens: usize,
    system_prompt: Option<String>,
}

impl OpenAiCompatibleGateway {
    /// Builds the gateway, reading the API key from the environment if the
    /// config names one.
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            api_key,
            api_url: config.api_url.clone(),
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            system_prompt: config.system_prompt.clone(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str, catalog: &[ToolCatalogEntry]) -> Value {
        let mut messages = vec![];
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let mut request_body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });
        if !catalog.is_empty() {
            let tools: Vec<Value> = catalog.iter().map(ToolCatalogEntry::to_function_tool).collect();
            if let Some(obj) = request_body.as_object_mut() {
                obj.insert("tools".to_string(), Value::Array(tools));
            }
        }
        request_body
    }
}

#[derive(Serialize)]
#[serde(tag = "role", content = "content")]
#[allow(non_camel_case_types)]
enum ChatMessage<'a> {
    system(&'a str),
    user(&'a str),
}

#[async_trait]
impl ModelGateway for OpenAiCompatibleGateway {
    #[instrument(
        skip(self, prompt, catalog),
        fields(model = %self.model, tools = catalog.len())
    )]
    async fn request_tool_calls(
        &self,
        prompt: &str,
        catalog: &[ToolCatalogEntry],
    ) -> Result<Vec<InvocationRequest>, GatewayError> {
        let request_body = self.request_body(prompt, catalog);
        debug!(request_body = ?request_body, "Sending request to model");

        let mut request = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| {
            error!(error = ?e, "Request failed");
            GatewayError::RequestError(e.to_string())
        })?;

        let status = response.status();
        debug!(%status, "Received API response");

        if !status.is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error (failed to read response body)".to_string());
            error!(status = %status, error = %error_msg, "API returned error response");
            return Err(GatewayError::ProviderError(status.as_u16(), error_msg));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response JSON");
            GatewayError::ParseError(e.to_string())
        })?;

        let requests = parse_tool_calls(&response_json)?;
        info!(tool_call_count = requests.len(), "Parsed tool calls");
        Ok(requests)
    }
}

/// Extracts the tool calls from a chat-completions response body.
///
/// A reply without `tool_calls` is a valid answer with no invocations.
fn parse_tool_calls(response_json: &Value) -> Result<Vec<InvocationRequest>, GatewayError> {
    let message = &response_json["choices"][0]["message"];
    if !message.is_object() {
        return Err(GatewayError::ParseError(
            "Response has no choices[0].message".to_string(),
        ));
    }

    let Some(calls) = message["tool_calls"].as_array() else {
        if let Some(content) = message["content"].as_str() {
            debug!(content, "Model answered without tool calls");
        }
        return Ok(vec![]);
    };

    Ok(calls.iter().map(parse_tool_call).collect())
}

fn parse_tool_call(raw: &Value) -> InvocationRequest {
    let function = &raw["function"];
    let name = function["name"].as_str().unwrap_or_default();
    if name.is_empty() {
        warn!(tool_call = %raw, "Tool call without a function name");
    }
    let id = raw["id"]
        .as_str()
        .map_or_else(|| format!("call_{}", Uuid::new_v4().simple()), str::to_string);

    InvocationRequest {
        id: Some(id),
        name: name.to_string(),
        arguments: decode_arguments(&function["arguments"]),
    }
}

/// OpenAI sends arguments as a JSON-encoded string, Ollama as an object.
/// Text that isn't JSON is kept as a string so validation rejects it.
fn decode_arguments(raw: &Value) -> Value {
    match raw {
        Value::Null => Value::Object(Map::new()),
        Value::String(s) if s.trim().is_empty() => Value::Object(Map::new()),
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|e| {
            warn!(arguments = %s, error = %e, "Tool call arguments are not valid JSON");
            raw.clone()
        }),
        other => other.clone(),
    }
}
