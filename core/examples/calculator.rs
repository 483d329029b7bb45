//! Asks a local model to add and multiply, then runs the calls it makes.
//!
//! ```bash
//! ollama pull llama3.2
//! cargo run --example calculator
//! ```
//!
//! Set `TOOLFRAME_CONFIG` to a JSON gateway config file, or `TOOLFRAME_MODEL` /
//! `TOOLFRAME_API_URL` to point at another model. `TOOLFRAME_OFFLINE=1` replays
//! a canned reply instead of contacting a model.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use toolframe::prelude::*;
use toolframe::report::{RequestLine, ResultLine};

const PROMPT: &str = "What is 30 plus 12? And what is 21 times 2?";

async fn run<G: ModelGateway>(gateway: G, registry: Arc<ToolRegistry>) -> Result<()> {
    let config = SessionConfig {
        gateway_timeout: Some(Duration::from_secs(120)),
        ..SessionConfig::default()
    };
    let session = ToolSession::new(gateway, registry, config);
    let outcome = session.run(PROMPT, &CancellationToken::new()).await?;

    for request in &outcome.requests {
        println!("{}", RequestLine(request));
    }
    for result in &outcome.results {
        println!("{}", ResultLine(result));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let registry = Arc::new(ToolRegistry::with_builtins()?);

    if std::env::var_os("TOOLFRAME_OFFLINE").is_some() {
        let gateway = ScriptedGateway::new(vec![
            InvocationRequest::new("addition", json!({"a": 30, "b": 12})),
            InvocationRequest::new("multiplication", json!({"a": 21, "b": 2})),
        ]);
        return run(gateway, registry).await;
    }

    let config = match std::env::var("TOOLFRAME_CONFIG") {
        Ok(path) => GatewayConfig::from_file(path)?,
        Err(_) => GatewayConfig {
            system_prompt: Some(
                "You are a calculator. Answer only by calling the provided tools.".to_string(),
            ),
            ..GatewayConfig::default()
        },
    }
    .with_env_overrides();

    let gateway = OpenAiCompatibleGateway::new(&config)?;
    run(gateway, registry).await
}
