//! # Toolframe - Core API Documentation
//!
//! Toolframe wires a language model to plain Rust functions through tool calling:
//! the model gets a catalog of callable signatures, picks which to invoke and with
//! what arguments, and toolframe validates and runs those invocations.
//!
//! ## Features
//!
//! - **Tool Registry**: named tools with fixed parameter specs, listed in registration order
//! - **Schema Validation**: strict checking of model-supplied arguments (missing, unknown
//!   and mistyped arguments are all rejected)
//! - **Ordered Dispatch**: one result per requested call, in request order, with tool
//!   errors, panics and timeouts contained in the result
//! - **Model Gateways**: an OpenAI-compatible HTTP gateway for local runtimes such as
//!   Ollama or LM Studio, and a scripted gateway for tests
//!
//! ## Examples
//!
//! `core/examples/calculator.rs` puts all the pieces together.
//!
//! ### Dispatching tool calls
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use toolframe::prelude::*;
//! use toolframe::report::ResultLine;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let registry = Arc::new(ToolRegistry::with_builtins()?);
//!     let gateway = OpenAiCompatibleGateway::new(&GatewayConfig::default())?;
//!     let session = ToolSession::new(gateway, registry, SessionConfig::default());
//!
//!     let outcome = session
//!         .run("What is 30 plus 12?", &CancellationToken::new())
//!         .await?;
//!     for result in &outcome.results {
//!         println!("{}", ResultLine(result));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Declaring your own tools
//!
//! ```rust,no_run
//! use serde_json::json;
//! use toolframe::prelude::*;
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(Box::new(FunctionTool::new(
//!     "capitalize",
//!     "Capitalizes all words in a string",
//!     vec![ParameterSpec::new("input", ParamType::String, "The text to capitalize")],
//!     |args| {
//!         let input = args.string("input").unwrap_or_default();
//!         Ok(json!(input.to_uppercase()))
//!     },
//! )))?;
//! # Ok::<(), toolframe::error::Error>(())
//! ```

/// Gateway, dispatch and session settings
pub mod config;

/// Ordered, failure-containing execution of invocation requests
pub mod dispatch;

/// Error types for all library operations
pub mod error;

/// The model boundary
///
/// Contains:
/// - the `ModelGateway` trait
/// - an OpenAI-compatible HTTP implementation
/// - a scripted implementation for tests
pub mod gateway;

/// Convenience prelude exports
pub mod prelude;

/// Console rendering of requests and results
pub mod report;

/// Prompt to results round trips
pub mod session;

/// Tool definitions, schema validation and the registry
pub mod tools;
