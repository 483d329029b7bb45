pub use crate::config::{DispatchConfig, ExecutionMode, GatewayConfig, SessionConfig};
pub use crate::dispatch::{Dispatcher, InvocationFailure, InvocationResult};
pub use crate::error::Error;
pub use crate::gateway::{ModelGateway, OpenAiCompatibleGateway, ScriptedGateway};
pub use crate::session::{SessionOutcome, ToolSession};
pub use crate::tools::{
    function::FunctionTool, InvocationRequest, ParamType, ParameterSpec, Tool, ToolError,
    ToolRegistry, ValidatedArgs,
};
pub use tokio_util::sync::CancellationToken;

pub type Result<T, E = Error> = std::result::Result<T, E>;
