//! Inbound MCP protocol: JSON-RPC envelopes, the tool catalog and the
//! dispatcher that maps tool calls onto the backends.

pub mod dispatcher;
pub mod envelope;
pub mod tools;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use envelope::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use tools::{ToolCatalog, ToolDescriptor, ToolKind};
