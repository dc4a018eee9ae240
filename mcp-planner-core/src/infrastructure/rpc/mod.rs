//! JSON-RPC over HTTP transport for MCP servers.
//!
//! - `types` - request framing
//! - `response` - plain JSON / single-frame SSE body parsing
//! - `transport` - the `McpTransport` seam and its reqwest implementation
//! - `error` - transport failures

pub mod error;
pub mod response;
pub mod transport;
pub mod types;

pub use error::TransportError;
pub use response::{RawResponse, parse_mcp_response};
pub use transport::{HttpTransport, McpTransport};
pub use types::RpcRequest;
