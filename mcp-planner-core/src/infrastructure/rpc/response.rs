use super::error::TransportError;
use serde_json::Value;

const SSE_DATA_MARKER: &str = "data: ";

/// Status and body of an HTTP exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Fails with [`TransportError::Status`] on anything but 200.
    pub fn ensure_ok(self) -> Result<Self, TransportError> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Parses a plain JSON body or a single server-sent-event frame.
///
/// A body containing `data: ` is treated as one SSE frame and the JSON after the
/// first marker is parsed. Multi-event streams are not supported.
pub fn parse_mcp_response(body: &str) -> Result<Value, TransportError> {
    let payload = match body.split_once(SSE_DATA_MARKER) {
        Some((_, data)) => data,
        None => body,
    };
    serde_json::from_str(payload).map_err(|source| TransportError::Parse {
        body: body.to_string(),
        source,
    })
}
