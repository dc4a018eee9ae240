use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("MCP server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse MCP response: {source}\nRaw response: {body}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP response is missing {field}\nRaw response: {body}")]
    MissingField { field: &'static str, body: String },
}

impl TransportError {
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            TransportError::InvalidHeader { name, .. } => {
                format!("Header \"{name}\" in the server configuration is not valid.")
            }
            TransportError::Network { endpoint, source } => {
                if source.is_connect() {
                    format!("Cannot connect to MCP server at {endpoint}.")
                } else if source.is_timeout() {
                    format!("Request to MCP server at {endpoint} timed out.")
                } else {
                    format!("Network error talking to MCP server at {endpoint}.")
                }
            }
            TransportError::Status { status, .. } => {
                format!("MCP server rejected the request with HTTP {status}.")
            }
            TransportError::Parse { .. } | TransportError::MissingField { .. } => {
                "MCP server sent a response that could not be understood.".to_string()
            }
        }
    }
}
