use super::error::TransportError;
use super::response::RawResponse;
use super::types::RpcRequest;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use tracing::debug;

/// Sends one JSON-RPC request to a single MCP endpoint.
#[async_trait]
pub trait McpTransport: Send + Sync {
    fn endpoint(&self) -> &str;

    /// POSTs `request` and returns the raw status and body.
    ///
    /// With `stream` set the body is consumed as a byte stream, but it is still
    /// returned whole.
    async fn post(&self, request: &RpcRequest, stream: bool) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport with fixed headers.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    headers: HeaderMap,
    http: Client,
}

impl HttpTransport {
    /// `Content-Type: application/json` is always sent; `headers` are applied on top of it.
    pub fn new(
        endpoint: impl Into<String>,
        headers: &BTreeMap<String, String>,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            endpoint: endpoint.into(),
            headers: build_headers(headers)?,
            http: Client::new(),
        })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

#[async_trait]
impl McpTransport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &RpcRequest, stream: bool) -> Result<RawResponse, TransportError> {
        debug!(
            endpoint = self.endpoint.as_str(),
            method = request.method.as_str(),
            id = request.id.as_str(),
            stream,
            "Sending JSON-RPC request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::network(&self.endpoint, e))?;

        let status = response.status().as_u16();
        let body = if stream {
            let mut chunks = response.bytes_stream();
            let mut buffer = Vec::new();
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk.map_err(|e| TransportError::network(&self.endpoint, e))?;
                buffer.extend_from_slice(&chunk);
            }
            String::from_utf8_lossy(&buffer).into_owned()
        } else {
            response
                .text()
                .await
                .map_err(|e| TransportError::network(&self.endpoint, e))?
        };

        debug!(
            endpoint = self.endpoint.as_str(),
            method = request.method.as_str(),
            status,
            bytes = body.len(),
            "Received JSON-RPC response"
        );
        Ok(RawResponse { status, body })
    }
}

fn build_headers(custom: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in custom {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
