// src/providers/mod.rs

use async_trait::async_trait;
use std::collections::HashMap;

/// Header name/value pairs sent with a request.
pub type HeaderSet = Vec<(&'static str, String)>;

#[derive(Debug)]
pub enum TransportError {
    Network(String),
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    /// Lower-cased header names.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The network seam under the fetch layer. Implementations perform one GET
/// and report the raw outcome; status interpretation happens above.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    fn transport_name(&self) -> &str;

    async fn get(&self, url: &str, headers: &HeaderSet) -> Result<HttpResponse, TransportError>;
}

// Module declarations
pub mod mocks;
pub mod reqwest_transport;

// Re-export for testing
pub use mocks::MockTransport;
pub use reqwest_transport::ReqwestTransport;
