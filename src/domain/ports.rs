use crate::error::NetworkErrorKind;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

/// Status and body of a remote answer, returned verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// A single HTTP exchange. Implementations never retry.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, NetworkErrorKind>;
}

/// Source of badge codes. Resolves once a code is read or capture fails.
#[async_trait]
pub trait BadgeScanner: Send + Sync {
    async fn capture(&self) -> Option<String>;
}

/// Append-only, ordered sink of user-facing activity lines.
pub trait ActivityLog: Send + Sync {
    fn record(&self, line: String);
}

pub type HttpTransportBox = Box<dyn HttpTransport>;
pub type BadgeScannerBox = Box<dyn BadgeScanner>;
pub type ActivityLogHandle = Arc<dyn ActivityLog>;
