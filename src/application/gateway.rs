use crate::config::AppConfig;
use crate::domain::ports::{HttpRequest, HttpResponse, HttpTransportBox, Method};
use crate::error::{NetworkError, NetworkErrorKind};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Header carrying the client-generated key of a state-changing submission.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Uniform wrapper around the HTTP transport.
///
/// Applies the per-call timeout, retries reads that time out up to a fixed
/// bound and hands status and body back uninterpreted.
pub struct RequestGateway {
    transport: HttpTransportBox,
    base_url: String,
    timeout: Duration,
    probe_timeout: Duration,
    max_attempts: u32,
    backoff: Duration,
}

impl RequestGateway {
    pub fn new(transport: HttpTransportBox, config: &AppConfig) -> Self {
        Self {
            transport,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.request_timeout(),
            probe_timeout: config.probe_timeout(),
            max_attempts: config.max_attempts.max(1),
            backoff: config.retry_backoff(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET path` with the bounded timeout retry.
    pub async fn get(&self, path: &str) -> Result<HttpResponse, NetworkError> {
        let request = HttpRequest {
            method: Method::Get,
            url: self.url(path),
            body: None,
            headers: Vec::new(),
        };
        self.call(&request, self.timeout, self.max_attempts).await
    }

    /// `POST path` with a JSON body. Submissions are not idempotent on the
    /// remote side, so they get exactly one attempt.
    pub async fn post(
        &self,
        path: &str,
        payload: Value,
        idempotency_key: &str,
    ) -> Result<HttpResponse, NetworkError> {
        let request = HttpRequest {
            method: Method::Post,
            url: self.url(path),
            body: Some(payload),
            headers: vec![(IDEMPOTENCY_HEADER.to_string(), idempotency_key.to_string())],
        };
        self.call(&request, self.timeout, 1).await
    }

    /// Single short-timeout `GET` used to check the service is reachable.
    pub async fn probe(&self, path: &str) -> Result<HttpResponse, NetworkError> {
        let request = HttpRequest {
            method: Method::Get,
            url: self.url(path),
            body: None,
            headers: Vec::new(),
        };
        self.call(&request, self.probe_timeout, 1).await
    }

    async fn call(
        &self,
        request: &HttpRequest,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<HttpResponse, NetworkError> {
        let mut attempt = 1;
        loop {
            debug!(url = %request.url, method = ?request.method, attempt, "sending request");
            match self.transport.send(request, timeout).await {
                Ok(response) => {
                    debug!(url = %request.url, status = response.status, "received response");
                    return Ok(response);
                }
                Err(NetworkErrorKind::Timeout) if attempt < max_attempts => {
                    warn!(url = %request.url, attempt, "request timed out, retrying");
                    attempt += 1;
                    sleep(self.backoff).await;
                }
                Err(kind) => {
                    warn!(url = %request.url, attempt, error = %kind, "request failed");
                    return Err(NetworkError { kind });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::HttpTransport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays a fixed list of attempt results and counts the calls made.
    #[derive(Clone, Default)]
    struct Scripted {
        replies: Arc<Mutex<VecDeque<Result<HttpResponse, NetworkErrorKind>>>>,
        seen: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<HttpResponse, NetworkErrorKind>>) -> Self {
            Self {
                replies: Arc::new(Mutex::new(replies.into())),
                seen: Arc::default(),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for Scripted {
        async fn send(
            &self,
            request: &HttpRequest,
            _timeout: Duration,
        ) -> Result<HttpResponse, NetworkErrorKind> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(NetworkErrorKind::Other("script exhausted".into())))
        }
    }

    fn gateway(transport: Scripted) -> RequestGateway {
        let config = AppConfig {
            base_url: "http://remote/api/".into(),
            retry_backoff_ms: 0,
            ..AppConfig::default()
        };
        RequestGateway::new(Box::new(transport), &config)
    }

    #[tokio::test]
    async fn test_timeout_then_success_uses_two_calls() {
        let transport = Scripted::new(vec![
            Err(NetworkErrorKind::Timeout),
            Ok(HttpResponse::new(200, "[]")),
        ]);
        let response = gateway(transport.clone()).get("/inventory").await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_two_timeouts_stop_without_third_attempt() {
        let transport = Scripted::new(vec![
            Err(NetworkErrorKind::Timeout),
            Err(NetworkErrorKind::Timeout),
            Ok(HttpResponse::new(200, "[]")),
        ]);
        let err = gateway(transport.clone()).get("inventory").await.unwrap_err();

        assert_eq!(err.kind, NetworkErrorKind::Timeout);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_connection_failure_is_not_retried() {
        let transport = Scripted::new(vec![
            Err(NetworkErrorKind::ConnectionFailed),
            Ok(HttpResponse::new(200, "[]")),
        ]);
        let err = gateway(transport.clone()).get("inventory").await.unwrap_err();

        assert_eq!(err.kind, NetworkErrorKind::ConnectionFailed);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_status_codes_pass_through() {
        let transport = Scripted::new(vec![Ok(HttpResponse::new(503, "down"))]);
        let response = gateway(transport).get("inventory").await.unwrap();

        assert_eq!(response, HttpResponse::new(503, "down"));
    }

    #[tokio::test]
    async fn test_post_is_sent_once_with_key() {
        let transport = Scripted::new(vec![
            Err(NetworkErrorKind::Timeout),
            Ok(HttpResponse::new(200, "")),
        ]);
        let err = gateway(transport.clone())
            .post("checkout", json!({"item_id": "5"}), "key-1")
            .await
            .unwrap_err();

        assert_eq!(err.kind, NetworkErrorKind::Timeout);
        assert_eq!(transport.calls(), 1);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://remote/api/checkout");
        assert_eq!(seen[0].method, Method::Post);
        assert!(seen[0]
            .headers
            .contains(&(IDEMPOTENCY_HEADER.to_string(), "key-1".to_string())));
    }
}
