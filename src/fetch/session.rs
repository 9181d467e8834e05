// src/fetch/session.rs

use super::credentials::CredentialRotator;
use crate::cache::{Clock, SimpleCache, SystemClock};
use crate::config::AuditConfig;
use crate::error::{FetchError, FetchResult};
use crate::providers::{HttpResponse, HttpTransport, TransportError};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Per-run fetch state: response cache, credential cursor and the transport.
///
/// Created at run start and passed by reference to everything that fetches.
/// `reset` returns it to the pristine state a new run expects.
pub struct Session {
    api_base: String,
    transport: Arc<dyn HttpTransport>,
    rotator: CredentialRotator,
    cache: Mutex<SimpleCache>,
    ttl: Duration,
    timeout: Duration,
}

impl Session {
    pub fn new(config: &AuditConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_clock(config, transport, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &AuditConfig,
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            transport,
            rotator: CredentialRotator::new(config.tokens.clone()),
            cache: Mutex::new(SimpleCache::with_clock(config.cache_capacity, clock)),
            ttl: config.cache_ttl(),
            timeout: config.timeout(),
        }
    }

    pub fn rotator(&self) -> &CredentialRotator {
        &self.rotator
    }

    pub async fn cached_entries(&self) -> usize {
        self.cache.lock().await.size()
    }

    pub async fn reset(&self) {
        self.cache.lock().await.clear();
        self.rotator.reset();
    }

    /// Absolute URLs pass through; anything else is joined to the API base.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.api_base, endpoint)
        } else {
            format!("{}/{}", self.api_base, endpoint)
        }
    }

    /// Fetch and decode `endpoint`. `Value::Null` means the resource does not
    /// exist. Quota rejections rotate to the next credential and retry the same
    /// URL, at most once per credential.
    pub async fn fetch(&self, endpoint: &str) -> FetchResult<Value> {
        let url = self.resolve(endpoint);

        if let Some(hit) = self.cache.lock().await.get(&url) {
            debug!(%url, "cache hit");
            return Ok(hit);
        }
        debug!(%url, transport = self.transport.transport_name(), "cache miss");

        let attempts = self.rotator.len().max(1);
        let mut retry_after = None;

        for _ in 0..attempts {
            let (index, headers) = self.rotator.current();

            let attempt = self.transport.get(&url, &headers);
            let response = match tokio::time::timeout(self.timeout, attempt).await {
                Err(_) => {
                    warn!(%url, timeout_secs = self.timeout.as_secs(), "request timed out");
                    return Err(FetchError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    });
                }
                Ok(Err(TransportError::Network(message))) => {
                    return Err(FetchError::Network(message));
                }
                Ok(Ok(response)) => response,
            };

            match response.status {
                401 => return Err(FetchError::InvalidCredential),
                403 | 429 => {
                    retry_after = parse_retry_after(&response);
                    if self.rotator.advance_past(index) {
                        warn!(
                            %url,
                            credential = self.rotator.cursor() + 1,
                            "quota exhausted, rotating credential"
                        );
                        continue;
                    }
                    return Err(FetchError::RateLimited { retry_after });
                }
                404 => {
                    self.store(url, Value::Null).await;
                    return Ok(Value::Null);
                }
                status if !response.is_success() => {
                    return Err(FetchError::Unexpected { status });
                }
                _ => {
                    let value = decode_body(&response.body)?;
                    self.store(url, value.clone()).await;
                    return Ok(value);
                }
            }
        }

        Err(FetchError::RateLimited { retry_after })
    }

    /// Typed fetch. `Ok(None)` for not-found.
    pub async fn fetch_as<T: DeserializeOwned>(&self, endpoint: &str) -> FetchResult<Option<T>> {
        match self.fetch(endpoint).await? {
            Value::Null => Ok(None),
            value => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| FetchError::Decode(format!("{}: {}", endpoint, e))),
        }
    }

    async fn store(&self, url: String, value: Value) {
        self.cache.lock().await.set(url, value, self.ttl);
    }
}

fn decode_body(body: &str) -> FetchResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Reset time from `x-ratelimit-reset` (epoch seconds), falling back to
/// `retry-after` (seconds from now).
fn parse_retry_after(response: &HttpResponse) -> Option<DateTime<Utc>> {
    if let Some(reset) = response
        .header("x-ratelimit-reset")
        .and_then(|v| v.trim().parse::<i64>().ok())
    {
        return DateTime::from_timestamp(reset, 0);
    }
    response
        .header("retry-after")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::providers::MockTransport;
    use serde_json::json;

    const BASE: &str = "https://api.test";

    fn config(tokens: &[&str]) -> AuditConfig {
        AuditConfig {
            api_base: BASE.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            timeout_secs: 5,
            ..AuditConfig::default()
        }
    }

    fn session(tokens: &[&str], transport: &Arc<MockTransport>) -> Session {
        Session::new(&config(tokens), transport.clone())
    }

    #[test]
    fn test_resolve() {
        let transport = Arc::new(MockTransport::new("test"));
        let session = session(&[], &transport);
        assert_eq!(session.resolve("/users/octo"), "https://api.test/users/octo");
        assert_eq!(session.resolve("users/octo"), "https://api.test/users/octo");
        assert_eq!(
            session.resolve("https://other.test/x?page=2"),
            "https://other.test/x?page=2"
        );
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let url = format!("{}/users/octo", BASE);
        let transport =
            Arc::new(MockTransport::new("test").with_json(&url, json!({"login": "octo"})));
        let session = session(&[], &transport);

        let first = session.fetch("/users/octo").await.unwrap();
        let second = session.fetch("/users/octo").await.unwrap();

        assert_eq!(first["login"], "octo");
        assert_eq!(first, second);
        assert_eq!(transport.request_count(&url), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_null_and_cached() {
        let url = format!("{}/repos/octo/missing/readme", BASE);
        let transport = Arc::new(MockTransport::new("test").with_status(&url, 404));
        let session = session(&["a"], &transport);

        assert_eq!(session.fetch(&url).await.unwrap(), Value::Null);
        assert_eq!(session.fetch(&url).await.unwrap(), Value::Null);
        assert_eq!(transport.request_count(&url), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let url = format!("{}/users/octo", BASE);
        let transport =
            Arc::new(MockTransport::new("test").with_json(&url, json!({"login": "octo"})));
        let clock = Arc::new(ManualClock::new());
        let mut cfg = config(&[]);
        cfg.cache_ttl_secs = 60;
        let session = Session::with_clock(&cfg, transport.clone(), clock.clone());

        session.fetch(&url).await.unwrap();
        clock.advance(Duration::from_secs(61));
        session.fetch(&url).await.unwrap();

        assert_eq!(transport.request_count(&url), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_is_invalid_credential_without_retry() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(MockTransport::new("test").with_status(&url, 401));
        let session = session(&["a", "b"], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidCredential));
        assert_eq!(transport.request_count(&url), 1);
        assert_eq!(session.rotator().cursor(), 0);
    }

    #[tokio::test]
    async fn test_quota_rotates_once_then_succeeds() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(
            MockTransport::new("test")
                .with_status(&url, 403)
                .with_json(&url, json!({"login": "octo"})),
        );
        let session = session(&["a", "b"], &transport);

        let value = session.fetch(&url).await.unwrap();
        assert_eq!(value["login"], "octo");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].authorization.as_deref(), Some("token a"));
        assert_eq!(requests[1].authorization.as_deref(), Some("token b"));
        assert_eq!(session.rotator().cursor(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_quota_hits_rotate_once() {
        let user_url = format!("{}/users/octo", BASE);
        let repos_url = format!("{}/users/octo/repos", BASE);
        let transport = Arc::new(
            MockTransport::new("test")
                .with_status(&user_url, 403)
                .with_json(&user_url, json!({"login": "octo"}))
                .with_delay(&user_url, Duration::from_secs(1))
                .with_status(&repos_url, 403)
                .with_json(&repos_url, json!([]))
                .with_delay(&repos_url, Duration::from_secs(1)),
        );
        let session = session(&["x", "y", "z"], &transport);

        // both requests are in flight under credential 0 before either answers
        let (user, repos) = tokio::join!(session.fetch(&user_url), session.fetch(&repos_url));
        assert_eq!(user.unwrap()["login"], "octo");
        assert_eq!(repos.unwrap(), json!([]));

        assert_eq!(session.rotator().cursor(), 1);
        let auths: Vec<Option<String>> =
            transport.requests().iter().map(|r| r.authorization.clone()).collect();
        assert_eq!(auths.len(), 4);
        assert!(auths[..2].iter().all(|a| a.as_deref() == Some("token x")));
        assert!(auths[2..].iter().all(|a| a.as_deref() == Some("token y")));
    }

    #[tokio::test]
    async fn test_quota_exhausts_every_credential() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(MockTransport::new("test").with_response(
            &url,
            HttpResponse::new(403, "").with_header("X-RateLimit-Reset", "1769862600"),
        ));
        let session = session(&["a", "b", "c"], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        match err {
            FetchError::RateLimited { retry_after } => {
                assert_eq!(retry_after.unwrap().timestamp(), 1769862600);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
        assert_eq!(transport.request_count(&url), 3);
        assert_eq!(session.rotator().cursor(), 2);
    }

    #[tokio::test]
    async fn test_quota_without_credentials() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(MockTransport::new("test").with_status(&url, 429));
        let session = session(&[], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::RateLimited { retry_after: None }));
        assert_eq!(transport.request_count(&url), 1);
    }

    #[tokio::test]
    async fn test_other_status_is_unexpected() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(MockTransport::new("test").with_status(&url, 502));
        let session = session(&[], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Unexpected { status: 502 }));
    }

    #[tokio::test]
    async fn test_transport_fault_is_network_error() {
        let url = format!("{}/users/octo", BASE);
        let transport =
            Arc::new(MockTransport::new("test").with_network_error(&url, "connection reset"));
        let session = session(&[], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(ref m) if m == "connection reset"));
        assert_eq!(session.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(
            MockTransport::new("test").with_response(&url, HttpResponse::new(200, "<html>")),
        );
        let session = session(&[], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_times_out() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(
            MockTransport::new("test")
                .with_json(&url, json!({"login": "octo"}))
                .with_delay(&url, Duration::from_secs(30)),
        );
        let session = session(&[], &transport);

        let err = session.fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout { timeout_secs: 5 }));
        assert_eq!(session.cached_entries().await, 0);
    }

    #[tokio::test]
    async fn test_fetch_as_decodes_and_maps_null() {
        let user_url = format!("{}/users/octo", BASE);
        let transport = Arc::new(
            MockTransport::new("test")
                .with_json(&user_url, json!({"login": "octo", "followers": 7})),
        );
        let session = session(&[], &transport);

        let profile: Option<crate::types::Profile> = session.fetch_as("/users/octo").await.unwrap();
        assert_eq!(profile.unwrap().followers, 7);

        let missing: Option<crate::types::Profile> =
            session.fetch_as("/users/ghost").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_cache_and_cursor() {
        let url = format!("{}/users/octo", BASE);
        let transport = Arc::new(
            MockTransport::new("test")
                .with_status(&url, 403)
                .with_json(&url, json!({"login": "octo"})),
        );
        let session = session(&["a", "b"], &transport);

        session.fetch(&url).await.unwrap();
        assert_eq!(session.cached_entries().await, 1);

        session.reset().await;
        assert_eq!(session.cached_entries().await, 0);
        assert_eq!(session.rotator().cursor(), 0);
    }
}
