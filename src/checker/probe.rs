// src/checker/probe.rs
// =============================================================================
// This module decides whether ONE website is online.
//
// How a probe works:
// 1. Pull the host out of the target (see host.rs)
// 2. Try "http://<host>" with a HEAD request
// 3. If that fails, try "https://<host>"
// 4. The first attempt that gets ANY HTTP response wins -> Online
// 5. If every attempt fails, the site is Offline and the reason is the
//    error from the LAST attempt
//
// Every attempt has its own timeout. A timeout is always reported as the
// plain text "timed out" instead of the transport's error message.
//
// Rust concepts:
// - Traits: Transport hides the real HTTP client so tests can fake it
// - async-trait: Lets a trait with async methods be used as `dyn Transport`
// - tokio::time::timeout: Puts an upper bound on how long a future may run
// =============================================================================

use crate::checker::host::extract_host;
use crate::error::{CheckerError, ProbeError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;
use url::Url;

// Default per-attempt timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 2.0;

// One ordered trial within a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub scheme: &'static str,
}

// The fixed order in which schemes are tried
pub const ATTEMPT_ORDER: [Attempt; 2] = [Attempt { scheme: "http" }, Attempt { scheme: "https" }];

impl Attempt {
    // Builds "<scheme>://<host>" and validates it with the url crate
    pub fn url_for(&self, host: &str) -> Result<Url, ProbeError> {
        let raw = format!("{}://{}", self.scheme, host);
        Url::parse(&raw).map_err(|e| ProbeError::InvalidUrl {
            url: raw,
            detail: e.to_string(),
        })
    }
}

// The final result for a single target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// The target exactly as the user supplied it
    pub target: String,
    /// Did any attempt get a response?
    pub reachable: bool,
    /// Why not (only set when reachable is false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ProbeOutcome {
    pub fn online(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reachable: true,
            failure_reason: None,
        }
    }

    pub fn offline(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            reachable: false,
            failure_reason: Some(reason.into()),
        }
    }
}

// Something that can send a single HEAD request
//
// Returning Ok means "the server answered", whatever the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn head(&self, url: &Url, timeout: Duration) -> Result<(), ProbeError>;
}

// The real transport, backed by reqwest
//
// Idle connections are not kept in the pool, so every attempt's socket
// is closed as soon as that attempt is over. Redirects are not followed:
// a 3xx is the site's own answer. Proxy environment variables are ignored.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, CheckerError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &Url, timeout: Duration) -> Result<(), ProbeError> {
        let response = self
            .client
            .head(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| categorize_error(url, e))?;

        debug!(%url, status = response.status().as_u16(), "attempt got a response");
        Ok(())
    }
}

// Probes one target and never fails: every error is folded into the outcome
pub async fn probe(target: &str, timeout: Duration, transport: &dyn Transport) -> ProbeOutcome {
    let host = extract_host(target);

    // Only used if ATTEMPT_ORDER were ever empty
    let mut last_error = ProbeError::Request {
        url: target.to_string(),
        detail: "unknown error".to_string(),
    };

    for attempt in ATTEMPT_ORDER {
        match run_attempt(&attempt, host, timeout, transport).await {
            Ok(()) => return ProbeOutcome::online(target),
            Err(e) => {
                debug!(probe_target = target, scheme = attempt.scheme, error = %e, "attempt failed");
                last_error = e;
            }
        }
    }

    ProbeOutcome::offline(target, last_error.to_string())
}

async fn run_attempt(
    attempt: &Attempt,
    host: &str,
    timeout: Duration,
    transport: &dyn Transport,
) -> Result<(), ProbeError> {
    let url = attempt.url_for(host)?;

    // The outer timeout also covers transports that ignore their own timeout
    match tokio::time::timeout(timeout, transport.head(&url, timeout)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(ProbeError::Timeout),
    }
}

// Turns a reqwest error into one of our ProbeError variants
//
// reqwest's own message is just "error sending request for url (...)",
// so the interesting part is further down the source() chain.
fn categorize_error(url: &Url, error: reqwest::Error) -> ProbeError {
    let detail = error_chain(&error);

    if error.is_timeout() {
        ProbeError::Timeout
    } else if error.is_connect() && detail.to_lowercase().contains("dns") {
        ProbeError::Resolution {
            host: url.host_str().unwrap_or_default().to_string(),
            detail,
        }
    } else if error.is_connect() {
        ProbeError::Connection {
            url: url.to_string(),
            detail,
        }
    } else {
        ProbeError::Request {
            url: url.to_string(),
            detail,
        }
    }
}

// Joins the messages of all underlying causes: "a: b: c"
fn error_chain(error: &reqwest::Error) -> String {
    let mut parts = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }

    if parts.is_empty() {
        error.to_string()
    } else {
        parts.join(": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::fake::{Behavior, FakeTransport};

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_first_attempt_short_circuits() {
        let transport = FakeTransport::new().with("up.test", Behavior::Up);

        let outcome = probe("up.test", TIMEOUT, &transport).await;

        assert_eq!(outcome, ProbeOutcome::online("up.test"));
        assert_eq!(transport.calls(), vec!["http://up.test/".to_string()]);
    }

    #[tokio::test]
    async fn test_falls_back_to_https() {
        let transport = FakeTransport::new().with("tls.test", Behavior::HttpsOnly);

        let outcome = probe("https://tls.test/login", TIMEOUT, &transport).await;

        assert!(outcome.reachable);
        assert_eq!(outcome.target, "https://tls.test/login");
        assert_eq!(
            transport.calls(),
            vec!["http://tls.test/".to_string(), "https://tls.test/".to_string()]
        );
    }

    #[tokio::test]
    async fn test_last_error_wins() {
        let transport = FakeTransport::new().with("down.test", Behavior::Refused);

        let outcome = probe("down.test", TIMEOUT, &transport).await;

        assert!(!outcome.reachable);
        let reason = outcome.failure_reason.expect("offline outcome has a reason");
        assert!(reason.contains("https://down.test/"), "got: {reason}");
        assert!(!reason.contains("http://down.test/"), "got: {reason}");
    }

    #[tokio::test]
    async fn test_hang_is_reported_as_timed_out() {
        let transport = FakeTransport::new().with("slow.test", Behavior::Hang);

        let outcome = probe("slow.test", Duration::from_millis(50), &transport).await;

        assert_eq!(outcome, ProbeOutcome::offline("slow.test", "timed out"));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_host_fails_every_attempt() {
        let transport = FakeTransport::new();

        let outcome = probe("", TIMEOUT, &transport).await;

        assert!(!outcome.reachable);
        let reason = outcome.failure_reason.expect("offline outcome has a reason");
        assert!(reason.starts_with("invalid URL 'https://'"), "got: {reason}");
        // Nothing was ever sent
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_probe_is_idempotent() {
        let transport = FakeTransport::new()
            .with("up.test", Behavior::Up)
            .with("down.test", Behavior::Refused);

        let first_up = probe("up.test", TIMEOUT, &transport).await;
        let second_up = probe("up.test", TIMEOUT, &transport).await;
        assert!(first_up.reachable && second_up.reachable);

        let first_down = probe("down.test", TIMEOUT, &transport).await;
        let second_down = probe("down.test", TIMEOUT, &transport).await;
        assert!(!first_down.reachable);
        assert_eq!(first_down, second_down);
    }

    #[tokio::test]
    async fn test_outcome_fields_are_exclusive() {
        let transport = FakeTransport::new()
            .with("up.test", Behavior::Up)
            .with("down.test", Behavior::Refused);

        for target in ["up.test", "down.test", "unknown.test", ""] {
            let outcome = probe(target, TIMEOUT, &transport).await;
            assert_eq!(outcome.reachable, outcome.failure_reason.is_none());
        }
    }

    #[test]
    fn test_outcome_json_skips_missing_reason() {
        let json = serde_json::to_string(&ProbeOutcome::online("example.com")).unwrap();
        assert_eq!(json, r#"{"target":"example.com","reachable":true}"#);
    }

    #[tokio::test]
    async fn test_http_transport_reaches_local_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("HEAD", "/")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let outcome = probe(&server.host_with_port(), Duration::from_secs(2), &transport).await;

        // Any HTTP answer counts as online, even a 503
        assert!(outcome.reachable);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_transport_refused_port() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let target = format!("127.0.0.1:{}", port);

        let transport = HttpTransport::new().unwrap();
        let outcome = probe(&target, Duration::from_secs(2), &transport).await;

        assert!(!outcome.reachable);
        let reason = outcome.failure_reason.unwrap();
        assert!(reason.contains(&format!("https://127.0.0.1:{}/", port)), "got: {reason}");
    }

    #[tokio::test]
    async fn test_http_transport_does_not_follow_redirects() {
        // The redirect points at a port nobody is listening on
        let closed_port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("HEAD", "/")
            .with_status(301)
            .with_header("location", &format!("http://127.0.0.1:{}/", closed_port))
            .expect(1)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let outcome = probe(&server.host_with_port(), Duration::from_secs(2), &transport).await;

        assert_eq!(outcome, ProbeOutcome::online(server.host_with_port()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_transport_unresolvable_host() {
        // .invalid is reserved and never resolves
        let transport = HttpTransport::new().unwrap();
        let outcome = probe("nothing.invalid", Duration::from_secs(5), &transport).await;

        assert!(!outcome.reachable);
        let reason = outcome.failure_reason.unwrap();
        assert!(
            reason.starts_with("could not resolve host 'nothing.invalid'"),
            "got: {reason}"
        );
    }
}
