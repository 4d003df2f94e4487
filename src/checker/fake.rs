// src/checker/fake.rs
// =============================================================================
// A scripted Transport for tests. No network involved.
//
// Each host gets a Behavior. Every call is recorded so tests can check
// which URLs were tried, and in which order.
// =============================================================================

use crate::checker::probe::Transport;
use crate::error::ProbeError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Answers every request
    Up,
    /// Refuses every connection
    Refused,
    /// Never answers
    Hang,
    /// Refuses plain http, answers https
    HttpsOnly,
    /// Answers after a short delay
    Slow(Duration),
    /// Panics inside the transport
    Panic,
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    hosts: HashMap<String, Behavior>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, host: &str, behavior: Behavior) -> Self {
        self.hosts.insert(host.to_string(), behavior);
        self
    }

    // Every URL that was requested, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn head(&self, url: &Url, _timeout: Duration) -> Result<(), ProbeError> {
        self.calls.lock().unwrap().push(url.to_string());

        let host = url.host_str().unwrap_or_default().to_string();
        let refused = ProbeError::Connection {
            url: url.to_string(),
            detail: "Connection refused (os error 111)".to_string(),
        };

        match self.hosts.get(&host) {
            Some(Behavior::Up) => Ok(()),
            Some(Behavior::Refused) => Err(refused),
            Some(Behavior::Hang) => {
                std::future::pending::<()>().await;
                Ok(())
            }
            Some(Behavior::HttpsOnly) if url.scheme() == "https" => Ok(()),
            Some(Behavior::HttpsOnly) => Err(refused),
            Some(Behavior::Slow(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            Some(Behavior::Panic) => panic!("transport exploded for {}", host),
            None => Err(ProbeError::Resolution {
                host,
                detail: "dns error: failed to lookup address information".to_string(),
            }),
        }
    }
}
