//! Network reachability probing
//!
//! The request layer asks a [`ReachabilityProbe`] once per call. The answer
//! is advisory: `None` means the probe could not tell.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Reports whether the device currently has connectivity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// `Some(true)` if connected, `Some(false)` if not, `None` if unknown
    async fn is_connected(&self) -> Option<bool>;
}

/// Probe that always returns a fixed answer
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticReachability(pub Option<bool>);

#[async_trait]
impl ReachabilityProbe for StaticReachability {
    async fn is_connected(&self) -> Option<bool> {
        self.0
    }
}

/// Probe that opens a TCP connection to a known address
#[derive(Debug, Clone)]
pub struct TcpReachabilityProbe {
    address: String,
    timeout: Duration,
}

impl TcpReachabilityProbe {
    /// Probe the given `host:port`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_secs(3),
        }
    }

    /// Set how long to wait for the connection
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The probed address
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ReachabilityProbe for TcpReachabilityProbe {
    async fn is_connected(&self) -> Option<bool> {
        match timeout(self.timeout, TcpStream::connect(self.address.as_str())).await {
            Ok(Ok(_)) => Some(true),
            Ok(Err(err)) => {
                tracing::debug!(address = %self.address, error = %err, "reachability probe failed");
                Some(false)
            }
            Err(_) => {
                tracing::debug!(address = %self.address, "reachability probe timed out");
                None
            }
        }
    }
}
