//! Retry policy for the shared transport
//!
//! The policy is fixed when the transport is built and applies to every
//! request that goes through it. The delay between attempts is flat: it is
//! `max_retries * delay_unit` whatever the attempt index.

use crate::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError, TransportErrorKind,
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Unit the flat delay is derived from
    pub delay_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_unit: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry count and the default delay unit
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// A policy that never retries
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Set the delay unit
    pub fn with_delay_unit(mut self, delay_unit: Duration) -> Self {
        self.delay_unit = delay_unit;
        self
    }

    /// Delay before the given retry (1-based). Does not depend on `attempt`.
    pub fn delay_for(&self, _attempt: u32) -> Duration {
        self.delay_unit * self.max_retries
    }

    /// Whether a finished attempt should be repeated
    ///
    /// Connectivity failures are always retried. Server errors (5xx) are
    /// retried only for idempotent methods. Timeouts, cancellations and
    /// malformed requests are final.
    pub fn should_retry(
        &self,
        method: HttpMethod,
        result: &Result<HttpResponse, TransportError>,
    ) -> bool {
        match result {
            Ok(response) => response.is_server_error() && method.is_idempotent(),
            Err(err) => err.kind() == TransportErrorKind::Network,
        }
    }
}

/// Transport wrapper applying a [`RetryPolicy`] to every request
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> RetryingTransport<T> {
    /// Wrap a transport with a retry policy
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The policy this transport was built with
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut attempt = 0;

        loop {
            let result = self.inner.execute(request).await;

            if attempt >= self.policy.max_retries
                || !self.policy.should_retry(request.method, &result)
            {
                return result;
            }

            attempt += 1;
            let delay = self.policy.delay_for(attempt);
            match &result {
                Ok(response) => tracing::warn!(
                    url = %request.url,
                    status = response.status,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request after server error"
                ),
                Err(err) => tracing::warn!(
                    url = %request.url,
                    error = %err,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying request after network error"
                ),
            }
            sleep(delay).await;
        }
    }
}
