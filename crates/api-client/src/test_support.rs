//! Scripted transport for unit tests

use async_trait::async_trait;
use networking::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// Replays queued results in order and records every request it sees
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn push_response(&self, response: HttpResponse) {
        self.script.lock().push_back(Ok(response));
    }

    pub(crate) fn push_error(&self, error: TransportError) {
        self.script.lock().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(200, "")))
    }
}
