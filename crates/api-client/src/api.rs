//! API facade
//!
//! Named operations screens call instead of building descriptors by hand.

use crate::descriptor::RequestDescriptor;
use crate::dispatcher::RequestDispatcher;
use crate::endpoints::Endpoint;
use crate::outcome::ErrorOutcome;
use networking::HttpMethod;
use serde_json::Value;
use std::sync::Arc;

/// Catalog of the app's API operations
#[derive(Clone)]
pub struct Api {
    dispatcher: Arc<RequestDispatcher>,
}

impl Api {
    /// Create the facade over a shared dispatcher
    pub fn new(dispatcher: Arc<RequestDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Dispatcher behind the facade
    pub fn dispatcher(&self) -> &Arc<RequestDispatcher> {
        &self.dispatcher
    }

    /// Create an account
    pub async fn signup(&self, body: Value) -> Result<Value, ErrorOutcome> {
        self.post(Endpoint::Signup, body).await
    }

    /// Authenticate
    pub async fn login(&self, body: Value) -> Result<Value, ErrorOutcome> {
        self.post(Endpoint::Login, body).await
    }

    async fn post(&self, endpoint: Endpoint, body: Value) -> Result<Value, ErrorOutcome> {
        let descriptor = RequestDescriptor::endpoint(endpoint.path())
            .body(body)
            .method(HttpMethod::Post);
        self.dispatcher.send(descriptor).await
    }
}
