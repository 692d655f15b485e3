//! Request dispatcher
//!
//! The single entry point every API call goes through. One `send`:
//!
//! 1. resolves the URL (external URL, else base + endpoint + suffix),
//! 2. snapshots the headers (JSON content type, host, current tokens, then
//!    caller overrides),
//! 3. asks the reachability probe (advisory only),
//! 4. picks the method and serializes the body,
//! 5. captures tokens placed in the outgoing headers,
//! 6. runs the call through the shared transport (retries live there),
//! 7. dismisses the loader and classifies the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use api_client::{RequestContext, RequestDescriptor, RequestDispatcher, ServiceHost};
//! use networking::{HttpClient, HttpClientConfig, RetryPolicy, RetryingTransport};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpClient::new(HttpClientConfig::default())?;
//!     let transport = RetryingTransport::new(client, RetryPolicy::default());
//!
//!     let dispatcher = RequestDispatcher::builder(Arc::new(transport))
//!         .host(ServiceHost::default())
//!         .context(Arc::new(RequestContext::new()))
//!         .build();
//!
//!     let profile = dispatcher.send(RequestDescriptor::endpoint("profile")).await?;
//!     println!("{profile}");
//!     Ok(())
//! }
//! ```

use crate::config::DispatcherConfig;
use crate::context::RequestContext;
use crate::credentials::non_empty;
use crate::descriptor::{merge_header, RequestDescriptor};
use crate::endpoints::ServiceHost;
use crate::hooks::{AlertPresenter, TokenPersistence};
use crate::outcome::ErrorOutcome;
use networking::{
    HttpRequest, HttpResponse, HttpTransport, ReachabilityProbe, StaticReachability,
    TransportError,
};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Header carrying a freshly issued access token
pub const ACCESS_TOKEN_HEADER: &str = "access_token";

/// Header carrying a freshly issued refresh token
pub const REFRESH_TOKEN_HEADER: &str = "refresh_token";

/// Header the current refresh token is sent in
pub const REFRESH_TOKEN_OUTGOING_HEADER: &str = "refreshToken";

/// Builds and issues HTTP calls on behalf of the whole app
pub struct RequestDispatcher {
    transport: Arc<dyn HttpTransport>,
    host: ServiceHost,
    context: Arc<RequestContext>,
    reachability: Arc<dyn ReachabilityProbe>,
    alerts: Option<Arc<dyn AlertPresenter>>,
    token_persistence: Option<Arc<dyn TokenPersistence>>,
}

/// Builder for [`RequestDispatcher`]
pub struct DispatcherBuilder {
    transport: Arc<dyn HttpTransport>,
    host: ServiceHost,
    context: Option<Arc<RequestContext>>,
    reachability: Option<Arc<dyn ReachabilityProbe>>,
    alerts: Option<Arc<dyn AlertPresenter>>,
    token_persistence: Option<Arc<dyn TokenPersistence>>,
}

impl DispatcherBuilder {
    /// Host the endpoints resolve against
    pub fn host(mut self, host: ServiceHost) -> Self {
        self.host = host;
        self
    }

    /// Shared credentials and settings
    pub fn context(mut self, context: Arc<RequestContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Connectivity probe consulted before each call
    pub fn reachability(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.reachability = Some(probe);
        self
    }

    /// Where failure alerts go
    pub fn alerts(mut self, presenter: Arc<dyn AlertPresenter>) -> Self {
        self.alerts = Some(presenter);
        self
    }

    /// Where captured tokens are written
    pub fn token_persistence(mut self, persistence: Arc<dyn TokenPersistence>) -> Self {
        self.token_persistence = Some(persistence);
        self
    }

    /// Finish building
    pub fn build(self) -> RequestDispatcher {
        RequestDispatcher {
            transport: self.transport,
            host: self.host,
            context: self.context.unwrap_or_default(),
            reachability: self
                .reachability
                .unwrap_or_else(|| Arc::new(StaticReachability::default())),
            alerts: self.alerts,
            token_persistence: self.token_persistence,
        }
    }
}

impl RequestDispatcher {
    /// Start building a dispatcher over the given transport
    pub fn builder(transport: Arc<dyn HttpTransport>) -> DispatcherBuilder {
        DispatcherBuilder {
            transport,
            host: ServiceHost::default(),
            context: None,
            reachability: None,
            alerts: None,
            token_persistence: None,
        }
    }

    /// Shared credentials and settings
    pub fn context(&self) -> &Arc<RequestContext> {
        &self.context
    }

    /// Host the endpoints resolve against
    pub fn host(&self) -> &ServiceHost {
        &self.host
    }

    /// URL the descriptor targets, `None` when it names neither an endpoint
    /// nor an external URL
    pub fn resolve_url(&self, descriptor: &RequestDescriptor) -> Option<String> {
        if let Some(url) = &descriptor.external_url {
            return Some(url.clone());
        }
        descriptor
            .endpoint
            .as_deref()
            .map(|endpoint| self.host.url_for(endpoint, descriptor.append_in_url.as_deref()))
    }

    /// Headers for a call made now, with the caller's overrides applied last
    pub fn assemble_headers(&self, overrides: &[(String, String)]) -> Vec<(String, String)> {
        let credentials = self.context.credentials().snapshot();

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Host".to_string(), self.host.host().to_string()),
        ];
        if let Some(token) = non_empty(&credentials.access_token) {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        if let Some(token) = non_empty(&credentials.refresh_token) {
            headers.push((REFRESH_TOKEN_OUTGOING_HEADER.to_string(), token.to_string()));
        }

        for (key, value) in overrides {
            merge_header(&mut headers, key.clone(), value.clone());
        }
        headers
    }

    /// Turn a descriptor into the concrete request that would be sent now
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ErrorOutcome> {
        let url = self.resolve_url(descriptor).ok_or_else(|| {
            ErrorOutcome::Unknown("request has neither an endpoint nor an external URL".to_string())
        })?;

        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ErrorOutcome::Unknown(format!("failed to serialize body: {e}")))?;

        // Reserved for parameters the dispatcher adds on its own
        let internal_params: Vec<(String, String)> = Vec::new();
        let query = descriptor
            .params
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .chain(internal_params)
            .collect();

        let request = HttpRequest {
            method: descriptor.effective_method(),
            url,
            headers: self.assemble_headers(&descriptor.headers),
            query,
            body,
        };
        request.validate_headers().map_err(ErrorOutcome::Unknown)?;
        Ok(request)
    }

    /// Send a request, returning the response payload or the classified
    /// failure
    ///
    /// Failures have already been reported (loader dismissed, alert shown
    /// when enabled) by the time this returns.
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<Value, ErrorOutcome> {
        // Headers are fixed here; token changes after this point do not
        // affect this call.
        let prepared = self.prepare(&descriptor);

        self.probe_connectivity().await;

        let result = match prepared {
            Ok(request) => {
                self.update_tokens(&request.headers, false).await;
                tracing::debug!(method = %request.method, url = %request.url, "dispatching request");
                self.dispatch(&request, descriptor.cancellation.as_ref())
                    .await
            }
            Err(outcome) => Err(outcome),
        };

        let config = self.context.config().snapshot();
        config.dismiss_loader();

        match result {
            Ok(response) => Ok(parse_payload(response.body)),
            Err(outcome) => {
                self.report(&outcome, &config);
                Err(outcome)
            }
        }
    }

    /// [`send`](Self::send) with failures collapsed to `None`
    pub async fn send_lenient(&self, descriptor: RequestDescriptor) -> Option<Value> {
        self.send(descriptor).await.ok()
    }

    /// Store tokens found in outgoing headers
    ///
    /// When both `access_token` and `refresh_token` are present they replace
    /// the stored pair and the write is forced. A forced write (or `force`)
    /// hands the current pair to the token persistence collaborator. Returns
    /// whether a forced write happened.
    pub async fn update_tokens(&self, headers: &[(String, String)], force: bool) -> bool {
        let access = find_header(headers, ACCESS_TOKEN_HEADER);
        let refresh = find_header(headers, REFRESH_TOKEN_HEADER);

        let mut forced = force;
        if let (Some(access), Some(refresh)) = (access, refresh) {
            self.context
                .credentials()
                .set_credentials(Some(access.to_string()), Some(refresh.to_string()));
            forced = true;
            tracing::info!("captured new tokens from outgoing request");
        }

        if forced {
            if let Some(persistence) = &self.token_persistence {
                let credentials = self.context.credentials().snapshot();
                if let Err(e) = persistence.persist(&credentials).await {
                    tracing::warn!("Failed to persist tokens: {}", e);
                }
            }
        }
        forced
    }

    async fn probe_connectivity(&self) {
        match self.reachability.is_connected().await {
            Some(false) => tracing::warn!("network reported unreachable, sending anyway"),
            Some(true) => {}
            None => tracing::debug!("network reachability unknown"),
        }
    }

    async fn dispatch(
        &self,
        request: &HttpRequest,
        cancellation: Option<&CancellationToken>,
    ) -> Result<HttpResponse, ErrorOutcome> {
        let result = match cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::cancelled()),
                    result = self.transport.execute(request) => result,
                }
            }
            None => self.transport.execute(request).await,
        };

        match result {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => Err(ErrorOutcome::from_response(&response)),
            Err(err) => Err(ErrorOutcome::from_transport_error(&err)),
        }
    }

    fn report(&self, outcome: &ErrorOutcome, config: &DispatcherConfig) {
        match outcome {
            ErrorOutcome::ServerUnavailable(status) => {
                tracing::warn!(status, "Network Error: server unavailable");
            }
            ErrorOutcome::Unauthorized => {
                tracing::debug!("request unauthorized");
            }
            other => tracing::warn!(status = ?other.status(), outcome = %other, "request failed"),
        }

        if !config.show_alert_dialog {
            return;
        }
        if let (Some(alert), Some(alerts)) = (outcome.alert(), &self.alerts) {
            alerts.present(&alert.with_button_color(config.alert_button_color.clone()));
        }
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

/// Response body as JSON; empty bodies are `Null`, non-JSON text is a string
fn parse_payload(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}
