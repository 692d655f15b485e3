//! App Scaffold
//!
//! Application bootstrap: wires the request layer, the navigator and the
//! persisted session together the way the app starts up.
//!
//! ```rust,no_run
//! use app_scaffold::{init_tracing, App, AppConfig};
//! use api_client::HostEnvironment;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing();
//!     let app = App::bootstrap(
//!         AppConfig::new("session/tokens.json").environment(HostEnvironment::Production),
//!     )
//!     .await?;
//!     let _ = app.api().login(serde_json::json!({"email": "ada@example.com"})).await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::Context;
use api_client::{
    Api, DispatcherConfig, HostEnvironment, PersistedTokenStore, RequestContext,
    RequestDispatcher, ServiceHost,
};
use app_ui::SharedNavigator;
use networking::{
    HttpClient, HttpClientConfig, ReachabilityProbe, RetryPolicy, RetryingTransport,
    StaticReachability, TcpReachabilityProbe,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Startup configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where API calls go
    pub host: ServiceHost,
    /// File the session tokens are kept in
    pub token_path: PathBuf,
    /// HTTP client settings
    pub http: HttpClientConfig,
    /// Retry policy shared by every call
    pub retry: RetryPolicy,
    /// Initial presentation settings
    pub dispatcher: DispatcherConfig,
    /// Probe connectivity by connecting to the API host
    pub probe_reachability: bool,
}

impl AppConfig {
    /// Defaults against the test backend
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        Self {
            host: ServiceHost::default(),
            token_path: token_path.into(),
            http: HttpClientConfig::default(),
            retry: RetryPolicy::default(),
            dispatcher: DispatcherConfig::default(),
            probe_reachability: false,
        }
    }

    /// Select the backend
    pub fn environment(mut self, environment: HostEnvironment) -> Self {
        self.host = ServiceHost::for_environment(environment);
        self
    }

    /// Use an explicit host
    pub fn host(mut self, host: ServiceHost) -> Self {
        self.host = host;
        self
    }

    /// HTTP client settings
    pub fn http(mut self, http: HttpClientConfig) -> Self {
        self.http = http;
        self
    }

    /// Retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Initial presentation settings
    pub fn dispatcher(mut self, dispatcher: DispatcherConfig) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Enable the TCP reachability probe
    pub fn probe_reachability(mut self, enabled: bool) -> Self {
        self.probe_reachability = enabled;
        self
    }
}

/// The running application's shared services
pub struct App {
    api: Api,
    navigator: SharedNavigator,
    token_store: Arc<PersistedTokenStore>,
}

impl App {
    /// Build every service and restore the saved session
    pub async fn bootstrap(config: AppConfig) -> anyhow::Result<Self> {
        let context = Arc::new(RequestContext::with_config(config.dispatcher.clone()));

        let token_store = Arc::new(
            PersistedTokenStore::open(&config.token_path)
                .await
                .with_context(|| {
                    format!("failed to open token store at {}", config.token_path.display())
                })?,
        );
        token_store.restore(&context).await;

        let client = HttpClient::new(config.http.clone()).context("failed to build HTTP client")?;
        let transport = RetryingTransport::new(client, config.retry);

        let navigator = SharedNavigator::new();
        context.config().set_navigation(Arc::new(navigator.clone()));
        // Installing the navigator resets the flags; reapply what was asked for
        context.config().set_loader(config.dispatcher.show_loader);
        context
            .config()
            .set_show_alert_dialog(config.dispatcher.show_alert_dialog);

        let reachability: Arc<dyn ReachabilityProbe> = if config.probe_reachability {
            Arc::new(TcpReachabilityProbe::new(reachability_address(&config.host)))
        } else {
            Arc::new(StaticReachability::default())
        };

        let dispatcher = RequestDispatcher::builder(Arc::new(transport))
            .host(config.host.clone())
            .context(context)
            .reachability(reachability)
            .alerts(Arc::new(navigator.clone()))
            .token_persistence(token_store.clone())
            .build();

        tracing::info!(base_url = %config.host.base_url(), "app bootstrapped");

        Ok(Self {
            api: Api::new(Arc::new(dispatcher)),
            navigator,
            token_store,
        })
    }

    /// API facade
    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Request dispatcher
    pub fn dispatcher(&self) -> &Arc<RequestDispatcher> {
        self.api.dispatcher()
    }

    /// Shared credentials and settings
    pub fn context(&self) -> &Arc<RequestContext> {
        self.dispatcher().context()
    }

    /// Root navigator
    pub fn navigator(&self) -> &SharedNavigator {
        &self.navigator
    }

    /// Persisted session tokens
    pub fn token_store(&self) -> &Arc<PersistedTokenStore> {
        &self.token_store
    }

    /// Put the loader up in the configured color
    ///
    /// The next call the dispatcher finishes dismisses it.
    pub fn show_loader(&self) {
        let config = self.context().config();
        config.set_loader(true);
        self.navigator.show_loader(config.snapshot().loader_color);
    }
}

/// `host:port` the reachability probe connects to
fn reachability_address(host: &ServiceHost) -> String {
    if host.host().contains(':') {
        return host.host().to_string();
    }
    let port = if host.scheme() == "http" { 80 } else { 443 };
    format!("{}:{}", host.host(), port)
}

/// Install the global log subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
