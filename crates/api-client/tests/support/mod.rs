//! Shared fixtures for api-client integration tests

#![allow(dead_code)]

use api_client::{
    Alert, AlertPresenter, NavigationHandle, RequestContext, RequestDispatcher, ServiceHost,
};
use networking::{HttpClient, HttpClientConfig, RetryPolicy, RetryingTransport};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// Collects every alert the dispatcher raises
#[derive(Default)]
pub struct RecordingAlerts {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }
}

impl AlertPresenter for RecordingAlerts {
    fn present(&self, alert: &Alert) {
        self.alerts.lock().push(alert.clone());
    }
}

/// Navigation stack that only counts pops
pub struct CountingNavigation {
    can_go_back: AtomicBool,
    pops: AtomicUsize,
}

impl CountingNavigation {
    pub fn new(can_go_back: bool) -> Self {
        Self {
            can_go_back: AtomicBool::new(can_go_back),
            pops: AtomicUsize::new(0),
        }
    }

    pub fn pops(&self) -> usize {
        self.pops.load(Ordering::SeqCst)
    }
}

impl NavigationHandle for CountingNavigation {
    fn can_go_back(&self) -> bool {
        self.can_go_back.load(Ordering::SeqCst)
    }

    fn pop(&self) {
        self.pops.fetch_add(1, Ordering::SeqCst);
    }
}

/// API host pointing at the mock server
pub fn host_for(server: &MockServer) -> ServiceHost {
    ServiceHost::new(server.address().to_string()).with_scheme("http")
}

/// Real HTTP stack with a short retry delay
pub fn transport(policy: RetryPolicy) -> Arc<RetryingTransport<HttpClient>> {
    let client = HttpClient::new(HttpClientConfig::default().with_timeout(Duration::from_secs(10)))
        .expect("client builds");
    Arc::new(RetryingTransport::new(client, policy))
}

pub struct Harness {
    pub dispatcher: RequestDispatcher,
    pub alerts: Arc<RecordingAlerts>,
    pub navigation: Arc<CountingNavigation>,
}

/// Dispatcher against `server` with the loader on and alerts recorded
pub fn harness(server: &MockServer, policy: RetryPolicy) -> Harness {
    let alerts = Arc::new(RecordingAlerts::default());
    let navigation = Arc::new(CountingNavigation::new(true));

    let context = Arc::new(RequestContext::new());
    context.config().set_navigation(navigation.clone());
    context.config().set_loader(true);

    let dispatcher = RequestDispatcher::builder(transport(policy))
        .host(host_for(server))
        .context(context)
        .alerts(alerts.clone())
        .build();

    Harness {
        dispatcher,
        alerts,
        navigation,
    }
}

/// Retries with a delay short enough for tests
pub fn fast_retries() -> RetryPolicy {
    RetryPolicy::default().with_delay_unit(Duration::from_millis(5))
}
