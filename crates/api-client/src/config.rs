//! Dispatcher configuration
//!
//! Presentation switches the dispatcher consults on every call: whether a
//! loader screen is up and should be dismissed, whether failures raise an
//! alert, and the colors the UI layer uses for both.

use crate::hooks::NavigationHandle;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Presentation settings for the dispatcher
#[derive(Clone)]
pub struct DispatcherConfig {
    /// Navigation stack the loader is pushed onto
    pub navigation: Option<Arc<dyn NavigationHandle>>,
    /// A loader screen is shown while requests run
    pub show_loader: bool,
    /// Color of the full screen loader
    pub loader_color: Option<String>,
    /// Color of the button in the error alert
    pub alert_button_color: Option<String>,
    /// Failures raise an alert
    pub show_alert_dialog: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            navigation: None,
            show_loader: false,
            loader_color: None,
            alert_button_color: None,
            show_alert_dialog: true,
        }
    }
}

impl fmt::Debug for DispatcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherConfig")
            .field("navigation", &self.navigation.is_some())
            .field("show_loader", &self.show_loader)
            .field("loader_color", &self.loader_color)
            .field("alert_button_color", &self.alert_button_color)
            .field("show_alert_dialog", &self.show_alert_dialog)
            .finish()
    }
}

impl DispatcherConfig {
    /// Pop the loader screen if one is up
    ///
    /// Returns whether a screen was popped.
    pub fn dismiss_loader(&self) -> bool {
        match &self.navigation {
            Some(navigation) if self.show_loader && navigation.can_go_back() => {
                navigation.pop();
                true
            }
            _ => false,
        }
    }
}

/// Shared, lock-guarded [`DispatcherConfig`]
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: RwLock<DispatcherConfig>,
}

impl ConfigStore {
    /// Create a store with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given settings
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    /// Install the navigation handle at app start
    ///
    /// Also resets the loader off and alerts on.
    pub fn set_navigation(&self, navigation: Arc<dyn NavigationHandle>) {
        let mut config = self.inner.write();
        config.navigation = Some(navigation);
        config.show_loader = false;
        config.show_alert_dialog = true;
    }

    /// Turn the loader on or off for subsequent calls
    pub fn set_loader(&self, show_loader: bool) {
        self.inner.write().show_loader = show_loader;
    }

    /// Set the loader color
    pub fn set_loader_color(&self, color: Option<String>) {
        self.inner.write().loader_color = color;
    }

    /// Set the alert button color
    pub fn set_alert_button_color(&self, color: Option<String>) {
        self.inner.write().alert_button_color = color;
    }

    /// Turn failure alerts on or off
    pub fn set_show_alert_dialog(&self, show_alert_dialog: bool) {
        self.inner.write().show_alert_dialog = show_alert_dialog;
    }

    /// Copy of the current settings
    pub fn snapshot(&self) -> DispatcherConfig {
        self.inner.read().clone()
    }
}
