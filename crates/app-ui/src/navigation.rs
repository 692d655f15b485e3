//! Navigation system for App Scaffold
//!
//! This module provides:
//! - The screen catalog ([`Screen`])
//! - The root navigator: an app stack plus a modal stack for root-level
//!   dialogs such as the loader and error alerts
//! - A shared handle that the request layer drives

use api_client::{Alert, AlertPresenter, NavigationHandle};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Screens
// =============================================================================

/// All screens the app can show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "params")]
pub enum Screen {
    /// Initial screen
    Test,
    /// Full screen loading overlay
    Loader {
        /// Overlay color
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Error alert dialog
    Alert {
        /// Dialog title
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Dialog message
        message: String,
        /// Color of the dismiss button
        #[serde(skip_serializing_if = "Option::is_none")]
        button_color: Option<String>,
    },
}

impl Screen {
    /// Whether this screen is presented modally over the app stack
    pub fn is_modal(&self) -> bool {
        matches!(self, Screen::Loader { .. } | Screen::Alert { .. })
    }

    /// Screen name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Test => "Test",
            Screen::Loader { .. } => "Loader",
            Screen::Alert { .. } => "Alert",
        }
    }
}

// =============================================================================
// Root Navigator
// =============================================================================

/// App stack plus modal stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootNavigator {
    /// App screens (bottom to top); the root is never removed
    app_stack: Vec<Screen>,
    /// Modals shown over the app stack (bottom to top)
    modal_stack: Vec<Screen>,
}

impl Default for RootNavigator {
    fn default() -> Self {
        Self::new(Screen::Test)
    }
}

impl RootNavigator {
    /// Create a navigator with the given root screen
    pub fn new(root: Screen) -> Self {
        Self {
            app_stack: vec![root],
            modal_stack: Vec::new(),
        }
    }

    /// Push a screen; modal screens go on the modal stack
    pub fn push(&mut self, screen: Screen) {
        tracing::debug!(screen = screen.name(), "push");
        if screen.is_modal() {
            self.modal_stack.push(screen);
        } else {
            self.app_stack.push(screen);
        }
    }

    /// Pop the top modal, else the top app screen above the root
    ///
    /// Returns the removed screen.
    pub fn pop(&mut self) -> Option<Screen> {
        let popped = match self.modal_stack.pop() {
            Some(modal) => Some(modal),
            None if self.app_stack.len() > 1 => self.app_stack.pop(),
            None => None,
        };
        if let Some(screen) = &popped {
            tracing::debug!(screen = screen.name(), "pop");
        }
        popped
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        !self.modal_stack.is_empty() || self.app_stack.len() > 1
    }

    /// Screen currently on top (modals first)
    pub fn current(&self) -> Option<&Screen> {
        self.modal_stack.last().or_else(|| self.app_stack.last())
    }

    /// App screens, bottom to top
    pub fn app_stack(&self) -> &[Screen] {
        &self.app_stack
    }

    /// Modal screens, bottom to top
    pub fn modals(&self) -> &[Screen] {
        &self.modal_stack
    }

    /// Check if any modals are presented
    pub fn has_modals(&self) -> bool {
        !self.modal_stack.is_empty()
    }
}

// =============================================================================
// Shared Navigator
// =============================================================================

/// Thread-safe navigator shared between the UI and the request layer
#[derive(Debug, Clone, Default)]
pub struct SharedNavigator {
    inner: Arc<Mutex<RootNavigator>>,
}

impl SharedNavigator {
    /// Create a navigator rooted at [`Screen::Test`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the full screen loader
    pub fn show_loader(&self, color: Option<String>) {
        self.inner.lock().push(Screen::Loader { color });
    }

    /// Push a screen
    pub fn push(&self, screen: Screen) {
        self.inner.lock().push(screen);
    }

    /// Screen currently on top
    pub fn current(&self) -> Option<Screen> {
        self.inner.lock().current().cloned()
    }

    /// Copy of the navigator state
    pub fn snapshot(&self) -> RootNavigator {
        self.inner.lock().clone()
    }
}

impl NavigationHandle for SharedNavigator {
    fn can_go_back(&self) -> bool {
        self.inner.lock().can_go_back()
    }

    fn pop(&self) {
        self.inner.lock().pop();
    }
}

impl AlertPresenter for SharedNavigator {
    fn present(&self, alert: &Alert) {
        self.inner.lock().push(Screen::Alert {
            title: alert.title.clone(),
            message: alert.message.clone(),
            button_color: alert.button_color.clone(),
        });
    }
}
