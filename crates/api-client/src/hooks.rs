//! Collaborator interfaces
//!
//! The dispatcher does not own navigation, alert presentation or durable
//! storage. It talks to them through these traits.

use crate::credentials::Credentials;
use async_trait::async_trait;

/// Navigation stack the loader screen is pushed onto
#[cfg_attr(test, mockall::automock)]
pub trait NavigationHandle: Send + Sync {
    /// Whether there is anything above the root screen
    fn can_go_back(&self) -> bool;

    /// Remove the top screen
    fn pop(&self);
}

/// An error alert requested by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Optional title (the transport error code for unanswered requests)
    pub title: Option<String>,
    /// Message shown to the user
    pub message: String,
    /// Color of the dismiss button
    pub button_color: Option<String>,
}

impl Alert {
    /// Create an alert
    pub fn new(title: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            title: title.map(str::to_string),
            message: message.into(),
            button_color: None,
        }
    }

    /// Set the dismiss button color
    pub fn with_button_color(mut self, color: Option<String>) -> Self {
        self.button_color = color;
        self
    }
}

/// Shows error alerts to the user
#[cfg_attr(test, mockall::automock)]
pub trait AlertPresenter: Send + Sync {
    /// Present the alert
    fn present(&self, alert: &Alert);
}

/// Durable storage for the token pair
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenPersistence: Send + Sync {
    /// Write the tokens out
    async fn persist(&self, credentials: &Credentials) -> crate::Result<()>;
}
