//! User interface for App Scaffold
//!
//! This crate provides the navigation model the request layer drives: the
//! loader overlay and error alerts are pushed as root-level modals over the
//! app stack.
//!
//! # Example
//!
//! ```rust
//! use app_ui::{Screen, SharedNavigator};
//! use api_client::NavigationHandle;
//!
//! let navigator = SharedNavigator::new();
//! navigator.show_loader(None);
//! assert!(navigator.can_go_back());
//!
//! navigator.pop();
//! assert_eq!(navigator.current(), Some(Screen::Test));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod navigation;

pub use navigation::{RootNavigator, Screen, SharedNavigator};
