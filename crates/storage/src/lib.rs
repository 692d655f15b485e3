//! Storage layer for App Scaffold
//!
//! This crate provides versioned, checksummed JSON file persistence used for
//! state that must survive restarts (currently the session tokens).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod persistence;

pub use persistence::{PersistedState, PersistenceConfig, PersistenceError};
