//! Networking utilities for App Scaffold
//!
//! This crate provides the HTTP transport the request layer sits on: a
//! `reqwest`-backed client, a retry wrapper configured once at construction,
//! and network reachability probing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod reachability;
pub mod retry;
pub mod transport;

pub use client::{HttpClient, HttpClientConfig};
pub use reachability::{ReachabilityProbe, StaticReachability, TcpReachabilityProbe};
pub use retry::{RetryPolicy, RetryingTransport};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError, TransportErrorKind,
};
