//! Endpoint registry
//!
//! Every API path the app calls is listed in [`Endpoint`] before it is used.
//! [`ServiceHost`] turns the selected host into the base URL the dispatcher
//! resolves endpoints against.

use serde::{Deserialize, Serialize};

/// Test backend host
pub const TEST_HOST: &str = "TestDBURL";

/// Production backend host
pub const PROD_HOST: &str = "ProdDBURL";

/// Path prefix shared by every API endpoint
pub const API_PREFIX: &str = "/api/";

/// Which backend the app talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostEnvironment {
    /// Test backend
    #[default]
    Test,
    /// Production backend
    Production,
}

impl HostEnvironment {
    /// Host name for this environment
    pub fn host(&self) -> &'static str {
        match self {
            HostEnvironment::Test => TEST_HOST,
            HostEnvironment::Production => PROD_HOST,
        }
    }
}

/// Symbolic API operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Create an account
    Signup,
    /// Authenticate
    Login,
}

impl Endpoint {
    /// Path fragment relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Signup => "signup",
            Endpoint::Login => "login",
        }
    }
}

/// Host, scheme and prefix the API is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHost {
    scheme: String,
    host: String,
    prefix: String,
}

impl Default for ServiceHost {
    fn default() -> Self {
        Self::for_environment(HostEnvironment::default())
    }
}

impl ServiceHost {
    /// Serve from an arbitrary host (`name` or `name:port`)
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: "https".to_string(),
            host: host.into(),
            prefix: API_PREFIX.to_string(),
        }
    }

    /// Serve from the host of the given environment
    pub fn for_environment(environment: HostEnvironment) -> Self {
        Self::new(environment.host())
    }

    /// Set the URL scheme
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Set the path prefix; leading and trailing slashes are added if missing
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        let trimmed = prefix.as_ref().trim_matches('/');
        self.prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        self
    }

    /// Host name as sent in the `Host` header
    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL scheme
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Path prefix, always slash-delimited
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `scheme://host/prefix/`
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.prefix)
    }

    /// Absolute URL of an endpoint path with an optional suffix
    pub fn url_for(&self, endpoint: &str, append_in_url: Option<&str>) -> String {
        format!(
            "{}{}{}",
            self.base_url(),
            endpoint,
            append_in_url.unwrap_or_default()
        )
    }
}
