//! Egress paths and the per-path request scheduler.
//!
//! An egress path is either the direct connection or one HTTP proxy. Each path owns a
//! `reqwest::Client` configured for that route, so sending through a path is just using
//! its client. Paths are built once at startup from the proxy source and never change for
//! the scheduler's lifetime.

pub mod scheduler;
pub mod source;

use std::fmt;

pub use scheduler::RequestScheduler;

/// Credentials for an authenticating proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One proxy from the proxy source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
    pub credentials: Option<ProxyCredentials>,
}

impl ProxyEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            credentials: None,
        }
    }

    pub fn with_credentials(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            credentials: Some(ProxyCredentials {
                username: username.into(),
                password: password.into(),
            }),
        }
    }

    /// Proxy URL without credentials, e.g. `http://10.0.0.1:8080`.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Builds a client that sends every request through this proxy.
    ///
    /// # Returns
    /// - `Ok(reqwest::Client)` - Client routed through the proxy
    /// - `Err(reqwest::Error)` - The proxy address is not a valid URL
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut proxy = reqwest::Proxy::all(self.url())?;
        if let Some(credentials) = &self.credentials {
            proxy = proxy.basic_auth(&credentials.username, &credentials.password);
        }

        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .proxy(proxy)
            .build()
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Route taken by an egress path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EgressKind {
    Direct,
    Proxy(ProxyEndpoint),
}

/// A network route for outbound calls, identified by its position in the pool.
///
/// Cloning is cheap; the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct EgressPath {
    index: usize,
    kind: EgressKind,
    http: reqwest::Client,
}

impl EgressPath {
    /// Creates a path from an already configured client.
    pub fn new(index: usize, kind: EgressKind, http: reqwest::Client) -> Self {
        Self { index, kind, http }
    }

    /// Direct path with a client that ignores proxy environment variables.
    ///
    /// # Returns
    /// - `Ok(EgressPath)` - Direct path at `index`
    /// - `Err(reqwest::Error)` - The TLS backend could not be initialized
    pub fn direct(index: usize) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self::new(index, EgressKind::Direct, http))
    }

    /// Path through `endpoint`.
    pub fn proxied(index: usize, endpoint: ProxyEndpoint) -> Result<Self, reqwest::Error> {
        let http = endpoint.build_client()?;

        Ok(Self::new(index, EgressKind::Proxy(endpoint), http))
    }

    /// Position of this path in its pool.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &EgressKind {
        &self.kind
    }

    /// Client to send this path's requests with.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn is_direct(&self) -> bool {
        matches!(self.kind, EgressKind::Direct)
    }
}

impl fmt::Display for EgressPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EgressKind::Direct => write!(f, "#{} direct", self.index),
            EgressKind::Proxy(endpoint) => write!(f, "#{} proxy {}", self.index, endpoint),
        }
    }
}
