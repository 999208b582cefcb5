//! Network connectivity precondition checked before any remote call.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::Instant;
use url::{Host, Url};

/// How long a probe answer is reused before the host is dialed again.
pub const PROBE_TTL: Duration = Duration::from_secs(5);

#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Fixed answer. `StaticConnectivity(true)` is the default for embedded use.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl Connectivity for StaticConnectivity {
    async fn is_online(&self) -> bool {
        self.0
    }
}

/// Considers the host online when a TCP connection to `addr` opens in time.
///
/// The answer is cached for [`PROBE_TTL`], so back-to-back operations share
/// one connection attempt.
#[derive(Debug)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
    last: Mutex<Option<(Instant, bool)>>,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: Duration::from_secs(3),
            last: Mutex::new(None),
        }
    }

    /// Probe for the host of a base URL such as `https://generativelanguage.googleapis.com`.
    ///
    /// Userinfo, path and query are ignored; the port falls back to the
    /// scheme's default.
    pub fn for_base_url(base_url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(base_url)?;
        let host = match url.host() {
            Some(Host::Ipv6(ip)) => format!("[{}]", ip),
            Some(host) => host.to_string(),
            None => return Err(url::ParseError::EmptyHost),
        };
        let port = url
            .port_or_known_default()
            .ok_or(url::ParseError::InvalidPort)?;
        Ok(Self::new(format!("{}:{}", host, port)))
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    fn cached(&self) -> Option<bool> {
        let last = self.last.lock().ok()?;
        (*last)
            .filter(|(at, _)| at.elapsed() < PROBE_TTL)
            .map(|(_, online)| online)
    }

    fn remember(&self, online: bool) {
        if let Ok(mut last) = self.last.lock() {
            *last = Some((Instant::now(), online));
        }
    }

    async fn dial(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::warn!("Connectivity probe to {} failed: {}", self.addr, e);
                false
            }
            Err(_) => {
                tracing::warn!("Connectivity probe to {} timed out", self.addr);
                false
            }
        }
    }
}

#[async_trait]
impl Connectivity for TcpProbe {
    async fn is_online(&self) -> bool {
        if let Some(online) = self.cached() {
            return online;
        }
        let online = self.dial().await;
        self.remember(online);
        online
    }
}
