//! Configuration types shared by the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds for the short-lived retrieval result cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a cached series stays valid.
    pub ttl: Duration,
    /// Maximum number of cached series.
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 64,
        }
    }
}

/// Optional HTTP/HTTPS proxy routing for outbound provider calls.
///
/// Absence of a proxy never errors; connectors degrade to a direct
/// connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy URL for plain-HTTP requests.
    pub http: Option<String>,
    /// Proxy URL for HTTPS requests.
    pub https: Option<String>,
}

impl ProxyConfig {
    /// Whether no proxy is configured at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.http.is_none() && self.https.is_none()
    }
}

/// Global configuration for the `Candela` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandelaConfig {
    /// Whether a primary failure may be retried against the fallback source.
    pub use_fallback: bool,
    /// Timeout applied to each individual source call.
    pub provider_timeout: Duration,
    /// Result cache bounds.
    pub cache: CacheConfig,
}

impl Default for CandelaConfig {
    fn default() -> Self {
        Self {
            use_fallback: true,
            provider_timeout: Duration::from_secs(5),
            cache: CacheConfig::default(),
        }
    }
}
