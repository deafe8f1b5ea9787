use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the candela workspace.
///
/// The orchestrator decides retry-vs-fail based on the error *kind*, never on
/// message text, so each upstream failure mode gets its own variant.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CandelaError {
    /// The input does not resolve to any instrument a source knows about.
    /// Bad input, not retried, terminal for the source that raised it.
    #[error("symbol not found: {what}")]
    SymbolNotFound {
        /// The unresolved input or ticker.
        what: String,
    },

    /// Network-level failure (connect, TLS, 5xx, transfer). Triggers
    /// fallback to the next source.
    #[error("{source_name}: transient fetch failure: {msg}")]
    Transient {
        /// Source that failed.
        source_name: String,
        /// Human-readable transport error.
        msg: String,
    },

    /// A valid request that yielded an empty result set (delisted or
    /// suspended instrument, window with no trades). Triggers fallback, but
    /// is distinct from [`CandelaError::Transient`] for diagnostics.
    #[error("{source_name}: no data returned for a valid request")]
    NoData {
        /// Source that returned the empty result.
        source_name: String,
    },

    /// A source was asked to serve a contract shape outside its declared
    /// support. The source fails loudly rather than silently proceeding.
    #[error("unsupported contract: {detail}")]
    UnsupportedContract {
        /// What made the contract shape unsupported.
        detail: String,
    },

    /// The upstream response did not match the documented wire shape.
    /// Fatal and surfaced verbatim: it usually means the upstream API
    /// changed and the operator must notice quickly.
    #[error("{source_name}: protocol error: {msg}")]
    Protocol {
        /// Source whose payload failed to decode.
        source_name: String,
        /// Decoding failure description.
        msg: String,
    },

    /// An individual source call exceeded the configured timeout.
    /// Policy-equivalent to [`CandelaError::Transient`].
    #[error("source timed out: {source_name}")]
    Timeout {
        /// Source that timed out.
        source_name: String,
    },

    /// Invalid caller-supplied argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Every attempted source failed; contains the individual failures in
    /// attempt order so the caller can diagnose the root cause.
    #[error("all sources failed: {0:?}")]
    AllSourcesFailed(Vec<CandelaError>),
}

impl CandelaError {
    /// Helper: build a `SymbolNotFound` error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::SymbolNotFound { what: what.into() }
    }

    /// Helper: build a `Transient` error tagged with the source name.
    pub fn transient(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transient {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NoData` error tagged with the source name.
    pub fn no_data(source_name: impl Into<String>) -> Self {
        Self::NoData {
            source_name: source_name.into(),
        }
    }

    /// Helper: build an `UnsupportedContract` error.
    pub fn unsupported_contract(detail: impl Into<String>) -> Self {
        Self::UnsupportedContract {
            detail: detail.into(),
        }
    }

    /// Helper: build a `Protocol` error tagged with the source name.
    pub fn protocol(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Protocol {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Timeout` error for the named source.
    pub fn timeout(source_name: impl Into<String>) -> Self {
        Self::Timeout {
            source_name: source_name.into(),
        }
    }

    /// Whether the orchestrator may try the next source after this failure.
    ///
    /// Transient transport failures, timeouts, empty results, and contract
    /// shape mismatches are all worth a second opinion; bad symbols and
    /// malformed payloads are not.
    #[must_use]
    pub const fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            Self::Transient { .. }
                | Self::NoData { .. }
                | Self::Timeout { .. }
                | Self::UnsupportedContract { .. }
        )
    }

    /// Flatten nested `AllSourcesFailed` aggregates into a plain vector,
    /// preserving other variants as-is.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllSourcesFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
