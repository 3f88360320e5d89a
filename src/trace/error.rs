//! Construction-time errors for the trace ID injector.

use thiserror::Error;

/// Reasons a trace ID injector cannot be built.
///
/// None of these can occur while a request is being processed.
#[derive(Debug, Error)]
pub enum InjectorError {
    /// The identifier scheme spelling is not one of `4`, `7` or `L`.
    #[error("unsupported identifier scheme {0:?}: expected 4 (UUIDv4), 7 (UUIDv7) or L (ULID)")]
    InvalidScheme(String),

    /// An entry of the trusted network list is not a CIDR block.
    #[error("invalid trusted network {entry:?}: {reason}")]
    InvalidNetwork { entry: String, reason: String },

    /// Some other option cannot be used (header name, prefix, suffix).
    #[error("invalid trace_id configuration: {0}")]
    InvalidConfig(String),

    /// No trace_id configuration was supplied at all.
    #[error("trace_id configuration is missing")]
    MissingConfig,
}
