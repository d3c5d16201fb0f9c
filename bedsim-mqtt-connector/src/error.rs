//! Connector error types
//!
//! Two failure classes matter to the caller: connection establishment
//! (fatal, since publishing is meaningless without a broker) and individual
//! publish attempts (non-fatal, retried implicitly on the next tick). Credential file
//! problems surface before the connect and are treated like connection
//! failures.

use thiserror::Error;

/// Result type for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Broker connection could not be established or was refused
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    /// A single publish attempt failed; the caller may retry later
    #[error("publish failed on '{topic}': {reason}")]
    PublishFailed { topic: String, reason: String },

    /// TLS credential files could not be read
    #[error("certificate error: {0}")]
    Certificate(#[from] std::io::Error),
}
