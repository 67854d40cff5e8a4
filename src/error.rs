// src/error.rs
use std::io;
use thiserror::Error;

/// Result type for origin client operations
pub type Result<T> = std::result::Result<T, OriginError>;

/// Errors raised while building or sending origin messages
#[derive(Error, Debug)]
pub enum OriginError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport error on {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: zmq::Error,
    },

    #[error("Timed out waiting to {operation} on {endpoint}")]
    Timeout {
        endpoint: String,
        operation: &'static str,
    },

    #[error("Registration rejected (status {status}): {message}")]
    Rejected { status: i64, message: String },

    #[error("Malformed reply: {0}")]
    Reply(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl OriginError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid(msg: impl Into<String>) -> Self {
        OriginError::InvalidArgument(msg.into())
    }

    /// Map a zmq failure on `endpoint` into a transport error.
    ///
    /// `EAGAIN` only surfaces when a send or receive timeout is armed, so it
    /// is reported as a timeout rather than a generic transport failure.
    pub fn transport(endpoint: &str, operation: &'static str, err: zmq::Error) -> Self {
        match err {
            zmq::Error::EAGAIN => OriginError::Timeout {
                endpoint: endpoint.to_string(),
                operation,
            },
            source => OriginError::Transport {
                endpoint: endpoint.to_string(),
                source,
            },
        }
    }

    /// Whether this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OriginError::Transport { .. } | OriginError::Timeout { .. }
        )
    }
}

impl From<config::ConfigError> for OriginError {
    fn from(err: config::ConfigError) -> Self {
        OriginError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eagain_maps_to_timeout() {
        let err = OriginError::transport("tcp://127.0.0.1:5556", "receive reply", zmq::Error::EAGAIN);
        assert!(matches!(err, OriginError::Timeout { operation: "receive reply", .. }));
        assert!(err.is_transport());
    }

    #[test]
    fn other_errors_keep_their_source() {
        let err = OriginError::transport("tcp://127.0.0.1:5557", "send", zmq::Error::ECONNREFUSED);
        match err {
            OriginError::Transport { endpoint, source } => {
                assert_eq!(endpoint, "tcp://127.0.0.1:5557");
                assert_eq!(source, zmq::Error::ECONNREFUSED);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_argument_is_not_transport() {
        assert!(!OriginError::invalid("empty stream name").is_transport());
    }
}
