//! Outbound channels to an origin collector.
//!
//! Registrations travel over a request/reply socket and block until the
//! collector answers. Measurements travel over a push socket and return as
//! soon as the message is queued. Sockets are opened lazily and dropped on
//! failure, so the next call reconnects from a clean state.

mod client;
mod measurement;
mod registration;

pub use client::{OriginClient, StreamConnection};
pub use measurement::MeasurementChannel;
pub use registration::RegistrationChannel;

use log::debug;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{OriginError, Result};

/// Socket options shared by both channels
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOptions {
    /// Deadline for receiving a reply; `None` blocks forever
    pub receive_timeout: Option<Duration>,
    /// Deadline for queueing a message; `None` blocks forever
    pub send_timeout: Option<Duration>,
    /// How long queued messages may linger after the socket closes
    pub linger: Duration,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for ChannelOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            receive_timeout: config.request_timeout(),
            send_timeout: config.send_timeout(),
            linger: config.linger(),
        }
    }
}

/// zmq takes millisecond options as `i32`, with -1 meaning infinite
fn millis(timeout: Option<Duration>) -> i32 {
    match timeout {
        Some(d) => i32::try_from(d.as_millis()).unwrap_or(i32::MAX),
        None => -1,
    }
}

/// Create a socket of `kind`, apply `options` and connect it to `endpoint`
fn open_socket(
    context: &zmq::Context,
    kind: zmq::SocketType,
    endpoint: &str,
    options: &ChannelOptions,
) -> Result<zmq::Socket> {
    let err = |e| OriginError::transport(endpoint, "connect", e);

    let socket = context.socket(kind).map_err(err)?;
    socket.set_linger(millis(Some(options.linger))).map_err(err)?;
    socket.set_rcvtimeo(millis(options.receive_timeout)).map_err(err)?;
    socket.set_sndtimeo(millis(options.send_timeout)).map_err(err)?;
    if kind == zmq::REQ {
        // Only queue requests on completed connections, so an absent
        // collector shows up as a send timeout instead of a silent queue.
        socket.set_immediate(true).map_err(err)?;
    }
    socket.connect(endpoint).map_err(err)?;

    debug!("Connected {:?} socket to {}", kind, endpoint);
    Ok(socket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_maps_none_to_infinite() {
        assert_eq!(millis(None), -1);
        assert_eq!(millis(Some(Duration::from_millis(250))), 250);
        assert_eq!(millis(Some(Duration::from_secs(u64::MAX / 1000))), i32::MAX);
    }

    #[test]
    fn options_follow_config() {
        let config = ClientConfig {
            request_timeout_ms: None,
            send_timeout_ms: Some(10),
            linger_ms: 0,
            ..Default::default()
        };
        let options = ChannelOptions::from(&config);
        assert_eq!(options.receive_timeout, None);
        assert_eq!(options.send_timeout, Some(Duration::from_millis(10)));
        assert_eq!(options.linger, Duration::ZERO);
    }

    #[test]
    fn invalid_endpoint_is_a_transport_error() {
        let context = zmq::Context::new();
        let err = open_socket(&context, zmq::PUSH, "not-an-endpoint", &ChannelOptions::default())
            .err().unwrap();
        assert!(matches!(err, OriginError::Transport { .. }));
    }
}
