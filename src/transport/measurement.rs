use log::{trace, warn};

use super::{ChannelOptions, open_socket};
use crate::error::{OriginError, Result};

/// One-way push channel for measurements.
///
/// `push` returns once the message is queued; there is no delivery
/// confirmation. Messages pushed on one channel arrive in push order.
pub struct MeasurementChannel {
    context: zmq::Context,
    endpoint: String,
    options: ChannelOptions,
    socket: Option<zmq::Socket>,
    sent: u64,
}

impl MeasurementChannel {
    /// Create a channel; the socket is opened on first use
    pub fn new(context: zmq::Context, endpoint: impl Into<String>, options: ChannelOptions) -> Self {
        Self {
            context,
            endpoint: endpoint.into(),
            options,
            socket: None,
            sent: 0,
        }
    }

    /// Open the socket now instead of on first use
    pub fn connect(&mut self) -> Result<()> {
        if self.socket.is_none() {
            let socket = open_socket(&self.context, zmq::PUSH, &self.endpoint, &self.options)?;
            self.socket = Some(socket);
        }
        Ok(())
    }

    /// Hand `encoded` to the transport
    pub fn push(&mut self, encoded: &str) -> Result<()> {
        self.connect()?;
        let Some(socket) = self.socket.as_ref() else {
            return Err(OriginError::invalid("measurement socket unavailable"));
        };

        if let Err(e) = socket.send(encoded, 0) {
            warn!("Push to {} failed, resetting socket: {}", self.endpoint, e);
            self.socket = None;
            return Err(OriginError::transport(&self.endpoint, "push measurement", e));
        }

        self.sent += 1;
        trace!("Pushed measurement #{} to {}: {}", self.sent, self.endpoint, encoded);
        Ok(())
    }

    /// Collector endpoint this channel connects to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of messages handed to the transport so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Whether a socket is currently open
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Release the socket, giving queued messages up to the linger period
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            trace!("Closed measurement socket for {}", self.endpoint);
        }
    }
}
