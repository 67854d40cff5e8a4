use log::{trace, warn};

use super::{ChannelOptions, open_socket};
use crate::error::{OriginError, Result};
use crate::wire::RegistrationReply;

/// Request/reply channel for stream registrations.
///
/// At most one request is in flight: every operation takes `&mut self` and
/// waits for its reply before returning.
pub struct RegistrationChannel {
    context: zmq::Context,
    endpoint: String,
    options: ChannelOptions,
    socket: Option<zmq::Socket>,
}

impl RegistrationChannel {
    /// Create a channel; the socket is opened on first use
    pub fn new(context: zmq::Context, endpoint: impl Into<String>, options: ChannelOptions) -> Self {
        Self {
            context,
            endpoint: endpoint.into(),
            options,
            socket: None,
        }
    }

    /// Open the socket now instead of on first use
    pub fn connect(&mut self) -> Result<()> {
        self.socket()?;
        Ok(())
    }

    /// Send `encoded` and wait for the acknowledgment, discarding its payload
    pub fn register(&mut self, encoded: &str) -> Result<()> {
        self.request(encoded).map(|_| ())
    }

    /// Like `register`, but decode the reply and fail if the collector
    /// refused the registration
    pub fn register_checked(&mut self, encoded: &str) -> Result<()> {
        let reply = self.request(encoded)?;
        RegistrationReply::parse(&reply)?.into_result()
    }

    /// Send one request and return the raw reply
    pub fn request(&mut self, encoded: &str) -> Result<Vec<u8>> {
        let result = self.exchange(encoded);
        if let Err(e) = &result {
            // A REQ socket that missed its reply can never send again.
            warn!("Registration on {} failed, resetting socket: {}", self.endpoint, e);
            self.socket = None;
        }
        result
    }

    fn exchange(&mut self, encoded: &str) -> Result<Vec<u8>> {
        let endpoint = self.endpoint.clone();
        let socket = self.socket()?;

        trace!("Sending registration to {}: {}", endpoint, encoded);
        socket
            .send(encoded, 0)
            .map_err(|e| OriginError::transport(&endpoint, "send registration", e))?;

        let reply = socket
            .recv_bytes(0)
            .map_err(|e| OriginError::transport(&endpoint, "receive reply", e))?;
        trace!("Registration acknowledged by {} ({} bytes)", endpoint, reply.len());

        Ok(reply)
    }

    fn socket(&mut self) -> Result<&zmq::Socket> {
        if self.socket.is_none() {
            let socket = open_socket(&self.context, zmq::REQ, &self.endpoint, &self.options)?;
            self.socket = Some(socket);
        }
        self.socket
            .as_ref()
            .ok_or_else(|| OriginError::invalid("registration socket unavailable"))
    }

    /// Collector endpoint this channel connects to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a socket is currently open
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Release the socket; a later call reconnects
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            trace!("Closed registration socket for {}", self.endpoint);
        }
    }
}
