use log::{debug, info};

use super::{ChannelOptions, MeasurementChannel, RegistrationChannel};
use crate::config::ClientConfig;
use crate::error::{OriginError, Result};
use crate::sample::Sample;
use crate::schema::Schema;
use crate::timestamp::{TimestampType, current_time};

/// Client for one origin collector, owning a registration channel and a
/// measurement channel
pub struct OriginClient {
    context: zmq::Context,
    options: ChannelOptions,
    timestamp_type: TimestampType,
    registration: RegistrationChannel,
    measurement: MeasurementChannel,
}

impl OriginClient {
    /// Build a client from configuration. No connection is made until the
    /// first call on either channel.
    pub fn new(config: &ClientConfig) -> Self {
        let context = zmq::Context::new();
        let options = ChannelOptions::from(config);

        let registration =
            RegistrationChannel::new(context.clone(), config.register_endpoint(), options.clone());
        let measurement =
            MeasurementChannel::new(context.clone(), config.measure_endpoint(), options.clone());

        Self {
            context,
            options,
            timestamp_type: config.timestamp_type,
            registration,
            measurement,
        }
    }

    /// Build a client and open both channels immediately
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let mut client = Self::new(config);
        client.registration.connect()?;
        client.measurement.connect()?;
        info!(
            "Origin client connected (register: {}, measure: {})",
            client.registration.endpoint(),
            client.measurement.endpoint()
        );
        Ok(client)
    }

    /// Register `schema`, ignoring the reply content
    pub fn register(&mut self, schema: &Schema) -> Result<()> {
        debug!("Registering stream '{}' ({} fields)", schema.stream(), schema.len());
        self.registration.register(&schema.serialize())
    }

    /// Register `schema` and fail if the collector refuses it
    pub fn register_checked(&mut self, schema: &Schema) -> Result<()> {
        debug!("Registering stream '{}' ({} fields)", schema.stream(), schema.len());
        self.registration.register_checked(&schema.serialize())
    }

    /// Push one measurement
    pub fn push(&mut self, sample: &Sample) -> Result<()> {
        self.measurement.push(&sample.serialize())
    }

    /// Register `schema` with the collector and hand its samples a push
    /// channel.
    ///
    /// The stream takes over the client's measurement socket, open or not,
    /// and the client keeps a fresh unopened channel to the same endpoint.
    /// At most one socket per endpoint stays open until `push` is called on
    /// the client again.
    pub fn register_stream(&mut self, schema: Schema) -> Result<StreamConnection> {
        self.register_checked(&schema)?;

        let fresh = MeasurementChannel::new(
            self.context.clone(),
            self.measurement.endpoint(),
            self.options.clone(),
        );
        let mut channel = std::mem::replace(&mut self.measurement, fresh);
        channel.connect()?;
        info!("Registered stream '{}'", schema.stream());

        Ok(StreamConnection {
            schema,
            timestamp_type: self.timestamp_type,
            channel,
        })
    }

    /// The request/reply channel used for registrations
    pub fn registration(&mut self) -> &mut RegistrationChannel {
        &mut self.registration
    }

    /// The push channel used by `push`
    pub fn measurement(&mut self) -> &mut MeasurementChannel {
        &mut self.measurement
    }

    /// Split into independent channels that can live on different threads
    pub fn into_channels(self) -> (RegistrationChannel, MeasurementChannel) {
        (self.registration, self.measurement)
    }

    /// Release both sockets
    pub fn close(&mut self) {
        self.registration.close();
        self.measurement.close();
    }
}

/// Push handle bound to one registered stream
pub struct StreamConnection {
    schema: Schema,
    timestamp_type: TimestampType,
    channel: MeasurementChannel,
}

impl StreamConnection {
    /// Name of the registered stream
    pub fn stream(&self) -> &str {
        self.schema.stream()
    }

    /// The schema this stream was registered with
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Start a sample for this stream
    pub fn sample(&self, timestamp: u64) -> Result<Sample> {
        Sample::new(self.schema.stream(), timestamp)
    }

    /// Start a sample stamped with the current time
    pub fn sample_now(&self) -> Result<Sample> {
        self.sample(current_time(self.timestamp_type))
    }

    /// Push a sample; it must belong to this stream
    pub fn send(&mut self, sample: &Sample) -> Result<()> {
        if sample.stream() != self.schema.stream() {
            return Err(OriginError::invalid(format!(
                "sample for stream '{}' sent on stream '{}'",
                sample.stream(),
                self.schema.stream()
            )));
        }
        self.channel.push(&sample.serialize())
    }

    /// Number of samples pushed on this stream
    pub fn sent(&self) -> u64 {
        self.channel.sent()
    }

    /// Release the stream's push socket
    pub fn close(mut self) {
        debug!("Closing stream '{}'", self.schema.stream());
        self.channel.close();
    }
}
