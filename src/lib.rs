//! A client library for publishing telemetry to an origin collector

pub mod config;
pub mod error;
pub mod sample;
pub mod schema;
pub mod timestamp;
pub mod transport;
pub mod util;
pub mod wire;

pub use util::logging::init as init_logging;

/// Re-export of commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ClientConfig, ConfigBuilder, load_config};
    pub use crate::error::{OriginError, Result};
    pub use crate::sample::{Sample, Value};
    pub use crate::schema::{FieldType, Schema};
    pub use crate::timestamp::{TimestampType, current_time};
    pub use crate::transport::{
        MeasurementChannel, OriginClient, RegistrationChannel, StreamConnection,
    };
}

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
