use crate::error::{OriginError, Result};
use crate::wire;

/// A single measured value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Float(f32),
    Integer(i64),
    Unsigned(u64),
    Text(String),
}

impl Value {
    /// Encode this value as a JSON token.
    ///
    /// Floating point values use the shortest representation that
    /// round-trips at their own width, so the text never depends on locale
    /// or process-wide formatting state.
    fn encode(&self) -> Result<String> {
        match self {
            Value::Double(v) if !v.is_finite() => Err(non_finite(v)),
            Value::Float(v) if !v.is_finite() => Err(non_finite(v)),
            Value::Double(v) => serde_json::to_string(v)
                .map_err(|e| OriginError::invalid(format!("cannot encode {}: {}", v, e))),
            Value::Float(v) => serde_json::to_string(v)
                .map_err(|e| OriginError::invalid(format!("cannot encode {}: {}", v, e))),
            Value::Integer(v) => Ok(v.to_string()),
            Value::Unsigned(v) => Ok(v.to_string()),
            Value::Text(s) => Ok(wire::quote(s)),
        }
    }
}

fn non_finite(v: impl std::fmt::Display) -> OriginError {
    OriginError::invalid(format!("non-finite value {} cannot be encoded", v))
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

macro_rules! integer_value {
    ($variant:ident, $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(<$wide>::from(v))
                }
            }
        )+
    };
}

integer_value!(Integer, i64: i8, i16, i32, i64);
integer_value!(Unsigned, u64: u8, u16, u32, u64);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A timestamped measurement for one stream.
///
/// Values are encoded when appended, so the rendered message is fixed at
/// insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    stream: String,
    timestamp: u64,
    // (name, encoded JSON token)
    values: Vec<(String, String)>,
}

impl Sample {
    /// Start an empty measurement for `stream` at `timestamp`
    pub fn new(stream: impl Into<String>, timestamp: u64) -> Result<Self> {
        let stream = stream.into();
        if stream.is_empty() {
            return Err(OriginError::invalid("stream name must not be empty"));
        }

        Ok(Self {
            stream,
            timestamp,
            values: Vec::new(),
        })
    }

    /// Append a named value
    pub fn append(mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(OriginError::invalid(format!(
                "empty value name in stream '{}'",
                self.stream
            )));
        }
        if self.values.iter().any(|(n, _)| *n == name) {
            return Err(OriginError::invalid(format!(
                "duplicate value '{}' in stream '{}'",
                name, self.stream
            )));
        }

        let token = value.into().encode()?;
        self.values.push((name, token));
        Ok(self)
    }

    /// Render the measurement message: `["<stream>",<timestamp>,{"<name>":<value>,...}]`
    pub fn serialize(&self) -> String {
        let body = wire::object(self.values.iter().map(|(n, v)| (n.as_str(), v.as_str())));
        format!("[{},{},{}]", wire::quote(&self.stream), self.timestamp, body)
    }

    /// Stream this sample belongs to
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Timestamp the sample was created with
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Names of the appended values, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    /// Number of appended values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values have been appended
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
