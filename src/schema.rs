use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OriginError, Result};
use crate::wire;

/// Type tags understood by the origin collector.
///
/// `Schema::append` accepts any tag string; this enum only saves callers
/// from spelling the common ones by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Int,
    Uint,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    String,
}

impl FieldType {
    /// The wire tag for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Int => "int",
            FieldType::Uint => "uint",
            FieldType::Int8 => "int8",
            FieldType::Uint8 => "uint8",
            FieldType::Int16 => "int16",
            FieldType::Uint16 => "uint16",
            FieldType::Int32 => "int32",
            FieldType::Uint32 => "uint32",
            FieldType::Int64 => "int64",
            FieldType::Uint64 => "uint64",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field descriptor in a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub type_tag: String,
}

/// Registration record for a stream.
///
/// Built by chaining `append` calls; `serialize` can be called at any point
/// and renders the fields registered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    stream: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Start an empty registration for `stream`
    pub fn new(stream: impl Into<String>) -> Result<Self> {
        let stream = stream.into();
        if stream.is_empty() {
            return Err(OriginError::invalid("stream name must not be empty"));
        }

        Ok(Self {
            stream,
            fields: Vec::new(),
        })
    }

    /// Append a field with an arbitrary type tag
    pub fn append(mut self, name: impl Into<String>, type_tag: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(OriginError::invalid(format!(
                "empty field name in stream '{}'",
                self.stream
            )));
        }
        if self.fields.iter().any(|f| f.name == name) {
            return Err(OriginError::invalid(format!(
                "duplicate field '{}' in stream '{}'",
                name, self.stream
            )));
        }

        self.fields.push(Field {
            name,
            type_tag: type_tag.into(),
        });
        Ok(self)
    }

    /// Append a field with one of the collector's known types
    pub fn append_typed(self, name: impl Into<String>, field_type: FieldType) -> Result<Self> {
        self.append(name, field_type.as_str())
    }

    /// Render the registration message: `["<stream>",{"<name>":"<type>",...}]`
    pub fn serialize(&self) -> String {
        let tags: Vec<String> = self.fields.iter().map(|f| wire::quote(&f.type_tag)).collect();
        let body = wire::object(
            self.fields
                .iter()
                .zip(tags.iter())
                .map(|(f, tag)| (f.name.as_str(), tag.as_str())),
        );
        format!("[{},{}]", wire::quote(&self.stream), body)
    }

    /// Stream this schema registers
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Registered fields, in insertion order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields have been registered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn registers_fields_in_order() {
        let reg = Schema::new("cpptoy")
            .unwrap()
            .append("cpptoy1", "float")
            .unwrap()
            .append("cpptoy2", "string")
            .unwrap()
            .serialize();

        assert_eq!(reg, r#"["cpptoy",{"cpptoy1":"float","cpptoy2":"string"}]"#);
    }

    #[test]
    fn empty_schema_serializes_empty_object() {
        let schema = Schema::new("toy").unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.serialize(), r#"["toy",{}]"#);
    }

    #[test]
    fn serialize_is_idempotent_snapshot() {
        let schema = Schema::new("toy").unwrap().append("a", "int").unwrap();
        let first = schema.serialize();
        assert_eq!(first, schema.serialize());

        let schema = schema.append("b", "double").unwrap();
        assert_ne!(first, schema.serialize());
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn any_type_tag_is_accepted() {
        let reg = Schema::new("toy")
            .unwrap()
            .append("x", "quaternion")
            .unwrap()
            .serialize();
        assert_eq!(reg, r#"["toy",{"x":"quaternion"}]"#);
    }

    #[test]
    fn typed_fields_use_collector_tags() {
        let reg = Schema::new("toy")
            .unwrap()
            .append_typed("a", FieldType::Uint64)
            .unwrap()
            .append_typed("b", FieldType::String)
            .unwrap()
            .serialize();
        assert_eq!(reg, r#"["toy",{"a":"uint64","b":"string"}]"#);
    }

    #[test]
    fn rejects_empty_stream() {
        assert!(matches!(Schema::new(""), Err(OriginError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_empty_and_duplicate_names() {
        let schema = Schema::new("toy").unwrap().append("a", "int").unwrap();
        assert!(matches!(
            schema.clone().append("a", "float"),
            Err(OriginError::InvalidArgument(_))
        ));
        assert!(matches!(
            schema.append("", "float"),
            Err(OriginError::InvalidArgument(_))
        ));
    }

    #[test]
    fn output_parses_as_json() {
        let schema = Schema::new("lab \"east\"")
            .unwrap()
            .append("t1", "float")
            .unwrap()
            .append("note\\x", "string")
            .unwrap()
            .append("b", "int")
            .unwrap();

        let parsed: Value = serde_json::from_str(&schema.serialize()).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], json!("lab \"east\""));

        let fields = items[1].as_object().unwrap();
        assert_eq!(fields.len(), 3);
        for field in schema.fields() {
            assert_eq!(fields[&field.name], json!(field.type_tag));
        }
    }

    #[test]
    fn field_type_display_matches_tag() {
        assert_eq!(FieldType::Double.to_string(), "double");
        assert_eq!(FieldType::Int8.to_string(), "int8");
    }
}
