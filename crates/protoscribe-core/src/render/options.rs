//! File option statements.
//!
//! Options are read reflectively: the static [`FileOptions`] struct is
//! transcoded into a [`DynamicMessage`] so every set field comes with its
//! descriptor, which carries the option name and declared kind.

use super::types::UnsupportedKind;
use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, ReflectMessage, Value};
use prost_types::FileOptions;
use std::fmt;

/// A single `option <name> = <value>;` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionStatement {
    /// Option name as declared in `descriptor.proto`
    pub name: String,
    /// Literal value text
    pub value: String,
}

impl fmt::Display for OptionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option {} = {};", self.name, self.value)
    }
}

/// Returns the options as a dynamic message whose fields are the set options.
///
/// Fields iterate in ascending field number.
pub(crate) fn option_message(options: &FileOptions) -> DynamicMessage {
    options.transcode_to_dynamic()
}

/// Formats an option value as a literal.
///
/// String values are quoted without escaping. Enum values use the value
/// name when the number is known.
pub fn format_option_value(field: &FieldDescriptor, value: &Value) -> Result<String, UnsupportedKind> {
    match (field.kind(), value) {
        (Kind::String, Value::String(s)) => Ok(format!("\"{s}\"")),
        (Kind::Enum(descriptor), Value::EnumNumber(number)) => Ok(descriptor
            .get_value(*number)
            .map(|v| v.name().to_string())
            .unwrap_or_else(|| number.to_string())),
        (_, Value::Bool(v)) => Ok(v.to_string()),
        (_, Value::I32(v)) => Ok(v.to_string()),
        (_, Value::I64(v)) => Ok(v.to_string()),
        (_, Value::U32(v)) => Ok(v.to_string()),
        (_, Value::U64(v)) => Ok(v.to_string()),
        (_, Value::F32(v)) => Ok(v.to_string()),
        (_, Value::F64(v)) => Ok(v.to_string()),
        (_, Value::List(_)) => Err(UnsupportedKind::Scalar("repeated")),
        (_, Value::Map(_)) => Err(UnsupportedKind::Scalar("map")),
        (_, Value::Message(_)) => Err(UnsupportedKind::Scalar("message")),
        (_, Value::Bytes(_)) => Err(UnsupportedKind::Scalar("bytes")),
        (_, Value::String(_) | Value::EnumNumber(_)) => {
            Err(UnsupportedKind::Scalar("mismatched value"))
        }
    }
}
