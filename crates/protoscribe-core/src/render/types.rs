//! Field kind to type token resolution.

use prost_types::field_descriptor_proto::Type;
use prost_types::FieldDescriptorProto;
use std::fmt;

/// A field kind that has no canonical text form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedKind {
    /// A known scalar encoding without a keyword in the canonical form
    Scalar(&'static str),
    /// A kind number outside the descriptor enumeration
    Unknown(i32),
    /// Message or enum kind without a type name, or no kind at all
    MissingTypeName,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => f.write_str(name),
            Self::Unknown(raw) => write!(f, "unknown kind {raw}"),
            Self::MissingTypeName => f.write_str("reference without type name"),
        }
    }
}

/// Returns the token placed before a field name.
///
/// Message and enum fields resolve to their `type_name` verbatim. A field
/// with no kind at all but a type name is an unresolved reference and
/// resolves the same way.
pub fn resolve_type_name(field: &FieldDescriptorProto) -> Result<&str, UnsupportedKind> {
    let Some(raw) = field.r#type else {
        return reference(field);
    };
    let kind = Type::try_from(raw).map_err(|_| UnsupportedKind::Unknown(raw))?;

    match kind {
        Type::Double => Ok("double"),
        Type::Float => Ok("float"),
        Type::Int64 => Ok("int64"),
        Type::Uint64 => Ok("uint64"),
        Type::Int32 => Ok("int32"),
        Type::Bool => Ok("bool"),
        Type::String => Ok("string"),
        Type::Bytes => Ok("bytes"),
        Type::Message | Type::Enum => reference(field),
        Type::Fixed64 => Err(UnsupportedKind::Scalar("fixed64")),
        Type::Fixed32 => Err(UnsupportedKind::Scalar("fixed32")),
        Type::Uint32 => Err(UnsupportedKind::Scalar("uint32")),
        Type::Sfixed32 => Err(UnsupportedKind::Scalar("sfixed32")),
        Type::Sfixed64 => Err(UnsupportedKind::Scalar("sfixed64")),
        Type::Sint32 => Err(UnsupportedKind::Scalar("sint32")),
        Type::Sint64 => Err(UnsupportedKind::Scalar("sint64")),
        Type::Group => Err(UnsupportedKind::Scalar("group")),
    }
}

fn reference(field: &FieldDescriptorProto) -> Result<&str, UnsupportedKind> {
    match field.type_name() {
        "" => Err(UnsupportedKind::MissingTypeName),
        name => Ok(name),
    }
}
