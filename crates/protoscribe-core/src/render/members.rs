//! Renderers for fields, enums, messages and services.

use super::types::resolve_type_name;
use super::{qualify, FileRenderer, ProtoSyntax};
use crate::error::{Error, Result};
use prost_types::field_descriptor_proto::Label;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto,
};

impl FileRenderer<'_> {
    /// Writes a message block, recursing into nested messages and enums.
    ///
    /// `depth` is 1 for top-level messages.
    pub(super) fn write_message(
        &mut self,
        message: &DescriptorProto,
        scope: &str,
        depth: usize,
    ) -> Result<()> {
        let full_name = qualify(scope, message.name());
        if depth > self.config.max_depth {
            return Err(Error::recursion_limit(
                self.file_name,
                full_name,
                self.config.max_depth,
            ));
        }

        self.stats.message_count += 1;
        self.buf.line(&format!("message {} {{", message.name()));
        self.buf.indent();

        for nested in &message.nested_type {
            self.write_message(nested, &full_name, depth + 1)?;
        }

        for enum_type in &message.enum_type {
            self.write_enum(enum_type);
        }

        let mut fields: Vec<&FieldDescriptorProto> = message.field.iter().collect();
        fields.sort_by_key(|field| field.number());
        for field in fields {
            self.write_field(field, &full_name)?;
        }

        self.buf.dedent();
        self.buf.line("}");
        self.buf.blank();
        Ok(())
    }

    fn write_field(&mut self, field: &FieldDescriptorProto, scope: &str) -> Result<()> {
        let type_name = resolve_type_name(field).map_err(|kind| {
            Error::unsupported_kind(self.file_name, qualify(scope, field.name()), kind.to_string())
        })?;

        self.stats.field_count += 1;
        self.buf.line(&format!(
            "{}{} {} = {};",
            field_label(field, self.syntax),
            type_name,
            field.name(),
            field.number()
        ));
        Ok(())
    }

    /// Writes an enum block with values in ascending number order.
    ///
    /// Aliases sharing a number are all kept.
    pub(super) fn write_enum(&mut self, enum_type: &EnumDescriptorProto) {
        self.stats.enum_count += 1;
        self.buf.line(&format!("enum {} {{", enum_type.name()));
        self.buf.indent();

        let mut values: Vec<_> = enum_type.value.iter().collect();
        values.sort_by_key(|value| value.number());
        for value in values {
            self.stats.enum_value_count += 1;
            self.buf.line(&format!("{} = {};", value.name(), value.number()));
        }

        self.buf.dedent();
        self.buf.line("}");
        self.buf.blank();
    }

    pub(super) fn write_service(&mut self, service: &ServiceDescriptorProto) {
        self.stats.service_count += 1;
        self.buf.line(&format!("service {} {{", service.name()));
        self.buf.indent();

        for method in &service.method {
            self.write_method(method);
        }

        self.buf.dedent();
        self.buf.line("}");
    }

    fn write_method(&mut self, method: &MethodDescriptorProto) {
        let client_stream = if method.client_streaming() { "stream " } else { "" };
        let server_stream = if method.server_streaming() { "stream " } else { "" };

        self.stats.method_count += 1;
        self.buf.line(&format!(
            "rpc {}({}{}) returns ({}{});",
            method.name(),
            client_stream,
            method.input_type(),
            server_stream,
            method.output_type()
        ));
    }
}

/// Label prefix for a field, including the trailing space.
///
/// Plain proto3 singular fields carry no label.
fn field_label(field: &FieldDescriptorProto, syntax: ProtoSyntax) -> &'static str {
    match field.label() {
        Label::Repeated => "repeated ",
        Label::Required => "required ",
        Label::Optional => match syntax {
            ProtoSyntax::Proto2 => "optional ",
            ProtoSyntax::Proto3 if field.proto3_optional() => "optional ",
            ProtoSyntax::Proto3 => "",
        },
    }
}
