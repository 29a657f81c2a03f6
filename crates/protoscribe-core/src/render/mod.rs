//! Descriptor-to-text rendering.
//!
//! This module turns a single `FileDescriptorProto` into `.proto` source in a
//! fixed canonical form:
//!
//! 1. `syntax` and `package` declarations (`package ;` when the package is empty)
//! 2. file option statements
//! 3. imports, in declared order, then a blank line
//! 4. top-level messages, enums and services, in that order
//!
//! Fields and enum values are ordered by number.
//!
//! Nested scopes are indented one level per nesting depth, so a field of a
//! nested message is written as `\t\t<type> <name> = <number>;` and a nested
//! `message`/`enum` header sits one level in from its parent. Flat output,
//! with nested headers at column 0 and every member at a single indent, is
//! not produced. Top-level blocks are unaffected: their members are always
//! at exactly one indent unit.
//!
//! Rendering is pure: it borrows the descriptor, performs no I/O and does not
//! log. Kinds without a canonical text form are reported as
//! [`Error::UnsupportedKind`] instead of producing a placeholder.

mod members;
mod options;
mod types;
mod writer;

use crate::error::{Error, Result};
use prost_types::{FileDescriptorProto, FileOptions};
use writer::TextBuffer;

pub use options::{format_option_value, OptionStatement};
pub use types::{resolve_type_name, UnsupportedKind};
pub use writer::RenderStats;

/// Default bound on message nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Indentation unit for nested scopes (default: one tab)
    pub indent_str: String,
    /// Maximum message nesting depth; top-level messages have depth 1
    pub max_depth: usize,
    /// Order option statements by name instead of field number
    pub sort_options: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_str: "\t".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            sort_options: false,
        }
    }
}

impl RenderConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets the maximum message nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets whether option statements are sorted by name
    pub fn sort_options(mut self, sort: bool) -> Self {
        self.sort_options = sort;
        self
    }
}

/// Proto syntax version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoSyntax {
    /// Proto2 syntax
    Proto2,
    /// Proto3 syntax
    Proto3,
}

impl ProtoSyntax {
    /// Returns the syntax declaration string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtoSyntax::Proto2 => "proto2",
            ProtoSyntax::Proto3 => "proto3",
        }
    }
}

impl TryFrom<&str> for ProtoSyntax {
    type Error = String;

    /// An empty syntax string means proto2, as in `descriptor.proto`.
    fn try_from(value: &str) -> std::result::Result<Self, String> {
        match value {
            "" | "proto2" => Ok(ProtoSyntax::Proto2),
            "proto3" => Ok(ProtoSyntax::Proto3),
            _ => Err(value.to_string()),
        }
    }
}

/// The rendered source of one descriptor file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Descriptor name, also the relative output path
    pub name: String,
    /// Rendered `.proto` text
    pub text: String,
    /// What was emitted
    pub stats: RenderStats,
}

/// Renders a file descriptor into `.proto` source text.
pub fn render_file(file: &FileDescriptorProto, config: &RenderConfig) -> Result<RenderedFile> {
    let syntax = ProtoSyntax::try_from(file.syntax()).map_err(|syntax| Error::UnsupportedSyntax {
        file: file.name().to_string(),
        syntax,
    })?;

    let mut renderer = FileRenderer {
        file_name: file.name(),
        config,
        syntax,
        buf: TextBuffer::new(&config.indent_str),
        stats: RenderStats::default(),
    };
    renderer.write_file(file)?;

    Ok(RenderedFile {
        name: file.name().to_string(),
        stats: renderer.stats,
        text: renderer.buf.into_string(),
    })
}

/// State of a single file render pass
pub(crate) struct FileRenderer<'a> {
    file_name: &'a str,
    config: &'a RenderConfig,
    syntax: ProtoSyntax,
    buf: TextBuffer<'a>,
    stats: RenderStats,
}

impl FileRenderer<'_> {
    fn write_file(&mut self, file: &FileDescriptorProto) -> Result<()> {
        self.buf.line(&format!("syntax = \"{}\";", self.syntax.as_str()));
        self.buf.line(&format!("package {};", file.package()));

        if let Some(options) = &file.options {
            for statement in self.option_statements(options)? {
                self.stats.option_count += 1;
                self.buf.line(&statement.to_string());
            }
        }

        for dependency in &file.dependency {
            self.buf.line(&format!("import \"{}\";", dependency));
        }

        self.buf.blank();

        let scope = file.package();
        for message in &file.message_type {
            self.write_message(message, scope, 1)?;
        }

        for enum_type in &file.enum_type {
            self.write_enum(enum_type);
        }

        for service in &file.service {
            self.write_service(service);
        }

        Ok(())
    }

    fn option_statements(&self, options: &FileOptions) -> Result<Vec<OptionStatement>> {
        let message = options::option_message(options);
        let mut statements = message
            .fields()
            .map(|(field, value)| -> Result<OptionStatement> {
                let value = format_option_value(&field, value).map_err(|kind| {
                    Error::unsupported_kind(
                        self.file_name,
                        format!("option {}", field.name()),
                        kind.to_string(),
                    )
                })?;
                Ok(OptionStatement {
                    name: field.name().to_string(),
                    value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if self.config.sort_options {
            statements.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(statements)
    }
}

/// Joins a scope and a name with a dot, leaving top-level names bare.
fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}
