//! Append-only text output and render statistics.

/// Counts of the elements emitted while rendering one file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of messages, nested ones included
    pub message_count: usize,
    /// Number of fields
    pub field_count: usize,
    /// Number of enums, nested ones included
    pub enum_count: usize,
    /// Number of enum values
    pub enum_value_count: usize,
    /// Number of services
    pub service_count: usize,
    /// Number of methods
    pub method_count: usize,
    /// Number of file-level option statements
    pub option_count: usize,
}

/// Line-oriented buffer with a nesting level.
///
/// Blank lines are never indented.
#[derive(Debug)]
pub(crate) struct TextBuffer<'a> {
    output: String,
    indent_str: &'a str,
    indent_level: usize,
}

impl<'a> TextBuffer<'a> {
    pub(crate) fn new(indent_str: &'a str) -> Self {
        Self {
            output: String::new(),
            indent_str,
            indent_level: 0,
        }
    }

    pub(crate) fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub(crate) fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn into_string(self) -> String {
        self.output
    }
}
