//! Error types for the protoscribe-core library.
//!
//! Every failure mode of decoding, rendering and emitting is a variant of
//! [`Error`]. Render errors carry the descriptor file and the fully-qualified
//! element that triggered them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for protoscribe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all protoscribe operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Descriptor name would place output outside the output directory
    #[error("path traversal detected: '{path}' would escape output directory")]
    PathTraversal {
        /// The suspicious path
        path: PathBuf,
    },

    /// Two descriptors with different content claim the same output path
    #[error("output collision: '{path}' was already written by an earlier descriptor with different content")]
    OutputCollision {
        /// The contested output path
        path: PathBuf,
    },

    /// Failed to parse the FileDescriptorSet
    #[error("failed to parse FileDescriptorSet: {0}")]
    DescriptorParse(#[from] prost::DecodeError),

    /// A field or option uses a kind that has no canonical text form
    #[error("unsupported kind '{kind}' on '{element}' in '{file}'")]
    UnsupportedKind {
        /// Descriptor file name
        file: String,
        /// Fully-qualified element name
        element: String,
        /// The offending kind
        kind: String,
    },

    /// Unsupported proto syntax version
    #[error("unsupported proto syntax '{syntax}' in '{file}'")]
    UnsupportedSyntax {
        /// Descriptor file name
        file: String,
        /// The unsupported syntax string
        syntax: String,
    },

    /// Message nesting deeper than the configured bound
    #[error("message nesting exceeds depth {limit} at '{element}' in '{file}'")]
    RecursionLimit {
        /// Descriptor file name
        file: String,
        /// Fully-qualified name of the message that crossed the bound
        element: String,
        /// The configured limit
        limit: usize,
    },

    /// One or more files of a descriptor set could not be emitted
    #[error("{failed} of {total} descriptor files failed to emit")]
    EmitFailed {
        /// Number of failed files
        failed: usize,
        /// Number of files in the set
        total: usize,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Creates a new output collision error
    pub fn output_collision(path: impl Into<PathBuf>) -> Self {
        Self::OutputCollision { path: path.into() }
    }

    /// Creates a new unsupported kind error
    pub fn unsupported_kind(
        file: impl Into<String>,
        element: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self::UnsupportedKind {
            file: file.into(),
            element: element.into(),
            kind: kind.into(),
        }
    }

    /// Creates a new recursion limit error
    pub fn recursion_limit(file: impl Into<String>, element: impl Into<String>, limit: usize) -> Self {
        Self::RecursionLimit {
            file: file.into(),
            element: element.into(),
            limit,
        }
    }
}
