//! # protoscribe-core
//!
//! A library for turning compiled protobuf descriptor sets back into
//! human-readable `.proto` source files.
//!
//! This crate provides the core functionality for:
//! - Decoding a binary `FileDescriptorSet`
//! - Rendering each file descriptor into canonical `.proto` text
//! - Writing the rendered files below an output directory
//!
//! ## Architecture
//!
//! - [`render`]: pure descriptor-to-text rendering
//! - [`emit`]: output paths, directory creation and per-file failure reporting
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use protoscribe_core::{EmitConfig, RenderConfig, SetEmitter};
//! use std::path::Path;
//!
//! let config = EmitConfig::new("./protos").render(RenderConfig::new().sort_options(true));
//! let report = SetEmitter::new(config).emit_path(Path::new("descriptor.pb"))?;
//!
//! for path in &report.written {
//!     println!("Wrote {}", path.display());
//! }
//! report.into_result()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod emit;
pub mod error;
pub mod render;

// Re-export primary types for convenience
pub use emit::{
    decode_descriptor_set, read_descriptor_set, resolve_output_path, EmitConfig, EmitReport,
    FileFailure, SetEmitter,
};
pub use error::{Error, Result};
pub use render::{
    render_file, ProtoSyntax, RenderConfig, RenderStats, RenderedFile, DEFAULT_MAX_DEPTH,
};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
