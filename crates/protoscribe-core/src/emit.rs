//! Writing a whole descriptor set to disk.
//!
//! [`SetEmitter`] renders every file of a `FileDescriptorSet` and writes it to
//! `<output_dir>/<file name>`. A failing file is recorded in the
//! [`EmitReport`] and the remaining files are still processed.

use crate::error::{Error, Result};
use crate::render::{render_file, RenderConfig};
use prost::Message;
use prost_types::{FileDescriptorProto, FileDescriptorSet};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, trace, warn};

/// Configuration for emitting a descriptor set
#[derive(Debug, Clone)]
pub struct EmitConfig {
    /// Root directory for generated files
    pub output_dir: PathBuf,
    /// Render and report without touching the filesystem
    pub dry_run: bool,
    /// Renderer configuration
    pub render: RenderConfig,
}

impl EmitConfig {
    /// Creates a config writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dry_run: false,
            render: RenderConfig::default(),
        }
    }

    /// Sets dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the renderer configuration
    pub fn render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }
}

/// A descriptor file that could not be emitted
#[derive(Debug)]
pub struct FileFailure {
    /// Descriptor name
    pub file: String,
    /// Why it failed
    pub error: Error,
}

/// Outcome of emitting a descriptor set
#[derive(Debug, Default)]
pub struct EmitReport {
    /// Number of files in the set
    pub total: usize,
    /// Paths written (or that would be written in dry-run mode)
    pub written: Vec<PathBuf>,
    /// Paths skipped because an identical file was already emitted
    pub duplicates: Vec<PathBuf>,
    /// Files that failed
    pub failures: Vec<FileFailure>,
}

impl EmitReport {
    /// Returns true when no file failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Converts a report with failures into [`Error::EmitFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::EmitFailed {
                failed: self.failures.len(),
                total: self.total,
            })
        }
    }
}

enum Outcome {
    Written(PathBuf),
    Duplicate(PathBuf),
}

/// Decodes a binary `FileDescriptorSet`.
pub fn decode_descriptor_set(data: &[u8]) -> Result<FileDescriptorSet> {
    Ok(FileDescriptorSet::decode(data)?)
}

/// Reads and decodes a binary `FileDescriptorSet` from `path`.
pub fn read_descriptor_set(path: &Path) -> Result<FileDescriptorSet> {
    let data = fs::read(path).map_err(|e| Error::file_read(path, e))?;
    trace!("Read {} bytes from {}", data.len(), path.display());
    decode_descriptor_set(&data)
}

/// Joins a descriptor name onto the output directory.
///
/// Empty names, absolute paths and `..` components are rejected.
pub fn resolve_output_path(output_dir: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if name.is_empty() || escapes {
        return Err(Error::path_traversal(relative));
    }
    Ok(output_dir.join(relative))
}

/// Renders and writes every file of a descriptor set
#[derive(Debug, Clone)]
pub struct SetEmitter {
    config: EmitConfig,
}

impl SetEmitter {
    /// Creates an emitter with the given configuration
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    /// Reads, decodes and emits the descriptor set stored at `input`.
    ///
    /// Read and decode failures abort before anything is written; per-file
    /// failures are collected in the report.
    pub fn emit_path(&self, input: &Path) -> Result<EmitReport> {
        let set = read_descriptor_set(input)?;
        debug!(
            "Decoded {} file descriptor(s) from {}",
            set.file.len(),
            input.display()
        );
        Ok(self.emit(&set))
    }

    /// Emits every file of `set` in order.
    pub fn emit(&self, set: &FileDescriptorSet) -> EmitReport {
        let mut report = EmitReport {
            total: set.file.len(),
            ..Default::default()
        };
        let mut claimed: HashMap<PathBuf, blake3::Hash> = HashMap::new();

        for file in &set.file {
            match self.emit_file(file, &mut claimed) {
                Ok(Outcome::Written(path)) => report.written.push(path),
                Ok(Outcome::Duplicate(path)) => report.duplicates.push(path),
                Err(error) => {
                    warn!("Skipping {}: {}", file.name(), error);
                    report.failures.push(FileFailure {
                        file: file.name().to_string(),
                        error,
                    });
                }
            }
        }

        report
    }

    fn emit_file(
        &self,
        file: &FileDescriptorProto,
        claimed: &mut HashMap<PathBuf, blake3::Hash>,
    ) -> Result<Outcome> {
        let path = resolve_output_path(&self.config.output_dir, file.name())?;
        let rendered = render_file(file, &self.config.render)?;
        let hash = blake3::hash(rendered.text.as_bytes());

        if let Some(previous) = claimed.get(&path) {
            if *previous == hash {
                debug!("Skipping duplicate: {} (hash: {})", file.name(), hash.to_hex());
                return Ok(Outcome::Duplicate(path));
            }
            return Err(Error::output_collision(path));
        }

        if self.config.dry_run {
            info!("Would write {}", path.display());
        } else {
            info!("Generating {}", path.display());
            write_text_file(&path, &rendered.text)?;
        }

        let stats = rendered.stats;
        debug!(
            "{}: {} messages, {} fields, {} enums, {} services, {} methods, {} options",
            file.name(),
            stats.message_count,
            stats.field_count,
            stats.enum_count,
            stats.service_count,
            stats.method_count,
            stats.option_count
        );

        claimed.insert(path.clone(), hash);
        Ok(Outcome::Written(path))
    }
}

/// Creates missing parent directories, then creates or truncates `path` and
/// writes `content` to it.
fn write_text_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::directory_create(parent, e))?;
    }

    let mut file = fs::File::create(path).map_err(|e| Error::file_write(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::file_write(path, e))?;
    file.flush().map_err(|e| Error::file_write(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prost_types::field_descriptor_proto::Type;
    use prost_types::{DescriptorProto, FieldDescriptorProto};
    use tempfile::TempDir;

    fn field(name: &str, number: i32, kind: Type) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            r#type: Some(kind as i32),
            ..Default::default()
        }
    }

    fn proto3_file(name: &str, package: &str, fields: Vec<FieldDescriptorProto>) -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some(name.to_string()),
            package: Some(package.to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Foo".to_string()),
                field: fields,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn foo_file() -> FileDescriptorProto {
        proto3_file(
            "pkg/foo.proto",
            "pkg",
            vec![field("id", 1, Type::Int64), field("label", 2, Type::String)],
        )
    }

    #[test]
    fn test_writes_file_and_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = SetEmitter::new(EmitConfig::new(temp_dir.path()));
        let set = FileDescriptorSet {
            file: vec![foo_file()],
        };

        let report = emitter.emit(&set);
        assert!(report.is_success());

        let path = temp_dir.path().join("pkg/foo.proto");
        assert_eq!(report.written, vec![path.clone()]);
        assert!(temp_dir.path().join("pkg").is_dir());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "syntax = \"proto3\";\npackage pkg;\n\nmessage Foo {\n\tint64 id = 1;\n\tstring label = 2;\n}\n\n"
        );
    }

    #[test]
    fn test_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pkg/foo.proto");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale content that is longer than the rendered file ".repeat(10)).unwrap();

        let emitter = SetEmitter::new(EmitConfig::new(temp_dir.path()));
        let report = emitter.emit(&FileDescriptorSet {
            file: vec![foo_file()],
        });
        assert!(report.is_success());
        assert!(fs::read_to_string(&path).unwrap().starts_with("syntax = \"proto3\";"));
        assert!(!fs::read_to_string(&path).unwrap().contains("stale"));
    }

    #[test]
    fn test_failing_file_does_not_stop_the_set() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = SetEmitter::new(EmitConfig::new(temp_dir.path()));
        let bad = proto3_file("pkg/bad.proto", "pkg", vec![field("n", 1, Type::Fixed32)]);
        let set = FileDescriptorSet {
            file: vec![bad, foo_file()],
        };

        let report = emitter.emit(&set);
        assert_eq!(report.total, 2);
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "pkg/bad.proto");
        assert!(matches!(
            report.failures[0].error,
            Error::UnsupportedKind { .. }
        ));
        assert!(!temp_dir.path().join("pkg/bad.proto").exists());
        assert!(temp_dir.path().join("pkg/foo.proto").exists());

        match report.into_result() {
            Err(Error::EmitFailed { failed, total }) => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected emit failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unwritable_directory_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        // A regular file where a directory is needed
        fs::write(temp_dir.path().join("pkg"), "").unwrap();

        let emitter = SetEmitter::new(EmitConfig::new(temp_dir.path()));
        let other = proto3_file("other.proto", "other", vec![]);
        let report = emitter.emit(&FileDescriptorSet {
            file: vec![foo_file(), other],
        });

        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            Error::DirectoryCreate { .. }
        ));
        assert_eq!(report.written, vec![temp_dir.path().join("other.proto")]);
    }

    #[test]
    fn test_duplicates_and_collisions() {
        let temp_dir = TempDir::new().unwrap();
        let emitter = SetEmitter::new(EmitConfig::new(temp_dir.path()));
        let different = proto3_file("pkg/foo.proto", "pkg", vec![field("id", 1, Type::Bool)]);
        let set = FileDescriptorSet {
            file: vec![foo_file(), foo_file(), different],
        };

        let report = emitter.emit(&set);
        let path = temp_dir.path().join("pkg/foo.proto");
        assert_eq!(report.written, vec![path.clone()]);
        assert_eq!(report.duplicates, vec![path.clone()]);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            report.failures[0].error,
            Error::OutputCollision { .. }
        ));
        assert!(fs::read_to_string(&path).unwrap().contains("int64 id = 1;"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = EmitConfig::new(temp_dir.path().join("out")).dry_run(true);
        let report = SetEmitter::new(config).emit(&FileDescriptorSet {
            file: vec![foo_file()],
        });

        assert_eq!(report.written.len(), 1);
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_resolve_output_path() {
        let out = Path::new("out");
        assert_eq!(
            resolve_output_path(out, "a/b/c.proto").unwrap(),
            PathBuf::from("out/a/b/c.proto")
        );
        assert!(matches!(
            resolve_output_path(out, "../escape.proto"),
            Err(Error::PathTraversal { .. })
        ));
        assert!(matches!(
            resolve_output_path(out, "/etc/passwd"),
            Err(Error::PathTraversal { .. })
        ));
        assert!(matches!(
            resolve_output_path(out, ""),
            Err(Error::PathTraversal { .. })
        ));
    }

    #[test]
    fn test_emit_path_decodes_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("set.pb");
        let set = FileDescriptorSet {
            file: vec![foo_file()],
        };
        fs::write(&input, set.encode_to_vec()).unwrap();

        let out = temp_dir.path().join("out");
        let report = SetEmitter::new(EmitConfig::new(&out))
            .emit_path(&input)
            .unwrap();
        assert!(report.is_success());
        assert!(out.join("pkg/foo.proto").is_file());
    }

    #[test]
    fn test_decode_error_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("garbage.pb");
        fs::write(&input, [0xff, 0xff, 0xff]).unwrap();

        let result = SetEmitter::new(EmitConfig::new(temp_dir.path().join("out"))).emit_path(&input);
        assert!(matches!(result, Err(Error::DescriptorParse(_))));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_descriptor_set(&temp_dir.path().join("missing.pb"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
