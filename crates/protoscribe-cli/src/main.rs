//! protoscribe - Decompile protobuf descriptor sets into `.proto` sources
//!
//! Reads a binary `FileDescriptorSet` (as produced by
//! `protoc --descriptor_set_out`) and writes one `.proto` file per descriptor
//! below an output directory.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use protoscribe_core::{EmitConfig, EmitReport, RenderConfig, SetEmitter, DEFAULT_MAX_DEPTH};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Decompile protobuf descriptor sets into .proto source files
#[derive(Parser, Debug)]
#[command(name = "protoscribe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every file of a descriptor set into .proto sources
    Decompile(DecompileArgs),
}

#[derive(Args, Debug)]
struct DecompileArgs {
    /// Output directory for generated protos
    #[arg(long = "out", value_name = "DIR")]
    out: PathBuf,

    /// Path to descriptor file
    #[arg(value_name = "PATH")]
    descriptor: PathBuf,

    /// Dry run - don't write files, just show what would be generated
    #[arg(long)]
    dry_run: bool,

    /// Order option statements by name instead of field number
    #[arg(long)]
    sort_options: bool,

    /// Maximum message nesting depth before a file is rejected
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    match &cli.command {
        Command::Decompile(args) => decompile(args),
    }
}

/// Decode the descriptor set and write every file
fn decompile(args: &DecompileArgs) -> Result<()> {
    if !args.descriptor.exists() {
        bail!("Input file does not exist: {}", args.descriptor.display());
    }
    if !args.descriptor.is_file() {
        bail!("Input path is not a file: {}", args.descriptor.display());
    }

    let render = RenderConfig::new()
        .max_depth(args.max_depth)
        .sort_options(args.sort_options);
    let config = EmitConfig::new(&args.out)
        .dry_run(args.dry_run)
        .render(render);

    let report = SetEmitter::new(config)
        .emit_path(&args.descriptor)
        .with_context(|| format!("Failed to decompile {}", args.descriptor.display()))?;

    print_report(&report, args.dry_run);

    report
        .into_result()
        .with_context(|| format!("Failed to decompile {}", args.descriptor.display()))?;
    Ok(())
}

fn print_report(report: &EmitReport, dry_run: bool) {
    for path in &report.written {
        if dry_run {
            println!("Would write: {}", path.display());
        } else {
            println!("Wrote {}", path.display());
        }
    }

    for failure in &report.failures {
        error!("{}: {}", failure.file, failure.error);
    }

    info!(
        "Summary: {} files, {} written, {} duplicates skipped, {} failed",
        report.total,
        report.written.len(),
        report.duplicates.len(),
        report.failures.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use prost_types::field_descriptor_proto::Type;
    use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet};
    use std::fs;
    use tempfile::TempDir;

    fn args(out: PathBuf, descriptor: PathBuf) -> DecompileArgs {
        DecompileArgs {
            out,
            descriptor,
            dry_run: false,
            sort_options: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    fn write_set(path: &std::path::Path, kind: Type) {
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("pkg/foo.proto".to_string()),
                package: Some("pkg".to_string()),
                syntax: Some("proto3".to_string()),
                message_type: vec![DescriptorProto {
                    name: Some("Foo".to_string()),
                    field: vec![FieldDescriptorProto {
                        name: Some("id".to_string()),
                        number: Some(1),
                        r#type: Some(kind as i32),
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        fs::write(path, set.encode_to_vec()).unwrap();
    }

    #[test]
    fn test_decompile_writes_files() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("set.pb");
        write_set(&input, Type::Int64);

        let out = temp_dir.path().join("out");
        decompile(&args(out.clone(), input)).unwrap();

        let text = fs::read_to_string(out.join("pkg/foo.proto")).unwrap();
        assert!(text.contains("\tint64 id = 1;"));
    }

    #[test]
    fn test_decompile_fails_on_unsupported_kind() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("set.pb");
        write_set(&input, Type::Sint64);

        let out = temp_dir.path().join("out");
        assert!(decompile(&args(out.clone(), input)).is_err());
        assert!(!out.join("pkg/foo.proto").exists());
    }

    #[test]
    fn test_decompile_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let result = decompile(&args(
            temp_dir.path().join("out"),
            temp_dir.path().join("missing.pb"),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_decompile_command() {
        let cli = Cli::try_parse_from(["protoscribe", "-v", "decompile", "--out", "gen", "set.pb"])
            .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Decompile(args) = cli.command;
        assert_eq!(args.out, PathBuf::from("gen"));
        assert_eq!(args.descriptor, PathBuf::from("set.pb"));
        assert_eq!(args.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_out_is_required() {
        assert!(Cli::try_parse_from(["protoscribe", "decompile", "set.pb"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
