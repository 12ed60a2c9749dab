use crate::config::{Options, ProjectMetadata};
use crate::introspection::Snapshot;
use crate::openapi_builder::assemble;
use crate::serializer::{serialize, write_to_file, Format};
use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

/// OpenAPI Assembler - build an OpenAPI document from an application's introspection snapshot
#[derive(Parser, Debug)]
#[command(name = "openapi-assembler")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Introspection snapshot (routes, classes, models) as JSON or YAML
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot_path: PathBuf,

    /// Assembly options file (JSON or YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Project metadata file supplying default title, description and version
    #[arg(short = 'p', long = "package", value_name = "FILE")]
    pub package_path: Option<PathBuf>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: Format,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.snapshot_path.is_file() {
        anyhow::bail!(
            "Snapshot file does not exist: {}",
            args.snapshot_path.display()
        );
    }

    if let Some(config_path) = &args.config_path {
        if !config_path.is_file() {
            anyhow::bail!("Config file does not exist: {}", config_path.display());
        }
    }

    info!("Snapshot: {}", args.snapshot_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Loads the inputs named by `args` and renders the assembled document.
pub fn render(args: &CliArgs) -> Result<String> {
    let snapshot = Snapshot::from_path(&args.snapshot_path).with_context(|| {
        format!("Failed to load snapshot: {}", args.snapshot_path.display())
    })?;
    info!(
        "Loaded {} routes, {} classes, {} models",
        snapshot.routes.len(),
        snapshot.classes.len(),
        snapshot.models.len()
    );

    let options = match &args.config_path {
        Some(path) => Options::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Options::default(),
    };

    // Project metadata is best-effort; missing or unreadable files fall back to defaults
    let metadata = args
        .package_path
        .as_deref()
        .map(ProjectMetadata::load)
        .unwrap_or_default();

    let assembly = assemble(&snapshot, &options, &metadata);
    for diagnostic in &assembly.diagnostics {
        warn!("{}", diagnostic);
    }

    serialize(&assembly.document, args.output_format)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting OpenAPI document assembly...");

    let content = render(&args)?;

    if let Some(output_path) = &args.output_path {
        write_to_file(&content, output_path)?;
        info!("Wrote OpenAPI document to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}
