//! oas-state CLI
//!
//! Command-line interface for resolving OpenAPI document state: overlay
//! merging, metadata-bound operations, content negotiation, and linting.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use oas_state::{
    content_type_values, effective_document, lint, load_document, load_document_auto,
    operation_with_meta, parameter_values, FileStatus, LoadError,
};

#[derive(Parser)]
#[command(name = "oas-state")]
#[command(about = "Resolve OpenAPI document state: overlays, parameter metadata, content types")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a resolved-subtrees overlay onto a document
    Resolve {
        /// Document source: file path or URL (http:// or https://)
        document: String,

        /// Overlay file of resolved reference subtrees
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show an operation with parameter metadata merged in
    Operation {
        /// Document source: file path or URL
        document: String,

        /// Path key of the operation (e.g., /pets/{petId})
        #[arg(long)]
        path: String,

        /// HTTP method of the operation (e.g., get)
        #[arg(long)]
        method: String,

        /// Overlay file of resolved reference subtrees
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Metadata store file (runtime parameter state)
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show effective request/response content types for an operation
    ContentType {
        /// Document source: file path or URL
        document: String,

        /// Path key of the operation
        #[arg(long)]
        path: String,

        /// HTTP method of the operation
        #[arg(long)]
        method: String,

        /// Overlay file of resolved reference subtrees
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Metadata store file (runtime parameter state)
        #[arg(long)]
        meta: Option<PathBuf>,
    },

    /// Show the flat "in.name" -> value map for an operation
    Params {
        /// Document source: file path or URL
        document: String,

        /// Path key of the operation
        #[arg(long)]
        path: String,

        /// HTTP method of the operation
        #[arg(long)]
        method: String,

        /// Overlay file of resolved reference subtrees
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Metadata store file (runtime parameter state)
        #[arg(long)]
        meta: Option<PathBuf>,

        /// Read body parameter values from value_xml
        #[arg(long)]
        xml: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Lint document files for shape problems (syntax, identity, $ref siblings)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show problems
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve {
            document,
            overlay,
            output,
            pretty,
        } => run_resolve(&document, overlay, output, pretty),

        Commands::Operation {
            document,
            path,
            method,
            overlay,
            meta,
            pretty,
        } => run_operation(&document, &path, &method, overlay, meta, pretty),

        Commands::ContentType {
            document,
            path,
            method,
            overlay,
            meta,
        } => run_content_type(&document, &path, &method, overlay, meta),

        Commands::Params {
            document,
            path,
            method,
            overlay,
            meta,
            xml,
            pretty,
        } => run_params(&document, &path, &method, overlay, meta, xml, pretty),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Load the document and merge in the overlay file, when given.
fn load_effective(document_source: &str, overlay: Option<PathBuf>) -> Result<Value, u8> {
    let document = load_document_auto(document_source).map_err(report_load_error)?;
    let Some(overlay_path) = overlay else {
        return Ok(document);
    };
    let overlay = load_document(&overlay_path).map_err(report_load_error)?;
    Ok(effective_document(&document, &overlay))
}

/// Load the metadata store, defaulting to an empty one.
fn load_meta(meta: Option<PathBuf>) -> Result<Value, u8> {
    match meta {
        Some(path) => load_document(&path).map_err(report_load_error),
        None => Ok(Value::Object(Default::default())),
    }
}

fn report_load_error(e: LoadError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn emit(value: &Value, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let json_output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_resolve(
    document_source: &str,
    overlay: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let effective = load_effective(document_source, overlay)?;
    emit(&effective, output, pretty)
}

fn run_operation(
    document_source: &str,
    path: &str,
    method: &str,
    overlay: Option<PathBuf>,
    meta: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let document = load_effective(document_source, overlay)?;
    let metadata = load_meta(meta)?;
    let operation = operation_with_meta(&document, &metadata, path, method);
    emit(&operation, None, pretty)
}

fn run_content_type(
    document_source: &str,
    path: &str,
    method: &str,
    overlay: Option<PathBuf>,
    meta: Option<PathBuf>,
) -> Result<(), u8> {
    let document = load_effective(document_source, overlay)?;
    let metadata = load_meta(meta)?;
    let content_types = content_type_values(&document, &metadata, path, method);
    let value = serde_json::to_value(&content_types).map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    emit(&value, None, false)
}

fn run_params(
    document_source: &str,
    path: &str,
    method: &str,
    overlay: Option<PathBuf>,
    meta: Option<PathBuf>,
    xml: bool,
    pretty: bool,
) -> Result<(), u8> {
    let document = load_effective(document_source, overlay)?;
    let metadata = load_meta(meta)?;
    let values = parameter_values(&document, &metadata, path, method, xml);
    emit(&Value::Object(values), None, pretty)
}

fn run_lint(path: &std::path::Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(3);
    }

    let result = lint(path, strict);

    if format == "json" {
        let output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing results: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        for file_result in &result.results {
            if quiet && file_result.status == FileStatus::Ok {
                continue;
            }
            let marker = match file_result.status {
                FileStatus::Ok => "ok",
                FileStatus::Warning => "warn",
                FileStatus::Error => "FAIL",
            };
            println!("{:>4}  {}", marker, file_result.file.display());
            for diagnostic in &file_result.diagnostics {
                println!(
                    "      [{}] {}: {}",
                    diagnostic.code, diagnostic.path, diagnostic.message
                );
            }
        }
        if !quiet {
            println!(
                "{} checked, {} passed, {} failed ({} errors, {} warnings)",
                result.files_checked,
                result.passed,
                result.failed,
                result.errors,
                result.warnings
            );
        }
    }

    if result.failed > 0 {
        return Err(1);
    }
    Ok(())
}
