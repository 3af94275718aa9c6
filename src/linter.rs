//! Document linting - static analysis of API description files.
//!
//! Flags document shapes the resolver would silently coerce or that degrade
//! parameter identity:
//! - JSON syntax errors
//! - containers of the wrong JSON type (`paths`, `parameters`, `produces`,
//!   `consumes`)
//! - parameters with no addressable identity or an unknown location
//! - duplicate `(in, name)` parameter pairs on one operation
//! - `$ref` nodes carrying sibling keys

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::loader::load_document;
use crate::types::{json_type_name, PARAM_LOCATIONS};

/// HTTP methods recognized as operation keys in a path-item.
const HTTP_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/paths/~1pet/get/parameters/0")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
/// Returns aggregated results for all files.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_document_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        let file_errors = file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let file_warnings = file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        total_errors += file_errors;
        total_warnings += file_warnings;
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single document file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut diagnostics = Vec::new();

    // Try to load the file (checks syntax)
    let document = match load_document(file) {
        Ok(d) => d,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                file: file.to_path_buf(),
                path: "/".to_string(),
                message: format!("syntax error: {}", e),
            });
            return FileResult {
                file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    check_document(&document, file, &mut diagnostics);
    check_ref_siblings(&document, file, "", &mut diagnostics);

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

/// Check the document's paths, operations, and content-type lists.
fn check_document(document: &Value, file: &Path, diagnostics: &mut Vec<Diagnostic>) {
    check_options_list(document, "", "produces", file, diagnostics);
    check_options_list(document, "", "consumes", file, diagnostics);

    let Some(paths) = document.get("paths") else {
        return;
    };
    let Some(paths_map) = paths.as_object() else {
        push_type_error(diagnostics, file, "/paths", "paths", "object", paths);
        return;
    };

    for (path_key, path_item) in paths_map {
        let item_path = format!("/paths/{}", escape_pointer(path_key));
        let Some(item_map) = path_item.as_object() else {
            continue;
        };
        check_options_list(path_item, &item_path, "produces", file, diagnostics);
        check_options_list(path_item, &item_path, "consumes", file, diagnostics);

        for (method, operation) in item_map {
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let op_path = format!("{}/{}", item_path, method);
            check_options_list(operation, &op_path, "produces", file, diagnostics);
            check_options_list(operation, &op_path, "consumes", file, diagnostics);
            check_operation_parameters(operation, &op_path, file, diagnostics);
        }
    }
}

/// Check one operation's parameter list for identity problems.
fn check_operation_parameters(
    operation: &Value,
    op_path: &str,
    file: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(parameters) = operation.get("parameters") else {
        return;
    };
    let params_path = format!("{}/parameters", op_path);
    let Some(params) = parameters.as_array() else {
        push_type_error(diagnostics, file, &params_path, "parameters", "array", parameters);
        return;
    };

    let mut seen: Vec<String> = Vec::new();
    for (i, param) in params.iter().enumerate() {
        // Unresolved references have no identity yet; the sibling check
        // handles their shape separately.
        if param.get("$ref").is_some() {
            continue;
        }
        let param_path = format!("{}/{}", params_path, i);
        let name = param.get("name").and_then(Value::as_str);
        let location = param.get("in").and_then(Value::as_str);

        let (Some(name), Some(location)) = (name, location) else {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E003".to_string(),
                file: file.to_path_buf(),
                path: param_path,
                message: "parameter has no string name/in pair; it cannot be addressed"
                    .to_string(),
            });
            continue;
        };

        if !PARAM_LOCATIONS.contains(&location) {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W001".to_string(),
                file: file.to_path_buf(),
                path: param_path.clone(),
                message: format!(
                    "unknown parameter location \"{}\": expected {}",
                    location,
                    PARAM_LOCATIONS.join(", ")
                ),
            });
        }

        let stable = format!("{}.{}", location, name);
        if seen.contains(&stable) {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W002".to_string(),
                file: file.to_path_buf(),
                path: param_path,
                message: format!(
                    "duplicate parameter \"{}\": identity falls back to a structural hash",
                    stable
                ),
            });
        } else {
            seen.push(stable);
        }
    }
}

/// Flag `$ref` nodes carrying sibling keys anywhere in the tree.
///
/// The host format gives a `$ref` node no other meaningful content; siblings
/// vanish once the reference resolves.
fn check_ref_siblings(value: &Value, file: &Path, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match value {
        Value::Object(map) => {
            if map.contains_key("$ref") && map.len() > 1 {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W003".to_string(),
                    file: file.to_path_buf(),
                    path: format!("{}/$ref", path),
                    message: "$ref node has sibling keys; they are dropped once the reference \
                              resolves"
                        .to_string(),
                });
            }
            for (key, val) in map {
                let child_path = format!("{}/{}", path, escape_pointer(key));
                check_ref_siblings(val, file, &child_path, diagnostics);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                let child_path = format!("{}/{}", path, i);
                check_ref_siblings(item, file, &child_path, diagnostics);
            }
        }
        _ => {}
    }
}

/// Non-array `produces`/`consumes` values are coerced to absent by the
/// resolver; flag them here.
fn check_options_list(
    node: &Value,
    node_path: &str,
    field: &str,
    file: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(list) = node.get(field) else {
        return;
    };
    let field_path = format!("{}/{}", node_path, field);
    let Some(entries) = list.as_array() else {
        push_type_error(diagnostics, file, &field_path, field, "array", list);
        return;
    };
    for (i, entry) in entries.iter().enumerate() {
        if !entry.is_string() {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W004".to_string(),
                file: file.to_path_buf(),
                path: format!("{}/{}", field_path, i),
                message: format!(
                    "{} entry is not a string (got {}); it is skipped during negotiation",
                    field,
                    json_type_name(entry)
                ),
            });
        }
    }
}

fn push_type_error(
    diagnostics: &mut Vec<Diagnostic>,
    file: &Path,
    path: &str,
    field: &str,
    expected: &str,
    actual: &Value,
) {
    diagnostics.push(Diagnostic {
        severity: Severity::Error,
        code: "E002".to_string(),
        file: file.to_path_buf(),
        path: path.to_string(),
        message: format!(
            "invalid {} type: expected {}, got {}",
            field,
            expected,
            json_type_name(actual)
        ),
    });
}

/// JSON Pointer escaping for path segments (~0 = ~, ~1 = /).
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Collect all .json files in a path (file or directory).
fn collect_document_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
