//! Core types and shared document-navigation helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker key identifying an overlay node as a resolved reference subtree.
///
/// A node carrying this key replaces the corresponding base node wholesale
/// during the overlay merge.
pub const RESOLVED_REF_MARKER: &str = "$$ref";

/// Parameter locations defined by the Swagger 2.0 parameter object.
pub const PARAM_LOCATIONS: &[&str] = &["query", "path", "header", "body", "formData"];

/// Fallback response content type when nothing is declared or selected.
pub const DEFAULT_RESPONSE_CONTENT_TYPE: &str = "application/json";

/// Request content type implied by a `type: "file"` parameter.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Request content type implied by `in: "formData"` parameters.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Fallback scheme when neither the document nor its source URL declares one.
pub const DEFAULT_SCHEME: &str = "http";

/// Returns the JSON type name for diagnostic messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Effective content types for one operation.
///
/// Either side is `None` when no explicit choice, declaration, or default
/// applies; a missing operation yields `None` for both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTypes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_content_type: Option<String>,
}

/// Looks up the path-item at `path`, if present.
pub(crate) fn path_item_at<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    document.get("paths")?.get(path)
}

/// Looks up the operation at `path`/`method`, if present.
pub(crate) fn operation_at<'a>(document: &'a Value, path: &str, method: &str) -> Option<&'a Value> {
    path_item_at(document, path)?.get(method)
}

/// Looks up the per-operation metadata subtree, if present.
pub(crate) fn operation_meta_at<'a>(
    metadata: &'a Value,
    path: &str,
    method: &str,
) -> Option<&'a Value> {
    metadata.get("paths")?.get(path)?.get(method)
}

/// The operation's `parameters` array, empty when absent or malformed.
pub(crate) fn parameters_of(operation: &Value) -> &[Value] {
    operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
