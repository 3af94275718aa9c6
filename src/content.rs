//! Content negotiation - effective content types and scheme for an operation.
//!
//! Candidate lists (`produces`, `consumes`, `schemes`) follow a strict
//! precedence chain: operation, then path-item, then document root. An empty
//! or malformed list at one level falls through to the next. On top of the
//! candidates sit the user's explicit selections from the metadata store and
//! a pair of Swagger 2.0 defaulting rules for request bodies.

use serde_json::Value;

use crate::types::{
    operation_at, operation_meta_at, parameters_of, path_item_at, ContentTypes,
    DEFAULT_RESPONSE_CONTENT_TYPE, DEFAULT_SCHEME, FORM_URLENCODED, MULTIPART_FORM_DATA,
};

/// Candidate `produces` lists, operation level first.
///
/// Returns the first non-empty list found walking operation, path-item, and
/// document root; `None` when the operation is missing or no level declares
/// one. A non-array value at any level counts as absent, and non-string
/// entries are skipped.
pub fn produces_options_for(document: &Value, path: &str, method: &str) -> Option<Vec<String>> {
    options_chain(document, path, method, "produces")
}

/// Candidate `consumes` lists, operation level first. Same fallthrough rules
/// as [`produces_options_for`].
pub fn consumes_options_for(document: &Value, path: &str, method: &str) -> Option<Vec<String>> {
    options_chain(document, path, method, "consumes")
}

/// Effective request and response content types for an operation.
///
/// Response: the user's `produces_value` selection, else the first candidate
/// from the precedence chain, else `"application/json"`.
///
/// Request: the user's `consumes_value` selection; else
/// `"multipart/form-data"` when the chain has no consumes candidates at all
/// and a parameter declares `type: "file"`; else
/// `"application/x-www-form-urlencoded"` when a `formData` parameter exists
/// without any file parameter; else `None`.
///
/// A missing operation yields `None` for both - defaulting only applies to
/// operations that exist.
pub fn content_type_values(
    document: &Value,
    metadata: &Value,
    path: &str,
    method: &str,
) -> ContentTypes {
    let Some(operation) = operation_at(document, path, method) else {
        return ContentTypes::default();
    };
    let meta = operation_meta_at(metadata, path, method);
    let params = parameters_of(operation);

    let response_content_type = meta
        .and_then(|m| m.get("produces_value"))
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| {
            produces_options_for(document, path, method).and_then(|opts| opts.into_iter().next())
        })
        .or_else(|| Some(DEFAULT_RESPONSE_CONTENT_TYPE.to_string()));

    let has_file_param = params
        .iter()
        .any(|p| p.get("type").and_then(Value::as_str) == Some("file"));
    let has_form_data_param = params
        .iter()
        .any(|p| p.get("in").and_then(Value::as_str) == Some("formData"));

    let explicit_consumes = meta
        .and_then(|m| m.get("consumes_value"))
        .and_then(Value::as_str)
        .map(String::from);

    let request_content_type = if explicit_consumes.is_some() {
        explicit_consumes
    } else if consumes_options_for(document, path, method).is_none() && has_file_param {
        Some(MULTIPART_FORM_DATA.to_string())
    } else if has_form_data_param && !has_file_param {
        Some(FORM_URLENCODED.to_string())
    } else {
        None
    };

    ContentTypes {
        request_content_type,
        response_content_type,
    }
}

/// Effective scheme for an operation.
///
/// First entry of the `schemes` list, precedence operation, path-item, then
/// document root; else the `scheme://` prefix of the document's source URL;
/// else `"http"`. The source URL is an explicit argument because this core
/// holds no document-origin state of its own.
pub fn operation_scheme(
    document: &Value,
    path: &str,
    method: &str,
    source_url: Option<&str>,
) -> String {
    if let Some(schemes) = options_chain(document, path, method, "schemes") {
        if let Some(first) = schemes.into_iter().next() {
            return first;
        }
    }
    source_url
        .and_then(url_scheme)
        .unwrap_or(DEFAULT_SCHEME)
        .to_string()
}

/// Extracts the scheme from a `scheme://` URL prefix.
fn url_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    Some(scheme)
}

fn options_chain(document: &Value, path: &str, method: &str, field: &str) -> Option<Vec<String>> {
    let operation = operation_at(document, path, method)?;
    let levels = [
        operation.get(field),
        path_item_at(document, path).and_then(|item| item.get(field)),
        document.get(field),
    ];
    for level in levels {
        if let Some(entries) = level.and_then(Value::as_array) {
            let list: Vec<String> = entries
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect();
            if !list.is_empty() {
                return Some(list);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn produces_prefers_operation_level() {
        let doc = json!({
            "produces": ["application/global"],
            "paths": {
                "/pet": {
                    "produces": ["application/path-item"],
                    "get": { "produces": ["application/operation"] }
                }
            }
        });
        assert_eq!(
            produces_options_for(&doc, "/pet", "get"),
            Some(vec!["application/operation".to_string()])
        );
    }

    #[test]
    fn produces_empty_level_falls_through() {
        let doc = json!({
            "produces": ["application/global"],
            "paths": {
                "/pet": {
                    "produces": [],
                    "get": { "produces": [] }
                }
            }
        });
        assert_eq!(
            produces_options_for(&doc, "/pet", "get"),
            Some(vec!["application/global".to_string()])
        );
    }

    #[test]
    fn produces_malformed_level_counts_as_absent() {
        let doc = json!({
            "produces": "application/not-a-list",
            "paths": { "/pet": { "get": {} } }
        });
        assert_eq!(produces_options_for(&doc, "/pet", "get"), None);
    }

    #[test]
    fn produces_missing_operation_is_none() {
        let doc = json!({ "produces": ["application/global"], "paths": {} });
        assert_eq!(produces_options_for(&doc, "/pet", "get"), None);
    }

    #[test]
    fn response_uses_first_declared_produces() {
        let doc = json!({
            "paths": { "/one": { "get": {
                "produces": ["application/xml", "application/whatever"]
            } } }
        });
        let ct = content_type_values(&doc, &json!({}), "/one", "get");
        assert_eq!(ct.response_content_type.as_deref(), Some("application/xml"));
    }

    #[test]
    fn response_defaults_to_json() {
        let doc = json!({ "paths": { "/one": { "get": {} } } });
        let ct = content_type_values(&doc, &json!({}), "/one", "get");
        assert_eq!(ct.response_content_type.as_deref(), Some("application/json"));
        assert_eq!(ct.request_content_type, None);
    }

    #[test]
    fn explicit_selections_win() {
        let doc = json!({
            "paths": { "/one": { "post": {
                "produces": ["application/xml"],
                "consumes": ["application/xml"]
            } } }
        });
        let meta = json!({
            "paths": { "/one": { "post": {
                "produces_value": "application/vnd.custom",
                "consumes_value": "text/plain"
            } } }
        });
        let ct = content_type_values(&doc, &meta, "/one", "post");
        assert_eq!(ct.response_content_type.as_deref(), Some("application/vnd.custom"));
        assert_eq!(ct.request_content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn file_param_defaults_request_to_multipart() {
        let doc = json!({
            "paths": { "/upload": { "post": {
                "parameters": [{ "name": "avatar", "in": "formData", "type": "file" }]
            } } }
        });
        let ct = content_type_values(&doc, &json!({}), "/upload", "post");
        assert_eq!(ct.request_content_type.as_deref(), Some("multipart/form-data"));
    }

    #[test]
    fn file_default_suppressed_by_declared_consumes() {
        let doc = json!({
            "consumes": ["application/octet-stream"],
            "paths": { "/upload": { "post": {
                "parameters": [{ "name": "avatar", "in": "formData", "type": "file" }]
            } } }
        });
        let ct = content_type_values(&doc, &json!({}), "/upload", "post");
        assert_eq!(ct.request_content_type, None);
    }

    #[test]
    fn form_data_param_defaults_request_to_urlencoded() {
        let doc = json!({
            "paths": { "/login": { "post": {
                "parameters": [
                    { "name": "user", "in": "formData", "type": "string" },
                    { "name": "pass", "in": "formData", "type": "string" }
                ]
            } } }
        });
        let ct = content_type_values(&doc, &json!({}), "/login", "post");
        assert_eq!(
            ct.request_content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn missing_operation_yields_no_defaults() {
        let doc = json!({ "paths": {} });
        let ct = content_type_values(&doc, &json!({}), "/one", "get");
        assert_eq!(ct, ContentTypes::default());
    }

    #[test]
    fn scheme_prefers_declared_schemes() {
        let doc = json!({
            "schemes": ["ws"],
            "paths": { "/pet": {
                "schemes": ["wss"],
                "get": { "schemes": ["https"] }
            } }
        });
        assert_eq!(operation_scheme(&doc, "/pet", "get", None), "https");
    }

    #[test]
    fn scheme_derived_from_source_url() {
        let doc = json!({ "paths": { "/pet": { "get": {} } } });
        assert_eq!(
            operation_scheme(&doc, "/pet", "get", Some("https://petstore.example/v2/swagger.json")),
            "https"
        );
    }

    #[test]
    fn scheme_defaults_to_http() {
        let doc = json!({ "paths": { "/pet": { "get": {} } } });
        assert_eq!(operation_scheme(&doc, "/pet", "get", None), "http");
        assert_eq!(operation_scheme(&doc, "/pet", "get", Some("no-scheme-here")), "http");
    }

    #[test]
    fn url_scheme_extraction() {
        assert_eq!(url_scheme("https://example.com"), Some("https"));
        assert_eq!(url_scheme("ftp://example.com"), Some("ftp"));
        assert_eq!(url_scheme("example.com"), None);
        assert_eq!(url_scheme("://example.com"), None);
    }
}
