//! OpenAPI Specification-State Resolver
//!
//! Stateless, read-only projections over an OpenAPI/Swagger-style document
//! and two auxiliary stores: an overlay of resolved `$ref` subtrees and a
//! metadata store of per-parameter runtime state.
//!
//! This library never fetches references and never issues requests; both
//! overlays are produced by upstream collaborators and passed in wholesale.
//! Every operation is a pure function of its inputs, and every missing
//! lookup (path, method, parameter, metadata entry) degrades to an empty
//! result rather than an error.
//!
//! # Example
//!
//! ```
//! use oas_state::{content_type_values, effective_document, parameter_values};
//! use serde_json::json;
//!
//! let document = json!({
//!     "paths": {
//!         "/pets": {
//!             "get": {
//!                 "produces": ["application/xml", "application/json"],
//!                 "parameters": [
//!                     { "name": "limit", "in": "query", "value": 10 }
//!                 ]
//!             }
//!         }
//!     }
//! });
//!
//! // Nothing resolved yet - the overlay is empty.
//! let effective = effective_document(&document, &json!({}));
//! assert_eq!(effective, document);
//!
//! let metadata = json!({});
//! let ct = content_type_values(&effective, &metadata, "/pets", "get");
//! assert_eq!(ct.response_content_type.as_deref(), Some("application/xml"));
//!
//! let values = parameter_values(&effective, &metadata, "/pets", "get", false);
//! assert_eq!(values["query.limit"], 10);
//! ```
//!
//! # Parameter identity
//!
//! A parameter's metadata entry is keyed by a composite key:
//!
//! | Tier | Key | When |
//! |------|-----|------|
//! | stable | `"<in>.<name>"` | always, when both fields are present |
//! | hashed | `"<in>.<name>.hash-<H>"` | fallback; duplicates of `(in, name)` |
//!
//! Lookups prefer the stable key for readability and fall back to the hashed
//! key, which stays correct when the document declares duplicate parameters.

mod binder;
mod content;
mod error;
mod identity;
mod linter;
mod loader;
mod merge;
mod types;
mod values;

pub use binder::{
    operation_with_meta, parameter_inclusion_setting_for, parameter_with_meta,
    parameter_with_meta_by_identity,
};
pub use content::{
    consumes_options_for, content_type_values, operation_scheme, produces_options_for,
};
pub use error::LoadError;
pub use identity::{hashed_identifier, param_identifiers, stable_identifier, structural_hash};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use merge::effective_document;
pub use types::{
    ContentTypes, DEFAULT_RESPONSE_CONTENT_TYPE, DEFAULT_SCHEME, FORM_URLENCODED,
    MULTIPART_FORM_DATA, PARAM_LOCATIONS, RESOLVED_REF_MARKER,
};
pub use values::parameter_values;

#[cfg(feature = "remote")]
pub use loader::load_document_url;
