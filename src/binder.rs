//! Metadata binding - merges runtime parameter state into declared parameters.
//!
//! The metadata store holds per-operation user state: entered values keyed by
//! composite parameter key, inclusion toggles, and selected content types.
//! Binding overlays a parameter's metadata entry onto the parameter object
//! itself, so callers see a single merged view. Every lookup degrades to an
//! empty result when the operation, parameter, or entry is absent.

use serde_json::{Map, Value};

use crate::identity::{hashed_identifier, is_ambiguous, param_identifiers};
use crate::types::{operation_at, operation_meta_at, parameters_of};

/// The operation at `path`/`method` with every parameter merged with its
/// metadata entry.
///
/// Parameters without a metadata entry pass through unchanged; all other
/// operation fields are untouched. Returns `Value::Null` when the operation
/// does not exist.
pub fn operation_with_meta(document: &Value, metadata: &Value, path: &str, method: &str) -> Value {
    let Some(operation) = operation_at(document, path, method) else {
        return Value::Null;
    };
    let meta_params = parameter_meta_table(metadata, path, method);
    let params = parameters_of(operation);

    let Some(operation_map) = operation.as_object() else {
        return operation.clone();
    };

    let mut merged_op = Map::new();
    for (key, value) in operation_map {
        if key == "parameters" && value.is_array() {
            let merged: Vec<Value> = params
                .iter()
                .map(|param| bind_parameter(param, meta_params))
                .collect();
            merged_op.insert(key.clone(), Value::Array(merged));
        } else {
            merged_op.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged_op)
}

/// A single parameter, located by declared `name` and `in`, merged with its
/// metadata entry.
///
/// Scans the operation's parameter sequence for the first match. Returns
/// `Value::Null` when the operation or parameter does not exist.
pub fn parameter_with_meta(
    document: &Value,
    metadata: &Value,
    path: &str,
    method: &str,
    param_name: &str,
    param_in: &str,
) -> Value {
    let Some(operation) = operation_at(document, path, method) else {
        return Value::Null;
    };
    let params = parameters_of(operation);
    let Some(param) = params.iter().find(|p| {
        p.get("name").and_then(Value::as_str) == Some(param_name)
            && p.get("in").and_then(Value::as_str) == Some(param_in)
    }) else {
        return Value::Null;
    };
    bind_parameter(param, parameter_meta_table(metadata, path, method))
}

/// A single parameter, located by full structural equality against the
/// operation's parameter sequence, merged with its metadata entry.
///
/// This is the precise entry point for callers holding a specific parameter
/// instance when `(in, name)` occurs more than once: the metadata entry is
/// looked up under the hash-qualified key directly, so the two duplicates
/// never share state. Returns `Value::Null` when no declared parameter equals
/// `param`.
pub fn parameter_with_meta_by_identity(
    document: &Value,
    metadata: &Value,
    path: &str,
    method: &str,
    param: &Value,
) -> Value {
    let Some(operation) = operation_at(document, path, method) else {
        return Value::Null;
    };
    let params = parameters_of(operation);
    let Some(declared) = params.iter().find(|candidate| *candidate == param) else {
        return Value::Null;
    };
    let meta_params = parameter_meta_table(metadata, path, method);
    let entry = if is_ambiguous(declared, params) {
        // The stable key cannot tell the duplicates apart.
        hashed_identifier(declared).and_then(|key| meta_params?.get(key))
    } else {
        meta_entry_for(declared, meta_params)
    };
    match entry {
        Some(entry) => deep_merge(declared, entry),
        None => declared.clone(),
    }
}

/// The user's inclusion toggle for a parameter, defaulting to `false`.
///
/// Inclusion toggles are keyed by the stable `"in.name"` key only; they exist
/// so optional parameters with an empty value can still be sent explicitly.
pub fn parameter_inclusion_setting_for(
    metadata: &Value,
    path: &str,
    method: &str,
    param_name: &str,
    param_in: &str,
) -> bool {
    operation_meta_at(metadata, path, method)
        .and_then(|meta| meta.get("parameter_inclusions"))
        .and_then(|inclusions| inclusions.get(format!("{}.{}", param_in, param_name)))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Merge a parameter with its metadata entry, if one exists.
fn bind_parameter(param: &Value, meta_params: Option<&Value>) -> Value {
    match meta_entry_for(param, meta_params) {
        Some(entry) => deep_merge(param, entry),
        None => param.clone(),
    }
}

/// Locate the metadata entry for a parameter: stable key first, hashed key
/// as fallback.
fn meta_entry_for<'a>(param: &Value, meta_params: Option<&'a Value>) -> Option<&'a Value> {
    let meta_params = meta_params?;
    param_identifiers(param)
        .iter()
        .find_map(|key| meta_params.get(key))
}

fn parameter_meta_table<'a>(metadata: &'a Value, path: &str, method: &str) -> Option<&'a Value> {
    operation_meta_at(metadata, path, method)?.get("parameters")
}

/// Deep-merge `entry` over `base`.
///
/// Objects merge per key with `entry` winning on conflicts and entry-only
/// keys appended after the base's own; any other value is replaced outright.
fn deep_merge(base: &Value, entry: &Value) -> Value {
    match (base, entry) {
        (Value::Object(base_map), Value::Object(entry_map)) => {
            let mut merged = Map::new();
            for (key, base_value) in base_map {
                match entry_map.get(key) {
                    Some(entry_value) => {
                        merged.insert(key.clone(), deep_merge(base_value, entry_value));
                    }
                    None => {
                        merged.insert(key.clone(), base_value.clone());
                    }
                }
            }
            for (key, entry_value) in entry_map {
                if !base_map.contains_key(key) {
                    merged.insert(key.clone(), entry_value.clone());
                }
            }
            Value::Object(merged)
        }
        _ => entry.clone(),
    }
}
