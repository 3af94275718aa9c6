//! Parameter value collection - flattens bound values for request building.

use serde_json::{Map, Value};

use crate::binder::operation_with_meta;
use crate::identity::stable_identifier;
use crate::types::parameters_of;

/// Flat map from `"in.name"` to each parameter's bound `value`.
///
/// Parameters are merged with their metadata entries first, so user-entered
/// values shadow values declared on the document. With `xml` set, a `body`
/// parameter contributes its `value_xml` field instead of `value`. Every
/// parameter with an addressable identity appears; one without a bound value
/// maps to `null`. A missing path, method, or parameter list yields an empty
/// map.
pub fn parameter_values(
    document: &Value,
    metadata: &Value,
    path: &str,
    method: &str,
    xml: bool,
) -> Map<String, Value> {
    let operation = operation_with_meta(document, metadata, path, method);
    let mut values = Map::new();
    for param in parameters_of(&operation) {
        let Some(key) = stable_identifier(param) else {
            continue;
        };
        let field = if xml && param.get("in").and_then(Value::as_str) == Some("body") {
            "value_xml"
        } else {
            "value"
        };
        values.insert(key, param.get(field).cloned().unwrap_or(Value::Null));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_declared_values() {
        let doc = json!({
            "paths": { "/one": { "get": { "parameters": [
                { "name": "one", "in": "query", "value": 1 },
                { "name": "two", "in": "query", "value": "duos" }
            ] } } }
        });
        let values = parameter_values(&doc, &json!({}), "/one", "get", false);
        assert_eq!(
            Value::Object(values),
            json!({ "query.one": 1, "query.two": "duos" })
        );
    }

    #[test]
    fn metadata_values_shadow_declared_values() {
        let doc = json!({
            "paths": { "/one": { "get": { "parameters": [
                { "name": "one", "in": "query", "value": 1 }
            ] } } }
        });
        let meta = json!({
            "paths": { "/one": { "get": { "parameters": {
                "query.one": { "value": 99 }
            } } } }
        });
        let values = parameter_values(&doc, &meta, "/one", "get", false);
        assert_eq!(values["query.one"], 99);
    }

    #[test]
    fn unbound_parameter_maps_to_null() {
        let doc = json!({
            "paths": { "/one": { "get": { "parameters": [
                { "name": "one", "in": "query" }
            ] } } }
        });
        let values = parameter_values(&doc, &json!({}), "/one", "get", false);
        assert_eq!(values["query.one"], Value::Null);
    }

    #[test]
    fn xml_reads_body_value_xml() {
        let doc = json!({
            "paths": { "/pets": { "post": { "parameters": [
                { "name": "body", "in": "body", "value": "{}", "value_xml": "<pet/>" },
                { "name": "dry", "in": "query", "value": true }
            ] } } }
        });
        let values = parameter_values(&doc, &json!({}), "/pets", "post", true);
        assert_eq!(values["body.body"], "<pet/>");
        // Non-body parameters still read plain values.
        assert_eq!(values["query.dry"], true);
    }

    #[test]
    fn missing_operation_yields_empty_map() {
        let doc = json!({ "paths": {} });
        assert!(parameter_values(&doc, &json!({}), "/one", "get", false).is_empty());
        assert!(parameter_values(&json!({}), &json!({}), "/one", "get", false).is_empty());
    }

    #[test]
    fn unkeyable_parameters_are_skipped() {
        let doc = json!({
            "paths": { "/one": { "get": { "parameters": [
                { "name": "ok", "in": "query", "value": 1 },
                { "value": "no identity" }
            ] } } }
        });
        let values = parameter_values(&doc, &json!({}), "/one", "get", false);
        assert_eq!(values.len(), 1);
        assert!(values.contains_key("query.ok"));
    }
}
