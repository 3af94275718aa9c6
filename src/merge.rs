//! Overlay merging - layers resolved reference subtrees onto the base document.
//!
//! The reference-resolution collaborator produces a sparse tree of
//! dereferenced nodes, each marked with [`RESOLVED_REF_MARKER`]. Merging that
//! overlay onto the base document yields the effective document: resolved
//! nodes substituted wholesale, everything else passed through untouched, and
//! the base document's own key order preserved throughout.

use serde_json::{Map, Value};

use crate::types::RESOLVED_REF_MARKER;

/// Merge a resolved-subtrees overlay onto a base document.
///
/// Rules, applied per node:
/// - An overlay object carrying `$$ref` replaces the base node wholesale.
///   The base node's `$ref` key and any siblings it had are gone; only the
///   overlay's content remains at that position.
/// - When both sides are plain objects, keys merge recursively: base keys
///   first, in the base document's own enumeration order, then overlay-only
///   keys appended in overlay order. Ordered mappings such as `paths` keep
///   the base document's enumeration order regardless of how the overlay
///   enumerates its keys.
/// - Any other overlay node wins over the base node.
///
/// A `null` overlay (nothing resolved yet) yields the document unchanged.
/// A document with no `paths` mapping merges like any other tree.
pub fn effective_document(document: &Value, overlay: &Value) -> Value {
    if overlay.is_null() {
        return document.clone();
    }
    merge_node(document, overlay)
}

fn merge_node(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            if overlay_map.contains_key(RESOLVED_REF_MARKER) {
                // Resolved reference subtree - substitute wholesale.
                return overlay.clone();
            }

            let mut merged = Map::new();
            for (key, base_value) in base_map {
                match overlay_map.get(key) {
                    Some(overlay_value) => {
                        merged.insert(key.clone(), merge_node(base_value, overlay_value));
                    }
                    None => {
                        merged.insert(key.clone(), base_value.clone());
                    }
                }
            }
            for (key, overlay_value) in overlay_map {
                if !base_map.contains_key(key) {
                    merged.insert(key.clone(), overlay_value.clone());
                }
            }
            Value::Object(merged)
        }
        _ => overlay.clone(),
    }
}
