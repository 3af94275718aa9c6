//! Parameter identity - composite keys correlating parameters with metadata.
//!
//! A parameter's natural key is `"<in>.<name>"`, but the source document does
//! not guarantee that pair is unique. The fallback tier appends a structural
//! hash of the full parameter value: `"<in>.<name>.hash-<H>"`. Lookups try
//! the stable key first and fall back to the hashed key, except where the
//! stable key is known to be ambiguous on the operation.

use serde_json::Value;

/// Composite keys for a parameter, in lookup order.
///
/// The stable `"<in>.<name>"` key comes first, the hash-qualified key second.
/// Returns an empty vector when `name` or `in` is absent or not a string -
/// such a parameter has no addressable identity.
pub fn param_identifiers(param: &Value) -> Vec<String> {
    let mut identifiers = Vec::with_capacity(2);
    if let Some(stable) = stable_identifier(param) {
        identifiers.push(stable);
    }
    if let Some(hashed) = hashed_identifier(param) {
        identifiers.push(hashed);
    }
    identifiers
}

/// The stable `"<in>.<name>"` key, when both fields are present.
pub fn stable_identifier(param: &Value) -> Option<String> {
    let name = param.get("name")?.as_str()?;
    let location = param.get("in")?.as_str()?;
    Some(format!("{}.{}", location, name))
}

/// The hash-qualified `"<in>.<name>.hash-<H>"` key, when both fields are present.
pub fn hashed_identifier(param: &Value) -> Option<String> {
    let stable = stable_identifier(param)?;
    Some(format!("{}.hash-{}", stable, structural_hash(param)))
}

/// Deterministic structural hash of a JSON value.
///
/// Equal values hash equal, including values whose objects enumerate keys in
/// different orders (object keys are hashed sorted, matching `serde_json`'s
/// order-insensitive object equality). Output is 16 lowercase hex characters.
pub fn structural_hash(value: &Value) -> String {
    let mut hasher = blake3::Hasher::new();
    hash_into(&mut hasher, value);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(16);
    for byte in &digest.as_bytes()[..8] {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

fn hash_into(hasher: &mut blake3::Hasher, value: &Value) {
    match value {
        Value::Null => {
            hasher.update(b"n");
        }
        Value::Bool(b) => {
            hasher.update(if *b { b"t" } else { b"f" });
        }
        Value::Number(n) => {
            hasher.update(b"#");
            hash_str(hasher, &n.to_string());
        }
        Value::String(s) => {
            hasher.update(b"s");
            hash_str(hasher, s);
        }
        Value::Array(items) => {
            hasher.update(b"[");
            for item in items {
                hash_into(hasher, item);
            }
            hasher.update(b"]");
        }
        Value::Object(map) => {
            hasher.update(b"{");
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                hash_str(hasher, key);
                hash_into(hasher, &map[key]);
            }
            hasher.update(b"}");
        }
    }
}

// Length prefix keeps adjacent strings from colliding ("ab","c" vs "a","bc").
fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

/// True when more than one parameter in `params` shares this parameter's
/// stable `(in, name)` identity.
pub(crate) fn is_ambiguous(param: &Value, params: &[Value]) -> bool {
    let Some(stable) = stable_identifier(param) else {
        return false;
    };
    params
        .iter()
        .filter(|candidate| stable_identifier(candidate).as_deref() == Some(stable.as_str()))
        .count()
        > 1
}
