//! Order-independent digests for cache keys.
//!
//! Remote call parameters arrive as data-interchange values whose object
//! fields may have been assembled in any order. Two structurally equal
//! parameter sets must map to the same cache slot, so the digest walks the
//! value in a canonical form: object keys are visited sorted, and every
//! node is tagged and length-prefixed so that distinct structures cannot
//! collide by concatenation.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Calculate a stable digest for a data-interchange value.
///
/// The digest is invariant under object key ordering: `{"a":1,"b":2}` and
/// `{"b":2,"a":1}` produce the same key. Array element order is
/// significant, since sequences are ordered data.
///
/// # Returns
///
/// The lowercase hexadecimal SHA-256 hash of the canonical encoding.
pub fn digest(value: &Value) -> String {
    let mut hasher = Sha256::new();
    update_canonical(&mut hasher, value);
    format!("{:x}", hasher.finalize())
}

/// Feed the canonical encoding of `value` into the hasher.
///
/// Each node is written as a one-byte tag, a length where the node is
/// variable-sized, and its contents. Object entries are visited in sorted
/// key order.
fn update_canonical(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update(b"n"),
        Value::Bool(true) => hasher.update(b"t"),
        Value::Bool(false) => hasher.update(b"f"),
        Value::Number(number) => {
            let repr = number.to_string();
            hasher.update(b"#");
            hasher.update((repr.len() as u64).to_be_bytes());
            hasher.update(repr.as_bytes());
        }
        Value::String(text) => {
            hasher.update(b"s");
            hasher.update((text.len() as u64).to_be_bytes());
            hasher.update(text.as_bytes());
        }
        Value::Array(items) => {
            hasher.update(b"[");
            hasher.update((items.len() as u64).to_be_bytes());
            for item in items {
                update_canonical(hasher, item);
            }
        }
        Value::Object(map) => {
            hasher.update(b"{");
            hasher.update((map.len() as u64).to_be_bytes());

            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| *key);

            for (key, entry) in entries {
                hasher.update(b"k");
                hasher.update((key.len() as u64).to_be_bytes());
                hasher.update(key.as_bytes());
                update_canonical(hasher, entry);
            }
        }
    }
}
