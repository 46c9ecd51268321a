//! Digest primitives: canonical JSON and SHA-256.
//!
//! Every digest in the log is SHA-256 over a canonical JSON rendering, encoded
//! as 64 lowercase hex characters. Canonical means compact output with object
//! keys sorted at every depth, so equal values always hash equally regardless
//! of how their maps were built.
//!
//! Fingerprint input (a JSON object, keys sorted):
//!   action_type, actor, created_at (RFC 3339, nanoseconds, `Z`), payload,
//!   previous_fingerprint, sequence_number

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use defiverse_contracts::action::ActionType;

/// SHA-256 of `bytes` as lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Render `value` as compact JSON with object keys sorted.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Value::String's Display handles quoting and escapes.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Compute a record fingerprint from the fields it commits to.
///
/// The record's own fingerprint is never an input, so the same function
/// serves both append and verification.
pub fn fingerprint(
    sequence_number: u64,
    action_type: ActionType,
    actor: &str,
    payload: &Value,
    created_at: &DateTime<Utc>,
    previous_fingerprint: &str,
) -> String {
    let mut input = serde_json::Map::new();
    input.insert("sequence_number".into(), Value::from(sequence_number));
    input.insert("action_type".into(), Value::from(action_type.as_str()));
    input.insert("actor".into(), Value::from(actor));
    input.insert("payload".into(), payload.clone());
    input.insert(
        "created_at".into(),
        Value::from(created_at.to_rfc3339_opts(SecondsFormat::Nanos, true)),
    );
    input.insert(
        "previous_fingerprint".into(),
        Value::from(previous_fingerprint),
    );

    sha256_hex(canonical_json(&Value::Object(input)).as_bytes())
}

/// Aggregate digest over a list of leaves.
///
/// Each leaf is hashed on its own; the hex leaf digests are concatenated in
/// order and hashed once more. For a record this is called with the single
/// leaf `[payload]`.
pub fn aggregate_digest(leaves: &[Value]) -> String {
    let joined: String = leaves
        .iter()
        .map(|leaf| sha256_hex(canonical_json(leaf).as_bytes()))
        .collect();
    sha256_hex(joined.as_bytes())
}
