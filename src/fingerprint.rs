//! Content fingerprints for revision comparison.
//!
//! A fingerprint is a stable serialization of a fixed, ordered field set
//! taken from a page snapshot. It lets the revision list tell whether a
//! stored snapshot matches the live row without trusting timestamps, and
//! is recomputed at view time rather than persisted, so it can never go
//! stale.

use serde_json::Value;

/// Snapshot fields that participate in equality, in serialization order.
/// `updatedAt`/`createdAt` are deliberately absent, as is the
/// `contentShape` discriminator: pre- and post-discriminator snapshots of
/// the same content must compare equal.
pub const FINGERPRINT_FIELDS: [&str; 11] = [
    "id",
    "title",
    "slug",
    "layout",
    "sidebarWidth",
    "sections",
    "sidebarBlocks",
    "showInNav",
    "navOrder",
    "navLabel",
    "isArchived",
];

/// Serialize the fingerprint field set of a snapshot object. Explicit
/// `null` and a missing key produce the same output. Nested objects
/// serialize with sorted keys (serde_json's default map), so two
/// differently-ordered but equal payloads fingerprint identically.
pub fn fingerprint(snapshot: &Value) -> String {
    let mut out = String::from("{");
    let mut first = true;
    for key in FINGERPRINT_FIELDS {
        let Some(value) = snapshot.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if !first {
            out.push(',');
        }
        first = false;
        out.push('"');
        out.push_str(key);
        out.push_str("\":");
        // Value serialization is infallible for JSON trees.
        out.push_str(&value.to_string());
    }
    out.push('}');
    out
}
