//! Content digests for snapshot sets
//!
//! A digest is the hex SHA-256 of the canonical JSON encoding of the
//! snapshots sorted by layer name, so two sets with the same content hash
//! identically regardless of input order.

use sha2::{Digest, Sha256};

use super::model::LayerSnapshot;
use crate::errors::Result;

/// Hex-encoded SHA-256 digest (64 characters) of a snapshot set.
///
/// # Errors
///
/// `Serialization` if a snapshot cannot be encoded.
pub fn compute_snapshot_digest(snapshots: &[LayerSnapshot]) -> Result<String> {
    let mut ordered: Vec<&LayerSnapshot> = snapshots.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));
    let canonical = serde_json::to_string(&ordered)?;
    Ok(hash_string(&canonical))
}

fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn test_digest_is_order_independent() {
        let a = LayerSnapshot::new("A", Color::indexed(1)).with_area(3.0);
        let b = LayerSnapshot::new("B", Color::indexed(2));
        let d1 = compute_snapshot_digest(&[a.clone(), b.clone()]).unwrap();
        let d2 = compute_snapshot_digest(&[b, a]).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
    }

    #[test]
    fn test_digest_changes_with_content() {
        let a = LayerSnapshot::new("A", Color::indexed(1)).with_area(3.0);
        let a2 = LayerSnapshot::new("A", Color::indexed(1)).with_area(3.5);
        assert_ne!(
            compute_snapshot_digest(&[a]).unwrap(),
            compute_snapshot_digest(&[a2]).unwrap()
        );
    }
}
