//! Stable identity for persisted objects.
//!
//! Repositories match previously materialized children by a name-based
//! identity tag. Handles for created objects are derived from the parent
//! handle and the identity name, so repeated runs assign the same handle
//! to the same object.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Handle to a persisted object in the repository.
pub type ObjectId = Uuid;

/// Derives a UUIDv8 object handle from a parent handle and identity name.
///
/// ```text
/// hash = SHA-256(parent_bytes || name_bytes)[0:16]
/// hash[6] = (hash[6] & 0x0F) | 0x80  // version 8
/// hash[8] = (hash[8] & 0x3F) | 0x80  // RFC 4122 variant
/// ```
pub fn derived_object_id(parent: &ObjectId, name: &str) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(parent.as_bytes());
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();

    let mut id = [0u8; 16];
    id.copy_from_slice(&hash[..16]);

    // Set version 8 (bits 4-7 of byte 6)
    id[6] = (id[6] & 0x0F) | 0x80;
    // Set RFC 4122 variant (bits 6-7 of byte 8)
    id[8] = (id[8] & 0x3F) | 0x80;

    Uuid::from_bytes(id)
}
