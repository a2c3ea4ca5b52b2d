//! Short public ids for events.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use uuid::Uuid;

/// Length of generated ids (72 bits of base64url).
pub const ID_LEN: usize = 12;

/// Generate a new URL-safe event id.
pub fn generate_id() -> String {
    let mut id = URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes());
    id.truncate(ID_LEN);
    id
}

/// Whether `id` could have come from [`generate_id`]. Used to keep request
/// paths from reaching the filesystem unchecked.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
