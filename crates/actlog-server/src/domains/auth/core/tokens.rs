use sha2::{Digest, Sha256};

/// Hex SHA-256 of the token bytes followed by the pepper.
///
/// Sessions store only this digest, so a leaked table cannot be replayed
/// without the pepper.
#[must_use]
pub fn hash_token(token: &str, pepper: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.update(pepper.as_bytes());
    hex::encode(hasher.finalize())
}
