//! bcrypt hashing, run off the async workers since it is deliberately slow.

use crate::error::AppResult;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

/// Passwords over [`MAX_PASSWORD_BYTES`] never match: registration rejects
/// them, and bcrypt would otherwise compare only their prefix.
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}
