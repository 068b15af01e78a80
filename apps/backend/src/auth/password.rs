//! Password hashing and verification.
//!
//! bcrypt with a fixed cost of 10 and a per-call random salt. The digest
//! string embeds salt and cost, so verification needs no extra state.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// bcrypt work factor. Fixed; raising it invalidates nothing (old digests
/// carry their own cost) but slows new registrations.
const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with a fresh random salt.
///
/// An empty password is rejected here rather than hashed, so no caller can
/// accidentally persist a credential that matches "".
pub fn hash_password(plaintext: &str) -> Result<String, AppError> {
    if plaintext.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            "Password cannot be empty",
        ));
    }

    bcrypt::hash(plaintext, BCRYPT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a plaintext password against a stored digest.
///
/// Returns `Ok(false)` on mismatch; errors only for a malformed digest.
pub fn verify_password(plaintext: &str, digest: &str) -> Result<bool, AppError> {
    bcrypt::verify(plaintext, digest)
        .map_err(|e| AppError::internal(format!("Malformed password digest: {e}")))
}
