//! The authorization verdict.
//!
//! A pure function of (held set, required set); everything stateful —
//! resolving the identity, loading the permission set — happens before this
//! point, in the authentication gate.

use crate::auth::permissions::{Permission, PermissionSet};
use crate::error::AppError;

/// Allow iff the held set overlaps the required set; otherwise `Forbidden`.
///
/// Callers must have authenticated the identity first: this function never
/// produces a 401, only a 403.
pub fn authorize(held: &PermissionSet, required: &[Permission]) -> Result<(), AppError> {
    if held.allows_any(required) {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_allows() {
        let held: PermissionSet = [Permission::Editor].into_iter().collect();
        assert!(authorize(&held, &[Permission::Admin, Permission::Editor]).is_ok());
    }

    #[test]
    fn test_no_overlap_forbidden() {
        let held: PermissionSet = [Permission::Registered].into_iter().collect();
        let result = authorize(&held, &[Permission::Editor]);
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_or_semantics_single_label_suffices() {
        // Holding just one of several required labels grants access
        let held: PermissionSet = [Permission::Subscribed].into_iter().collect();
        assert!(authorize(
            &held,
            &[Permission::Admin, Permission::Editor, Permission::Subscribed]
        )
        .is_ok());
    }
}
