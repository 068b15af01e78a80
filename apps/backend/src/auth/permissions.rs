//! The closed permission vocabulary and the set type the authorization gate
//! compares against.
//!
//! Permissions are stored as label strings but only cross the Rust boundary
//! as [`Permission`] values, so a typo in the store surfaces as an error
//! instead of silently granting or denying access.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A permission label a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Granted to every account at registration
    Registered,
    /// May use the editor desk
    Editor,
    /// Full administrative access
    Admin,
    /// Paying subscriber; unlocks full post content
    Subscribed,
}

impl Permission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Subscribed => "subscribed",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for a label outside the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl fmt::Display for UnknownPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown permission label: {}", self.0)
    }
}

impl std::error::Error for UnknownPermission {}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            "subscribed" => Ok(Self::Subscribed),
            other => Err(UnknownPermission(other.to_string())),
        }
    }
}

/// An unordered set of permission labels held by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    /// True when this set overlaps the required set.
    ///
    /// The access model is OR-of-required: holding any one of the required
    /// labels is enough, never all of them.
    pub fn allows_any(&self, required: &[Permission]) -> bool {
        required.iter().any(|p| self.0.contains(p))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for p in [
            Permission::Registered,
            Permission::Editor,
            Permission::Admin,
            Permission::Subscribed,
        ] {
            assert_eq!(p.as_str().parse::<Permission>().unwrap(), p);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let err = "moderator".parse::<Permission>().unwrap_err();
        assert_eq!(err.0, "moderator");
        // Case-sensitive: labels are stored lowercase
        assert!("Editor".parse::<Permission>().is_err());
    }

    #[test]
    fn test_allows_any_overlap() {
        let held: PermissionSet = [Permission::Editor].into_iter().collect();
        assert!(held.allows_any(&[Permission::Admin, Permission::Editor]));

        let held: PermissionSet = [Permission::Registered].into_iter().collect();
        assert!(!held.allows_any(&[Permission::Editor]));
    }

    #[test]
    fn test_allows_any_empty_sets() {
        let empty = PermissionSet::new();
        assert!(!empty.allows_any(&[Permission::Registered]));

        let held: PermissionSet = [Permission::Admin].into_iter().collect();
        assert!(!held.allows_any(&[]));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = PermissionSet::new();
        assert!(set.insert(Permission::Registered));
        assert!(!set.insert(Permission::Registered));
        assert!(set.contains(Permission::Registered));
    }
}
