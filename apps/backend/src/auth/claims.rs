//! Access token claims shared across the application.

use serde::{Deserialize, Serialize};

/// Claims embedded in a backend-issued access token.
///
/// Stateless: nothing here is persisted server-side. Permissions are
/// deliberately NOT part of the token; they are read from the store when the
/// identity is resolved, so a role change takes effect on the next request
/// rather than at token expiry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AccessClaims {
    /// User identifier (users.id, as a string per JWT convention)
    pub sub: String,
    /// Subscription flag carried for API clients
    pub is_subscribed: bool,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl AccessClaims {
    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
