//! The auth core: password hashing, token issuance/verification, and the
//! permission model backing the authorization gate.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod password;
pub mod permissions;
