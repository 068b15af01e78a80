use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Configuration for JWT security settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Read the signing secret from `BLOG_JWT_SECRET`.
    ///
    /// There is deliberately no fallback: a missing secret aborts startup
    /// instead of signing tokens with a guessable default.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("BLOG_JWT_SECRET")
            .map_err(|_| AppError::config("Required environment variable 'BLOG_JWT_SECRET' is not set"))?;
        if secret.is_empty() {
            return Err(AppError::config("'BLOG_JWT_SECRET' must not be empty"));
        }
        Ok(Self::new(secret.into_bytes()))
    }

    /// Fixed secret for test setups only.
    pub fn for_tests() -> Self {
        Self::new("test_secret_key_for_testing_purposes_only".as_bytes())
    }
}
