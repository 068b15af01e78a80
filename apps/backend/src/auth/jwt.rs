use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::AccessClaims;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Access token lifetime: one hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Mint a HS256 JWT access token with a 1-hour TTL.
pub fn mint_access_token(
    user_id: i64,
    is_subscribed: bool,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time".to_string()))?
        .as_secs() as i64;

    let claims = AccessClaims {
        sub: user_id.to_string(),
        is_subscribed,
        iat,
        exp: iat + ACCESS_TOKEN_TTL_SECS,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify JWT and return claims.
///
/// Errors:
/// - Expired token → `AppError::UnauthorizedExpiredJwt`
/// - Bad signature or malformed payload → `AppError::UnauthorizedInvalidJwt`
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured
    // algorithm. Zero leeway: a token is invalid the second after `exp`.
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{mint_access_token, verify_access_token, ACCESS_TOKEN_TTL_SECS};
    use crate::error::AppError;
    use crate::state::security_config::SecurityConfig;

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let security = SecurityConfig::for_tests();

        let now = SystemTime::now();
        let token = mint_access_token(42, true, now, &security).unwrap();
        let claims = verify_access_token(&token, &security).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id(), Some(42));
        assert!(claims.is_subscribed);
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + ACCESS_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_verify_is_idempotent() {
        let security = SecurityConfig::for_tests();
        let token = mint_access_token(7, false, SystemTime::now(), &security).unwrap();

        let first = verify_access_token(&token, &security).unwrap();
        let second = verify_access_token(&token, &security).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expired_token() {
        let security = SecurityConfig::for_tests();

        // Minted one second past its own TTL
        let now = SystemTime::now() - Duration::from_secs(ACCESS_TOKEN_TTL_SECS as u64 + 1);
        let token = mint_access_token(42, false, now, &security).unwrap();
        let result = verify_access_token(&token, &security);

        assert!(matches!(result, Err(AppError::UnauthorizedExpiredJwt)));
    }

    #[test]
    fn test_bad_signature() {
        // Mint with secret A, verify with secret B
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let token = mint_access_token(42, false, SystemTime::now(), &security_a).unwrap();

        let security_b = SecurityConfig::new("secret-B".as_bytes());
        let result = verify_access_token(&token, &security_b);

        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }

    #[test]
    fn test_garbage_token() {
        let security = SecurityConfig::for_tests();
        let result = verify_access_token("not.a.jwt", &security);
        assert!(matches!(result, Err(AppError::UnauthorizedInvalidJwt)));
    }
}
