//! The authentication gate.
//!
//! `CurrentUser` is the single authoritative way a request becomes an
//! identity: bearer token parsed, signature and expiry verified, user and
//! permission set loaded from the store. Protected handlers declare it as an
//! extractor; the permission gate middleware resolves it through the same
//! path. Public routes simply never ask for it.

use actix_web::dev::Payload;
use actix_web::{http::header, web, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::verify_access_token;
use crate::auth::permissions::PermissionSet;
use crate::error::AppError;
use crate::services::users::load_identity;
use crate::state::app_state::AppState;

/// Request-scoped identity: the authenticated user plus their permissions.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_subscribed: bool,
    pub permissions: PermissionSet,
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let parts: Vec<&str> = auth_value.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" || parts[1].is_empty() {
        return Err(AppError::unauthorized_missing_bearer());
    }
    Ok(parts[1].to_string())
}

impl CurrentUser {
    /// Resolve the identity for this request.
    ///
    /// Failure ladder: no/malformed bearer → 401 missing-bearer; bad
    /// signature or expiry → 401; token fine but the account is gone →
    /// 403 (the caller proved who they were, they just aren't anyone
    /// anymore).
    pub async fn resolve(req: &HttpRequest) -> Result<Self, AppError> {
        // A gate earlier in the chain may have resolved us already
        if let Some(current) = req.extensions().get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let app_state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| AppError::internal("AppState not available"))?;

        let token = bearer_token(req)?;
        let claims = verify_access_token(&token, &app_state.security)?;
        let user_id = claims
            .user_id()
            .ok_or_else(AppError::unauthorized_invalid_jwt)?;

        let db = app_state.require_db()?;
        let (user, permissions) = load_identity(db, user_id).await?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            is_subscribed: user.is_subscribed,
            permissions,
        })
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { CurrentUser::resolve(&req).await })
    }
}
