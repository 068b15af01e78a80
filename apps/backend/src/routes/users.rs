use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::auth::authorize::authorize;
use crate::auth::permissions::Permission;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::middleware::permission_gate::PermissionGate;
use crate::repos::users::User;
use crate::services::users as users_service;
use crate::state::app_state::AppState;

/// Public projection of a user. Credentials never appear here.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub is_subscribed: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_subscribed: user.is_subscribed,
            created_at: user
                .created_at
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

async fn list_users(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let users = users_service::list_users(db).await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_user(
    _current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let user = users_service::get_user(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn delete_user(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // Same-method resource as the authenticated GET, so the admin check
    // lives here rather than in a composition-time gate
    authorize(&current.permissions, &[Permission::Admin])?;

    let db = app_state.require_db()?;
    users_service::delete_user(db, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .wrap(PermissionGate::any([Permission::Admin]))
            .route(web::get().to(list_users)),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_user))
            .route(web::delete().to(delete_user)),
    );
}
