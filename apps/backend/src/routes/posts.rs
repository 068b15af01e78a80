use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::permissions::Permission;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::current_user::CurrentUser;
use crate::middleware::permission_gate::PermissionGate;
use crate::repos::posts::{Post, PostPage};
use crate::services::posts as posts_service;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct PostPageResponse {
    pub posts: Vec<PostResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

fn rfc3339(ts: time::OffsetDateTime) -> String {
    ts.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            title: post.title,
            content: post.content,
            created_at: rfc3339(post.created_at),
            updated_at: rfc3339(post.updated_at),
        }
    }
}

impl From<PostPage> for PostPageResponse {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(PostResponse::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

async fn create_post(
    current: CurrentUser,
    body: web::Json<PostBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let post = posts_service::create_post(db, current.id, &body.title, &body.content).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

async fn list_posts(
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let page = posts_service::list_posts(db, query.page, query.limit).await?;
    Ok(HttpResponse::Ok().json(PostPageResponse::from(page)))
}

async fn search_posts(
    query: web::Query<SearchQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let q = query.q.as_deref().ok_or_else(|| {
        AppError::bad_request(ErrorCode::BadRequest, "Missing required query parameter 'q'")
    })?;

    let db = app_state.require_db()?;
    let posts = posts_service::search_posts(db, q).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_post(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let post = posts_service::get_post(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn update_post(
    current: CurrentUser,
    path: web::Path<i64>,
    body: web::Json<PostBody>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let post = posts_service::update_post(
        db,
        path.into_inner(),
        current.id,
        &body.title,
        &body.content,
    )
    .await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn delete_post(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    posts_service::delete_post(db, path.into_inner(), current.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Editor desk landing; gated on {editor}.
async fn editor_desk(current: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "message": "Welcome to the editor desk",
        "username": current.username,
    })))
}

/// Management desk landing; gated on {admin, editor}.
async fn manage_desk(current: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "message": "Welcome to the management desk",
        "username": current.username,
    })))
}

/// Titles of every post; gated on {registered}.
async fn list_titles(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let titles = posts_service::list_titles(db).await?;
    let body: Vec<serde_json::Value> = titles
        .into_iter()
        .map(|(id, title)| json!({ "id": id, "title": title }))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Full post view for subscribers; gated on {subscribed}.
async fn full_post(
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let post = posts_service::get_post(db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Literal segments before the `{id}` matchers
    cfg.service(
        web::resource("")
            .route(web::get().to(list_posts))
            .route(web::post().to(create_post)),
    );
    cfg.service(web::resource("/search").route(web::get().to(search_posts)));
    cfg.service(
        web::resource("/editor")
            .wrap(PermissionGate::any([Permission::Editor]))
            .route(web::get().to(editor_desk)),
    );
    cfg.service(
        web::resource("/manage")
            .wrap(PermissionGate::any([Permission::Admin, Permission::Editor]))
            .route(web::get().to(manage_desk)),
    );
    cfg.service(
        web::resource("/titles")
            .wrap(PermissionGate::any([Permission::Registered]))
            .route(web::get().to(list_titles)),
    );
    cfg.service(
        web::resource("/{id}/full")
            .wrap(PermissionGate::any([Permission::Subscribed]))
            .route(web::get().to(full_post)),
    );
    cfg.service(
        web::resource("/{id}")
            .route(web::get().to(get_post))
            .route(web::put().to(update_post))
            .route(web::delete().to(delete_post)),
    );
}
