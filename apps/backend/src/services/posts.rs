//! Blog post services: CRUD, pagination, search.

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::posts as posts_repo;
use crate::repos::posts::{Post, PostPage};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

fn validate_post_input(title: &str, content: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Title must not be empty",
        ));
    }
    if content.trim().is_empty() {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "Content must not be empty",
        ));
    }
    Ok(())
}

pub async fn create_post(
    db: &DatabaseConnection,
    author_id: i64,
    title: &str,
    content: &str,
) -> Result<Post, AppError> {
    validate_post_input(title, content)?;
    let post = posts_repo::create_post(db, author_id, title, content).await?;
    info!(post_id = post.id, author_id, "Created post");
    Ok(post)
}

pub async fn get_post(db: &DatabaseConnection, post_id: i64) -> Result<Post, AppError> {
    posts_repo::find_post_by_id(db, post_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::PostNotFound, "Post not found"))
}

/// Paginated listing; out-of-range inputs are clamped rather than rejected.
pub async fn list_posts(
    db: &DatabaseConnection,
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<PostPage, AppError> {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Ok(posts_repo::list_posts(db, page, limit).await?)
}

pub async fn search_posts(db: &DatabaseConnection, query: &str) -> Result<Vec<Post>, AppError> {
    if query.trim().is_empty() {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "Search query must not be empty",
        ));
    }
    Ok(posts_repo::search_posts(db, query).await?)
}

pub async fn list_titles(db: &DatabaseConnection) -> Result<Vec<(i64, String)>, AppError> {
    Ok(posts_repo::list_titles(db).await?)
}

/// Update a post; only its author may do so.
pub async fn update_post(
    db: &DatabaseConnection,
    post_id: i64,
    current_user_id: i64,
    title: &str,
    content: &str,
) -> Result<Post, AppError> {
    validate_post_input(title, content)?;

    let existing = get_post(db, post_id).await?;
    if existing.author_id != current_user_id {
        return Err(AppError::not_post_author());
    }

    let post = posts_repo::update_post(db, post_id, title, content).await?;
    info!(post_id, author_id = current_user_id, "Updated post");
    Ok(post)
}

/// Delete a post; only its author may do so.
pub async fn delete_post(
    db: &DatabaseConnection,
    post_id: i64,
    current_user_id: i64,
) -> Result<(), AppError> {
    let existing = get_post(db, post_id).await?;
    if existing.author_id != current_user_id {
        return Err(AppError::not_post_author());
    }

    posts_repo::delete_post(db, post_id).await?;
    info!(post_id, author_id = current_user_id, "Deleted post");
    Ok(())
}
