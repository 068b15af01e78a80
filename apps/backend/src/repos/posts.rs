//! Blog post repository functions (generic over ConnectionTrait).

use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::blog_posts;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Blog post domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// One page of posts, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

pub async fn create_post<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    author_id: i64,
    title: &str,
    content: &str,
) -> Result<Post, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let post = blog_posts::ActiveModel {
        id: NotSet,
        author_id: Set(author_id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;
    Ok(Post::from(post))
}

pub async fn find_post_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    post_id: i64,
) -> Result<Option<Post>, DomainError> {
    let post = blog_posts::Entity::find_by_id(post_id)
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(post.map(Post::from))
}

/// Newest-first page of posts. `page` is 1-based.
pub async fn list_posts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: u64,
    limit: u64,
) -> Result<PostPage, DomainError> {
    let paginator = blog_posts::Entity::find()
        .order_by_desc(blog_posts::Column::CreatedAt)
        .paginate(conn, limit);

    let total = paginator.num_items().await.map_err(map_db_err)?;
    let posts = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .map_err(map_db_err)?;

    Ok(PostPage {
        posts: posts.into_iter().map(Post::from).collect(),
        total,
        page,
        limit,
    })
}

/// Escape LIKE metacharacters so a query string only matches literally.
/// Must stay in sync with the `ESCAPE '\'` clause in [`search_posts`].
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// LIKE substring search over title and content, newest first. `%` and `_`
/// in the query are matched literally, not as wildcards.
pub async fn search_posts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    query: &str,
) -> Result<Vec<Post>, DomainError> {
    let pattern = format!("%{}%", escape_like(query));
    let posts = blog_posts::Entity::find()
        .filter(
            Condition::any()
                .add(
                    blog_posts::Column::Title.like(LikeExpr::new(pattern.clone()).escape('\\')),
                )
                .add(blog_posts::Column::Content.like(LikeExpr::new(pattern).escape('\\'))),
        )
        .order_by_desc(blog_posts::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(posts.into_iter().map(Post::from).collect())
}

/// (id, title) pairs of every post, newest first.
pub async fn list_titles<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<(i64, String)>, DomainError> {
    let titles: Vec<(i64, String)> = blog_posts::Entity::find()
        .select_only()
        .column(blog_posts::Column::Id)
        .column(blog_posts::Column::Title)
        .order_by_desc(blog_posts::Column::CreatedAt)
        .into_tuple()
        .all(conn)
        .await
        .map_err(map_db_err)?;
    Ok(titles)
}

pub async fn update_post<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    post_id: i64,
    title: &str,
    content: &str,
) -> Result<Post, DomainError> {
    let post = blog_posts::ActiveModel {
        id: Set(post_id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        updated_at: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .update(conn)
    .await
    .map_err(map_db_err)?;
    Ok(Post::from(post))
}

/// Returns true when a row existed.
pub async fn delete_post<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    post_id: i64,
) -> Result<bool, DomainError> {
    let res = blog_posts::Entity::delete_by_id(post_id)
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(res.rows_affected > 0)
}

impl From<blog_posts::Model> for Post {
    fn from(model: blog_posts::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
