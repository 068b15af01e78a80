//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};

use crate::auth::permissions::{Permission, PermissionSet};
use crate::entities::{user_credentials, user_permissions, users};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::infra::db_errors::map_db_err;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_subscribed: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// User credentials domain model
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub last_login: Option<time::OffsetDateTime>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<User, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let user = users::ActiveModel {
        id: NotSet,
        username: Set(username.to_string()),
        is_subscribed: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;
    Ok(User::from(user))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find_by_id(user_id)
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    let user = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    let all = users::Entity::find().all(conn).await.map_err(map_db_err)?;
    Ok(all.into_iter().map(User::from).collect())
}

/// Delete a user and their dependent rows. Returns true when a row existed.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    user_permissions::Entity::delete_many()
        .filter(user_permissions::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    user_credentials::Entity::delete_many()
        .filter(user_credentials::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    let res = users::Entity::delete_by_id(user_id)
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(res.rows_affected > 0)
}

pub async fn create_credentials<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    email: &str,
    password_hash: &str,
) -> Result<UserCredentials, DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let credential = user_credentials::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;
    Ok(UserCredentials::from(credential))
}

pub async fn find_credentials_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<UserCredentials>, DomainError> {
    let credential = user_credentials::Entity::find()
        .filter(user_credentials::Column::UserId.eq(user_id))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(credential.map(UserCredentials::from))
}

/// Record a successful login on the credential row.
pub async fn touch_last_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    credential_id: i64,
) -> Result<(), DomainError> {
    let now = time::OffsetDateTime::now_utc();
    let active = user_credentials::ActiveModel {
        id: Set(credential_id),
        last_login: Set(Some(now)),
        updated_at: Set(now),
        ..Default::default()
    };
    active.update(conn).await.map_err(map_db_err)?;
    Ok(())
}

pub async fn grant_permission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    permission: Permission,
) -> Result<(), DomainError> {
    user_permissions::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        permission: Set(permission.as_str().to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
    .map_err(map_db_err)?;
    Ok(())
}

/// Load the permission set for a user.
///
/// A stored label outside the closed vocabulary is treated as data
/// corruption, not silently skipped: skipping would turn a bad write into a
/// quiet privilege change.
pub async fn permissions_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<PermissionSet, DomainError> {
    let rows = user_permissions::Entity::find()
        .filter(user_permissions::Column::UserId.eq(user_id))
        .all(conn)
        .await
        .map_err(map_db_err)?;

    rows.iter()
        .map(|row| {
            row.permission.parse::<Permission>().map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Stored permission label is not recognized: {e}"),
                )
            })
        })
        .collect()
}

// Conversions between SeaORM models and domain models

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_subscribed: model.is_subscribed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<crate::entities::user_credentials::Model> for UserCredentials {
    fn from(model: crate::entities::user_credentials::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            email: model.email,
            password_hash: model.password_hash,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
