//! User account services: registration, login, identity loading.

use std::sync::LazyLock;

use regex::Regex;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::permissions::{Permission, PermissionSet};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::infra::db_errors::map_db_err;
use crate::logging::pii::Redacted;
use crate::repos::users as users_repo;
use crate::repos::users::User;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,32}$").expect("valid username regex"));

fn validate_username(username: &str) -> Result<(), AppError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidUsername,
            "Username must be 3-32 characters of letters, digits, '_' or '-'",
        ))
    }
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "Email address is not valid",
        ))
    }
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

/// Register a new account: user row, credential row, and the baseline
/// `registered` permission, all in one transaction.
///
/// Duplicate username/email surfaces as a 409 conflict from the unique
/// constraints; the pre-existing account is untouched.
pub async fn register_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password)?;

    let password_hash = hash_password(password)?;

    let txn = db.begin().await.map_err(map_db_err)?;
    let user = users_repo::create_user(&txn, username).await?;
    users_repo::create_credentials(&txn, user.id, email, &password_hash).await?;
    users_repo::grant_permission(&txn, user.id, Permission::Registered).await?;
    txn.commit().await.map_err(map_db_err)?;

    info!(user_id = user.id, email = %Redacted(email), "Registered new user");
    Ok(user)
}

/// Authenticate by username + password.
///
/// Unknown username and wrong password both produce the same
/// `INVALID_CREDENTIALS` error, so a caller cannot probe which usernames
/// exist. Updates `last_login` on success.
pub async fn login_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some(user) = users_repo::find_user_by_username(db, username).await? else {
        warn!(username = %Redacted(username), "Login failed: unknown username");
        return Err(AppError::invalid_credentials());
    };

    let Some(credentials) = users_repo::find_credentials_for_user(db, user.id).await? else {
        warn!(user_id = user.id, "Login failed: user has no credential row");
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &credentials.password_hash)? {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::invalid_credentials());
    }

    users_repo::touch_last_login(db, credentials.id).await?;
    info!(user_id = user.id, "Login succeeded");
    Ok(user)
}

/// Load the user and permission set for an already-verified token subject.
///
/// The token was valid, so a missing user means the account was deleted
/// after issuance: that is a 403, not a 401.
pub async fn load_identity(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<(User, PermissionSet), AppError> {
    let user = users_repo::find_user_by_id(db, user_id)
        .await?
        .ok_or_else(AppError::forbidden_user_not_found)?;
    let permissions = users_repo::permissions_for_user(db, user_id).await?;
    Ok((user, permissions))
}

pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<User, AppError> {
    users_repo::find_user_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))
}

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<User>, AppError> {
    Ok(users_repo::list_users(db).await?)
}

pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<(), AppError> {
    let txn = db.begin().await.map_err(map_db_err)?;
    let deleted = users_repo::delete_user(&txn, user_id).await?;
    txn.commit().await.map_err(map_db_err)?;

    if !deleted {
        return Err(AppError::not_found(
            ErrorCode::UserNotFound,
            "User not found",
        ));
    }
    info!(user_id, "Deleted user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice!").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }
}
