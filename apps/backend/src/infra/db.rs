use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::config::db::{db_url, DbProfile};
use crate::entities::{blog_posts, user_credentials, user_permissions, users};
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;

/// Connect to the database for the given profile.
///
/// The test profile pins the pool to a single connection: an in-memory SQLite
/// database exists per connection, so a second one would see empty tables.
pub async fn connect_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile)?;

    let mut opts = ConnectOptions::new(database_url);
    opts.connect_timeout(Duration::from_secs(5));
    if profile == DbProfile::Test {
        opts.max_connections(1);
    }

    let conn = Database::connect(opts).await.map_err(map_db_err)?;
    Ok(conn)
}

/// Single entrypoint: connect, and for the test profile create the schema.
///
/// The production schema is owned by operations tooling; only the throwaway
/// in-memory database gets its tables created here, derived from the entity
/// definitions.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;
    if profile == DbProfile::Test {
        create_schema(&conn).await?;
    }
    Ok(conn)
}

async fn create_schema(conn: &DatabaseConnection) -> Result<(), AppError> {
    let builder = conn.get_database_backend();
    let schema = Schema::new(builder);

    conn.execute(builder.build(&schema.create_table_from_entity(users::Entity)))
        .await
        .map_err(map_db_err)?;
    conn.execute(builder.build(&schema.create_table_from_entity(user_credentials::Entity)))
        .await
        .map_err(map_db_err)?;
    conn.execute(builder.build(&schema.create_table_from_entity(user_permissions::Entity)))
        .await
        .map_err(map_db_err)?;
    conn.execute(builder.build(&schema.create_table_from_entity(blog_posts::Entity)))
        .await
        .map_err(map_db_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::EntityTrait;

    use super::{bootstrap_db, DbProfile};
    use crate::entities::users;

    #[tokio::test]
    async fn test_bootstrap_test_db_creates_tables() {
        let conn = bootstrap_db(DbProfile::Test).await.unwrap();
        // Querying an existing-but-empty table proves the schema landed
        let all = users::Entity::find().all(&conn).await.unwrap();
        assert!(all.is_empty());
    }
}
