use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::db::models::{User, UserPatch, validate_username};
use crate::error::Result;

const SELECT_USER: &str = r#"
    SELECT username,
           COALESCE(display_name, '') AS display_name,
           COALESCE(points, 0) AS points
    FROM users
"#;

pub async fn create_pool(db_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);

    // Every connection to an in-memory database sees its own empty database,
    // so keep exactly one and never let it expire.
    if is_in_memory(db_url) {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

pub async fn create_user_table(pool: &SqlitePool) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY NOT NULL,
            display_name TEXT,
            points INTEGER DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Persistence for [`User`] records, keyed by username.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `db_url` and makes sure the `users` table exists.
    pub async fn connect(db_url: &str) -> Result<Self> {
        let pool = create_pool(db_url).await?;
        create_user_table(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn get(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Creates the user or overwrites only the fields present in `patch`.
    ///
    /// The current row is read first and the merged row is written back in a
    /// single statement. Two concurrent upserts for the same username can
    /// therefore lose one of the updates.
    pub async fn upsert(&self, username: &str, patch: UserPatch) -> Result<User> {
        validate_username(username)?;

        let existing = self.get(username).await?;
        let created = existing.is_none();
        let user = patch.apply(username, existing);

        sqlx::query(
            r#"
            INSERT INTO users (username, display_name, points)
            VALUES (?, ?, ?)
            ON CONFLICT(username)
            DO UPDATE SET display_name = excluded.display_name, points = excluded.points
            "#,
        )
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(user.points)
        .execute(&self.pool)
        .await?;

        tracing::debug!(username = %user.username, created, "Upserted user");

        Ok(user)
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY username"))
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
