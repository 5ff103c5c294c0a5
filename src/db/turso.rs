use crate::types::{AppError, Genre, Result};
use chrono::Utc;
use libsql::{params::IntoParams, Builder, Connection, Database, Row};

/// libsql-backed store for users, revoked tokens and genres.
///
/// A single connection is opened at construction and shared by every
/// operation, so an in-memory database is visible to all requests.
pub struct TursoClient {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Connect to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    /// Open (or create) a local SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    /// Open an ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Revoked tokens, keyed by SHA-256 digest
        conn.execute(
            "CREATE TABLE IF NOT EXISTS blacklisted_tokens (
                token_hash TEXT PRIMARY KEY,
                expires_at INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to create blacklisted_tokens table: {}", e))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_blacklisted_tokens_expires_at
             ON blacklisted_tokens(expires_at)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create blacklist index: {}", e)))?;

        // Genres table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS genres (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create genres table: {}", e)))?;

        Ok(())
    }

    // User operations
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        let mut rows = conn
            .query(
                "INSERT INTO users (username, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?)
                 RETURNING id, username, email, password_hash, created_at",
                (username, email, password_hash, now),
            )
            .await
            .map_err(map_user_insert_error)?;

        let row = rows
            .next()
            .await
            .map_err(map_user_insert_error)?
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

        user_from_row(&row)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.query_user(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
            [id],
        )
        .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.query_user(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
            [username],
        )
        .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?",
            [email],
        )
        .await
    }

    async fn query_user(&self, sql: &str, params: impl IntoParams) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    // Blacklist operations
    pub async fn blacklist_token(&self, token_hash: &str, expires_at: i64) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT OR IGNORE INTO blacklisted_tokens (token_hash, expires_at, created_at)
             VALUES (?, ?, ?)",
            (token_hash, expires_at, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to blacklist token: {}", e)))?;

        Ok(())
    }

    pub async fn is_token_blacklisted(&self, token_hash: &str) -> Result<bool> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT 1 FROM blacklisted_tokens WHERE token_hash = ?",
                [token_hash],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query blacklist: {}", e)))?;

        Ok(rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .is_some())
    }

    pub async fn prune_blacklist(&self, now: i64) -> Result<u64> {
        let conn = self.connection()?;

        conn.execute(
            "DELETE FROM blacklisted_tokens WHERE expires_at <= ?",
            [now],
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to prune blacklist: {}", e)))
    }

    pub async fn count_blacklisted(&self) -> Result<i64> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT COUNT(*) FROM blacklisted_tokens", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count blacklist: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| AppError::Database(e.to_string())),
            None => Ok(0),
        }
    }

    // Genre operations
    pub async fn create_genre(&self, name: &str) -> Result<Genre> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "INSERT INTO genres (name) VALUES (?) RETURNING id, name",
                [name],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create genre: {}", e)))?;

        let row = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

        genre_from_row(&row)
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT id, name FROM genres ORDER BY id ASC", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to query genres: {}", e)))?;

        let mut genres = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            genres.push(genre_from_row(&row)?);
        }

        Ok(genres)
    }

    pub async fn get_genre(&self, id: i64) -> Result<Option<Genre>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query("SELECT id, name FROM genres WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query genre: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(genre_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn update_genre(&self, id: i64, name: &str) -> Result<Option<Genre>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "UPDATE genres SET name = ? WHERE id = ? RETURNING id, name",
                (name, id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update genre: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(genre_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_genre(&self, id: i64) -> Result<bool> {
        let conn = self.connection()?;

        let affected = conn
            .execute("DELETE FROM genres WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete genre: {}", e)))?;

        Ok(affected > 0)
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        password_hash: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
    })
}

fn genre_from_row(row: &Row) -> Result<Genre> {
    Ok(Genre {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
    })
}

/// UNIQUE violations on insert mean another registration won the race.
fn map_user_insert_error(e: libsql::Error) -> AppError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed: users.username") {
        AppError::DuplicateUsername
    } else if message.contains("UNIQUE constraint failed: users.email") {
        AppError::DuplicateEmail
    } else {
        AppError::Database(format!("Failed to create user: {}", message))
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}
