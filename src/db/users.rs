//! Credential store: persistence and uniqueness for user accounts.
//!
//! Password hashing happens in `api::auth` before a record gets here;
//! this module only ever sees the hash. The `username`/`email` UNIQUE
//! constraints are the backstop behind the handler's pre-check.

use sqlx::Result;

use super::{DbPool, User};

pub async fn insert(pool: &DbPool, user: &User) -> Result<()> {
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn username_exists(pool: &DbPool, username: &str) -> Result<bool> {
    Ok(find_by_username(pool, username).await?.is_some())
}
