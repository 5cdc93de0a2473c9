//! Review store: one review per (isbn, user_id), enforced by the
//! UNIQUE index rather than application-level locking. Concurrent
//! first-time submissions resolve as one insert and one constraint
//! violation.

use sqlx::Result;

use super::{DbPool, Review};

pub async fn list_by_book(pool: &DbPool, isbn: &str) -> Result<Vec<Review>> {
    sqlx::query_as("SELECT * FROM reviews WHERE isbn = ?")
        .bind(isbn)
        .fetch_all(pool)
        .await
}

pub async fn find_user_review(pool: &DbPool, isbn: &str, user_id: &str) -> Result<Option<Review>> {
    sqlx::query_as("SELECT * FROM reviews WHERE isbn = ? AND user_id = ?")
        .bind(isbn)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn insert(pool: &DbPool, review: &Review) -> Result<()> {
    sqlx::query(
        "INSERT INTO reviews (id, isbn, user_id, username, rating, comment, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&review.id)
    .bind(&review.isbn)
    .bind(&review.user_id)
    .bind(&review.username)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(&review.created_at)
    .bind(&review.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replace rating and comment on the user's existing review, refreshing
/// `updated_at`. Returns the updated row, or None if the user has no
/// review for this book.
pub async fn update(
    pool: &DbPool,
    isbn: &str,
    user_id: &str,
    rating: i64,
    comment: &str,
) -> Result<Option<Review>> {
    let updated_at = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query(
        "UPDATE reviews SET rating = ?, comment = ?, updated_at = ?
         WHERE isbn = ? AND user_id = ?",
    )
    .bind(rating)
    .bind(comment)
    .bind(&updated_at)
    .bind(isbn)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find_user_review(pool, isbn, user_id).await
}

/// Remove the user's review for a book and return it, or None if no
/// such review existed.
pub async fn delete(pool: &DbPool, isbn: &str, user_id: &str) -> Result<Option<Review>> {
    let Some(review) = find_user_review(pool, isbn, user_id).await? else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM reviews WHERE isbn = ? AND user_id = ?")
        .bind(isbn)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(Some(review))
}
