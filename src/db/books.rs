//! Catalog store: read-only lookups over the `books` table.
//!
//! Substring searches fold case in Rust rather than in SQL: SQLite's
//! `LIKE` and `LOWER` only fold ASCII, and `%..%` patterns never use an
//! index anyway, so filtering the fetched rows gives full Unicode
//! case-insensitivity at the same cost. An empty result is a valid
//! outcome here; the empty-vs-404 distinction belongs to the handlers.

use sqlx::Result;

use super::{Book, DbPool};

pub async fn all(pool: &DbPool) -> Result<Vec<Book>> {
    sqlx::query_as("SELECT * FROM books").fetch_all(pool).await
}

pub async fn by_isbn(pool: &DbPool, isbn: &str) -> Result<Option<Book>> {
    sqlx::query_as("SELECT * FROM books WHERE isbn = ?")
        .bind(isbn)
        .fetch_optional(pool)
        .await
}

pub async fn by_author(pool: &DbPool, author: &str) -> Result<Vec<Book>> {
    let needle = author.to_lowercase();
    let books = all(pool).await?;
    Ok(books
        .into_iter()
        .filter(|b| b.author.to_lowercase().contains(&needle))
        .collect())
}

pub async fn by_title(pool: &DbPool, title: &str) -> Result<Vec<Book>> {
    let needle = title.to_lowercase();
    let books = all(pool).await?;
    Ok(books
        .into_iter()
        .filter(|b| b.title.to_lowercase().contains(&needle))
        .collect())
}

pub async fn insert(pool: &DbPool, book: &Book) -> Result<()> {
    sqlx::query(
        "INSERT INTO books (isbn, title, author, description, published_date, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&book.isbn)
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.description)
    .bind(&book.published_date)
    .bind(&book.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn count(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
