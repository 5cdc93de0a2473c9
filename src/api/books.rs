// Catalog endpoints.
//
// Each search exists under two routes with different contracts for an
// empty result: the plain routes return the (possibly empty) list, the
// /promise routes treat emptiness as a 404. One implementation serves
// both, selected by `OnEmpty` at route wiring.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::db::{self, Book};
use crate::AppState;

use super::error::ApiError;

/// How a search handler responds to an empty result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnEmpty {
    ReturnList,
    NotFound,
}

/// List all books
///
/// GET /api/books/  (also GET /api/books/async/books)
pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = db::books::all(&state.db).await?;
    Ok(Json(books))
}

/// Get a book by its ISBN, exact match
///
/// GET /api/books/isbn/:isbn  (also GET /api/books/promise/isbn/:isbn)
pub async fn get_book_by_isbn(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = db::books::by_isbn(&state.db, &isbn)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;
    Ok(Json(book))
}

async fn search_by_author(
    state: &AppState,
    author: &str,
    on_empty: OnEmpty,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = db::books::by_author(&state.db, author).await?;
    if books.is_empty() && on_empty == OnEmpty::NotFound {
        return Err(ApiError::not_found("No books found for this author"));
    }
    Ok(Json(books))
}

async fn search_by_title(
    state: &AppState,
    title: &str,
    on_empty: OnEmpty,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = db::books::by_title(&state.db, title).await?;
    if books.is_empty() && on_empty == OnEmpty::NotFound {
        return Err(ApiError::not_found("No books found with this title"));
    }
    Ok(Json(books))
}

/// GET /api/books/author/:author — empty matches are a valid 200
pub async fn list_books_by_author(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    search_by_author(&state, &author, OnEmpty::ReturnList).await
}

/// GET /api/books/promise/author/:author — empty matches are a 404
pub async fn find_books_by_author(
    State(state): State<Arc<AppState>>,
    Path(author): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    search_by_author(&state, &author, OnEmpty::NotFound).await
}

/// GET /api/books/title/:title — empty matches are a valid 200
pub async fn list_books_by_title(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    search_by_title(&state, &title, OnEmpty::ReturnList).await
}

/// GET /api/books/promise/title/:title — empty matches are a 404
pub async fn find_books_by_title(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<Vec<Book>>, ApiError> {
    search_by_title(&state, &title, OnEmpty::NotFound).await
}
