pub mod auth;
mod books;
pub mod error;
mod reviews;
pub mod token;
mod validation;

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Review mutations require a bearer token; reads do not
    let protected_review_routes = Router::new()
        .route(
            "/:isbn/reviews",
            post(reviews::upsert_review).delete(reviews::delete_review),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let book_routes = Router::new()
        .route("/", get(books::list_books))
        .route("/isbn/:isbn", get(books::get_book_by_isbn))
        .route("/author/:author", get(books::list_books_by_author))
        .route("/title/:title", get(books::list_books_by_title))
        // Alternate lookup contract: empty search results become 404s
        .route("/async/books", get(books::list_books))
        .route("/promise/isbn/:isbn", get(books::get_book_by_isbn))
        .route("/promise/author/:author", get(books::find_books_by_author))
        .route("/promise/title/:title", get(books::find_books_by_title))
        // Reviews are part of books
        .route("/:isbn/reviews", get(reviews::list_reviews))
        .merge(protected_review_routes);

    Router::new()
        .route("/api", get(api_status))
        .nest("/api/books", book_routes)
        .nest("/api/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub database: String,
}

/// API status probe
///
/// GET /api
async fn api_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let connected = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    Json(StatusResponse {
        message: "Bookshop API is running".to_string(),
        database: if connected { "Connected" } else { "Disconnected" }.to_string(),
    })
}
