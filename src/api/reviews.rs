// Review endpoints. Mutations sit behind the auth middleware and act
// on the verified identity, never on anything in the body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use crate::db::{self, Review, ReviewRequest, ReviewResponse};
use crate::AppState;

use super::auth::AuthUser;
use super::error::ApiError;
use super::validation::{validate_comment, validate_rating};

/// List all reviews for a book
///
/// GET /api/books/:isbn/reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    if db::books::by_isbn(&state.db, &isbn).await?.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    let reviews = db::reviews::list_by_book(&state.db, &isbn).await?;
    Ok(Json(reviews))
}

/// Add or update the caller's review for a book.
///
/// POST /api/books/:isbn/reviews (auth required)
///
/// A first submission creates the review (201); a later submission by
/// the same user replaces rating and comment in place (200). Concurrent
/// first submissions race on the UNIQUE index, so at most one row ever
/// exists.
pub async fn upsert_review(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let rating = validate_rating(request.rating)
        .map_err(|e| ApiError::validation_field("rating", e))?;
    let comment = validate_comment(request.comment.as_deref())
        .map_err(|e| ApiError::validation_field("comment", e))?;

    if db::books::by_isbn(&state.db, &isbn).await?.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    if let Some(updated) =
        db::reviews::update(&state.db, &isbn, &user.id, rating, comment).await?
    {
        tracing::info!(isbn = %isbn, username = %user.username, "Review updated");
        return Ok((
            StatusCode::OK,
            Json(ReviewResponse {
                success: true,
                message: "Review updated successfully".to_string(),
                review: updated,
            }),
        ));
    }

    let review = Review::new(&isbn, &user.id, &user.username, rating, comment);
    db::reviews::insert(&state.db, &review).await?;

    tracing::info!(isbn = %isbn, username = %user.username, "Review added");

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            success: true,
            message: "Review added successfully".to_string(),
            review,
        }),
    ))
}

/// Delete the caller's review for a book
///
/// DELETE /api/books/:isbn/reviews (auth required)
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(isbn): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = db::reviews::delete(&state.db, &isbn, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review not found"))?;

    tracing::info!(isbn = %isbn, username = %user.username, "Review deleted");

    Ok(Json(ReviewResponse {
        success: true,
        message: "Review deleted successfully".to_string(),
        review,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const ISBN: &str = "978-0143034638";

    async fn test_state() -> Arc<AppState> {
        let pool = db::test_pool().await;
        db::seed_books(&pool).await.unwrap();
        Arc::new(AppState::new(Config::default(), pool))
    }

    fn test_user() -> AuthUser {
        AuthUser {
            id: uuid::Uuid::new_v4().to_string(),
            username: "alice".to_string(),
        }
    }

    fn review_body(rating: i64, comment: &str) -> ReviewRequest {
        ReviewRequest {
            rating: Some(rating),
            comment: Some(comment.to_string()),
        }
    }

    #[tokio::test]
    async fn test_first_submission_creates_then_updates_in_place() {
        let state = test_state().await;
        let user = test_user();

        let (status, Json(created)) = upsert_review(
            State(state.clone()),
            Path(ISBN.to_string()),
            Extension(user.clone()),
            Json(review_body(5, "loved it")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let (status, Json(updated)) = upsert_review(
            State(state.clone()),
            Path(ISBN.to_string()),
            Extension(user),
            Json(review_body(2, "changed my mind")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::OK);

        // Same row, new content
        assert_eq!(updated.review.id, created.review.id);
        assert_eq!(updated.review.rating, 2);

        let Json(reviews) = list_reviews(State(state), Path(ISBN.to_string()))
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected_before_write() {
        let state = test_state().await;

        for rating in [0, 6] {
            let err = upsert_review(
                State(state.clone()),
                Path(ISBN.to_string()),
                Extension(test_user()),
                Json(review_body(rating, "whatever")),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }

        let Json(reviews) = list_reviews(State(state), Path(ISBN.to_string()))
            .await
            .unwrap();
        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn test_review_for_unknown_book_is_404() {
        let state = test_state().await;
        let err = upsert_review(
            State(state),
            Path("978-0000000000".to_string()),
            Extension(test_user()),
            Json(review_body(4, "ghost book")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_without_review_is_404() {
        let state = test_state().await;
        let err = delete_review(State(state), Path(ISBN.to_string()), Extension(test_user()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_returns_deleted_review() {
        let state = test_state().await;
        let user = test_user();

        upsert_review(
            State(state.clone()),
            Path(ISBN.to_string()),
            Extension(user.clone()),
            Json(review_body(4, "good")),
        )
        .await
        .unwrap();

        let Json(deleted) =
            delete_review(State(state.clone()), Path(ISBN.to_string()), Extension(user))
                .await
                .unwrap();
        assert_eq!(deleted.review.rating, 4);

        let Json(reviews) = list_reviews(State(state), Path(ISBN.to_string()))
            .await
            .unwrap();
        assert!(reviews.is_empty());
    }

    #[tokio::test]
    async fn test_reviews_are_scoped_to_user() {
        let state = test_state().await;
        let alice = test_user();
        let bob = AuthUser {
            id: uuid::Uuid::new_v4().to_string(),
            username: "bob".to_string(),
        };

        for user in [&alice, &bob] {
            let (status, _) = upsert_review(
                State(state.clone()),
                Path(ISBN.to_string()),
                Extension(user.clone()),
                Json(review_body(3, "fine")),
            )
            .await
            .unwrap();
            assert_eq!(status, StatusCode::CREATED);
        }

        let Json(reviews) = list_reviews(State(state), Path(ISBN.to_string()))
            .await
            .unwrap();
        assert_eq!(reviews.len(), 2);
    }
}
