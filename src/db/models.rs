//! Plain data records for the bookshop, plus the request/response
//! shapes the API exchanges for them.
//!
//! Records carry no persistence logic; the store functions in
//! `db::books`, `db::users` and `db::reviews` operate on them.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// A catalog entry. Books are immutable once created; `isbn` is the
/// identity key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub created_at: String,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            description,
            published_date: None,
            created_at: now_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    /// `password_hash` must already be hashed; raw passwords never
    /// reach a record.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now_rfc3339(),
        }
    }
}

/// User as exposed by the API: the password hash is stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// A user's review of a book. At most one review exists per
/// (isbn, user_id) pair; `username` is denormalized for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub isbn: String,
    pub user_id: String,
    pub username: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Review {
    pub fn new(
        isbn: impl Into<String>,
        user_id: impl Into<String>,
        username: impl Into<String>,
        rating: i64,
        comment: impl Into<String>,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            isbn: isbn.into(),
            user_id: user_id.into(),
            username: username.into(),
            rating,
            comment: comment.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// -------------------------------------------------------------------------
// API request/response shapes
// -------------------------------------------------------------------------

/// Fields arrive as options so missing values produce a 400 from our
/// validators rather than a body-deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub message: String,
    pub review: Review,
}
