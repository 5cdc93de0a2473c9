use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::db::{
    self, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User, UserResponse,
};
use crate::AppState;

use super::error::{ApiError, ErrorCode, ValidationErrorBuilder};
use super::token;
use super::validation::{validate_email, validate_password, validate_username};

/// Verified identity attached to the request by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

/// Hash a password using Argon2. Called exactly once per account, at
/// registration; there is no password-change path.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash (timing-safe comparison
/// inside the argon2 crate)
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Auth middleware guarding the review mutation routes.
///
/// A missing token is 401; a present but unverifiable one is 403. The
/// decoded subject id must also be a well-formed uuid before the
/// identity is trusted downstream.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => return Err(ApiError::unauthorized("Authentication required")),
    };

    let claims = token::verify(&state.config.auth.jwt_secret, token)
        .map_err(|_| ApiError::forbidden("Invalid or expired token"))?;

    if uuid::Uuid::parse_str(&claims.id).is_err() {
        return Err(ApiError::forbidden("Invalid user ID in token"));
    }

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = request.username.as_deref().unwrap_or("").trim().to_string();
    let email = request
        .email
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let password = request.password.as_deref().unwrap_or("");

    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_username(&username) {
        errors.add("username", e);
    }
    if let Err(e) = validate_email(&email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(password) {
        errors.add("password", e);
    }
    errors.finish()?;

    // Pre-check before relying on the UNIQUE constraint, so the common
    // case gets a clear message
    if db::users::username_exists(&state.db, &username).await? {
        return Err(ApiError::new(ErrorCode::Conflict, "Username already exists")
            .with_status(StatusCode::BAD_REQUEST));
    }

    let password_hash = hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal("Error registering user")
    })?;

    let user = User::new(username, email, password_hash);
    db::users::insert(&state.db, &user).await?;

    tracing::info!(username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// Log in as a registered user
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = request.username.as_deref().unwrap_or("").trim();
    let password = request.password.as_deref().unwrap_or("");

    let mut errors = ValidationErrorBuilder::new();
    if username.is_empty() {
        errors.add("username", "Username is required");
    }
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.finish()?;

    let user = db::users::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid password"));
    }

    let token = token::issue(&state.config.auth.jwt_secret, &user.id, &user.username)
        .map_err(|e| {
            tracing::error!("Token issuance failed: {}", e);
            ApiError::internal("Error during login")
        })?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db;

    async fn test_state() -> Arc<AppState> {
        let pool = db::test_pool().await;
        Arc::new(AppState::new(Config::default(), pool))
    }

    /// Probe handler behind the gate; extracting `AuthUser` fails with a
    /// 500 if the middleware did not attach the identity.
    async fn whoami(Extension(user): Extension<AuthUser>) -> String {
        user.username
    }

    fn gated_router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth,
            ))
            .with_state(state)
    }

    fn gate_request(token: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn register_body(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn login_body(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret123").unwrap();
        assert_ne!(hash, "secret123");
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("secret123", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_gate_missing_token_is_401() {
        let state = test_state().await;
        let response = gated_router(state)
            .oneshot(gate_request(None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_gate_bad_signature_is_403() {
        let state = test_state().await;
        let forged = token::issue("some-other-secret", &uuid::Uuid::new_v4().to_string(), "alice")
            .unwrap();
        let response = gated_router(state)
            .oneshot(gate_request(Some(&forged)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_gate_expired_token_is_403_not_401() {
        let state = test_state().await;
        let secret = state.config.auth.jwt_secret.clone();

        // Well-formed, correctly signed, but past its expiry
        let now = chrono::Utc::now();
        let claims = token::Claims {
            id: uuid::Uuid::new_v4().to_string(),
            username: "alice".to_string(),
            iat: (now - chrono::Duration::hours(2)).timestamp(),
            exp: (now - chrono::Duration::hours(1)).timestamp(),
        };
        let expired = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let response = gated_router(state)
            .oneshot(gate_request(Some(&expired)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_gate_rejects_malformed_subject_id() {
        let state = test_state().await;
        let token = token::issue(&state.config.auth.jwt_secret, "not-a-uuid", "alice").unwrap();
        let response = gated_router(state)
            .oneshot(gate_request(Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_gate_passes_valid_token_with_identity() {
        let state = test_state().await;
        let token = token::issue(
            &state.config.auth.jwt_secret,
            &uuid::Uuid::new_v4().to_string(),
            "alice",
        )
        .unwrap();
        let response = gated_router(state)
            .oneshot(gate_request(Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_account() {
        let state = test_state().await;

        let (status, Json(first)) = register(
            State(state.clone()),
            Json(register_body("alice", "alice@example.com", "secret123")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let err = register(
            State(state.clone()),
            Json(register_body("alice", "other@example.com", "different1")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        // First record unaffected: the original credentials still log in
        let Json(session) = login(State(state), Json(login_body("alice", "secret123")))
            .await
            .unwrap();
        assert_eq!(session.user.id, first.user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let state = test_state().await;
        register(
            State(state.clone()),
            Json(register_body("alice", "alice@example.com", "secret123")),
        )
        .await
        .unwrap();

        let err = login(State(state), Json(login_body("alice", "wrong-password")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_unknown_username_is_404() {
        let state = test_state().await;
        let err = login(State(state), Json(login_body("nobody", "secret123")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_token_passes_the_gate() {
        let state = test_state().await;
        register(
            State(state.clone()),
            Json(register_body("alice", "alice@example.com", "secret123")),
        )
        .await
        .unwrap();
        let Json(session) = login(
            State(state.clone()),
            Json(login_body("alice", "secret123")),
        )
        .await
        .unwrap();

        let response = gated_router(state)
            .oneshot(gate_request(Some(&session.token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
