use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::User;
use crate::inbound::http::router::AppState;

/// Name of the session cookie carrying the signed token
pub const SESSION_COOKIE: &str = "session_id";

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

/// Middleware that validates the session cookie and materializes the
/// current user into request extensions.
///
/// Session validation flow: extract cookie, parse the token, take its
/// subject claim, and load the user by email. Any parse failure or missing
/// user yields an unauthorized outcome.
pub async fn authenticate_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let cookie = jar.get(SESSION_COOKIE).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Missing session cookie"
            })),
        )
            .into_response()
    })?;

    let claims = state.tokens.parse(cookie.value()).map_err(|e| {
        tracing::warn!("Session token validation failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    let email = EmailAddress::new(claims.sub).map_err(|e| {
        tracing::error!("Malformed subject claim in valid token: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid token format"
            })),
        )
            .into_response()
    })?;

    let user = state
        .accounts
        .get_user_by_email(&email)
        .await
        .map_err(|e| match e {
            AccountError::NotFound(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unknown session subject"
                })),
            )
                .into_response(),
            _ => {
                tracing::error!("Failed to load session user: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to load session user"
                    })),
                )
                    .into_response()
            }
        })?;

    req.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(req).await)
}
