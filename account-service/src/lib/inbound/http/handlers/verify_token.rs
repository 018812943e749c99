use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Verify a raw session token and return its claims.
pub async fn verify_token(
    State(state): State<AppState>,
    Json(body): Json<VerifyTokenRequestBody>,
) -> Result<ApiSuccess<VerifyTokenResponseData>, ApiError> {
    let claims = state
        .tokens
        .parse(&body.token)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid or expired token: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        VerifyTokenResponseData {
            sub: claims.sub,
            exp: claims.exp,
            iat: claims.iat,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyTokenRequestBody {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyTokenResponseData {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}
