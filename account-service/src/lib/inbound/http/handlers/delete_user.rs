use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::account::errors::AccountError;
use crate::account::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // Parse user ID
    let user_id = UserId::from_string(&id).map_err(AccountError::from)?;

    // Found/not-found is a boolean outcome from the use case; the transport
    // maps absent ids to 404
    let deleted = state
        .accounts
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)?;

    if !deleted {
        return Err(ApiError::NotFound(format!("User not found: {}", user_id)));
    }

    // 204 carries no body, so skip the response envelope
    Ok(StatusCode::NO_CONTENT)
}
