use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;

use super::ApiSuccess;
use crate::inbound::http::middleware::SESSION_COOKIE;

/// Logout: clear the session cookie. Tokens are stateless, so there is
/// nothing to revoke server-side.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiSuccess<LogoutResponseData>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/");

    (
        jar.remove(removal),
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Logout successful".to_string(),
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
