use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// The subject is the authentication principal (the user's email address).
/// Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (authentication principal, typically an email address)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl SessionClaims {
    /// Check if the token is expired at the given instant.
    ///
    /// A token is expired once the current time reaches its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
