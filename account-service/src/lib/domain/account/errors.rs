use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must not be empty")]
    Empty,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced by the user Directory.
///
/// `DuplicateEmail` is the authoritative uniqueness signal: the store
/// enforces one account per email and reports violations here. Everything
/// else is an opaque storage failure passed through unchanged.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] auth::HashError),

    // Domain-level errors
    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    #[error("User not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DirectoryError> for AccountError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::DuplicateEmail(email) => AccountError::EmailAlreadyRegistered(email),
            DirectoryError::Storage(msg) => AccountError::Storage(msg),
        }
    }
}
