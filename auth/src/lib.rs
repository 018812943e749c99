//! Authentication infrastructure library
//!
//! Provides the credential-handling building blocks for the account service:
//! - Password hashing (Argon2id) with a tunable cost factor
//! - Signed, time-limited session tokens (JWT) with an injectable clock
//!
//! The service defines its own ports and adapts these implementations, so the
//! domain layer never depends on a concrete hash or token format.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("not_my_password", &digest));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenCodec;
//! use jsonwebtoken::Algorithm;
//!
//! let codec = TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Algorithm::HS256,
//!     30,
//! )
//! .unwrap();
//! let token = codec.issue("alice@example.com").unwrap();
//! let claims = codec.parse(&token).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::HashError;
pub use password::PasswordHasher;
pub use token::Clock;
pub use token::SessionClaims;
pub use token::SystemClock;
pub use token::TokenCodec;
pub use token::TokenError;
