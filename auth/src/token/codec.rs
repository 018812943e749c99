use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::TokenError;

/// Session token codec: issues and validates signed, time-limited tokens.
///
/// Signing uses a symmetric secret and an HMAC algorithm, both supplied at
/// construction. Tokens are stateless: the subject and expiry travel inside
/// the token, nothing is stored server-side.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec using wall-clock time.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret (should be stored securely)
    /// * `algorithm` - HMAC signing algorithm (HS256, HS384, or HS512)
    /// * `ttl_minutes` - Token time-to-live in minutes
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is not an HMAC variant
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl_minutes: i64) -> Result<Self, TokenError> {
        Self::with_clock(secret, algorithm, ttl_minutes, Box::new(SystemClock))
    }

    /// Create a codec with an injected clock.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is not an HMAC variant
    pub fn with_clock(
        secret: &[u8],
        algorithm: Algorithm,
        ttl_minutes: i64,
        clock: Box<dyn Clock>,
    ) -> Result<Self, TokenError> {
        // Symmetric secrets only make sense with the HMAC family
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            ttl: Duration::minutes(ttl_minutes),
            clock,
        })
    }

    /// Issue a signed token for a subject.
    ///
    /// The expiry is the current time plus the configured TTL.
    ///
    /// # Arguments
    /// * `subject` - Identity value embedded in the token (the user's email)
    ///
    /// # Returns
    /// Opaque signed token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = self.clock.now();
        let claims = SessionClaims {
            sub: subject.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token.
    ///
    /// Rejects tokens signed with a different secret or algorithm, and
    /// tokens whose expiry has passed according to the codec's clock.
    ///
    /// # Arguments
    /// * `token` - Token string to validate
    ///
    /// # Returns
    /// The embedded claims
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch or malformed token
    /// * `ExpiredToken` - Current time is at or past the encoded expiry
    pub fn parse(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked against the injected clock, not the library's
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;
        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(TokenError::ExpiredToken);
        }

        Ok(claims)
    }
}
