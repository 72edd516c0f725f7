//! Authentication error types.

use thiserror::Error;

/// Errors produced while verifying bearer tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on the request.
    #[error("Missing bearer token")]
    MissingToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Signature verification failed.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token uses an algorithm other than RS256.
    #[error("Invalid token algorithm")]
    InvalidAlgorithm,

    /// Token is malformed or fails validation.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// A required claim is absent.
    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    /// A verification key is malformed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The JWKS endpoint could not be fetched or parsed.
    #[error("JWKS fetch failed: {0}")]
    JwksFetchFailed(String),

    /// No key in the JWKS matches the token's kid.
    #[error("Signing key not found: {0}")]
    KeyNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "Missing bearer token");
        assert_eq!(AuthError::TokenExpired.to_string(), "Token expired");
        assert_eq!(
            AuthError::KeyNotFound("kid-1".to_string()).to_string(),
            "Signing key not found: kid-1"
        );
    }
}
