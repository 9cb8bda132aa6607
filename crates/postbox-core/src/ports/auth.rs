//! Authentication ports.

/// Claims carried by a bearer token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Identifier of the authenticated caller.
    pub subject: String,
    pub roles: Vec<String>,
}

/// Token service trait for bearer token operations.
pub trait TokenService: Send + Sync {
    /// Mint a token for the given subject.
    fn generate_token(&self, subject: &str, roles: Vec<String>) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
