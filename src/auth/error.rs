#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No token held by the auth session")]
    MissingToken,

    #[error("Failed to decode token: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error("Token has no valid expiry claim")]
    InvalidExpiry,

    #[error("Auth session lock was poisoned")]
    Lock,
}
