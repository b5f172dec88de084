#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
