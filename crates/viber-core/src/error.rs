use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViberError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("internal error: {0}")]
    Internal(String),
}
