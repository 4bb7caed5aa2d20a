use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Invalid schema: {0}")]
    SchemaParse(String),

    #[error("Invalid max depth {0}: selections need at least one level")]
    InvalidDepth(usize),
}
