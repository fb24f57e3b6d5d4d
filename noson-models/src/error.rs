//! Error types for noson-models

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid media host: {0}")]
    InvalidHost(String),

    #[error("Invalid port in media host: {0}")]
    InvalidPort(String),

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(String),
}
