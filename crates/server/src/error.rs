use bankfront_http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("auth.jwt_secret must be set (BANKFRONT__AUTH__JWT_SECRET)")]
    MissingJwtSecret,

    #[error("Failed to build upstream client: {0}")]
    Upstream(#[from] HttpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
