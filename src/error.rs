use crate::api::ApiError;
use thiserror::Error;

/// Application-level errors for the runner, auth and config layers
///
/// The API client keeps its own error-as-data enum (`api::ApiError`);
/// this type wraps it where failures bubble up to the entry points.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("API error: {0}")]
    Api(ApiError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Api(err)
    }
}

impl AppError {
    /// Whether the user can plausibly fix this by retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Api(api) => matches!(api, ApiError::Network { .. } | ApiError::Http { .. }),
            AppError::Auth(_) => false,
            AppError::Config(_) => false,
            _ => false,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
