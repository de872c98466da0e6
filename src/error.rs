use thiserror::Error;

use crate::storage::StorageError;

/// Everything a request can fail with once the function is running.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized!")]
    Unauthorized,

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Storage provider error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest(reason.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::MalformedRequest(_) => 400,
            Self::Storage(_) => 500,
        }
    }
}
