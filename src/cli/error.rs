use std::path::PathBuf;

use thiserror::Error;

use crate::common::error::QRError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("failed to encode QR code: {0}")]
    Encoding(#[source] QRError),

    #[error("failed to render QR code: {0}")]
    Raster(#[source] QRError),

    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Process exit status. 2 is reserved for a rejected URL.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            _ => 1,
        }
    }
}
