use portfolio::PortfolioError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not load configuration: {0}")]
    ConfigError(String),

    #[error("Could not print result: {0}")]
    OutputError(#[from] serde_json::Error),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    PortfolioError(#[from] PortfolioError),
}
