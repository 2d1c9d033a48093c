// Crate-wide error handling

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(String),
    Network(String),
    Io(std::io::Error),
    Decode(serde_json::Error),
    Route(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Io(err) => write!(f, "IO error: {}", err),
            AppError::Decode(err) => write!(f, "Decode error: {}", err),
            AppError::Route(msg) => write!(f, "Route error: {}", msg),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
