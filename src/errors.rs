use std::{fmt::Display, string::FromUtf8Error};

#[derive(Debug)]
pub enum CovError {
    IoError(std::io::Error),
    StringFromUtf8(FromUtf8Error),
    GlobPattern(glob::PatternError),
    Regex(regex::Error),
    Json(serde_json::Error),
    InvalidArgument(String),
    ToolNotFound(String),
    RuntimeError(String),
}

impl std::error::Error for CovError {}

impl Display for CovError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CovError::IoError(io_error) => write!(f, "{}", io_error),
            CovError::StringFromUtf8(error) => write!(f, "{}", error),
            CovError::GlobPattern(error) => write!(f, "{}", error),
            CovError::Regex(error) => write!(f, "{}", error),
            CovError::Json(error) => write!(f, "{}", error),
            CovError::InvalidArgument(error) => write!(f, "{}", error),
            CovError::ToolNotFound(tool) => write!(f, "Executable not found: {}", tool),
            CovError::RuntimeError(error) => write!(f, "{}", error),
        }
    }
}

impl From<std::io::Error> for CovError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl From<FromUtf8Error> for CovError {
    fn from(value: FromUtf8Error) -> Self {
        Self::StringFromUtf8(value)
    }
}

impl From<glob::PatternError> for CovError {
    fn from(value: glob::PatternError) -> Self {
        Self::GlobPattern(value)
    }
}

impl From<regex::Error> for CovError {
    fn from(value: regex::Error) -> Self {
        Self::Regex(value)
    }
}

impl From<serde_json::Error> for CovError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
