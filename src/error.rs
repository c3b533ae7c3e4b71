use std::path::PathBuf;

use crate::directory::DirectoryError;
use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("assignment error: {0}")]
    Assignment(String),

    #[error("assignment validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, Error>;
