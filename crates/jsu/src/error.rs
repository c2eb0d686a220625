//! Error types for the jsu facade.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(#[from] figment::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
