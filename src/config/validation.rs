//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the level and format names
//! - Require a file path when file output is enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LoggerConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::{LoggerConfig, OutputFormat};
use crate::logging::Level;

/// A single semantic problem in a [`LoggerConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown level {0:?}")]
    UnknownLevel(String),

    #[error("unknown format {0:?}")]
    UnknownFormat(String),

    #[error("enable_file is set but file_path is empty")]
    MissingFilePath,
}

/// Check a config, collecting every problem found.
pub fn validate_config(config: &LoggerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.level.parse::<Level>().is_err() {
        errors.push(ValidationError::UnknownLevel(config.level.clone()));
    }

    if let Err(format) = config.format.parse::<OutputFormat>() {
        errors.push(ValidationError::UnknownFormat(format));
    }

    if config.enable_file && config.file_path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingFilePath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
