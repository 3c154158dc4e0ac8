//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and the log-filter directive
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ServerConfig -> Result<(), Vec<ValidationError>>

use tracing_subscriber::EnvFilter;

use crate::config::schema::ServerConfig;

/// A single semantic configuration error.
#[derive(Debug)]
pub enum ValidationError {
    ZeroMaxConnections,
    EmptyContractFile,
    InvalidLogLevel(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ZeroMaxConnections => {
                write!(f, "listener.max_connections must be greater than 0")
            }
            ValidationError::EmptyContractFile => {
                write!(f, "storage.contract_file must not be empty")
            }
            ValidationError::InvalidLogLevel(level) => {
                write!(f, "observability.log_level {:?} is not a valid filter", level)
            }
        }
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }
    if config.storage.contract_file.is_empty() {
        errors.push(ValidationError::EmptyContractFile);
    }
    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
