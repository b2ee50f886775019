//! Error types for the fleet loader.
//!
//! Two kinds of failure live in this crate and they are kept apart:
//!
//! - Per-record problems (a missing field, an unknown vehicle type, a
//!   rejected entity) are *collected* as [`crate::validation::DataError`]
//!   values and never propagate out of [`crate::FleetLoader::ingest`].
//! - Operational failures (reading an input file, bad configuration) are the
//!   enums below and propagate with `?`:
//!
//! - [`EntityError`] - Entity construction errors
//! - [`InputError`] - Input file reading and decoding errors
//! - [`ConfigError`] - Environment configuration errors
//! - [`FleetError`] - Top-level errors for the CLI
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Entity Construction Errors
// =============================================================================

/// Errors raised while building a [`crate::Car`] or [`crate::Drone`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// Identifier is not a non-empty string.
    #[error("identifier must be a non-empty string")]
    InvalidIdentifier,

    /// Model is not a non-empty string.
    #[error("model must be a non-empty string")]
    InvalidModel,

    /// Position could not be read as a coordinate pair.
    #[error("invalid position: {0}")]
    InvalidPosition(String),

    /// A field assigned after construction was rejected.
    #[error("invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading raw records from a file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Failed to read file.
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON document.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid line in a JSON Lines document.
    #[error("Invalid JSON on line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid CSV document.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Document decoded but is neither a record nor a list of records.
    #[error("Expected a record or an array of records, found {0}")]
    UnexpectedShape(String),

    /// Format could not be inferred or was not recognised.
    #[error("Unknown input format: {0}")]
    UnknownFormat(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading loader configuration from the environment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Environment variable holds a value that cannot be used.
    #[error("Invalid value '{value}' for {var}: {message}")]
    InvalidValue {
        var: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Top-level errors surfaced by the `fleet-loader` binary.
#[derive(Debug, Error)]
pub enum FleetError {
    /// Input error.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to write output.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize output.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Lookup found nothing.
    #[error("No vehicle with identifier '{0}'")]
    NotFound(String),

    /// Records were rejected while running in strict mode.
    #[error("{0} data errors collected")]
    Rejected(usize),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for entity construction.
pub type EntityResult<T> = Result<T, EntityError>;

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for the CLI.
pub type FleetResult<T> = Result<T, FleetError>;
