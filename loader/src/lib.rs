//! # Fleet Loader - validate and load raw fleet records
//!
//! Fleet Loader takes untyped vehicle records (cars and drones, as JSON
//! values), checks each one against the required fields of its type, and
//! turns the valid ones into typed entities. Everything that goes wrong is
//! collected as data, never raised.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ JSON / CSV  │────▶│    Input    │────▶│  Validation │────▶│  Car/Drone  │
//! │   records   │     │  (decode)   │     │ (per type)  │     │ + DataError │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fleet_loader::FleetLoader;
//! use serde_json::json;
//!
//! let mut loader = FleetLoader::new();
//! loader.ingest(&[json!({
//!     "type": "car", "license": "ABC1", "model": "Civic",
//!     "latLong": [1, 2], "miles": "1200", "make": "Honda"
//! })]);
//! assert_eq!(loader.find_car_by_identifier("ABC1").unwrap().mileage(), 1200.0);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Domain models (Car, Drone, LatLong)
//! - [`validation`] - Per-type field checks and collected data errors
//! - [`loader`] - The fleet loader itself
//! - [`input`] - Reading records from JSON, JSON Lines and CSV files
//! - [`config`] - Environment configuration
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Validation
pub mod validation;

// Loading
pub mod loader;

// Input files
pub mod input;

// Ambient
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, EntityError, FleetError, InputError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Car, Drone, LatLong, VehicleKind};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{check_car, check_drone, DataError, DataErrorKind};

// =============================================================================
// Re-exports - Loader
// =============================================================================

pub use loader::{FleetLoader, FleetSnapshot, IngestReport, LoadSummary};

// =============================================================================
// Re-exports - Input and config
// =============================================================================

pub use config::LoaderConfig;
pub use input::{load_paths, read_records, InputFormat};
