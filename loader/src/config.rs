//! Loader configuration.
//!
//! Settings come from the environment (a `.env` file is honoured by the CLI
//! through `dotenvy`) and can be overridden by command-line flags.
//!
//! | Variable                  | Default | Meaning                                 |
//! |---------------------------|---------|-----------------------------------------|
//! | `FLEET_MAX_LOGGED_ERRORS` | `5`     | Data errors echoed to the log per batch |
//! | `FLEET_LOG_RECORDS`       | `false` | Emit a debug event for every record     |

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

pub const MAX_LOGGED_ERRORS_VAR: &str = "FLEET_MAX_LOGGED_ERRORS";
pub const LOG_RECORDS_VAR: &str = "FLEET_LOG_RECORDS";

/// Tuning knobs for [`crate::FleetLoader`]. None of them change what is
/// loaded or collected, only what is logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// How many data errors of one batch are echoed as warnings.
    pub max_logged_errors: usize,

    /// Emit a debug event for every record processed.
    pub log_records: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_logged_errors: 5,
            log_records: false,
        }
    }
}

impl LoaderConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_LOGGED_ERRORS_VAR) {
            config.max_logged_errors = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: MAX_LOGGED_ERRORS_VAR.to_string(),
                value: raw.clone(),
                message: "expected a non-negative integer".to_string(),
            })?;
        }

        if let Some(raw) = lookup(LOG_RECORDS_VAR) {
            config.log_records = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
                var: LOG_RECORDS_VAR.to_string(),
                value: raw.clone(),
                message: "expected true/false".to_string(),
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
