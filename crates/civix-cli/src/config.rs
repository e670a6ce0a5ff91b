// crates/civix-cli/src/config.rs
// ============================================================================
// Module: Civix CLI Configuration
// Description: Configuration loading and validation for the Civix CLI.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a strict size limit and
//! unknown keys rejected. An explicitly named file (flag or environment
//! variable) must exist and parse; only the implicit default file may be
//! absent, in which case built-in defaults apply.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "civix.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CIVIX_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Civix CLI configuration.
///
/// # Invariants
/// - Unknown keys are rejected at parse time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Rule store defaults.
    #[serde(default)]
    pub store: StoreSection,
}

/// Rule store configuration section.
///
/// # Invariants
/// - Unknown keys are rejected at parse time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Default path to the SQLite rule library.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly named configuration file does not exist.
    #[error("config file not found: {path}")]
    NotFound {
        /// Path that was requested.
        path: PathBuf,
    },
    /// The configuration file exceeds the size limit.
    #[error("config file too large: {path} ({actual_bytes} > {max_bytes} bytes)")]
    TooLarge {
        /// Path that was rejected.
        path: PathBuf,
        /// Maximum allowed bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        actual_bytes: u64,
    },
    /// The configuration file could not be read.
    #[error("config read error for {path}: {message}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// The configuration file failed to parse.
    #[error("config parse error for {path}: {message}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads the CLI configuration.
///
/// Resolution order: the explicit path, then [`CONFIG_ENV_VAR`], then the
/// default filename in the working directory. Explicitly named files must
/// exist; a missing default file yields built-in defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] when a named file is missing, oversized,
/// unreadable, or fails to parse.
pub fn load(explicit: Option<&Path>) -> Result<CliConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_file(path, true);
    }

    if let Some(env_path) = env::var_os(CONFIG_ENV_VAR) {
        return load_file(Path::new(&env_path), true);
    }

    load_file(Path::new(DEFAULT_CONFIG_NAME), false)
}

/// Loads and parses one configuration file.
///
/// `required` controls whether a missing file is an error or defaults.
fn load_file(path: &Path, required: bool) -> Result<CliConfig, ConfigError> {
    if !path.exists() {
        if required {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        return Ok(CliConfig::default());
    }

    let metadata = fs::metadata(path).map_err(|err| ConfigError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            max_bytes: MAX_CONFIG_FILE_SIZE,
            actual_bytes: metadata.len(),
        });
    }

    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
