//! Street seeding configuration from config.toml
//!
//! The street list is owned by the membership side of the system; for
//! first-run convenience the service can seed it from a TOML file so that
//! card generation has something to work against.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// List of street names to seed
    #[serde(default)]
    pub streets: Vec<StreetConfig>,
}

/// Configuration for a single street
#[derive(Debug, Deserialize, Clone)]
pub struct StreetConfig {
    /// Name of the street
    pub name: String,
}

/// Loads street configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads street configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
