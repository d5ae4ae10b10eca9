//! Typed configuration for Formwright.
//!
//! This crate loads the settings consumed by the form pipeline:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [validator]
//! dateFormat = "%Y-%m-%d"
//!
//! [validator.customRegex]
//! zipcode = "[0-9]{5}"
//! phone = "\\+?[0-9 ]{6,}"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with `PREFIX__SECTION__KEY` variables:
//!
//! - `FORMWRIGHT__VALIDATOR__DATE_FORMAT=%d.%m.%Y`
//! - `FORMWRIGHT__VALIDATOR__CUSTOM_REGEX__ZIPCODE=[0-9]{5}`
//! - `FORMWRIGHT__LOGGING__FORMAT=pretty`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{FormwrightConfig, FormwrightConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, ValidatorConfig, DEFAULT_DATE_FORMAT};
