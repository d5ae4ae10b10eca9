//! Main configuration types.
//!
//! This module provides the top-level [`FormwrightConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, ValidatorConfig};

/// Complete Formwright configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use formwright_config::FormwrightConfig;
///
/// let config = FormwrightConfig::default();
/// assert_eq!(config.validator.date_format, "%Y-%m-%d");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct FormwrightConfig {
    /// Validator configuration (date format, custom regex rules).
    #[serde(default)]
    pub validator: ValidatorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FormwrightConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> FormwrightConfigBuilder {
        FormwrightConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The date format is empty or not a valid chrono format
    /// - A custom regex rule has an invalid name or pattern
    /// - The log level is unknown
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validator.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty log output at debug level.
    ///
    /// # Example
    ///
    /// ```
    /// use formwright_config::FormwrightConfig;
    ///
    /// let config = FormwrightConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON log output at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`FormwrightConfig`].
#[derive(Debug, Default)]
pub struct FormwrightConfigBuilder {
    validator: Option<ValidatorConfig>,
    logging: Option<LoggingConfig>,
}

impl FormwrightConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validator configuration.
    #[must_use]
    pub fn validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> FormwrightConfig {
        FormwrightConfig {
            validator: self.validator.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<FormwrightConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
