//! Configuration section schemas.
//!
//! Each section maps to a table in the configuration file:
//!
//! - [`ValidatorConfig`] - `[validator]`, date format and custom regex rules
//! - [`LoggingConfig`] - `[logging]`, structured log output

use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default date layout for the `dateformat`, `minimumage` and `maximumage` rules.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validator configuration.
///
/// Keys accept both the camelCase spelling used by form configuration files
/// (`dateFormat`, `customRegex`) and snake_case.
///
/// # Example
///
/// ```
/// use formwright_config::ValidatorConfig;
///
/// let config: ValidatorConfig = toml::from_str(r#"
///     dateFormat = "%d.%m.%Y"
///
///     [customRegex]
///     zipcode = "[0-9]{5}"
/// "#).unwrap();
///
/// assert_eq!(config.date_format, "%d.%m.%Y");
/// assert_eq!(config.custom_regex["zipcode"], "[0-9]{5}");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    /// chrono format string used to parse date fields.
    #[serde(
        rename = "dateFormat",
        alias = "date_format",
        default = "default_date_format"
    )]
    pub date_format: String,

    /// Rule name to regular expression. Each entry becomes a validation rule
    /// matching the whole field value.
    #[serde(rename = "customRegex", alias = "custom_regex", default)]
    pub custom_regex: IndexMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            custom_regex: IndexMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Checks the date format and compiles every custom pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_format.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "validator.dateFormat",
                "must not be empty",
            ));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::invalid_value(
                "validator.dateFormat",
                format!("invalid date format: {}", self.date_format),
            ));
        }

        for (name, pattern) in &self.custom_regex {
            if name.is_empty() || name.contains([',', '=']) {
                return Err(ConfigError::invalid_value(
                    "validator.customRegex",
                    format!("invalid rule name: '{name}'"),
                ));
            }
            Regex::new(pattern).map_err(|e| {
                ConfigError::invalid_value(format!("validator.customRegex.{name}"), e.to_string())
            })?;
        }

        Ok(())
    }
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Checks the log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::invalid_value(
                "logging.level",
                format!("unknown level '{other}'"),
            )),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert!(config.custom_regex.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validator_snake_case_alias() {
        let config: ValidatorConfig = serde_json::from_str(
            r#"{"date_format": "%m/%d/%Y", "custom_regex": {"sku": "[A-Z]{3}-[0-9]+"}}"#,
        )
        .unwrap();

        assert_eq!(config.date_format, "%m/%d/%Y");
        assert_eq!(config.custom_regex["sku"], "[A-Z]{3}-[0-9]+");
    }

    #[test]
    fn test_validator_rejects_unknown_fields() {
        let result: Result<ValidatorConfig, _> = serde_json::from_str(r#"{"timeFormat": "%H"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validator_invalid_regex() {
        let mut config = ValidatorConfig::default();
        config
            .custom_regex
            .insert("broken".to_string(), "([a-z]".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("validator.customRegex.broken"));
    }

    #[test]
    fn test_validator_invalid_rule_name() {
        let mut config = ValidatorConfig::default();
        config
            .custom_regex
            .insert("zip,code".to_string(), "[0-9]+".to_string());

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validator_invalid_date_format() {
        let config = ValidatorConfig {
            date_format: "%Q-%m".to_string(),
            ..ValidatorConfig::default()
        };
        assert!(config.validate().is_err());

        let empty = ValidatorConfig {
            date_format: "  ".to_string(),
            ..ValidatorConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_logging_level_validation() {
        let config = LoggingConfig {
            level: "verbose".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);

        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
    }
}
