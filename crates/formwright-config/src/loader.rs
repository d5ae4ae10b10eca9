//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, and environment variables.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{ConfigError, FormwrightConfig, LogFormat};

/// Configuration loader with layered approach.
///
/// Later layers override earlier ones:
/// 1. Default values or a preset (built into the code)
/// 2. Configuration files or strings (TOML or JSON)
/// 3. Environment variables
///
/// A file or string only overrides the keys it sets. Custom regex rules are
/// added to the ones already loaded, replacing rules of the same name.
///
/// # Example
///
/// ```no_run
/// use formwright_config::ConfigLoader;
///
/// # fn main() -> Result<(), formwright_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_file("forms.toml")?
///     .with_env_prefix("FORMWRIGHT")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: FormwrightConfig,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FormwrightConfig::default(),
            env_prefix: None,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = FormwrightConfig::default();
        self
    }

    /// Start with development preset configuration.
    #[must_use]
    pub fn with_development(mut self) -> Self {
        self.config = FormwrightConfig::development();
        self
    }

    /// Load configuration from a file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        let layer = Self::parse_file(&content, path)?;
        layer.merge_into(&mut self.config);
        Ok(self)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Example
    ///
    /// ```
    /// use formwright_config::ConfigLoader;
    ///
    /// let toml = r#"
    ///     [validator]
    ///     dateFormat = "%d/%m/%Y"
    /// "#;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.validator.date_format, "%d/%m/%Y");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let layer: ConfigLayer = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        layer.merge_into(&mut self.config);
        Ok(self)
    }

    /// Set environment variable prefix for overrides.
    ///
    /// Environment variables use the format `PREFIX__SECTION__KEY`:
    /// - `FORMWRIGHT__VALIDATOR__DATE_FORMAT=%d.%m.%Y`
    /// - `FORMWRIGHT__VALIDATOR__CUSTOM_REGEX__ZIPCODE=[0-9]{5}` (rule `zipcode`)
    /// - `FORMWRIGHT__VALIDATOR__CUSTOM_REGEX__germanZip=[0-9]{5}` (rule `germanZip`)
    ///
    /// An all-uppercase rule name is lowercased; a name with any lowercase
    /// letter is kept as written.
    /// - `FORMWRIGHT__LOGGING__LEVEL=debug`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load a `.env` file for environment variables, if one exists.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::validation_error(format!(
                "failed to load .env file: {e}"
            ))),
        }
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies environment variable overrides (if a prefix was set) and
    /// validates the final configuration.
    pub fn load(mut self) -> Result<FormwrightConfig, ConfigError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.config.validate()?;
        Ok(self.config)
    }

    /// Finalize without validation.
    #[must_use]
    pub fn load_unvalidated(self) -> FormwrightConfig {
        self.config
    }

    fn parse_file(content: &str, path: &Path) -> Result<ConfigLayer, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let env_vars: HashMap<String, String> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();

        for (key, value) in env_vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
        let key_without_prefix = key
            .strip_prefix(prefix)
            .and_then(|k| k.strip_prefix("__"))
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let parts: Vec<&str> = key_without_prefix.split("__").collect();

        match parts.as_slice() {
            ["VALIDATOR", "DATE_FORMAT"] => {
                self.config.validator.date_format = value.to_string();
            }
            ["VALIDATOR", "CUSTOM_REGEX", name] => {
                if name.is_empty() {
                    return Err(ConfigError::env_parse_error(key, "missing rule name"));
                }
                let rule = if name.chars().any(|c| c.is_ascii_lowercase()) {
                    (*name).to_string()
                } else {
                    name.to_lowercase()
                };
                self.config
                    .validator
                    .custom_regex
                    .insert(rule, value.to_string());
            }

            ["LOGGING", "ENABLED"] => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.config.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.config.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(ConfigError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }

            // Unknown key, ignored
            _ => {}
        }

        Ok(())
    }
}

/// Keys set by one file or string.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(default)]
    validator: ValidatorLayer,
    #[serde(default)]
    logging: LoggingLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ValidatorLayer {
    #[serde(rename = "dateFormat", alias = "date_format")]
    date_format: Option<String>,
    #[serde(rename = "customRegex", alias = "custom_regex", default)]
    custom_regex: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingLayer {
    enabled: Option<bool>,
    level: Option<String>,
    format: Option<LogFormat>,
}

impl ConfigLayer {
    fn merge_into(self, config: &mut FormwrightConfig) {
        if let Some(date_format) = self.validator.date_format {
            config.validator.date_format = date_format;
        }
        config.validator.custom_regex.extend(self.validator.custom_regex);

        if let Some(enabled) = self.logging.enabled {
            config.logging.enabled = enabled;
        }
        if let Some(level) = self.logging.level {
            config.logging.level = level;
        }
        if let Some(format) = self.logging.format {
            config.logging.format = format;
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loader_new() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.validator.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_loader_with_development() {
        let config = ConfigLoader::new().with_development().load().unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"validator": {"customRegex": {"zipcode": "[0-9]{5}"}}}"#;

        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.validator.custom_regex["zipcode"], "[0-9]{5}");
    }

    #[test]
    fn test_loader_with_string_unsupported_format() {
        let result = ConfigLoader::new().with_string("a: b", "yaml");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_loader_load_validates() {
        let toml = r#"
            [validator.customRegex]
            broken = "(["
        "#;

        let loader = ConfigLoader::new().with_string(toml, "toml").unwrap();
        assert!(loader.load().is_err());
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [validator]
            dateFormat = "%d.%m.%Y"

            [validator.customRegex]
            phone = "\\+?[0-9 ]+"

            [logging]
            level = "warn"
            format = "pretty"
            "#
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

        assert_eq!(config.validator.date_format, "%d.%m.%Y");
        assert_eq!(config.validator.custom_regex["phone"], "\\+?[0-9 ]+");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_file_merges_into_preset() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [validator]
            dateFormat = "%d.%m.%Y"
            "#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_development()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.validator.date_format, "%d.%m.%Y");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_later_strings_add_rules() {
        let config = ConfigLoader::new()
            .with_string(r#"{"validator": {"customRegex": {"zipcode": "[0-9]{5}"}}}"#, "json")
            .unwrap()
            .with_string(
                r#"
                [validator.custom_regex]
                phone = "[0-9 ]+"
                zipcode = "[0-9]{4}"
                "#,
                "toml",
            )
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.validator.custom_regex.len(), 2);
        assert_eq!(config.validator.custom_regex["zipcode"], "[0-9]{4}");
        assert_eq!(config.validator.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_loader_rejects_unknown_keys() {
        let result = ConfigLoader::new().with_string("[server]\nport = 1", "toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_with_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let result = ConfigLoader::new().with_file(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_loader_with_file_not_found() {
        let result = ConfigLoader::new().with_file("/nonexistent/forms.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_loader_with_optional_file_not_found() {
        let config = ConfigLoader::new()
            .with_optional_file("/nonexistent/forms.toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config, FormwrightConfig::default());
    }

    #[test]
    fn test_loader_load_unvalidated() {
        let toml = r#"
            [logging]
            level = "chatty"
        "#;

        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load_unvalidated();

        assert_eq!(config.logging.level, "chatty");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("On"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_apply_env_var_date_format() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__VALIDATOR__DATE_FORMAT", "%d.%m.%Y", "TEST")
            .unwrap();
        assert_eq!(loader.config.validator.date_format, "%d.%m.%Y");
    }

    #[test]
    fn test_apply_env_var_custom_regex() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__VALIDATOR__CUSTOM_REGEX__ZIPCODE", "[0-9]{5}", "TEST")
            .unwrap();
        assert_eq!(loader.config.validator.custom_regex["zipcode"], "[0-9]{5}");
    }

    #[test]
    fn test_apply_env_var_custom_regex_keeps_mixed_case() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__VALIDATOR__CUSTOM_REGEX__germanZip", "[0-9]{5}", "TEST")
            .unwrap();
        assert_eq!(loader.config.validator.custom_regex["germanZip"], "[0-9]{5}");
        assert!(!loader.config.validator.custom_regex.contains_key("germanzip"));
    }

    #[test]
    fn test_apply_env_var_logging() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__LOGGING__LEVEL", "debug", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__FORMAT", "pretty", "TEST")
            .unwrap();
        loader
            .apply_env_var("TEST__LOGGING__ENABLED", "off", "TEST")
            .unwrap();

        assert_eq!(loader.config.logging.level, "debug");
        assert_eq!(loader.config.logging.format, LogFormat::Pretty);
        assert!(!loader.config.logging.enabled);
    }

    #[test]
    fn test_apply_env_var_invalid_boolean() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__LOGGING__ENABLED", "sometimes", "TEST");
        assert!(matches!(result, Err(ConfigError::EnvParseError { .. })));
    }

    #[test]
    fn test_apply_env_var_invalid_format() {
        let mut loader = ConfigLoader::new();
        let result = loader.apply_env_var("TEST__LOGGING__FORMAT", "xml", "TEST");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_env_var_unknown_key_ignored() {
        let mut loader = ConfigLoader::new();
        loader
            .apply_env_var("TEST__SERVER__PORT", "8080", "TEST")
            .unwrap();
        assert_eq!(loader.config, FormwrightConfig::default());
    }
}
