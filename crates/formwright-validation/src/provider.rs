//! The validation engine.
//!
//! [`ValidatorProvider`] combines four rule sources. When names collide the
//! first source in this list wins:
//!
//! 1. injected [`FieldValidator`]s
//! 2. regex rules from configuration (`validator.customRegex`)
//! 3. date rules (`dateformat`, `minimumage`, `maximumage`)
//! 4. general-purpose rules (`required`, `email`, `min`, ...)
//!
//! Per field, rules run in expression order and evaluation stops at the
//! first failure, so a field yields at most one finding. Every declared
//! field is checked; findings of all fields are returned together.

use crate::builtin;
use crate::date::{self, Clock, DateRules};
use crate::error::ValidationSetupError;
use crate::field::{FieldLevel, FieldValidator};
use crate::rule::{self, Rule};
use crate::structure::{StructLevel, StructValidator};
use chrono::format::{Item, StrftimeItems};
use formwright_config::{ValidatorConfig, DEFAULT_DATE_FORMAT};
use formwright_core::{FormContext, FormData, FormRequest, ValidationError, ValidationInfo};
use indexmap::IndexMap;
use regex::Regex;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rule that skips the remaining rules of a field when its value is empty.
const OMITEMPTY: &str = "omitempty";

/// Combined validation engine.
///
/// Built once at startup with [`ValidatorProvider::builder`] and shared
/// read-only (`Arc<ValidatorProvider>`) by every handler.
///
/// # Example
///
/// ```
/// use formwright_core::FormContext;
/// use formwright_validation::ValidatorProvider;
///
/// let provider = ValidatorProvider::builder()
///     .with_custom_regex("zipcode", "[0-9]{5}")
///     .build()
///     .unwrap();
///
/// let ctx = FormContext::new();
/// assert!(provider.validate_value(&ctx, "zip", "12345", "required,zipcode").is_none());
///
/// let finding = provider.validate_value(&ctx, "zip", "1234", "required,zipcode").unwrap();
/// assert_eq!(finding.message_key, "formError.zip.zipcode");
/// ```
pub struct ValidatorProvider {
    field_validators: HashMap<String, Arc<dyn FieldValidator>>,
    struct_validators: HashMap<TypeId, Arc<dyn StructValidator>>,
    regex_rules: IndexMap<String, Regex>,
    date_rules: DateRules,
}

impl ValidatorProvider {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ValidatorProviderBuilder {
        ValidatorProviderBuilder::new()
    }

    /// Provider with the general-purpose and date rules only.
    #[must_use]
    pub fn new() -> Self {
        Self {
            field_validators: HashMap::new(),
            struct_validators: HashMap::new(),
            regex_rules: IndexMap::new(),
            date_rules: DateRules::new(DEFAULT_DATE_FORMAT.to_string(), date::system_clock()),
        }
    }

    /// Builds a provider from the `[validator]` configuration section.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, ValidationSetupError> {
        Self::builder().with_config(config).build()
    }

    /// Validates `data`: the rules of every declared field, then the struct
    /// validator registered for the data's type.
    pub fn validate(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
        data: &dyn FormData,
    ) -> ValidationInfo {
        let mut info = ValidationInfo::new();

        let specs = data.field_specs();
        if specs.iter().any(|spec| !spec.rules.is_empty()) {
            match data.encode() {
                Ok(values) => {
                    for spec in specs.iter().filter(|spec| !spec.rules.is_empty()) {
                        let value = values.get(spec.name).unwrap_or("");
                        let level = FieldLevel::new(ctx, spec.name, value)
                            .with_request(req)
                            .with_data(data);
                        if let Some(error) = self.check_field(&level, spec.rules) {
                            info.push_field_error(spec.name, error);
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "could not encode form data for validation");
                    let error = rule::struct_error("encode");
                    info.add_struct_error(error.message_key, e.to_string());
                }
            }
        }

        if let Some(validator) = self.struct_validators.get(&data.as_any().type_id()) {
            let mut level = StructLevel::new();
            validator.validate_struct(ctx, data, &mut level);
            info.merge(level.into_info());
        }

        debug!(
            request_id = %ctx.request_id(),
            findings = info.error_count(),
            "form data validated"
        );
        info
    }

    /// Evaluates a rule expression against a single value.
    ///
    /// Returns the finding of the first failing rule.
    pub fn validate_value(
        &self,
        ctx: &FormContext,
        field: &str,
        value: &str,
        rules: &str,
    ) -> Option<ValidationError> {
        self.check_field(&FieldLevel::new(ctx, field, value), rules)
    }

    /// Returns `true` if `name` resolves to any rule.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        name == OMITEMPTY
            || self.field_validators.contains_key(name)
            || self.regex_rules.contains_key(name)
            || date::DATE_RULES.contains(&name)
            || builtin::BUILTIN_RULES.contains(&name)
    }

    /// Returns `true` if a struct validator is registered for `T`.
    #[must_use]
    pub fn has_struct_validator<T: FormData>(&self) -> bool {
        self.struct_validators.contains_key(&TypeId::of::<T>())
    }

    /// The date format used by the date rules.
    #[must_use]
    pub fn date_format(&self) -> &str {
        self.date_rules.format()
    }

    fn check_field(&self, level: &FieldLevel<'_>, rules: &str) -> Option<ValidationError> {
        let rules = rule::parse_rules(rules);
        if level.value().is_empty() && rules.iter().any(|r| r.name == OMITEMPTY) {
            return None;
        }

        rules
            .iter()
            .filter(|r| r.name != OMITEMPTY)
            .find(|r| !self.check_rule(level, r))
            .map(|r| rule::field_error(level.field(), r.tag()))
    }

    fn check_rule(&self, level: &FieldLevel<'_>, rule: &Rule<'_>) -> bool {
        if let Some(validator) = self.field_validators.get(rule.name) {
            return match rule.param {
                Some(param) => validator.validate_field_with_param(level, param),
                None => validator.validate_field(level),
            };
        }

        if let Some(pattern) = self.regex_rules.get(rule.name) {
            return pattern.is_match(level.value());
        }

        if let Some(passed) = self.date_rules.check(rule.name, rule.param, level.value()) {
            return passed;
        }

        if let Some(passed) = builtin::check(rule.name, rule.param, level.value()) {
            return passed;
        }

        warn!(rule = rule.name, field = level.field(), "unknown validation rule");
        false
    }
}

impl Default for ValidatorProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorProvider")
            .field("field_validators", &self.field_validators.keys().collect::<Vec<_>>())
            .field("struct_validators", &self.struct_validators.len())
            .field("regex_rules", &self.regex_rules.keys().collect::<Vec<_>>())
            .field("date_rules", &self.date_rules)
            .finish()
    }
}

/// Builder for [`ValidatorProvider`].
///
/// Registration is last-write-wins: a second field validator with the same
/// name, or a second struct validator for the same type, replaces the first
/// and logs a warning.
pub struct ValidatorProviderBuilder {
    date_format: String,
    custom_regex: IndexMap<String, String>,
    field_validators: HashMap<String, Arc<dyn FieldValidator>>,
    struct_validators: HashMap<TypeId, Arc<dyn StructValidator>>,
    clock: Clock,
}

impl ValidatorProviderBuilder {
    /// Creates a builder with the default date format and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            custom_regex: IndexMap::new(),
            field_validators: HashMap::new(),
            struct_validators: HashMap::new(),
            clock: date::system_clock(),
        }
    }

    /// Applies the `[validator]` configuration section.
    #[must_use]
    pub fn with_config(mut self, config: &ValidatorConfig) -> Self {
        self.date_format.clone_from(&config.date_format);
        for (name, pattern) in &config.custom_regex {
            self = self.with_custom_regex(name.clone(), pattern.clone());
        }
        self
    }

    /// Sets the chrono format used by the date rules.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Adds a rule matching the whole value against `pattern`.
    #[must_use]
    pub fn with_custom_regex(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.custom_regex.insert(name.into(), pattern.into());
        self
    }

    /// Registers a field validator under its name.
    #[must_use]
    pub fn with_field_validator(mut self, validator: Arc<dyn FieldValidator>) -> Self {
        let name = validator.name().to_string();
        if self.field_validators.insert(name.clone(), validator).is_some() {
            warn!(rule = %name, "field validator replaced by a later registration");
        }
        self
    }

    /// Registers the struct validator for its target type.
    #[must_use]
    pub fn with_struct_validator(mut self, validator: Arc<dyn StructValidator>) -> Self {
        if self
            .struct_validators
            .insert(validator.target_type(), validator)
            .is_some()
        {
            warn!("struct validator replaced by a later registration for the same type");
        }
        self
    }

    /// Replaces the clock used for age rules.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Checks the date format, compiles every regex rule and builds the provider.
    pub fn build(self) -> Result<ValidatorProvider, ValidationSetupError> {
        if self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(ValidationSetupError::InvalidDateFormat {
                format: self.date_format,
            });
        }

        let mut regex_rules = IndexMap::with_capacity(self.custom_regex.len());
        for (name, pattern) in self.custom_regex {
            if !rule::is_valid_rule_name(&name) {
                return Err(ValidationSetupError::InvalidRuleName { name });
            }
            let compiled = Regex::new(&format!("^(?:{pattern})$"))
                .map_err(|source| ValidationSetupError::InvalidPattern {
                    name: name.clone(),
                    source,
                })?;
            regex_rules.insert(name, compiled);
        }

        for name in self.field_validators.keys() {
            if !rule::is_valid_rule_name(name) {
                return Err(ValidationSetupError::InvalidRuleName { name: name.clone() });
            }
        }

        debug!(
            date_format = %self.date_format,
            regex_rules = regex_rules.len(),
            field_validators = self.field_validators.len(),
            struct_validators = self.struct_validators.len(),
            "validator provider built"
        );

        Ok(ValidatorProvider {
            field_validators: self.field_validators,
            struct_validators: self.struct_validators,
            regex_rules,
            date_rules: DateRules::new(self.date_format, self.clock),
        })
    }
}

impl Default for ValidatorProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorProviderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorProviderBuilder")
            .field("date_format", &self.date_format)
            .field("custom_regex", &self.custom_regex)
            .field("field_validators", &self.field_validators.keys().collect::<Vec<_>>())
            .field("struct_validators", &self.struct_validators.len())
            .finish_non_exhaustive()
    }
}
