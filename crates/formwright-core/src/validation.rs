//! Validation findings.
//!
//! [`ValidationInfo`] collects every finding produced for one request: the
//! main validator's and every extension's. It is derived-valid: a
//! `ValidationInfo` is valid exactly when it holds no findings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single validation finding.
///
/// `message_key` is a stable translation key (for example
/// `formError.email.required`), `default_label` a human-readable fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Translation key.
    pub message_key: String,
    /// Fallback message.
    pub default_label: String,
}

impl ValidationError {
    /// Creates a finding.
    #[must_use]
    pub fn new(message_key: impl Into<String>, default_label: impl Into<String>) -> Self {
        Self {
            message_key: message_key.into(),
            default_label: default_label.into(),
        }
    }
}

/// Aggregated field-level and struct-level findings.
///
/// # Example
///
/// ```
/// use formwright_core::ValidationInfo;
///
/// let mut info = ValidationInfo::new();
/// assert!(info.is_valid());
///
/// info.add_field_error("email", "formError.email.required", "email is required");
/// info.add_struct_error("formError.passwordMismatch", "passwords differ");
///
/// assert!(!info.is_valid());
/// assert_eq!(info.error_count(), 2);
/// assert!(info.has_errors_for_field("email"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationInfo {
    #[serde(default)]
    field_errors: IndexMap<String, Vec<ValidationError>>,
    #[serde(default)]
    struct_errors: Vec<ValidationError>,
}

impl ValidationInfo {
    /// Creates an empty, valid result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no finding was recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.field_errors.values().all(Vec::is_empty) && self.struct_errors.is_empty()
    }

    /// Records a finding for `field`.
    pub fn add_field_error(
        &mut self,
        field: impl Into<String>,
        message_key: impl Into<String>,
        default_label: impl Into<String>,
    ) {
        self.push_field_error(field, ValidationError::new(message_key, default_label));
    }

    /// Records an already built finding for `field`.
    pub fn push_field_error(&mut self, field: impl Into<String>, error: ValidationError) {
        self.field_errors.entry(field.into()).or_default().push(error);
    }

    /// Records a finding that concerns the data object as a whole.
    pub fn add_struct_error(
        &mut self,
        message_key: impl Into<String>,
        default_label: impl Into<String>,
    ) {
        self.struct_errors
            .push(ValidationError::new(message_key, default_label));
    }

    /// Appends every finding of `other`.
    ///
    /// Findings are never de-duplicated: N findings in, N findings out.
    pub fn merge(&mut self, other: Self) {
        for (field, errors) in other.field_errors {
            self.field_errors.entry(field).or_default().extend(errors);
        }
        self.struct_errors.extend(other.struct_errors);
    }

    /// Field findings keyed by field name, in insertion order.
    #[must_use]
    pub fn field_errors(&self) -> &IndexMap<String, Vec<ValidationError>> {
        &self.field_errors
    }

    /// Struct-level findings.
    #[must_use]
    pub fn struct_errors(&self) -> &[ValidationError] {
        &self.struct_errors
    }

    /// Findings recorded for `field`.
    #[must_use]
    pub fn errors_for_field(&self, field: &str) -> &[ValidationError] {
        self.field_errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if `field` has at least one finding.
    #[must_use]
    pub fn has_errors_for_field(&self, field: &str) -> bool {
        !self.errors_for_field(field).is_empty()
    }

    /// Returns `true` if any field has a finding.
    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        self.field_errors.values().any(|errors| !errors.is_empty())
    }

    /// Returns `true` if a struct-level finding exists.
    #[must_use]
    pub fn has_struct_errors(&self) -> bool {
        !self.struct_errors.is_empty()
    }

    /// Total number of findings (field and struct level).
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.field_errors.values().map(Vec::len).sum::<usize>() + self.struct_errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_valid() {
        let info = ValidationInfo::new();
        assert!(info.is_valid());
        assert_eq!(info.error_count(), 0);
        assert!(!info.has_field_errors());
        assert!(!info.has_struct_errors());
    }

    #[test]
    fn test_field_errors() {
        let mut info = ValidationInfo::new();
        info.add_field_error("firstname", "formError.firstname.required", "required");
        info.add_field_error("firstname", "formError.firstname.min", "too short");

        assert!(!info.is_valid());
        assert_eq!(info.errors_for_field("firstname").len(), 2);
        assert!(info.errors_for_field("lastname").is_empty());
        assert!(info.has_field_errors());
    }

    #[test]
    fn test_merge_keeps_every_finding() {
        let mut main = ValidationInfo::new();
        main.add_field_error("email", "formError.email.email", "invalid");

        let mut extension = ValidationInfo::new();
        extension.add_field_error("email", "formError.email.email", "invalid");
        extension.add_struct_error("formError.csrf", "invalid token");

        main.merge(extension);

        assert_eq!(main.error_count(), 3);
        assert_eq!(main.errors_for_field("email").len(), 2);
        assert_eq!(main.struct_errors().len(), 1);
    }

    #[test]
    fn test_merge_valid_into_valid() {
        let mut info = ValidationInfo::new();
        info.merge(ValidationInfo::new());
        assert!(info.is_valid());
    }

    #[test]
    fn test_serialize() {
        let mut info = ValidationInfo::new();
        info.add_field_error("email", "formError.email.required", "email is required");

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json["field_errors"]["email"][0]["message_key"],
            "formError.email.required"
        );
        assert!(json["struct_errors"].as_array().unwrap().is_empty());
    }
}
