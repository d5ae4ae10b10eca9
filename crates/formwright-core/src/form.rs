//! The pipeline result.

use crate::{DefaultFormData, FormData, ValidationError, ValidationInfo};
use indexmap::IndexMap;

/// Result of running the form pipeline against one request.
///
/// A `Form` holds the decoded data object, the data contributed by
/// extensions, the merged validation findings and whether the request was a
/// submission. It is built once by the handler and never changes afterwards.
///
/// # Example
///
/// ```
/// use formwright_core::{DefaultFormData, Form};
///
/// let data: DefaultFormData = [("company", "Acme")].into_iter().collect();
/// let form = Form::unsubmitted(Box::new(data));
///
/// assert!(!form.is_submitted());
/// assert!(form.is_valid());
/// assert_eq!(form.data_as::<DefaultFormData>().unwrap().get("company"), Some("Acme"));
/// ```
#[derive(Debug, Clone)]
pub struct Form {
    data: Box<dyn FormData>,
    extension_data: IndexMap<String, Box<dyn FormData>>,
    submitted: bool,
    validation_info: ValidationInfo,
}

impl Form {
    /// Creates the result of an unsubmitted request.
    #[must_use]
    pub fn unsubmitted(data: Box<dyn FormData>) -> Self {
        Self {
            data,
            extension_data: IndexMap::new(),
            submitted: false,
            validation_info: ValidationInfo::new(),
        }
    }

    /// Creates the result of a submitted and validated request.
    #[must_use]
    pub fn submitted(data: Box<dyn FormData>, validation_info: ValidationInfo) -> Self {
        Self {
            data,
            extension_data: IndexMap::new(),
            submitted: true,
            validation_info,
        }
    }

    /// Attaches the data produced by extensions, keyed by extension name.
    #[must_use]
    pub fn with_extension_data(mut self, extension_data: IndexMap<String, Box<dyn FormData>>) -> Self {
        self.extension_data = extension_data;
        self
    }

    /// Returns the data object.
    #[must_use]
    pub fn data(&self) -> &dyn FormData {
        self.data.as_ref()
    }

    /// Returns the data object as `T` if it has that type.
    #[must_use]
    pub fn data_as<T: FormData>(&self) -> Option<&T> {
        self.data.as_any().downcast_ref::<T>()
    }

    /// Returns the data as the default string map, if no typed provider was used.
    #[must_use]
    pub fn default_data(&self) -> Option<&DefaultFormData> {
        self.data_as::<DefaultFormData>()
    }

    /// Consumes the form and returns the data as `T`.
    ///
    /// Returns `None` when the data has another type.
    #[must_use]
    pub fn into_data<T: FormData>(self) -> Option<T> {
        self.data.into_any().downcast::<T>().ok().map(|data| *data)
    }

    /// Returns the data contributed by the extension registered as `name`.
    #[must_use]
    pub fn extension_data(&self, name: &str) -> Option<&dyn FormData> {
        self.extension_data.get(name).map(|data| &**data)
    }

    /// Names of extensions that contributed data.
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extension_data.keys().map(String::as_str)
    }

    /// Returns `true` if the request was a submission.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Returns `true` if no validation finding was recorded.
    ///
    /// Unsubmitted forms are never validated and therefore valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_info.is_valid()
    }

    /// Returns `true` for a submitted form without findings.
    #[must_use]
    pub fn is_valid_and_submitted(&self) -> bool {
        self.submitted && self.is_valid()
    }

    /// Returns the merged validation findings.
    #[must_use]
    pub const fn validation_info(&self) -> &ValidationInfo {
        &self.validation_info
    }

    /// Returns `true` if `field` has at least one finding.
    #[must_use]
    pub fn has_errors_for_field(&self, field: &str) -> bool {
        self.validation_info.has_errors_for_field(field)
    }

    /// Findings recorded for `field`.
    #[must_use]
    pub fn errors_for_field(&self, field: &str) -> &[ValidationError] {
        self.validation_info.errors_for_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Box<dyn FormData> {
        Box::new([("company", "Acme")].into_iter().collect::<DefaultFormData>())
    }

    #[test]
    fn test_unsubmitted_form() {
        let form = Form::unsubmitted(acme());
        assert!(!form.is_submitted());
        assert!(form.is_valid());
        assert!(!form.is_valid_and_submitted());
        assert_eq!(form.default_data().unwrap().get("company"), Some("Acme"));
    }

    #[test]
    fn test_submitted_form_with_findings() {
        let mut info = ValidationInfo::new();
        info.add_field_error("firstname", "formError.firstname.required", "required");

        let form = Form::submitted(acme(), info);

        assert!(form.is_submitted());
        assert!(!form.is_valid());
        assert!(!form.is_valid_and_submitted());
        assert!(form.has_errors_for_field("firstname"));
        assert_eq!(
            form.errors_for_field("firstname")[0].message_key,
            "formError.firstname.required"
        );
    }

    #[test]
    fn test_into_data() {
        let form = Form::submitted(acme(), ValidationInfo::new());
        assert!(form.is_valid_and_submitted());

        let data: DefaultFormData = form.into_data().unwrap();
        assert_eq!(data.get("company"), Some("Acme"));
    }

    #[test]
    fn test_into_data_wrong_type() {
        #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
        struct Other {
            name: String,
        }
        impl crate::FormSchema for Other {}

        let form = Form::unsubmitted(acme());
        assert!(form.into_data::<Other>().is_none());
    }

    #[test]
    fn test_extension_data() {
        let mut extension_data = IndexMap::new();
        extension_data.insert("csrf".to_string(), acme());

        let form = Form::unsubmitted(Box::new(DefaultFormData::new()))
            .with_extension_data(extension_data);

        assert!(form.extension_data("csrf").is_some());
        assert!(form.extension_data("captcha").is_none());
        assert_eq!(form.extension_names().collect::<Vec<_>>(), ["csrf"]);
    }
}
