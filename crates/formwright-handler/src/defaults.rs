//! Default role implementations.
//!
//! These are used for every role a handler builder leaves unset. Each is also
//! a [`FormService`] so it can be registered by name or passed as an
//! extension.

use crate::service::{FormDataDecoder, FormDataProvider, FormDataValidator, FormService};
use async_trait::async_trait;
use formwright_core::{
    conform, DefaultFormData, FormContext, FormData, FormRequest, FormResult, FormValues,
    ValidationInfo,
};
use formwright_validation::ValidatorProvider;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Provides an empty [`DefaultFormData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataProvider;

#[async_trait]
impl FormDataProvider for DefaultFormDataProvider {
    async fn get_form_data(
        &self,
        _ctx: &FormContext,
        _req: &FormRequest,
    ) -> FormResult<Option<Box<dyn FormData>>> {
        Ok(Some(Box::new(DefaultFormData::new())))
    }
}

impl FormService for DefaultFormDataProvider {
    fn service_name(&self) -> &str {
        "default-provider"
    }

    fn as_provider(self: Arc<Self>) -> Option<Arc<dyn FormDataProvider>> {
        Some(self)
    }
}

/// Provides `T::default()` for a typed form.
///
/// # Example
///
/// ```
/// use formwright_handler::TypedFormDataProvider;
/// # use formwright_core::FormSchema;
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// # struct Contact { email: String }
/// # impl FormSchema for Contact {}
///
/// let provider = TypedFormDataProvider::<Contact>::new();
/// ```
pub struct TypedFormDataProvider<T> {
    _data: PhantomData<fn() -> T>,
}

impl<T> TypedFormDataProvider<T> {
    /// Creates the provider.
    #[must_use]
    pub const fn new() -> Self {
        Self { _data: PhantomData }
    }
}

impl<T> Default for TypedFormDataProvider<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TypedFormDataProvider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFormDataProvider")
            .field("data", &std::any::type_name::<T>())
            .finish()
    }
}

#[async_trait]
impl<T: FormData + Default> FormDataProvider for TypedFormDataProvider<T> {
    async fn get_form_data(
        &self,
        _ctx: &FormContext,
        _req: &FormRequest,
    ) -> FormResult<Option<Box<dyn FormData>>> {
        Ok(Some(Box::new(T::default())))
    }
}

impl<T: FormData + Default> FormService for TypedFormDataProvider<T> {
    fn as_provider(self: Arc<Self>) -> Option<Arc<dyn FormDataProvider>> {
        Some(self)
    }
}

/// Applies conform directives, then [`FormData::decode_from`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataDecoder;

impl DefaultFormDataDecoder {
    /// Returns `values` with the conform directives of `specs` applied.
    fn conformed<'v>(values: &'v FormValues, data: &dyn FormData) -> Cow<'v, FormValues> {
        let mut specs = data
            .field_specs()
            .iter()
            .filter(|spec| !spec.conform.is_empty() && values.contains_key(spec.name))
            .peekable();
        if specs.peek().is_none() {
            return Cow::Borrowed(values);
        }

        let mut conformed = values.clone();
        for spec in specs {
            conformed.map_values(spec.name, |value| conform::apply(value, spec.conform));
        }
        Cow::Owned(conformed)
    }
}

#[async_trait]
impl FormDataDecoder for DefaultFormDataDecoder {
    async fn decode(
        &self,
        _ctx: &FormContext,
        _req: &FormRequest,
        values: &FormValues,
        mut data: Box<dyn FormData>,
    ) -> FormResult<Box<dyn FormData>> {
        let values = Self::conformed(values, &*data);
        data.decode_from(&values)?;
        Ok(data)
    }
}

impl FormService for DefaultFormDataDecoder {
    fn service_name(&self) -> &str {
        "default-decoder"
    }

    fn as_decoder(self: Arc<Self>) -> Option<Arc<dyn FormDataDecoder>> {
        Some(self)
    }
}

/// Runs the [`ValidatorProvider`] over typed data.
///
/// [`DefaultFormData`] carries no rules and always validates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataValidator;

#[async_trait]
impl FormDataValidator for DefaultFormDataValidator {
    async fn validate(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
        validators: &ValidatorProvider,
        data: &dyn FormData,
    ) -> FormResult<ValidationInfo> {
        if data.is_default_data() {
            return Ok(ValidationInfo::new());
        }
        Ok(validators.validate(ctx, req, data))
    }
}

impl FormService for DefaultFormDataValidator {
    fn service_name(&self) -> &str {
        "default-validator"
    }

    fn as_validator(self: Arc<Self>) -> Option<Arc<dyn FormDataValidator>> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwright_core::{FieldSpec, FormSchema};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Contact {
        name: String,
        email: String,
    }

    impl FormSchema for Contact {
        fn fields() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::new("name").rules("required").conform("trim title"),
                FieldSpec::new("email").rules("required,email").conform("email"),
            ];
            FIELDS
        }
    }

    fn request() -> FormRequest {
        FormRequest::builder().build()
    }

    #[tokio::test]
    async fn test_default_provider_is_empty() {
        let data = DefaultFormDataProvider
            .get_form_data(&FormContext::new(), &request())
            .await
            .unwrap()
            .unwrap();

        assert!(data.is_default_data());
        assert!(data.encode().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_typed_provider() {
        let data = TypedFormDataProvider::<Contact>::new()
            .get_form_data(&FormContext::new(), &request())
            .await
            .unwrap()
            .unwrap();

        assert!(data.as_any().downcast_ref::<Contact>().is_some());
    }

    #[tokio::test]
    async fn test_decoder_applies_conform() {
        let values = FormValues::from_urlencoded("name=%20jane%20doe%20&email=%20Jane%40Example.COM").unwrap();
        let data = DefaultFormDataDecoder
            .decode(&FormContext::new(), &request(), &values, Box::new(Contact::default()))
            .await
            .unwrap();

        let contact = data.as_any().downcast_ref::<Contact>().unwrap();
        assert_eq!(contact.name, "Jane Doe");
        assert_eq!(contact.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_decoder_leaves_default_data_untouched() {
        let values = FormValues::from_urlencoded("company=%20Acme%20").unwrap();
        let data = DefaultFormDataDecoder
            .decode(&FormContext::new(), &request(), &values, Box::new(DefaultFormData::new()))
            .await
            .unwrap();

        let data = data.as_any().downcast_ref::<DefaultFormData>().unwrap();
        assert_eq!(data.get("company"), Some(" Acme "));
    }

    #[tokio::test]
    async fn test_validator_skips_default_data() {
        let mut data = DefaultFormData::new();
        data.insert("email".into(), "not-an-email".into());

        let info = DefaultFormDataValidator
            .validate(&FormContext::new(), &request(), &ValidatorProvider::new(), &data)
            .await
            .unwrap();
        assert!(info.is_valid());
    }

    #[tokio::test]
    async fn test_validator_runs_rules() {
        let data = Contact {
            name: String::new(),
            email: "not-an-email".into(),
        };

        let info = DefaultFormDataValidator
            .validate(&FormContext::new(), &request(), &ValidatorProvider::new(), &data)
            .await
            .unwrap();

        assert_eq!(info.error_count(), 2);
        assert!(info.has_errors_for_field("name"));
        assert_eq!(info.errors_for_field("email")[0].message_key, "formError.email.email");
    }

    #[test]
    fn test_service_capabilities() {
        assert!(Arc::new(DefaultFormDataProvider).as_provider().is_some());
        assert!(Arc::new(DefaultFormDataDecoder).as_decoder().is_some());
        assert!(Arc::new(DefaultFormDataDecoder).as_provider().is_none());
        assert!(Arc::new(DefaultFormDataValidator).as_validator().is_some());
    }
}
