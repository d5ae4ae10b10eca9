//! Fixture services for handler tests.
//!
//! Each fixture is a [`FormService`] with exactly one role, so it can be
//! bound directly, registered by name or added as an extension.

use async_trait::async_trait;
use formwright_core::{
    FormContext, FormData, FormError, FormRequest, FormResult, ValidationError, ValidationInfo,
};
use formwright_handler::{FormDataProvider, FormDataValidator, FormService, ServiceRegistry};
use formwright_validation::ValidatorProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provides a clone of a fixed data object.
///
/// # Example
///
/// ```
/// use formwright_core::DefaultFormData;
/// use formwright_test::StaticProvider;
///
/// let provider = StaticProvider::new(
///     "company",
///     [("company", "Acme")].into_iter().collect::<DefaultFormData>(),
/// );
/// assert_eq!(provider.calls(), 0);
/// ```
#[derive(Debug)]
pub struct StaticProvider {
    name: String,
    data: Box<dyn FormData>,
    calls: AtomicUsize,
}

impl StaticProvider {
    /// Creates a provider named `name` returning `data`.
    pub fn new(name: impl Into<String>, data: impl FormData) -> Self {
        Self {
            name: name.into(),
            data: Box::new(data),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times data was provided.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormDataProvider for StaticProvider {
    async fn get_form_data(
        &self,
        _ctx: &FormContext,
        _req: &FormRequest,
    ) -> FormResult<Option<Box<dyn FormData>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.data.clone_boxed()))
    }
}

impl FormService for StaticProvider {
    fn service_name(&self) -> &str {
        &self.name
    }

    fn as_provider(self: Arc<Self>) -> Option<Arc<dyn FormDataProvider>> {
        Some(self)
    }
}

/// Reports the same findings for every data object.
#[derive(Debug, Clone)]
pub struct FixedFindingsValidator {
    name: String,
    info: ValidationInfo,
}

impl FixedFindingsValidator {
    /// Creates a validator named `name` without findings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: ValidationInfo::new(),
        }
    }

    /// Adds a field finding under key `formError.<field>.<rule>`.
    pub fn with_field_error(mut self, field: &str, rule: &str) -> Self {
        self.info.push_field_error(
            field,
            ValidationError::new(format!("formError.{field}.{rule}"), format!("{field} {rule}")),
        );
        self
    }

    /// Adds a struct finding under key `formError.<rule>`.
    pub fn with_struct_error(mut self, rule: &str) -> Self {
        self.info
            .add_struct_error(format!("formError.{rule}"), rule.to_string());
        self
    }
}

#[async_trait]
impl FormDataValidator for FixedFindingsValidator {
    async fn validate(
        &self,
        _ctx: &FormContext,
        _req: &FormRequest,
        _validators: &ValidatorProvider,
        _data: &dyn FormData,
    ) -> FormResult<ValidationInfo> {
        Ok(self.info.clone())
    }
}

impl FormService for FixedFindingsValidator {
    fn service_name(&self) -> &str {
        &self.name
    }

    fn as_validator(self: Arc<Self>) -> Option<Arc<dyn FormDataValidator>> {
        Some(self)
    }
}

/// Provider that fails every request.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    /// Creates a provider failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl FormDataProvider for FailingProvider {
    async fn get_form_data(
        &self,
        _ctx: &FormContext,
        _req: &FormRequest,
    ) -> FormResult<Option<Box<dyn FormData>>> {
        Err(FormError::provider(self.message.clone()))
    }
}

impl FormService for FailingProvider {
    fn service_name(&self) -> &str {
        "failing-provider"
    }

    fn as_provider(self: Arc<Self>) -> Option<Arc<dyn FormDataProvider>> {
        Some(self)
    }
}

/// Registers each service under its [`FormService::service_name`].
pub fn registry_with(services: impl IntoIterator<Item = Arc<dyn FormService>>) -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    for service in services {
        let name = service.service_name().to_string();
        registry.register_service(name, service);
    }
    registry
}

/// A context whose token is already cancelled.
pub fn cancelled_context() -> FormContext {
    let token = CancellationToken::new();
    token.cancel();
    FormContext::with_cancellation(token)
}
