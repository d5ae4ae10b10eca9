//! Shortcuts for common handler shapes.

use crate::builder::FormHandlerBuilder;
use crate::handler::FormHandler;
use crate::registry::ServiceRegistry;
use crate::service::{FormDataDecoder, FormDataProvider, FormDataValidator, FormService};
use formwright_config::FormwrightConfig;
use formwright_core::{FormError, FormResult};
use formwright_validation::ValidatorProvider;
use std::sync::Arc;

/// Creates form handlers sharing one registry and validation engine.
///
/// # Example
///
/// ```
/// use formwright_handler::{FormHandlerFactory, ServiceRegistry};
/// use formwright_validation::ValidatorProvider;
/// use std::sync::Arc;
///
/// let factory = FormHandlerFactory::new(
///     Arc::new(ServiceRegistry::new()),
///     Arc::new(ValidatorProvider::new()),
/// );
/// let handler = factory.create_simple_form_handler().unwrap();
/// assert_eq!(handler.extension_names().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct FormHandlerFactory {
    registry: Arc<ServiceRegistry>,
    validators: Arc<ValidatorProvider>,
}

impl FormHandlerFactory {
    /// Creates a factory.
    #[must_use]
    pub fn new(registry: Arc<ServiceRegistry>, validators: Arc<ValidatorProvider>) -> Self {
        Self {
            registry,
            validators,
        }
    }

    /// Creates a factory whose validation engine is built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidConfiguration`] for an invalid date format
    /// or regex rule.
    pub fn from_config(registry: Arc<ServiceRegistry>, config: &FormwrightConfig) -> FormResult<Self> {
        let validators = ValidatorProvider::from_config(&config.validator)
            .map_err(|e| FormError::invalid_configuration(e.to_string()))?;
        Ok(Self::new(registry, Arc::new(validators)))
    }

    /// The registry names are resolved against.
    #[must_use]
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// A fresh builder sharing this factory's registry and validation engine.
    #[must_use]
    pub fn get_form_handler_builder(&self) -> FormHandlerBuilder {
        FormHandlerBuilder::new(Arc::clone(&self.registry), Arc::clone(&self.validators))
    }

    /// A handler using the default implementation of every role.
    pub fn create_simple_form_handler(&self) -> FormResult<FormHandler> {
        self.get_form_handler_builder().build()
    }

    /// A handler with `service` bound to every role it implements, plus the
    /// extensions registered under `extension_names`.
    ///
    /// # Errors
    ///
    /// Fails if an extension name is not registered.
    pub fn create_form_handler_with_form_service(
        &self,
        service: Arc<dyn FormService>,
        extension_names: &[&str],
    ) -> FormResult<FormHandler> {
        extension_names
            .iter()
            .fold(
                self.get_form_handler_builder().set_form_service(service),
                |builder, name| builder.add_named_form_extension(*name),
            )
            .build()
    }

    /// A handler with explicit role instances; `None` keeps the default.
    pub fn create_form_handler_with_form_services(
        &self,
        provider: Option<Arc<dyn FormDataProvider>>,
        decoder: Option<Arc<dyn FormDataDecoder>>,
        validator: Option<Arc<dyn FormDataValidator>>,
    ) -> FormResult<FormHandler> {
        let mut builder = self.get_form_handler_builder();
        if let Some(provider) = provider {
            builder = builder.set_form_data_provider(provider);
        }
        if let Some(decoder) = decoder {
            builder = builder.set_form_data_decoder(decoder);
        }
        if let Some(validator) = validator {
            builder = builder.set_form_data_validator(validator);
        }
        builder.build()
    }
}
