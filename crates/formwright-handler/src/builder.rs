//! Form handler builder.
//!
//! The builder records one binding per role and an ordered list of
//! extensions. Nothing is resolved until [`FormHandlerBuilder::build`], which
//! either produces a complete handler or the first configuration error.
//!
//! # Example
//!
//! ```
//! use formwright_handler::{DefaultFormDataProvider, FormHandlerBuilder, ServiceRegistry};
//! use formwright_validation::ValidatorProvider;
//! use std::sync::Arc;
//!
//! let mut registry = ServiceRegistry::new();
//! registry.register_service("defaults", Arc::new(DefaultFormDataProvider));
//!
//! let handler = FormHandlerBuilder::new(Arc::new(registry), Arc::new(ValidatorProvider::new()))
//!     .set_named_form_data_provider("defaults")
//!     .build()
//!     .unwrap();
//! ```

use crate::defaults::{DefaultFormDataDecoder, DefaultFormDataProvider, DefaultFormDataValidator};
use crate::handler::{Extension, FormHandler};
use crate::registry::ServiceRegistry;
use crate::service::{
    Capabilities, FormDataDecoder, FormDataProvider, FormDataValidator, FormService,
};
use formwright_core::{FormError, FormResult, ServiceRole};
use formwright_validation::ValidatorProvider;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// A role bound to an instance or to a registry name.
enum Binding<T: ?Sized> {
    Instance(Arc<T>),
    Named(String),
}

impl<T: ?Sized> Binding<T> {
    fn describe(&self) -> &str {
        match self {
            Self::Instance(_) => "instance",
            Self::Named(name) => name,
        }
    }
}

/// Assembles a [`FormHandler`].
///
/// Each `set_*` call replaces the previous binding for its role. Extensions
/// accumulate in the order they are added.
pub struct FormHandlerBuilder {
    registry: Arc<ServiceRegistry>,
    validators: Arc<ValidatorProvider>,
    provider: Option<Binding<dyn FormDataProvider>>,
    decoder: Option<Binding<dyn FormDataDecoder>>,
    validator: Option<Binding<dyn FormDataValidator>>,
    extensions: Vec<Binding<dyn FormService>>,
}

impl FormHandlerBuilder {
    /// Creates a builder with every role unset.
    #[must_use]
    pub fn new(registry: Arc<ServiceRegistry>, validators: Arc<ValidatorProvider>) -> Self {
        Self {
            registry,
            validators,
            provider: None,
            decoder: None,
            validator: None,
            extensions: Vec::new(),
        }
    }

    /// Binds the provider role to `provider`.
    pub fn set_form_data_provider(mut self, provider: Arc<dyn FormDataProvider>) -> Self {
        self.provider = Some(Binding::Instance(provider));
        self
    }

    /// Binds the decoder role to `decoder`.
    pub fn set_form_data_decoder(mut self, decoder: Arc<dyn FormDataDecoder>) -> Self {
        self.decoder = Some(Binding::Instance(decoder));
        self
    }

    /// Binds the validator role to `validator`.
    pub fn set_form_data_validator(mut self, validator: Arc<dyn FormDataValidator>) -> Self {
        self.validator = Some(Binding::Instance(validator));
        self
    }

    /// Binds the provider role to the service registered as `name`.
    pub fn set_named_form_data_provider(mut self, name: impl Into<String>) -> Self {
        self.provider = Some(Binding::Named(name.into()));
        self
    }

    /// Binds the decoder role to the service registered as `name`.
    pub fn set_named_form_data_decoder(mut self, name: impl Into<String>) -> Self {
        self.decoder = Some(Binding::Named(name.into()));
        self
    }

    /// Binds the validator role to the service registered as `name`.
    pub fn set_named_form_data_validator(mut self, name: impl Into<String>) -> Self {
        self.validator = Some(Binding::Named(name.into()));
        self
    }

    /// Binds every role `service` implements.
    ///
    /// Roles the service lacks keep their current binding.
    pub fn set_form_service(mut self, service: Arc<dyn FormService>) -> Self {
        let caps = Capabilities::probe(&service);
        if caps.is_empty() {
            warn!(service = service.service_name(), "form service implements no role");
        }
        if let Some(provider) = caps.provider {
            self.provider = Some(Binding::Instance(provider));
        }
        if let Some(decoder) = caps.decoder {
            self.decoder = Some(Binding::Instance(decoder));
        }
        if let Some(validator) = caps.validator {
            self.validator = Some(Binding::Instance(validator));
        }
        self
    }

    /// Appends an extension, keyed by its service name.
    pub fn add_form_extension(mut self, extension: Arc<dyn FormService>) -> Self {
        self.extensions.push(Binding::Instance(extension));
        self
    }

    /// Appends the extension registered as `name`, keyed by that name.
    pub fn add_named_form_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(Binding::Named(name.into()));
        self
    }

    /// Resolves every binding and creates the handler.
    ///
    /// # Errors
    ///
    /// - [`FormError::UnknownServiceName`] if a name is not registered.
    /// - [`FormError::MissingCapability`] if a named service lacks the role
    ///   it was bound for.
    /// - [`FormError::InvalidConfiguration`] if two extensions share a name.
    pub fn build(self) -> FormResult<FormHandler> {
        let registry = &self.registry;

        let provider = resolve(self.provider, |name| registry.resolve_provider(name))?
            .unwrap_or_else(|| Arc::new(DefaultFormDataProvider));
        let decoder = resolve(self.decoder, |name| registry.resolve_decoder(name))?
            .unwrap_or_else(|| Arc::new(DefaultFormDataDecoder));
        let validator = resolve(self.validator, |name| registry.resolve_validator(name))?
            .unwrap_or_else(|| Arc::new(DefaultFormDataValidator));

        let mut names = HashSet::new();
        let mut extensions = Vec::with_capacity(self.extensions.len());
        for binding in self.extensions {
            let (name, service) = match binding {
                Binding::Instance(service) => (service.service_name().to_string(), service),
                Binding::Named(name) => {
                    let service = registry.resolve_service(ServiceRole::Extension, &name)?;
                    (name, service)
                }
            };
            if !names.insert(name.clone()) {
                return Err(FormError::invalid_configuration(format!(
                    "duplicate form extension '{name}'"
                )));
            }

            let capabilities = Capabilities::probe(&service);
            if capabilities.is_empty() {
                warn!(extension = %name, "form extension implements no role");
            }
            extensions.push(Extension { name, capabilities });
        }

        info!(
            extensions = extensions.len(),
            roles = ?extensions
                .iter()
                .map(|ext| (ext.name.as_str(), ext.capabilities.roles()))
                .collect::<Vec<_>>(),
            "form handler built"
        );

        Ok(FormHandler::new(
            provider,
            decoder,
            validator,
            extensions,
            self.validators,
        ))
    }
}

fn resolve<T: ?Sized>(
    binding: Option<Binding<T>>,
    lookup: impl FnOnce(&str) -> FormResult<Arc<T>>,
) -> FormResult<Option<Arc<T>>> {
    match binding {
        None => Ok(None),
        Some(Binding::Instance(instance)) => Ok(Some(instance)),
        Some(Binding::Named(name)) => lookup(&name).map(Some),
    }
}

impl fmt::Debug for FormHandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHandlerBuilder")
            .field("registry", &self.registry)
            .field("provider", &self.provider.as_ref().map(Binding::describe))
            .field("decoder", &self.decoder.as_ref().map(Binding::describe))
            .field("validator", &self.validator.as_ref().map(Binding::describe))
            .field(
                "extensions",
                &self.extensions.iter().map(Binding::describe).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
