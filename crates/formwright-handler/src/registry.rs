//! Named service registry.
//!
//! Services and encoders are registered by name during startup. The registry
//! is then wrapped in an `Arc` and handed to the builders and factories that
//! resolve names against it; nothing looks it up as ambient state.
//!
//! # Example
//!
//! ```
//! use formwright_core::ServiceRole;
//! use formwright_handler::{DefaultFormDataProvider, ServiceRegistry};
//! use std::sync::Arc;
//!
//! let mut registry = ServiceRegistry::new();
//! registry.register_service("defaults", Arc::new(DefaultFormDataProvider));
//!
//! assert!(registry.resolve_provider("defaults").is_ok());
//! assert!(registry.resolve_decoder("defaults").is_err());
//! assert!(registry.resolve_service(ServiceRole::Extension, "missing").is_err());
//! ```

use crate::encoder::FormDataEncoder;
use crate::service::{FormDataDecoder, FormDataProvider, FormDataValidator, FormService};
use formwright_core::{FormError, FormResult, ServiceRole};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Name to service mapping built at process start.
///
/// # Thread Safety
///
/// Registration needs `&mut self`; once shared behind an `Arc` the registry
/// is read-only and can be used from any thread.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn FormService>>,
    encoders: HashMap<String, Arc<dyn FormDataEncoder>>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
            encoders: HashMap::new(),
        }
    }

    /// Registers a service under `name`, replacing any previous one.
    pub fn register_service(&mut self, name: impl Into<String>, service: Arc<dyn FormService>) {
        let name = name.into();
        if self.services.insert(name.clone(), service).is_some() {
            warn!(service = %name, "replacing registered form service");
        }
    }

    /// Registers an encoder under `name`, replacing any previous one.
    pub fn register_encoder(&mut self, name: impl Into<String>, encoder: Arc<dyn FormDataEncoder>) {
        let name = name.into();
        if self.encoders.insert(name.clone(), encoder).is_some() {
            warn!(encoder = %name, "replacing registered form encoder");
        }
    }

    /// Looks up a service by name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<Arc<dyn FormService>> {
        self.services.get(name).cloned()
    }

    /// Looks up a service by name for `role`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownServiceName`] if nothing is registered
    /// under `name`.
    pub fn resolve_service(&self, role: ServiceRole, name: &str) -> FormResult<Arc<dyn FormService>> {
        self.service(name)
            .ok_or_else(|| FormError::unknown_service(role, name))
    }

    /// Resolves the provider role of the service named `name`.
    ///
    /// # Errors
    ///
    /// [`FormError::UnknownServiceName`] for an unregistered name,
    /// [`FormError::MissingCapability`] if the service is not a provider.
    pub fn resolve_provider(&self, name: &str) -> FormResult<Arc<dyn FormDataProvider>> {
        self.resolve_service(ServiceRole::Provider, name)?
            .as_provider()
            .ok_or_else(|| FormError::missing_capability(ServiceRole::Provider, name))
    }

    /// Resolves the decoder role of the service named `name`.
    pub fn resolve_decoder(&self, name: &str) -> FormResult<Arc<dyn FormDataDecoder>> {
        self.resolve_service(ServiceRole::Decoder, name)?
            .as_decoder()
            .ok_or_else(|| FormError::missing_capability(ServiceRole::Decoder, name))
    }

    /// Resolves the validator role of the service named `name`.
    pub fn resolve_validator(&self, name: &str) -> FormResult<Arc<dyn FormDataValidator>> {
        self.resolve_service(ServiceRole::Validator, name)?
            .as_validator()
            .ok_or_else(|| FormError::missing_capability(ServiceRole::Validator, name))
    }

    /// Resolves the encoder named `name`.
    pub fn resolve_encoder(&self, name: &str) -> FormResult<Arc<dyn FormDataEncoder>> {
        self.encoders
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::unknown_service(ServiceRole::Encoder, name))
    }

    /// Returns `true` if a service is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Registered service names, sorted.
    #[must_use]
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.service_names())
            .field("encoder_count", &self.encoders.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultFormDataDecoder, DefaultFormDataProvider};
    use crate::encoder::DefaultFormDataEncoder;

    fn registry() -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        registry.register_service("provider", Arc::new(DefaultFormDataProvider));
        registry.register_service("decoder", Arc::new(DefaultFormDataDecoder));
        registry.register_encoder("default", Arc::new(DefaultFormDataEncoder));
        registry
    }

    #[test]
    fn test_empty_registry() {
        let registry = ServiceRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("provider"));
        assert!(registry.resolve_provider("provider").is_ok());
        assert!(registry.resolve_decoder("decoder").is_ok());
        assert!(registry.resolve_encoder("default").is_ok());
    }

    #[test]
    fn test_unknown_name() {
        let err = registry().resolve_provider("nope").err().unwrap();
        assert!(matches!(
            err,
            FormError::UnknownServiceName { role: ServiceRole::Provider, ref name } if name == "nope"
        ));
    }

    #[test]
    fn test_missing_capability() {
        let err = registry().resolve_validator("decoder").err().unwrap();
        assert!(matches!(
            err,
            FormError::MissingCapability { role: ServiceRole::Validator, ref name } if name == "decoder"
        ));
    }

    #[test]
    fn test_unknown_encoder() {
        let err = registry().resolve_encoder("json").err().unwrap();
        assert!(matches!(
            err,
            FormError::UnknownServiceName { role: ServiceRole::Encoder, .. }
        ));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = registry();
        registry.register_service("provider", Arc::new(DefaultFormDataDecoder));

        assert_eq!(registry.len(), 2);
        assert!(registry.resolve_provider("provider").is_err());
        assert!(registry.resolve_decoder("provider").is_ok());
    }

    #[test]
    fn test_service_names_sorted() {
        assert_eq!(registry().service_names(), ["decoder", "provider"]);
    }
}
