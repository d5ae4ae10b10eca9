//! Encoding data objects back into request values.
//!
//! Encoders are the inverse of decoders: they turn a data object into the
//! [`FormValues`] a form would submit, for example to pre-fill an edit form
//! or to re-issue a request.

use crate::registry::ServiceRegistry;
use formwright_core::{FormContext, FormData, FormResult, FormValues};
use std::sync::Arc;

/// Serialises a data object into request values.
pub trait FormDataEncoder: Send + Sync {
    /// Encodes `data`.
    fn encode(&self, ctx: &FormContext, data: &dyn FormData) -> FormResult<FormValues>;
}

/// Delegates to [`FormData::encode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormDataEncoder;

impl FormDataEncoder for DefaultFormDataEncoder {
    fn encode(&self, ctx: &FormContext, data: &dyn FormData) -> FormResult<FormValues> {
        ctx.ensure_active()?;
        data.encode()
    }
}

/// Hands out encoders.
///
/// # Example
///
/// ```
/// use formwright_core::{DefaultFormData, FormContext};
/// use formwright_handler::{FormDataEncoderFactory, ServiceRegistry};
/// use std::sync::Arc;
///
/// let factory = FormDataEncoderFactory::new(Arc::new(ServiceRegistry::new()));
/// let encoder = factory.create_default_form_data_encoder();
///
/// let mut data = DefaultFormData::new();
/// data.insert("company".into(), "Acme".into());
///
/// let values = encoder.encode(&FormContext::new(), &data).unwrap();
/// assert_eq!(values.get("company"), Some("Acme"));
///
/// assert!(factory.create_by_named_encoder("json").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct FormDataEncoderFactory {
    registry: Arc<ServiceRegistry>,
}

impl FormDataEncoderFactory {
    /// Creates a factory resolving names against `registry`.
    #[must_use]
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the default encoder.
    #[must_use]
    pub fn create_default_form_data_encoder(&self) -> Arc<dyn FormDataEncoder> {
        Arc::new(DefaultFormDataEncoder)
    }

    /// Returns the encoder registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownServiceName`](formwright_core::FormError::UnknownServiceName)
    /// if no encoder is registered under `name`.
    pub fn create_by_named_encoder(&self, name: &str) -> FormResult<Arc<dyn FormDataEncoder>> {
        self.registry.resolve_encoder(name)
    }
}
