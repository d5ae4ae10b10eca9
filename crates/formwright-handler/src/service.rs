//! Service roles.
//!
//! A form handler is assembled from three roles. Each role is an independent
//! async trait; a single service object may implement any subset of them and
//! advertises which ones through [`FormService`].
//!
//! | Role | Trait | Phase |
//! |------|-------|-------|
//! | Provider | [`FormDataProvider`] | Provide |
//! | Decoder | [`FormDataDecoder`] | Decode |
//! | Validator | [`FormDataValidator`] | Validate |
//!
//! # Example
//!
//! ```
//! use formwright_core::{DefaultFormData, FormContext, FormData, FormRequest, FormResult};
//! use formwright_handler::{async_trait, FormDataProvider, FormService};
//! use std::sync::Arc;
//!
//! struct CompanyDefaults;
//!
//! #[async_trait]
//! impl FormDataProvider for CompanyDefaults {
//!     async fn get_form_data(
//!         &self,
//!         _ctx: &FormContext,
//!         _req: &FormRequest,
//!     ) -> FormResult<Option<Box<dyn FormData>>> {
//!         let mut data = DefaultFormData::new();
//!         data.insert("company".into(), "Acme".into());
//!         Ok(Some(Box::new(data)))
//!     }
//! }
//!
//! impl FormService for CompanyDefaults {
//!     fn as_provider(self: Arc<Self>) -> Option<Arc<dyn FormDataProvider>> {
//!         Some(self)
//!     }
//! }
//! ```

use async_trait::async_trait;
use formwright_core::{FormContext, FormData, FormRequest, FormResult, FormValues, ValidationInfo};
use formwright_validation::ValidatorProvider;
use std::sync::Arc;

/// Supplies the initial data object for a request.
#[async_trait]
pub trait FormDataProvider: Send + Sync {
    /// Returns the data object to seed the form with.
    ///
    /// `None` makes the handler fall back to an empty
    /// [`DefaultFormData`](formwright_core::DefaultFormData).
    async fn get_form_data(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
    ) -> FormResult<Option<Box<dyn FormData>>>;
}

/// Populates a data object from request values.
#[async_trait]
pub trait FormDataDecoder: Send + Sync {
    /// Decodes `values` into `data` and returns the populated object.
    async fn decode(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
        values: &FormValues,
        data: Box<dyn FormData>,
    ) -> FormResult<Box<dyn FormData>>;
}

/// Produces validation findings for a data object.
///
/// Findings are returned inside the [`ValidationInfo`]; an `Err` means the
/// validator itself could not run.
#[async_trait]
pub trait FormDataValidator: Send + Sync {
    /// Validates `data`.
    async fn validate(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
        validators: &ValidatorProvider,
        data: &dyn FormData,
    ) -> FormResult<ValidationInfo>;
}

/// A service object with an optional set of roles.
///
/// The handler builder probes each capability once, when the handler is
/// built. Implementors override the probes for the roles they support by
/// returning `Some(self)`.
pub trait FormService: Send + Sync + 'static {
    /// Name used as the extension data key and in logs.
    fn service_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The provider role, if implemented.
    fn as_provider(self: Arc<Self>) -> Option<Arc<dyn FormDataProvider>> {
        None
    }

    /// The decoder role, if implemented.
    fn as_decoder(self: Arc<Self>) -> Option<Arc<dyn FormDataDecoder>> {
        None
    }

    /// The validator role, if implemented.
    fn as_validator(self: Arc<Self>) -> Option<Arc<dyn FormDataValidator>> {
        None
    }
}

/// Roles probed from one [`FormService`].
#[derive(Clone, Default)]
pub(crate) struct Capabilities {
    pub(crate) provider: Option<Arc<dyn FormDataProvider>>,
    pub(crate) decoder: Option<Arc<dyn FormDataDecoder>>,
    pub(crate) validator: Option<Arc<dyn FormDataValidator>>,
}

impl Capabilities {
    pub(crate) fn probe(service: &Arc<dyn FormService>) -> Self {
        Self {
            provider: Arc::clone(service).as_provider(),
            decoder: Arc::clone(service).as_decoder(),
            validator: Arc::clone(service).as_validator(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.provider.is_none() && self.decoder.is_none() && self.validator.is_none()
    }

    /// Role names, for logging.
    pub(crate) fn roles(&self) -> Vec<&'static str> {
        let mut roles = Vec::new();
        if self.provider.is_some() {
            roles.push("provider");
        }
        if self.decoder.is_some() {
            roles.push("decoder");
        }
        if self.validator.is_some() {
            roles.push("validator");
        }
        roles
    }
}
