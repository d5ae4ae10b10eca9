//! # Formwright
//!
//! A pluggable form processing pipeline for HTTP services.
//!
//! A request is turned into a [`Form`](prelude::Form) in up to three phases:
//! a provider seeds the data object, a decoder fills it from the submitted
//! values and a validator reports findings. Each phase is a trait, so any of
//! them can be replaced, and extensions add their own data and findings
//! alongside.
//!
//! ## Quick Start
//!
//! ```
//! use formwright::prelude::*;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Signup {
//!     firstname: String,
//!     email: String,
//! }
//!
//! impl FormSchema for Signup {
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::new("firstname").rules("required"),
//!             FieldSpec::new("email").rules("required,email").conform("email"),
//!         ];
//!         FIELDS
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let factory = FormHandlerFactory::new(
//!     Arc::new(ServiceRegistry::new()),
//!     Arc::new(ValidatorProvider::new()),
//! );
//! let handler = factory
//!     .get_form_handler_builder()
//!     .set_form_data_provider(Arc::new(TypedFormDataProvider::<Signup>::new()))
//!     .build()?;
//!
//! let req = FormRequest::builder()
//!     .method(Method::POST)
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("firstname=&email=a%40b.com")
//!     .build();
//! let form = handler.handle_form(&FormContext::new(), &req).await?;
//!
//! assert!(form.is_submitted());
//! assert!(form.has_errors_for_field("firstname"));
//! # Ok::<(), FormError>(())
//! # }).unwrap();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! FormRequest → Provide → Decode → Validate → Form
//!                  ↓         ↓         ↓
//!              extensions extensions extensions
//! ```

#![doc(html_root_url = "https://docs.rs/formwright/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use formwright_core as core;

// Re-export configuration
pub use formwright_config as config;

// Re-export logging and metrics
pub use formwright_telemetry as telemetry;

// Re-export the validation engine
pub use formwright_validation as validation;

// Re-export the handler pipeline
pub use formwright_handler as handler;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use formwright::prelude::*;
/// ```
pub mod prelude {
    pub use formwright_core::{
        DefaultFormData, FieldSpec, Form, FormContext, FormData, FormError, FormRequest,
        FormResult, FormSchema, FormValues, ValidationError, ValidationInfo,
    };

    // HTTP method for building requests
    pub use formwright_core::http::Method;

    // Configuration
    pub use formwright_config::{ConfigLoader, FormwrightConfig};

    // Validation engine and custom rules
    pub use formwright_validation::{
        FieldLevel, FieldValidator, StructLevel, StructValidator, TypedStructValidator,
        ValidatorProvider,
    };

    // Handler pipeline
    pub use formwright_handler::{
        async_trait, DefaultFormDataEncoder, FormDataDecoder, FormDataEncoder,
        FormDataEncoderFactory, FormDataProvider, FormDataValidator, FormHandler,
        FormHandlerBuilder, FormHandlerFactory, FormService, ServiceRegistry,
        TypedFormDataProvider,
    };
}
