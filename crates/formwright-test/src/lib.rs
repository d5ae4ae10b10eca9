//! # Formwright Test
//!
//! Test utilities for Formwright handlers: request builders that produce a
//! [`FormRequest`](formwright_core::FormRequest) without an HTTP stack, and
//! fixture services with fixed behaviour.
//!
//! ## Example
//!
//! ```
//! use formwright_core::FormContext;
//! use formwright_handler::{FormHandlerFactory, ServiceRegistry};
//! use formwright_test::{FixedFindingsValidator, TestRequest};
//! use formwright_validation::ValidatorProvider;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let factory = FormHandlerFactory::new(
//!     Arc::new(ServiceRegistry::new()),
//!     Arc::new(ValidatorProvider::new()),
//! );
//! let handler = factory
//!     .get_form_handler_builder()
//!     .set_form_data_validator(Arc::new(
//!         FixedFindingsValidator::new("fixed").with_field_error("email", "required"),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let req = TestRequest::post("/signup").field("email", "").build().unwrap();
//! let form = handler.handle_form(&FormContext::new(), &req).await.unwrap();
//! assert!(form.has_errors_for_field("email"));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/formwright-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod fixtures;
mod request;

pub use error::TestError;
pub use fixtures::{
    cancelled_context, registry_with, FailingProvider, FixedFindingsValidator, StaticProvider,
};
pub use request::{TestRequest, TestRequestBuilder};
