//! # Formwright Handler
//!
//! The form processing pipeline.
//!
//! A [`FormHandler`] turns a [`FormRequest`](formwright_core::FormRequest)
//! into a [`Form`](formwright_core::Form) by running a provider, a decoder and
//! a validator, plus any number of extensions. Each role is a trait; services
//! advertise which roles they implement through [`FormService`].
//!
//! - [`FormHandlerBuilder`] - binds roles by instance or registry name
//! - [`FormHandlerFactory`] - shortcuts for common handler shapes
//! - [`ServiceRegistry`] - named services and encoders, built at startup
//! - [`FormDataEncoder`] / [`FormDataEncoderFactory`] - data back to values
//!
//! # Example
//!
//! ```
//! use formwright_core::{FormContext, FormRequest};
//! use formwright_handler::{FormHandlerFactory, ServiceRegistry};
//! use formwright_validation::ValidatorProvider;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let factory = FormHandlerFactory::new(
//!     Arc::new(ServiceRegistry::new()),
//!     Arc::new(ValidatorProvider::new()),
//! );
//! let handler = factory.create_simple_form_handler().unwrap();
//!
//! let req = FormRequest::builder().build();
//! let form = handler.handle_form(&FormContext::new(), &req).await.unwrap();
//! assert!(!form.is_submitted());
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/formwright-handler/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod builder;
mod defaults;
mod encoder;
mod factory;
mod handler;
mod registry;
mod service;

pub use async_trait::async_trait;
pub use builder::FormHandlerBuilder;
pub use defaults::{
    DefaultFormDataDecoder, DefaultFormDataProvider, DefaultFormDataValidator,
    TypedFormDataProvider,
};
pub use encoder::{DefaultFormDataEncoder, FormDataEncoder, FormDataEncoderFactory};
pub use factory::FormHandlerFactory;
pub use handler::FormHandler;
pub use registry::ServiceRegistry;
pub use service::{FormDataDecoder, FormDataProvider, FormDataValidator, FormService};
