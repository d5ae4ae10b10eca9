//! # Formwright Core
//!
//! Core types for the Formwright form pipeline.
//!
//! This crate provides the types every other Formwright crate builds on:
//!
//! - [`FormValues`] - Pre-tokenized `field -> values` view of a request
//! - [`FormData`] / [`FormSchema`] - Data objects the pipeline decodes into
//! - [`DefaultFormData`] - String map used when no typed provider is configured
//! - [`Form`] - Result of handling one request
//! - [`ValidationInfo`] - Aggregated validation findings
//! - [`FormRequest`] / [`FormContext`] - Request view and per-request context
//! - [`FormError`] - Standard error type
//! - [`conform`] - String normalisation directives

#![doc(html_root_url = "https://docs.rs/formwright-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
pub mod conform;
mod context;
mod data;
mod error;
mod form;
mod request;
mod validation;
mod values;

pub use context::{FormContext, RequestId};
pub use data::{DefaultFormData, FieldSpec, FormData, FormSchema};
pub use error::{FormError, FormErrorCategory, FormResult, ServiceRole};
pub use form::Form;
pub use request::{FormRequest, FormRequestBuilder, DEFAULT_MAX_BODY_SIZE};
pub use validation::{ValidationError, ValidationInfo};
pub use values::FormValues;

// HTTP types used in the request view
pub use http;
