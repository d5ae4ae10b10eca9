//! # Formwright Validation
//!
//! Rule-based validation for form data objects.
//!
//! Fields declare rule expressions through [`FieldSpec`](formwright_core::FieldSpec)
//! (`required,min=2`, `omitempty,dateformat,minimumage=18`). The
//! [`ValidatorProvider`] evaluates them against the encoded data and runs the
//! struct validator registered for the data type.
//!
//! - [`ValidatorProvider`] / [`ValidatorProviderBuilder`] - the engine
//! - [`FieldValidator`] - named rules supplied by the application
//! - [`StructValidator`] / [`TypedStructValidator`] - whole-object checks
//! - [`builtin`] - general-purpose rules
//! - date rules - `dateformat`, `minimumage`, `maximumage`

#![doc(html_root_url = "https://docs.rs/formwright-validation/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builtin;
mod date;
mod error;
mod field;
mod provider;
mod rule;
mod structure;

pub use date::{age_on, fixed_clock, system_clock, Clock, DATE_RULES};
pub use error::ValidationSetupError;
pub use field::{FieldLevel, FieldValidator};
pub use provider::{ValidatorProvider, ValidatorProviderBuilder};
pub use rule::{field_error, is_valid_rule_name, parse_rules, struct_error, Rule};
pub use structure::{StructLevel, StructValidator, TypedStructValidator};
