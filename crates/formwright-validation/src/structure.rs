//! Injected struct validators.
//!
//! A struct validator checks a data object as a whole, typically for
//! cross-field constraints such as matching passwords. At most one is active
//! per data type.

use crate::rule;
use formwright_core::{FormContext, FormData, ValidationError, ValidationInfo};
use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

/// Collects the findings of a struct validator.
#[derive(Debug, Default)]
pub struct StructLevel {
    info: ValidationInfo,
}

impl StructLevel {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a finding for `field` under key `formError.<field>.<tag>`.
    pub fn report_field_error(&mut self, field: &str, tag: &str) {
        self.info.push_field_error(field, rule::field_error(field, tag));
    }

    /// Reports a finding for `field` with an explicit message.
    pub fn report_field_error_with_label(
        &mut self,
        field: &str,
        tag: &str,
        default_label: impl Into<String>,
    ) {
        self.info.push_field_error(
            field,
            ValidationError::new(format!("formError.{field}.{tag}"), default_label),
        );
    }

    /// Reports a finding for the whole object under key `formError.<tag>`.
    pub fn report_error(&mut self, tag: &str) {
        let error = rule::struct_error(tag);
        self.info.add_struct_error(error.message_key, error.default_label);
    }

    /// Returns `true` if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_valid()
    }

    /// Consumes the reporter.
    #[must_use]
    pub fn into_info(self) -> ValidationInfo {
        self.info
    }
}

/// Validates one data type as a whole.
pub trait StructValidator: Send + Sync {
    /// The data type this validator applies to.
    fn target_type(&self) -> TypeId;

    /// Reports findings for `data` into `level`.
    fn validate_struct(&self, ctx: &FormContext, data: &dyn FormData, level: &mut StructLevel);
}

/// Struct validator backed by a closure over the concrete type.
///
/// # Example
///
/// ```
/// use formwright_validation::{StructLevel, TypedStructValidator};
/// # use formwright_core::{FieldSpec, FormSchema};
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// # struct Register { password: String, confirm: String }
/// # impl FormSchema for Register {}
///
/// let validator = TypedStructValidator::new(|_ctx, form: &Register, level: &mut StructLevel| {
///     if form.password != form.confirm {
///         level.report_field_error("confirm", "eqfield");
///     }
/// });
/// ```
pub struct TypedStructValidator<T, F> {
    check: F,
    _target: PhantomData<fn(&T)>,
}

impl<T, F> TypedStructValidator<T, F>
where
    T: FormData,
    F: Fn(&FormContext, &T, &mut StructLevel) + Send + Sync,
{
    /// Wraps `check` as the struct validator for `T`.
    pub fn new(check: F) -> Self {
        Self {
            check,
            _target: PhantomData,
        }
    }
}

impl<T, F> StructValidator for TypedStructValidator<T, F>
where
    T: FormData,
    F: Fn(&FormContext, &T, &mut StructLevel) + Send + Sync,
{
    fn target_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn validate_struct(&self, ctx: &FormContext, data: &dyn FormData, level: &mut StructLevel) {
        if let Some(data) = data.as_any().downcast_ref::<T>() {
            (self.check)(ctx, data, level);
        }
    }
}

impl<T, F> fmt::Debug for TypedStructValidator<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedStructValidator")
            .field("target", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
