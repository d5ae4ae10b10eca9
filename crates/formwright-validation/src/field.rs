//! Injected field validators.

use formwright_core::{FormContext, FormData, FormRequest};

/// The field a [`FieldValidator`] is asked about.
#[derive(Debug, Clone, Copy)]
pub struct FieldLevel<'a> {
    ctx: &'a FormContext,
    request: Option<&'a FormRequest>,
    field: &'a str,
    value: &'a str,
    data: Option<&'a dyn FormData>,
}

impl<'a> FieldLevel<'a> {
    /// Creates a field view.
    #[must_use]
    pub fn new(ctx: &'a FormContext, field: &'a str, value: &'a str) -> Self {
        Self {
            ctx,
            request: None,
            field,
            value,
            data: None,
        }
    }

    /// Attaches the request being validated.
    #[must_use]
    pub fn with_request(mut self, request: &'a FormRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Attaches the data object the field belongs to.
    #[must_use]
    pub fn with_data(mut self, data: &'a dyn FormData) -> Self {
        self.data = Some(data);
        self
    }

    /// Request context.
    #[must_use]
    pub fn ctx(&self) -> &'a FormContext {
        self.ctx
    }

    /// The request, when validating as part of the pipeline.
    #[must_use]
    pub fn request(&self) -> Option<&'a FormRequest> {
        self.request
    }

    /// Form field name.
    #[must_use]
    pub fn field(&self) -> &'a str {
        self.field
    }

    /// First submitted value, or `""` when absent.
    #[must_use]
    pub fn value(&self) -> &'a str {
        self.value
    }

    /// The whole data object, for cross-field checks.
    #[must_use]
    pub fn data(&self) -> Option<&'a dyn FormData> {
        self.data
    }
}

/// A named validation rule supplied by the application.
///
/// The provider calls [`validate_field`](Self::validate_field) for a bare
/// usage (`zipcode`) and [`validate_field_with_param`](Self::validate_field_with_param)
/// for a usage with a parameter (`zipcode=DE`).
///
/// # Example
///
/// ```
/// use formwright_validation::{FieldLevel, FieldValidator};
///
/// struct Even;
///
/// impl FieldValidator for Even {
///     fn name(&self) -> &str {
///         "even"
///     }
///
///     fn validate_field(&self, field: &FieldLevel<'_>) -> bool {
///         field.value().parse::<i64>().is_ok_and(|n| n % 2 == 0)
///     }
/// }
/// ```
pub trait FieldValidator: Send + Sync {
    /// Rule name used in expressions.
    fn name(&self) -> &str;

    /// Validates a bare usage.
    fn validate_field(&self, field: &FieldLevel<'_>) -> bool;

    /// Validates a usage carrying a parameter.
    fn validate_field_with_param(&self, field: &FieldLevel<'_>, _param: &str) -> bool {
        self.validate_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Prefix;

    impl FieldValidator for Prefix {
        fn name(&self) -> &str {
            "prefix"
        }

        fn validate_field(&self, field: &FieldLevel<'_>) -> bool {
            !field.value().is_empty()
        }

        fn validate_field_with_param(&self, field: &FieldLevel<'_>, param: &str) -> bool {
            field.value().starts_with(param)
        }
    }

    struct NonEmpty;

    impl FieldValidator for NonEmpty {
        fn name(&self) -> &str {
            "nonempty"
        }

        fn validate_field(&self, field: &FieldLevel<'_>) -> bool {
            !field.value().is_empty()
        }
    }

    #[test]
    fn test_dispatch_on_param() {
        let ctx = FormContext::new();
        let level = FieldLevel::new(&ctx, "sku", "ABC-1");

        assert!(Prefix.validate_field(&level));
        assert!(Prefix.validate_field_with_param(&level, "ABC"));
        assert!(!Prefix.validate_field_with_param(&level, "XYZ"));
    }

    #[test]
    fn test_param_defaults_to_bare_form() {
        let ctx = FormContext::new();
        let level = FieldLevel::new(&ctx, "name", "x");
        assert!(NonEmpty.validate_field_with_param(&level, "ignored"));
    }

    #[test]
    fn test_level_accessors() {
        let ctx = FormContext::new();
        let req = FormRequest::builder().build();
        let level = FieldLevel::new(&ctx, "email", "a@b.com").with_request(&req);

        assert_eq!(level.field(), "email");
        assert_eq!(level.value(), "a@b.com");
        assert!(level.request().is_some());
        assert!(level.data().is_none());
        assert_eq!(level.ctx().request_id(), ctx.request_id());
    }
}
