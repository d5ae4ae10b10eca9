//! Error types for Formwright.
//!
//! This module provides [`FormError`], the single error type returned by every
//! fallible operation in the form pipeline.
//!
//! # Errors vs. validation findings
//!
//! A `FormError` means the request *could not be processed*: a misconfigured
//! builder, a malformed body, a failing provider. A request that was processed
//! but contains invalid input is **not** an error; its findings live in the
//! [`ValidationInfo`](crate::ValidationInfo) of the returned
//! [`Form`](crate::Form).
//!
//! | `FormErrorCategory` | Raised by | Status |
//! |---|---|---|
//! | `Configuration` | builder / factories | 500 |
//! | `Decode` | request parsing, decoders | 400 / 413 / 415 |
//! | `Provider` | data providers | 500 |
//! | `Validator` | validator infrastructure | 500 |
//! | `Encode` | encoders | 500 |
//! | `Cancelled` | cancelled request context | 499 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using [`FormError`].
pub type FormResult<T> = Result<T, FormError>;

/// The pipeline role a service binding is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRole {
    /// Supplies the initial data object.
    Provider,
    /// Populates the data object from request values.
    Decoder,
    /// Produces validation findings for a data object.
    Validator,
    /// Auxiliary stage attached next to the primary roles.
    Extension,
    /// Serialises a data object back into request values.
    Encoder,
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => write!(f, "form data provider"),
            Self::Decoder => write!(f, "form data decoder"),
            Self::Validator => write!(f, "form data validator"),
            Self::Extension => write!(f, "form extension"),
            Self::Encoder => write!(f, "form data encoder"),
        }
    }
}

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormErrorCategory {
    /// Programmer error detected while wiring a handler.
    Configuration,
    /// The request could not be turned into a data object.
    Decode,
    /// A provider failed to supply default data.
    Provider,
    /// A validator failed to run (not a validation finding).
    Validator,
    /// A data object could not be encoded.
    Encode,
    /// The request context was cancelled.
    Cancelled,
}

impl FormErrorCategory {
    /// Returns the snake_case label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Decode => "decode",
            Self::Provider => "provider",
            Self::Validator => "validator",
            Self::Encode => "encode",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Standard error type for the form pipeline.
///
/// # Example
///
/// ```
/// use formwright_core::{FormError, FormErrorCategory, ServiceRole};
///
/// let err = FormError::unknown_service(ServiceRole::Provider, "checkout");
/// assert_eq!(err.category(), FormErrorCategory::Configuration);
/// assert!(err.to_string().contains("checkout"));
/// ```
#[derive(Error, Debug)]
pub enum FormError {
    /// A named binding did not resolve against the service registry.
    #[error("unknown {role} service name: '{name}'")]
    UnknownServiceName {
        /// Role the name was bound for.
        role: ServiceRole,
        /// The unresolved name.
        name: String,
    },

    /// A named service exists but does not implement the requested role.
    #[error("service '{name}' does not implement the {role} role")]
    MissingCapability {
        /// Role the name was bound for.
        role: ServiceRole,
        /// The service name.
        name: String,
    },

    /// Any other invalid wiring.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Human-readable error message.
        message: String,
    },

    /// The request values could not be decoded into the data object.
    #[error("failed to decode form data: {message}")]
    Decode {
        /// The offending field, when known.
        field: Option<String>,
        /// Human-readable error message.
        message: String,
    },

    /// The request body exceeds the accepted size.
    #[error("payload too large: max {max_size} bytes, got {actual_size} bytes")]
    PayloadTooLarge {
        /// Maximum accepted body size.
        max_size: usize,
        /// Actual body size.
        actual_size: usize,
    },

    /// The request body has a content type the pipeline cannot decode.
    #[error("unsupported content type: expected '{expected}', got '{actual}'")]
    UnsupportedMediaType {
        /// The accepted content type.
        expected: String,
        /// The content type of the request.
        actual: String,
    },

    /// A provider failed to produce default data.
    #[error("form data provider failed: {message}")]
    Provider {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A validator failed to run.
    #[error("form data validator failed: {message}")]
    Validator {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A data object could not be encoded to request values.
    #[error("failed to encode form data: {message}")]
    Encode {
        /// Human-readable error message.
        message: String,
    },

    /// The request context was cancelled before the pipeline finished.
    #[error("form processing cancelled")]
    Cancelled,
}

impl FormError {
    /// Creates an unknown service name error.
    #[must_use]
    pub fn unknown_service(role: ServiceRole, name: impl Into<String>) -> Self {
        Self::UnknownServiceName {
            role,
            name: name.into(),
        }
    }

    /// Creates a missing capability error.
    #[must_use]
    pub fn missing_capability(role: ServiceRole, name: impl Into<String>) -> Self {
        Self::MissingCapability {
            role,
            name: name.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates a decode error not tied to a field.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a decode error for a specific field.
    #[must_use]
    pub fn decode_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a provider error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a provider error wrapping an underlying cause.
    #[must_use]
    pub fn provider_with_source(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Provider {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates a validator infrastructure error.
    #[must_use]
    pub fn validator(message: impl Into<String>) -> Self {
        Self::Validator {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a validator error wrapping an underlying cause.
    #[must_use]
    pub fn validator_with_source(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Validator {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Creates an encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> FormErrorCategory {
        match self {
            Self::UnknownServiceName { .. }
            | Self::MissingCapability { .. }
            | Self::InvalidConfiguration { .. } => FormErrorCategory::Configuration,
            Self::Decode { .. } | Self::PayloadTooLarge { .. } | Self::UnsupportedMediaType { .. } => {
                FormErrorCategory::Decode
            }
            Self::Provider { .. } => FormErrorCategory::Provider,
            Self::Validator { .. } => FormErrorCategory::Validator,
            Self::Encode { .. } => FormErrorCategory::Encode,
            Self::Cancelled => FormErrorCategory::Cancelled,
        }
    }

    /// Returns `true` for errors raised while wiring a handler.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.category(), FormErrorCategory::Configuration)
    }

    /// Returns the field name if the error concerns a single field.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Decode { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            // 499 Client Closed Request (nginx convention)
            Self::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownServiceName { .. } => "UNKNOWN_SERVICE_NAME",
            Self::MissingCapability { .. } => "MISSING_CAPABILITY",
            Self::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            Self::Decode { .. } => "DECODE_FAILED",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            Self::Provider { .. } => "PROVIDER_FAILED",
            Self::Validator { .. } => "VALIDATOR_FAILED",
            Self::Encode { .. } => "ENCODE_FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_error() {
        let err = FormError::unknown_service(ServiceRole::Decoder, "newsletter");

        assert_eq!(err.category(), FormErrorCategory::Configuration);
        assert!(err.is_configuration());
        assert_eq!(err.error_code(), "UNKNOWN_SERVICE_NAME");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("newsletter"));
        assert!(err.to_string().contains("form data decoder"));
    }

    #[test]
    fn test_missing_capability_error() {
        let err = FormError::missing_capability(ServiceRole::Validator, "csrf");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("csrf"));
        assert!(err.to_string().contains("validator"));
    }

    #[test]
    fn test_decode_field_error() {
        let err = FormError::decode_field("age", "invalid digit found in string");

        assert_eq!(err.category(), FormErrorCategory::Decode);
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "DECODE_FAILED");
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = FormError::PayloadTooLarge {
            max_size: 1024,
            actual_size: 2048,
        };

        assert_eq!(err.category(), FormErrorCategory::Decode);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_provider_error_with_source() {
        let err = FormError::provider_with_source(
            "could not load customer",
            anyhow::anyhow!("connection refused"),
        );

        assert_eq!(err.category(), FormErrorCategory::Provider);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_cancelled_error() {
        let err = FormError::Cancelled;
        assert_eq!(err.category(), FormErrorCategory::Cancelled);
        assert_eq!(err.status_code().as_u16(), 499);
        assert_eq!(err.error_code(), "CANCELLED");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(FormErrorCategory::Configuration.as_str(), "configuration");
        assert_eq!(FormErrorCategory::Decode.as_str(), "decode");
        assert_eq!(FormErrorCategory::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn test_service_role_display() {
        assert_eq!(ServiceRole::Provider.to_string(), "form data provider");
        assert_eq!(ServiceRole::Extension.to_string(), "form extension");
        assert_eq!(ServiceRole::Encoder.to_string(), "form data encoder");
    }
}
