//! Request context types.
//!
//! The [`FormContext`] travels through every pipeline stage. It carries the
//! request identifier used for log correlation and the cancellation token
//! inherited from the hosting server.

use crate::{FormError, FormResult};
use std::fmt;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps log lines of one request together
/// when sorted.
///
/// # Example
///
/// ```
/// use formwright_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context passed to providers, decoders and validators.
///
/// Cloning is cheap; clones share the cancellation token.
///
/// # Example
///
/// ```
/// use formwright_core::FormContext;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = FormContext::with_cancellation(token.clone());
/// assert!(ctx.ensure_active().is_ok());
///
/// token.cancel();
/// assert!(ctx.is_cancelled());
/// assert!(ctx.ensure_active().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    request_id: RequestId,
    cancellation: CancellationToken,
}

impl FormContext {
    /// Creates a context with a fresh request ID and a token nobody cancels.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context bound to the hosting server's cancellation token.
    #[must_use]
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            request_id: RequestId::new(),
            cancellation,
        }
    }

    /// Replaces the request ID (e.g. with one propagated from a header).
    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns `true` once the request was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fails with [`FormError::Cancelled`] if the request was cancelled.
    pub fn ensure_active(&self) -> FormResult<()> {
        if self.is_cancelled() {
            Err(FormError::Cancelled)
        } else {
            Ok(())
        }
    }
}
