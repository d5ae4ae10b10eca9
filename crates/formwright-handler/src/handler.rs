//! The form handler.
//!
//! A [`FormHandler`] runs up to three phases per request:
//!
//! 1. **Provide** - the provider seeds the data object; extensions with the
//!    provider role seed their own data under their name.
//! 2. **Decode** - request values are decoded into the main data and into the
//!    data of every extension with the decoder role.
//! 3. **Validate** - the validator and every extension with the validator role
//!    report findings, which are merged into one [`ValidationInfo`].
//!
//! Unsubmitted requests only run Provide. Infrastructure failures abort with
//! a [`FormError`]; validation findings never do.

use crate::service::{Capabilities, FormDataDecoder, FormDataProvider, FormDataValidator};
use formwright_core::{
    DefaultFormData, Form, FormContext, FormData, FormError, FormRequest, FormResult, FormValues,
    ValidationInfo,
};
use formwright_telemetry::metrics;
use formwright_validation::ValidatorProvider;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, debug_span, warn, Instrument};

type ExtensionData = IndexMap<String, Box<dyn FormData>>;

/// An extension with the roles probed at build time.
#[derive(Clone)]
pub(crate) struct Extension {
    pub(crate) name: String,
    pub(crate) capabilities: Capabilities,
}

/// Processes form requests.
///
/// Built once by [`FormHandlerBuilder`](crate::FormHandlerBuilder) or
/// [`FormHandlerFactory`](crate::FormHandlerFactory) and immutable afterwards.
/// Cloning is cheap; clones share their services.
#[derive(Clone)]
pub struct FormHandler {
    provider: Arc<dyn FormDataProvider>,
    decoder: Arc<dyn FormDataDecoder>,
    validator: Arc<dyn FormDataValidator>,
    extensions: Arc<[Extension]>,
    validators: Arc<ValidatorProvider>,
}

impl FormHandler {
    pub(crate) fn new(
        provider: Arc<dyn FormDataProvider>,
        decoder: Arc<dyn FormDataDecoder>,
        validator: Arc<dyn FormDataValidator>,
        extensions: Vec<Extension>,
        validators: Arc<ValidatorProvider>,
    ) -> Self {
        Self {
            provider,
            decoder,
            validator,
            extensions: extensions.into(),
            validators,
        }
    }

    /// Names of the configured extensions, in order.
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|ext| ext.name.as_str())
    }

    /// The validation engine shared by the validators of this handler.
    #[must_use]
    pub fn validator_provider(&self) -> &Arc<ValidatorProvider> {
        &self.validators
    }

    /// Handles a request according to its method.
    ///
    /// POST, PUT and PATCH are submissions; every other method shows the form.
    pub async fn handle_form(&self, ctx: &FormContext, req: &FormRequest) -> FormResult<Form> {
        if req.is_submission() {
            self.handle_submitted_form(ctx, req).await
        } else {
            self.handle_unsubmitted_form(ctx, req).await
        }
    }

    /// Provides the data for a form that is being shown, not submitted.
    ///
    /// The result is never validated.
    pub async fn handle_unsubmitted_form(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
    ) -> FormResult<Form> {
        let started = Instant::now();
        let span = debug_span!(
            "form",
            request_id = %ctx.request_id(),
            method = %req.method(),
            path = req.path(),
            submitted = false,
        );
        let result = self.unsubmitted(ctx, req).instrument(span).await;
        record(&result, false, started);
        result
    }

    /// Provides, decodes and validates a submitted form.
    pub async fn handle_submitted_form(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
    ) -> FormResult<Form> {
        let started = Instant::now();
        let span = debug_span!(
            "form",
            request_id = %ctx.request_id(),
            method = %req.method(),
            path = req.path(),
            submitted = true,
        );
        let result = self.submitted(ctx, req).instrument(span).await;
        record(&result, true, started);
        result
    }

    async fn unsubmitted(&self, ctx: &FormContext, req: &FormRequest) -> FormResult<Form> {
        let (data, extension_data) = self.provide(ctx, req).await?;
        Ok(Form::unsubmitted(data).with_extension_data(extension_data))
    }

    async fn submitted(&self, ctx: &FormContext, req: &FormRequest) -> FormResult<Form> {
        let (data, extension_data) = self.provide(ctx, req).await?;
        let (data, extension_data) = self.decode(ctx, req, data, extension_data).await?;
        let info = self.validate(ctx, req, &*data, &extension_data).await?;
        Ok(Form::submitted(data, info).with_extension_data(extension_data))
    }

    async fn provide(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
    ) -> FormResult<(Box<dyn FormData>, ExtensionData)> {
        ctx.ensure_active()?;
        debug!(phase = "provide", "providing form data");
        let data = self
            .provider
            .get_form_data(ctx, req)
            .await?
            .unwrap_or_else(empty);

        let mut extension_data = ExtensionData::new();
        for ext in self.extensions.iter() {
            let Some(provider) = &ext.capabilities.provider else {
                continue;
            };
            ctx.ensure_active()?;
            debug!(phase = "provide", service = %ext.name, "providing extension data");
            if let Some(seed) = provider.get_form_data(ctx, req).await? {
                extension_data.insert(ext.name.clone(), seed);
            }
        }
        Ok((data, extension_data))
    }

    async fn decode(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
        data: Box<dyn FormData>,
        mut extension_data: ExtensionData,
    ) -> FormResult<(Box<dyn FormData>, ExtensionData)> {
        ctx.ensure_active()?;
        let values: FormValues = req.form_values()?;
        debug!(phase = "decode", fields = values.len(), "decoding form data");
        let data = self.decoder.decode(ctx, req, &values, data).await?;

        for ext in self.extensions.iter() {
            let Some(decoder) = &ext.capabilities.decoder else {
                continue;
            };
            ctx.ensure_active()?;
            debug!(phase = "decode", service = %ext.name, "decoding extension data");
            let seed = match extension_data.get_mut(&ext.name) {
                Some(slot) => std::mem::replace(slot, empty()),
                None => empty(),
            };
            let decoded = decoder.decode(ctx, req, &values, seed).await?;
            extension_data.insert(ext.name.clone(), decoded);
        }
        Ok((data, extension_data))
    }

    async fn validate(
        &self,
        ctx: &FormContext,
        req: &FormRequest,
        data: &dyn FormData,
        extension_data: &ExtensionData,
    ) -> FormResult<ValidationInfo> {
        ctx.ensure_active()?;
        debug!(phase = "validate", "validating form data");
        let mut info = self
            .validator
            .validate(ctx, req, &self.validators, data)
            .await?;

        for ext in self.extensions.iter() {
            let Some(validator) = &ext.capabilities.validator else {
                continue;
            };
            ctx.ensure_active()?;
            debug!(phase = "validate", service = %ext.name, "validating extension data");
            let target = extension_data.get(&ext.name).map_or(data, |own| &**own);
            info.merge(validator.validate(ctx, req, &self.validators, target).await?);
        }
        Ok(info)
    }
}

fn empty() -> Box<dyn FormData> {
    Box::new(DefaultFormData::new())
}

fn record(result: &FormResult<Form>, submitted: bool, started: Instant) {
    match result {
        Ok(form) => {
            let findings = form.validation_info().error_count();
            debug!(submitted, valid = form.is_valid(), findings, "form handled");
            metrics::record_form_handled(submitted, form.is_valid(), findings, started.elapsed());
        }
        Err(error) => {
            log_error(error);
            metrics::record_form_error(error);
        }
    }
}

fn log_error(error: &FormError) {
    if matches!(error, FormError::Cancelled) {
        debug!("form processing cancelled");
    } else {
        warn!(error = %error, kind = error.category().as_str(), "form processing failed");
    }
}

impl fmt::Debug for FormHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHandler")
            .field("extensions", &self.extension_names().collect::<Vec<_>>())
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}
