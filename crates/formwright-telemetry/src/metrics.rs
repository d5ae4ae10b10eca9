//! Form pipeline metrics.
//!
//! Recorded through the `metrics` facade; the hosting application installs
//! whichever recorder/exporter it uses. Without a recorder every call is a
//! no-op.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `formwright_forms_handled_total` | Counter | `submitted`, `valid` | Forms produced by handlers |
//! | `formwright_form_errors_total` | Counter | `kind` | Infrastructure failures by category |
//! | `formwright_validation_findings_total` | Counter | - | Validation findings reported |
//! | `formwright_form_duration_seconds` | Histogram | `submitted` | Pipeline latency |

use formwright_core::FormError;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::sync::Once;
use std::time::Duration;

/// Forms produced by handlers.
pub const FORMS_HANDLED_TOTAL: &str = "formwright_forms_handled_total";

/// Infrastructure failures.
pub const FORM_ERRORS_TOTAL: &str = "formwright_form_errors_total";

/// Validation findings.
pub const VALIDATION_FINDINGS_TOTAL: &str = "formwright_validation_findings_total";

/// Pipeline latency.
pub const FORM_DURATION_SECONDS: &str = "formwright_form_duration_seconds";

static DESCRIBE: Once = Once::new();

/// Registers descriptions for all standard metrics.
///
/// Safe to call repeatedly; descriptions are registered once.
pub fn describe_metrics() {
    DESCRIBE.call_once(|| {
        describe_counter!(FORMS_HANDLED_TOTAL, "Total number of forms produced by handlers");
        describe_counter!(
            FORM_ERRORS_TOTAL,
            "Total form pipeline failures by error category"
        );
        describe_counter!(
            VALIDATION_FINDINGS_TOTAL,
            "Total validation findings reported for submitted forms"
        );
        describe_histogram!(FORM_DURATION_SECONDS, "Form pipeline duration in seconds");
    });
}

/// Records a form produced by a handler.
///
/// Updates:
/// - `formwright_forms_handled_total` (incremented)
/// - `formwright_validation_findings_total` (by `findings`)
/// - `formwright_form_duration_seconds` (histogram observation)
pub fn record_form_handled(submitted: bool, valid: bool, findings: usize, duration: Duration) {
    counter!(
        FORMS_HANDLED_TOTAL,
        "submitted" => submitted.to_string(),
        "valid" => valid.to_string()
    )
    .increment(1);

    if findings > 0 {
        counter!(VALIDATION_FINDINGS_TOTAL).increment(findings as u64);
    }

    histogram!(
        FORM_DURATION_SECONDS,
        "submitted" => submitted.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a pipeline failure, labelled with the error category.
pub fn record_form_error(error: &FormError) {
    counter!(
        FORM_ERRORS_TOTAL,
        "kind" => error.category().as_str()
    )
    .increment(1);
}
