//! Observability for the Formwright form pipeline.
//!
//! - **Logging**: structured JSON or pretty output via `tracing-subscriber`
//! - **Metrics**: form pipeline counters via the `metrics` facade
//!
//! # Example
//!
//! ```rust,ignore
//! use formwright_config::ConfigLoader;
//! use formwright_telemetry::{init_logging, LogConfig};
//!
//! let config = ConfigLoader::new().with_env_prefix("FORMWRIGHT").load()?;
//! init_logging(&LogConfig::from(&config.logging))?;
//! formwright_telemetry::metrics::describe_metrics();
//! ```

#![doc(html_root_url = "https://docs.rs/formwright-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
