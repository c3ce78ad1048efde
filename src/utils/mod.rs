//! Utility module: errors, logging, metrics, and serde helpers.

pub mod errors;
pub mod logging;
pub mod metrics;
pub mod serde_helpers;

pub use errors::{ChainError, Result};
pub use logging::init_logging;
pub use metrics::{MetricsRegistry, METRICS};
