//! BiLD Launch - translation evaluation run launcher
//!
//! Turns a handful of high-level experiment choices into one validated
//! invocation of the translation evaluation pipeline:
//! - Validates model / language-direction consistency
//! - Builds the ordered downstream argument list
//! - Launches the pipeline with tracking integration disabled

pub mod args;
pub mod error;
pub mod params;
pub mod plan;
pub mod runner;
pub mod telemetry;
pub mod validation;

// Re-export key types
pub use args::build_arguments;
pub use error::{ConfigurationError, LaunchError, Result};
pub use params::{DatasetName, RunConfiguration, RunParameters, BILD_MODEL_TAG};
pub use plan::{EntryPoint, LaunchPlan};
pub use runner::{execute, LaunchOutcome};
pub use telemetry::init_tracing;
pub use validation::validate;
