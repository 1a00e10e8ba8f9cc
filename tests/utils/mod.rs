pub mod fixtures;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use fixtures::{full_match, squad_match, TelemetryBuilder};
#[allow(unused_imports)]
pub use setup::{PipelineSetup, PipelineSetupBuilder};
