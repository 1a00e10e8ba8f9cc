// Public API - what other modules can use
pub use distribution::{build_distribution, bucket_metrics, percentile};
pub use errors::BenchmarkError;
pub use handlers::{list_benchmarks, refresh_benchmarks};
pub use models::MetricDistribution;
pub use service::BenchmarkService;
pub use types::BenchmarkRequest;

// Internal modules
mod distribution;
mod errors;
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
