// Public API - what other modules can use
pub use errors::IngestError;
pub use handlers::{get_profile, ingest};
pub use service::IngestService;
pub use types::{IngestRequest, IngestResponse, ProfileResponse};

// Internal modules
mod errors;
mod handlers;
pub mod repository;
mod service;
mod types;
