// Public API - what other modules can use
pub use errors::FeedbackError;
pub use handlers::get_feedback;
pub use scorer::{interpolate_percentile, score, z_score, Score, ScoreAnchors};
pub use service::FeedbackService;
pub use types::{FeedbackCard, PlayerFeedback};

// Internal modules
mod errors;
mod handlers;
mod narrative;
mod scorer;
mod service;
mod types;
