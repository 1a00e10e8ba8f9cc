use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("No player found for nickname={0}")]
    PlayerNotFound(String),

    #[error("Unknown account: {0}")]
    AccountNotFound(String),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Telemetry fetch failed for {reference}: {reason}")]
    Telemetry { reference: String, reason: String },

    #[error("Catalog error: {0}")]
    Catalog(String),
}
