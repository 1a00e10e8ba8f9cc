pub mod errors;
pub mod event;
pub mod models;
pub mod source;

pub use errors::SourceError;
pub use event::{epoch, Actor, EventKind, TelemetryEvent};
pub use models::MatchMeta;
pub use source::{InMemoryMatchSource, MatchSource};
