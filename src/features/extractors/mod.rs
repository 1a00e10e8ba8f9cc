pub mod combat;
pub mod grenade;
pub mod phase_metrics;

pub use combat::CombatMetricsExtractor;
pub use grenade::GrenadeMetricsExtractor;
pub use phase_metrics::PhaseMetricsExtractor;
