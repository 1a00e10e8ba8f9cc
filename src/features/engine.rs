use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    build_timeline,
    extractors::{CombatMetricsExtractor, GrenadeMetricsExtractor, PhaseMetricsExtractor},
    extract_phases, FeatureAggregate, MatchContext, MetricCategory, MetricExtractor, MetricMap,
};
use crate::telemetry::{MatchMeta, TelemetryEvent};

/// Turns one match's telemetry into a [`FeatureAggregate`] for one account.
///
/// Stateless; a single engine can serve concurrent matches.
pub struct FeatureEngine {
    extractors: Vec<Arc<dyn MetricExtractor>>,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl FeatureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FeatureEngineBuilder {
        FeatureEngineBuilder::new()
    }

    #[instrument(skip(self, meta, events), fields(match_id = %meta.match_id, events = events.len()))]
    pub fn compute_features(
        &self,
        account_id: &str,
        meta: &MatchMeta,
        events: &[TelemetryEvent],
    ) -> FeatureAggregate {
        let timeline = build_timeline(account_id, events);
        let phases = extract_phases(meta, events);
        debug!(phases = phases.len(), "Extracted zone phases");

        let context = MatchContext {
            account_id,
            meta,
            events,
            timeline: &timeline,
            phases: &phases,
        };

        let mut phase_metrics = MetricMap::new();
        let mut combat_metrics = MetricMap::new();
        let mut grenade_metrics = MetricMap::new();
        for extractor in &self.extractors {
            let target = match extractor.category() {
                MetricCategory::Phase => &mut phase_metrics,
                MetricCategory::Combat => &mut combat_metrics,
                MetricCategory::Grenade => &mut grenade_metrics,
            };
            target.extend(extractor.extract(&context));
        }

        debug!(
            phase_metrics = phase_metrics.len(),
            combat_metrics = combat_metrics.len(),
            grenade_metrics = grenade_metrics.len(),
            "Computed match features"
        );
        FeatureAggregate::new(phase_metrics, combat_metrics, grenade_metrics)
    }
}

pub struct FeatureEngineBuilder {
    extractors: Vec<Arc<dyn MetricExtractor>>,
}

impl FeatureEngineBuilder {
    fn new() -> Self {
        Self {
            extractors: vec![
                Arc::new(PhaseMetricsExtractor::new()),
                Arc::new(CombatMetricsExtractor::new()),
                Arc::new(GrenadeMetricsExtractor::new()),
            ],
        }
    }

    /// Starts from no extractors instead of the default three.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn MetricExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn build(self) -> FeatureEngine {
        FeatureEngine {
            extractors: self.extractors,
        }
    }
}
