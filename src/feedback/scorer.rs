use crate::benchmark::MetricDistribution;
use crate::math::clamp;

pub const PERCENTILE_CEILING: f64 = 99.0;

/// Floor for interpolation denominators.
const EPSILON: f64 = 1e-6;

/// Reference points a value is scored against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAnchors {
    pub mean: f64,
    pub std: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
}

impl ScoreAnchors {
    /// Anchors for a metric nobody has benchmarked yet: the value is its own
    /// reference, with unit spread.
    ///
    /// Scoring against these is not a median score. A positive value lands on
    /// its own p25 and scores percentile 25; zero or negative values score 0.
    /// The z-score is always 0.
    pub fn neutral(value: f64) -> Self {
        Self {
            mean: value,
            std: 1.0,
            p25: value,
            p50: value,
            p75: value,
        }
    }
}

impl From<&MetricDistribution> for ScoreAnchors {
    fn from(distribution: &MetricDistribution) -> Self {
        Self {
            mean: distribution.mean,
            std: distribution.std,
            p25: distribution.p25,
            p50: distribution.p50,
            p75: distribution.p75,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub percentile: f64,
    pub z_score: f64,
}

pub fn score(value: f64, distribution: Option<&MetricDistribution>) -> Score {
    let anchors = distribution
        .map(ScoreAnchors::from)
        .unwrap_or_else(|| ScoreAnchors::neutral(value));

    Score {
        percentile: interpolate_percentile(value, anchors.p25, anchors.p50, anchors.p75),
        z_score: z_score(value, anchors.mean, anchors.std),
    }
}

pub fn z_score(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 {
        0.0
    } else {
        (value - mean) / std
    }
}

/// Piecewise-linear map of (0, p25, p50, p75) onto (0, 25, 50, 75), with
/// values past p75 extrapolated against p75 and capped at 99.
pub fn interpolate_percentile(value: f64, p25: f64, p50: f64, p75: f64) -> f64 {
    let raw = if value <= p25 {
        25.0 * value / p25.max(EPSILON)
    } else if value <= p50 {
        25.0 + 25.0 * (value - p25) / (p50 - p25).max(EPSILON)
    } else if value <= p75 {
        50.0 + 25.0 * (value - p50) / (p75 - p50).max(EPSILON)
    } else {
        (75.0 + 25.0 * (value - p75) / p75.max(EPSILON)).min(PERCENTILE_CEILING)
    };
    clamp(raw, 0.0, PERCENTILE_CEILING)
}
