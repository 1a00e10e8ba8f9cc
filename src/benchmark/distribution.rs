use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::models::MetricDistribution;
use crate::features::FeatureAggregate;
use crate::math::{mean, std_dev};

/// Groups every raw metric value by key across all aggregates. Values are not
/// averaged per account; each match contributes its own sample. Non-finite
/// values are dropped.
pub fn bucket_metrics<'a, I>(aggregates: I) -> BTreeMap<String, Vec<f64>>
where
    I: IntoIterator<Item = &'a FeatureAggregate>,
{
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for aggregate in aggregates {
        for (key, value) in aggregate.iter_all() {
            if value.is_finite() {
                buckets.entry(key.clone()).or_default().push(*value);
            }
        }
    }
    buckets
}

/// Percentile of ascending `sorted` values at `p` (0..=100).
///
/// Estimated at position `p * (n + 1) / 100` with linear interpolation
/// between neighbours, clamped to the smallest and largest value.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let pos = p * (n as f64 + 1.0) / 100.0;
    if pos < 1.0 {
        return sorted[0];
    }
    if pos >= n as f64 {
        return sorted[n - 1];
    }
    let lower = pos.floor();
    let fraction = pos - lower;
    let lower = lower as usize;
    sorted[lower - 1] + fraction * (sorted[lower] - sorted[lower - 1])
}

pub fn build_distribution(
    metric_key: &str,
    values: &[f64],
    updated_at: DateTime<Utc>,
) -> MetricDistribution {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    MetricDistribution {
        metric_key: metric_key.to_string(),
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
        mean: mean(&sorted),
        std: std_dev(&sorted),
        updated_at,
    }
}
