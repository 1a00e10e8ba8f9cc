use super::types::FeedbackCard;
use crate::features::MetricCategory;

/// A best card at or above this percentile is called out as a strength.
const STRENGTH_PERCENTILE: f64 = 60.0;
/// A worst card at or below this percentile is called out as the focus.
const FOCUS_PERCENTILE: f64 = 50.0;

fn readable_key(metric_key: &str) -> String {
    metric_key.replace('_', " ")
}

pub fn card_message(category: MetricCategory, metric_key: &str, percentile: f64) -> String {
    let subject = readable_key(metric_key);
    let score = format!("percentile {percentile:.1}%");
    match category {
        MetricCategory::Phase => format!(
            "Zone positioning: {subject} ({score}). Try rotating into the next phase one beat earlier."
        ),
        MetricCategory::Combat => format!(
            "Engagement quality: {subject} ({score}). Spread your team's angles and aim for synchronized fire."
        ),
        MetricCategory::Grenade => format!(
            "Utility usage: {subject} ({score}). Throw your first grenade earlier to set up the push."
        ),
    }
}

fn direction(category: MetricCategory) -> &'static str {
    match category {
        MetricCategory::Phase => {
            "Start moving before the next safe zone shrinks and experiment with your centre-to-edge balance."
        }
        MetricCategory::Combat => {
            "Line up team angles and shot timing in fights to convert more downs into kills."
        }
        MetricCategory::Grenade => {
            "Make a habit of throwing three seconds before a push to win vision and entry angles like top players do."
        }
    }
}

/// Summarizes cards ranked best first: the top card as a strength, the
/// bottom card as the improvement focus.
pub fn build_narrative(cards: &[FeedbackCard]) -> String {
    let (Some(best), Some(worst)) = (cards.first(), cards.last()) else {
        return "Not enough data to compare against top-tier players.".to_string();
    };

    let strength = if best.percentile >= STRENGTH_PERCENTILE {
        format!(
            "Strength: {} in {} compares well with the top-tier distribution.",
            best.metric_key, best.category
        )
    } else {
        "Strength: your metrics sit around the average.".to_string()
    };

    let focus = if worst.percentile <= FOCUS_PERCENTILE {
        format!(
            "Focus: raising {} in {} closes the gap to top players fastest.",
            worst.metric_key, worst.category
        )
    } else {
        "Focus: your metrics are balanced, work on fine-grained optimization.".to_string()
    };

    format!("{strength} {focus} {}", direction(worst.category))
}
