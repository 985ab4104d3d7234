// Predicate evaluation for alert conditions.
//
// Each query looks at one source and one target and answers whether the
// condition currently holds. Evaluation is only ever run in response to a
// change notification, never on a timer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::source::AlertSource;
use super::target::AlertTarget;

/// The spatial or attribute test a condition applies to each of its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertQuery {
    /// Source is within `meters` of any target geometry
    WithinDistance { meters: f64 },
    /// Source position lies inside any target area
    WithinArea,
    /// Source attribute equals `value`; the target is not consulted
    AttributeEquals { attribute: String, value: Value },
}

impl AlertQuery {
    /// Get the display name for this query
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WithinDistance { .. } => "Within Distance",
            Self::WithinArea => "Within Area",
            Self::AttributeEquals { .. } => "Attribute Equals",
        }
    }
}

/// Evaluate `query` against the current state of `source` and `target`.
/// Missing geometry on either side means the condition does not hold.
pub fn evaluate_trigger(query: &AlertQuery, source: &dyn AlertSource, target: &dyn AlertTarget) -> bool {
    match query {
        AlertQuery::WithinDistance { meters } => evaluate_within_distance(*meters, source, target),
        AlertQuery::WithinArea => evaluate_within_area(source, target),
        AlertQuery::AttributeEquals { attribute, value } => source.value(attribute) == Some(value),
    }
}

fn evaluate_within_distance(meters: f64, source: &dyn AlertSource, target: &dyn AlertTarget) -> bool {
    let Some(position) = source.location().and_then(|g| g.anchor()) else {
        return false;
    };

    target
        .geometries()
        .iter()
        .filter_map(|g| g.distance_to(&position))
        .any(|d| d <= meters)
}

fn evaluate_within_area(source: &dyn AlertSource, target: &dyn AlertTarget) -> bool {
    let Some(position) = source.location().and_then(|g| g.anchor()) else {
        return false;
    };

    target.geometries().iter().any(|area| area.contains(&position))
}
