//! Per-collaborator score aggregation.
//!
//! Category averages only count skills that apply to the role: an
//! observation with criticality `N` leaves the denominator instead of
//! counting as zero.

use crate::error::EngineError;
use crate::models::{category_key, Catalog, Collaborator, Criticality, SkillObservation};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Average level per category id.
pub type CategoryAverages = BTreeMap<u32, f64>;

/// Round to one decimal place, half away from zero.
///
/// Rounds the exact binary value of `value`, so 1.15 (stored as
/// 1.1499...) becomes 1.1. Scaling by ten first would round the already
/// inexact product instead.
pub fn round1(value: f64) -> f64 {
    let rounded = Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value);
    // Avoid printing "-0.0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Mean of `values`, or 0.0 when empty.
pub(crate) fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Look up the observation of a catalog skill.
pub(crate) fn observation(
    collaborator: &Collaborator,
    skill_id: u32,
) -> Result<&SkillObservation, EngineError> {
    collaborator
        .skills
        .get(&skill_id)
        .ok_or(EngineError::MissingObservation {
            collaborator_id: collaborator.id,
            skill_id,
        })
}

/// Check that the collaborator has an observation for every catalog skill.
pub fn ensure_complete(collaborator: &Collaborator, catalog: &Catalog) -> Result<(), EngineError> {
    for skill in &catalog.skills {
        observation(collaborator, skill.id)?;
    }
    Ok(())
}

/// Compute a collaborator's average level for every category.
pub fn category_averages(
    collaborator: &Collaborator,
    catalog: &Catalog,
) -> Result<CategoryAverages, EngineError> {
    let mut averages = CategoryAverages::new();

    for category in &catalog.categories {
        let mut levels = Vec::new();
        for skill in catalog.skills_in(category.id) {
            let obs = observation(collaborator, skill.id)?;
            if obs.criticality != Criticality::NotApplicable {
                levels.push(obs.level);
            }
        }

        averages.insert(category.id, round1(mean(levels)));
    }

    Ok(averages)
}

/// Convert averages to the `"cat" + id` keyed form stored on a collaborator.
pub fn to_cached_averages(averages: &CategoryAverages) -> BTreeMap<String, f64> {
    averages
        .iter()
        .map(|(id, value)| (category_key(*id), *value))
        .collect()
}

/// Mean of a collaborator's category averages.
pub fn overall_average(averages: &CategoryAverages) -> f64 {
    round1(mean(averages.values().copied()))
}
