//! Team-wide aggregation.
//!
//! Computes the team average of every category, a target derived from how
//! critical the category's skills are to the team, the resulting gap and
//! the development priority ranking of categories.

use crate::analysis::aggregator::{category_averages, mean, observation, round1, CategoryAverages};
use crate::analysis::executive::{StatusBand, Thresholds};
use crate::error::EngineError;
use crate::evaluation::{evaluate_observation, EvaluationResult};
use crate::models::{Catalog, Collaborator, SkillObservation};
use serde::Serialize;
use std::cmp::Ordering;

/// Target assigned to a category that has no skills.
pub const DEFAULT_CATEGORY_TARGET: f64 = 3.0;

/// Team figures for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStanding {
    pub category_id: u32,
    pub name: String,
    pub short_label: String,
    pub average: f64,
    pub target: f64,
    /// Target minus average, may be negative.
    pub gap: f64,
    /// Gap clamped at zero.
    pub priority: f64,
}

/// One collaborator's average for a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub collaborator_id: u32,
    pub name: String,
    pub role: String,
    pub average: f64,
    pub status: StatusBand,
}

/// One collaborator's observation of a skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillHolder {
    pub collaborator_id: u32,
    pub name: String,
    pub observation: SkillObservation,
    pub evaluation: EvaluationResult,
}

/// Team view of a single skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillBreakdown {
    pub skill_id: u32,
    pub name: String,
    pub team_average: f64,
    pub holders: Vec<SkillHolder>,
}

/// Per-collaborator category averages, recomputed from the skill matrices.
fn all_averages(
    collaborators: &[Collaborator],
    catalog: &Catalog,
) -> Result<Vec<CategoryAverages>, EngineError> {
    collaborators
        .iter()
        .map(|c| category_averages(c, catalog))
        .collect()
}

fn team_averages_from(per_collaborator: &[CategoryAverages], catalog: &Catalog) -> CategoryAverages {
    catalog
        .categories
        .iter()
        .map(|category| {
            let values = per_collaborator
                .iter()
                .map(|averages| averages.get(&category.id).copied().unwrap_or(0.0));
            (category.id, round1(mean(values)))
        })
        .collect()
}

/// Team average per category; 0.0 for every category when the team is empty.
pub fn team_averages(
    collaborators: &[Collaborator],
    catalog: &Catalog,
) -> Result<CategoryAverages, EngineError> {
    let per_collaborator = all_averages(collaborators, catalog)?;
    Ok(team_averages_from(&per_collaborator, catalog))
}

/// Target score of a category from the team's criticality distribution.
pub fn category_target(
    category_id: u32,
    collaborators: &[Collaborator],
    catalog: &Catalog,
) -> Result<f64, EngineError> {
    let mut contributions = Vec::new();

    for skill in catalog.skills_in(category_id) {
        let mut weights = Vec::with_capacity(collaborators.len());
        for collaborator in collaborators {
            weights.push(observation(collaborator, skill.id)?.criticality.target_weight());
        }
        contributions.push(mean(weights));
    }

    if contributions.is_empty() {
        return Ok(DEFAULT_CATEGORY_TARGET);
    }

    Ok(round1(mean(contributions)))
}

/// Average, target and gap of every category, in catalog order.
pub fn category_standings(
    collaborators: &[Collaborator],
    catalog: &Catalog,
) -> Result<Vec<CategoryStanding>, EngineError> {
    let averages = team_averages(collaborators, catalog)?;

    catalog
        .categories
        .iter()
        .map(|category| {
            let average = averages.get(&category.id).copied().unwrap_or(0.0);
            let target = category_target(category.id, collaborators, catalog)?;
            let gap = round1(target - average);
            let priority = if gap > 0.0 { gap } else { 0.0 };

            Ok(CategoryStanding {
                category_id: category.id,
                name: category.name.clone(),
                short_label: category.short_label.clone(),
                average,
                target,
                gap,
                priority,
            })
        })
        .collect()
}

/// Order categories by priority, then by gap, both descending.
///
/// The sort is stable, so categories that tie on both keys keep catalog order.
pub fn rank_categories(mut standings: Vec<CategoryStanding>) -> Vec<CategoryStanding> {
    standings.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.gap.partial_cmp(&a.gap).unwrap_or(Ordering::Equal))
    });
    standings
}

/// Category standings ranked for development attention.
pub fn development_priorities(
    collaborators: &[Collaborator],
    catalog: &Catalog,
) -> Result<Vec<CategoryStanding>, EngineError> {
    Ok(rank_categories(category_standings(collaborators, catalog)?))
}

/// Every collaborator's average for one category.
pub fn category_roster(
    category_id: u32,
    collaborators: &[Collaborator],
    catalog: &Catalog,
    thresholds: &Thresholds,
) -> Result<Vec<RosterEntry>, EngineError> {
    collaborators
        .iter()
        .map(|collaborator| {
            let averages = category_averages(collaborator, catalog)?;
            let average = averages.get(&category_id).copied().unwrap_or(0.0);
            Ok(RosterEntry {
                collaborator_id: collaborator.id,
                name: collaborator.name.clone(),
                role: collaborator.role.clone(),
                average,
                status: thresholds.status(average),
            })
        })
        .collect()
}

/// Team average and individual observations of each skill in a category.
pub fn skill_breakdown(
    category_id: u32,
    collaborators: &[Collaborator],
    catalog: &Catalog,
) -> Result<Vec<SkillBreakdown>, EngineError> {
    catalog
        .skills_in(category_id)
        .map(|skill| {
            let mut holders = Vec::with_capacity(collaborators.len());
            for collaborator in collaborators {
                let obs = observation(collaborator, skill.id)?;
                holders.push(SkillHolder {
                    collaborator_id: collaborator.id,
                    name: collaborator.name.clone(),
                    observation: *obs,
                    evaluation: evaluate_observation(obs),
                });
            }

            Ok(SkillBreakdown {
                skill_id: skill.id,
                name: skill.name.clone(),
                team_average: round1(mean(holders.iter().map(|h| h.observation.level))),
                holders,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Criticality, Frequency, Skill};
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Category {
                    id: 1,
                    name: "Cloud".to_string(),
                    short_label: "CLD".to_string(),
                    skill_count: 2,
                },
                Category {
                    id: 2,
                    name: "Security".to_string(),
                    short_label: "SEC".to_string(),
                    skill_count: 1,
                },
                Category {
                    id: 3,
                    name: "Empty".to_string(),
                    short_label: "EMP".to_string(),
                    skill_count: 0,
                },
            ],
            vec![
                Skill {
                    id: 1,
                    name: "AWS".to_string(),
                    category_id: 1,
                },
                Skill {
                    id: 2,
                    name: "Terraform".to_string(),
                    category_id: 1,
                },
                Skill {
                    id: 3,
                    name: "Threat modeling".to_string(),
                    category_id: 2,
                },
            ],
        )
    }

    fn collaborator(id: u32, skills: [(f64, Criticality); 3]) -> Collaborator {
        Collaborator {
            id,
            name: format!("Member {}", id),
            role: "Engineer".to_string(),
            is_demo: false,
            skills: skills
                .iter()
                .enumerate()
                .map(|(idx, (level, crit))| {
                    (
                        idx as u32 + 1,
                        SkillObservation::new(*level, *crit, Frequency::Weekly),
                    )
                })
                .collect(),
            category_averages: BTreeMap::new(),
        }
    }

    fn standing(id: u32, gap: f64) -> CategoryStanding {
        CategoryStanding {
            category_id: id,
            name: format!("Category {}", id),
            short_label: format!("C{}", id),
            average: 0.0,
            target: 0.0,
            gap,
            priority: if gap > 0.0 { gap } else { 0.0 },
        }
    }

    #[test]
    fn test_empty_team_averages_are_zero() {
        let averages = team_averages(&[], &catalog()).unwrap();
        assert_eq!(averages.len(), 3);
        assert!(averages.values().all(|v| *v == 0.0));
    }

    #[test]
    fn test_team_average_is_mean_of_collaborator_averages() {
        let team = vec![
            collaborator(
                1,
                [
                    (4.0, Criticality::Critical),
                    (2.0, Criticality::Important),
                    (1.0, Criticality::Critical),
                ],
            ),
            collaborator(
                2,
                [
                    (3.0, Criticality::Important),
                    (0.0, Criticality::NotApplicable),
                    (4.5, Criticality::Desirable),
                ],
            ),
        ];

        let averages = team_averages(&team, &catalog()).unwrap();
        // Member 1: cat1 = 3.0; Member 2: cat1 = 3.0 (N skill excluded)
        assert_eq!(averages.get(&1), Some(&3.0));
        // (1.0 + 4.5) / 2 = 2.75
        assert_eq!(averages.get(&2), Some(&2.8));
        assert_eq!(averages.get(&3), Some(&0.0));
    }

    #[test]
    fn test_category_target() {
        let team = vec![
            collaborator(
                1,
                [
                    (4.0, Criticality::Critical),
                    (2.0, Criticality::Important),
                    (1.0, Criticality::Desirable),
                ],
            ),
            collaborator(
                2,
                [
                    (3.0, Criticality::Important),
                    (0.0, Criticality::NotApplicable),
                    (4.5, Criticality::Desirable),
                ],
            ),
        ];
        let cat = catalog();

        // AWS: (5 + 4) / 2 = 4.5, Terraform: (4 + 0) / 2 = 2.0 -> 3.25
        assert_eq!(category_target(1, &team, &cat).unwrap(), 3.3);
        assert_eq!(category_target(2, &team, &cat).unwrap(), 3.0);
        assert_eq!(
            category_target(3, &team, &cat).unwrap(),
            DEFAULT_CATEGORY_TARGET
        );
        // Skills with no collaborators contribute zero.
        assert_eq!(category_target(1, &[], &cat).unwrap(), 0.0);
    }

    #[test]
    fn test_standings_gap_and_priority() {
        let team = vec![collaborator(
            1,
            [
                (2.0, Criticality::Critical),
                (2.0, Criticality::Critical),
                (5.0, Criticality::Desirable),
            ],
        )];

        let standings = category_standings(&team, &catalog()).unwrap();
        let cloud = &standings[0];
        assert_eq!(cloud.average, 2.0);
        assert_eq!(cloud.target, 5.0);
        assert_eq!(cloud.gap, 3.0);
        assert_eq!(cloud.priority, 3.0);

        let security = &standings[1];
        assert_eq!(security.target, 3.0);
        assert_eq!(security.gap, -2.0);
        assert_eq!(security.priority, 0.0);
    }

    #[test]
    fn test_ranking_uses_priority_then_gap() {
        let mut a = standing(1, 2.0);
        let mut b = standing(2, 1.0);
        a.priority = 2.0;
        b.priority = 2.0;

        let ranked = rank_categories(vec![b.clone(), a.clone()]);
        assert_eq!(ranked[0].category_id, 1);
        assert_eq!(ranked[1].category_id, 2);

        let ranked = rank_categories(vec![
            standing(1, -1.0),
            standing(2, 0.5),
            standing(3, -0.2),
            standing(4, 1.5),
        ]);
        let order: Vec<u32> = ranked.iter().map(|s| s.category_id).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_ranking_is_stable_for_full_ties() {
        let ranked = rank_categories(vec![standing(3, 0.0), standing(1, 0.0), standing(2, 0.0)]);
        let order: Vec<u32> = ranked.iter().map(|s| s.category_id).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn test_roster_and_skill_breakdown() {
        let team = vec![
            collaborator(
                1,
                [
                    (4.0, Criticality::Critical),
                    (2.0, Criticality::Important),
                    (1.0, Criticality::Critical),
                ],
            ),
            collaborator(
                2,
                [
                    (3.0, Criticality::Important),
                    (1.0, Criticality::Important),
                    (4.5, Criticality::Desirable),
                ],
            ),
        ];
        let cat = catalog();

        let roster = category_roster(1, &team, &cat, &Thresholds::default()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].average, 3.0);
        assert_eq!(roster[0].status, StatusBand::Competent);
        assert_eq!(roster[1].average, 2.0);
        assert_eq!(roster[1].status, StatusBand::NeedsAttention);

        let breakdown = skill_breakdown(1, &team, &cat).unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].name, "AWS");
        assert_eq!(breakdown[0].team_average, 3.5);
        assert_eq!(breakdown[1].team_average, 1.5);
        assert_eq!(breakdown[0].holders[1].name, "Member 2");
    }

    #[test]
    fn test_team_average_rounds_like_one_decimal_display() {
        let catalog = Catalog::new(
            vec![Category {
                id: 1,
                name: "Data".to_string(),
                short_label: "DAT".to_string(),
                skill_count: 3,
            }],
            (1..=3)
                .map(|id| Skill {
                    id,
                    name: format!("Skill {}", id),
                    category_id: 1,
                })
                .collect(),
        );
        let team = vec![
            collaborator(
                1,
                [
                    (0.0, Criticality::NotApplicable),
                    (0.0, Criticality::NotApplicable),
                    (0.0, Criticality::NotApplicable),
                ],
            ),
            collaborator(
                2,
                [
                    (2.0, Criticality::Important),
                    (2.0, Criticality::Important),
                    (3.0, Criticality::Important),
                ],
            ),
        ];

        // Collaborator averages 0.0 and 2.3; the mean 1.15 is stored as 1.1499...
        let averages = team_averages(&team, &catalog).unwrap();
        assert_eq!(averages.get(&1), Some(&1.1));

        let standing = &category_standings(&team, &catalog).unwrap()[0];
        assert_eq!(standing.average, 1.1);
        assert_eq!(standing.target, 2.0);
        assert_eq!(standing.gap, 0.9);
        assert_eq!(standing.priority, 0.9);
    }
}
