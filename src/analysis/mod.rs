//! Aggregation and analysis.
//!
//! Builds on the classifier to produce collaborator insights, team
//! category standings and the executive summary.

pub mod aggregator;
pub mod executive;
pub mod insights;
pub mod team;

pub use aggregator::*;
pub use executive::*;
pub use insights::*;
pub use team::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate_observation, SkillState};
    use crate::models::{
        Catalog, Category, Collaborator, Criticality, Frequency, Skill, SkillObservation,
    };

    #[test]
    fn test_two_category_scenario() {
        let catalog = Catalog::new(
            vec![
                Category {
                    id: 1,
                    name: "Analytics".to_string(),
                    short_label: "ANL".to_string(),
                    skill_count: 1,
                },
                Category {
                    id: 2,
                    name: "Communication".to_string(),
                    short_label: "COM".to_string(),
                    skill_count: 1,
                },
            ],
            vec![
                Skill {
                    id: 1,
                    name: "Statistics".to_string(),
                    category_id: 1,
                },
                Skill {
                    id: 2,
                    name: "Presenting".to_string(),
                    category_id: 2,
                },
            ],
        );

        let skill1 = SkillObservation::new(1.0, Criticality::Critical, Frequency::Daily);
        let skill2 = SkillObservation::new(5.0, Criticality::Important, Frequency::Never);
        let collaborator = Collaborator {
            id: 1,
            name: "Kiara Patel".to_string(),
            role: "Analyst".to_string(),
            is_demo: false,
            skills: [(1, skill1), (2, skill2)].into_iter().collect(),
            category_averages: Default::default(),
        };

        assert_eq!(evaluate_observation(&skill1).state, SkillState::CriticalGap);
        assert_eq!(
            evaluate_observation(&skill2).state,
            SkillState::UnderusedTalent
        );

        let averages = category_averages(&collaborator, &catalog).unwrap();
        let cached = to_cached_averages(&averages);
        assert_eq!(cached.get("cat1"), Some(&1.0));
        assert_eq!(cached.get("cat2"), Some(&5.0));

        let insights = analyze_collaborator(&collaborator, &catalog).unwrap();
        assert_eq!(insights.risk_level, RiskLevel::Critical);

        let team = std::slice::from_ref(&collaborator);
        let summary = summarize(
            &team_averages(team, &catalog).unwrap(),
            &catalog,
            &Thresholds::default(),
        );
        assert_eq!(summary.gaps[0].category, "Analytics");
        assert_eq!(summary.strengths[0].category, "Communication");

        let ranked = development_priorities(team, &catalog).unwrap();
        // Analytics: target 5, average 1 -> gap 4; Communication: 4 - 5 = -1
        assert_eq!(ranked[0].category_id, 1);
        assert_eq!(ranked[0].gap, 4.0);
        assert_eq!(ranked[1].gap, -1.0);
    }
}
