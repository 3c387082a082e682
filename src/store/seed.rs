//! Demo dataset used by `skillmatrix init`.

use crate::error::EngineError;
use crate::models::{
    Category, Collaborator, Criticality, Dataset, Frequency, Skill, SkillObservation,
};
use crate::store::database::refresh_category_averages;
use std::collections::BTreeMap;

use crate::models::Criticality::{Critical, Desirable, Important, NotApplicable};
use crate::models::Frequency::{Daily, Monthly, Never, Quarterly, Weekly};

/// Catalog rows: (name, short label, skill names).
const CATALOG: [(&str, &str, [&str; 3]); 5] = [
    (
        "Data Engineering",
        "DATA",
        ["SQL", "Data modeling", "Pipeline orchestration"],
    ),
    (
        "Analytics & BI",
        "BI",
        ["Dashboard design", "Statistical analysis", "Data storytelling"],
    ),
    (
        "Cloud Platforms",
        "CLOUD",
        ["Cloud infrastructure", "Infrastructure as code", "Cost management"],
    ),
    (
        "Data Governance",
        "GOV",
        ["Data quality", "Privacy & compliance", "Metadata management"],
    ),
    (
        "Leadership",
        "LEAD",
        ["Stakeholder management", "Mentoring", "Project planning"],
    ),
];

type Row = (f64, Criticality, Frequency);

/// Demo collaborators: (name, role, one observation per catalog skill).
const TEAM: [(&str, &str, [Row; 15]); 4] = [
    (
        "Ana Torres",
        "Data Engineer",
        [
            (4.5, Critical, Daily),
            (4.0, Critical, Weekly),
            (2.5, Critical, Daily),
            (2.0, Desirable, Monthly),
            (1.5, Desirable, Quarterly),
            (1.0, NotApplicable, Never),
            (3.0, Important, Weekly),
            (2.0, Critical, Monthly),
            (1.0, Desirable, Quarterly),
            (3.5, Important, Weekly),
            (1.0, NotApplicable, Never),
            (2.0, Desirable, Monthly),
            (2.5, Important, Monthly),
            (4.0, Desirable, Quarterly),
            (3.0, Important, Monthly),
        ],
    ),
    (
        "Bruno Díaz",
        "BI Analyst",
        [
            (4.0, Critical, Daily),
            (3.0, Important, Weekly),
            (1.0, NotApplicable, Never),
            (4.5, Critical, Daily),
            (3.5, Critical, Weekly),
            (2.0, Critical, Weekly),
            (1.0, NotApplicable, Never),
            (0.0, NotApplicable, Never),
            (0.5, NotApplicable, Never),
            (3.0, Important, Monthly),
            (2.0, Important, Monthly),
            (1.0, Desirable, Quarterly),
            (3.0, Critical, Daily),
            (2.5, Desirable, Monthly),
            (2.0, Important, Monthly),
        ],
    ),
    (
        "Carla Núñez",
        "Cloud Architect",
        [
            (3.0, Important, Weekly),
            (2.0, Desirable, Monthly),
            (4.0, Important, Weekly),
            (1.0, NotApplicable, Never),
            (2.0, Desirable, Quarterly),
            (1.0, NotApplicable, Never),
            (5.0, Critical, Daily),
            (4.5, Critical, Daily),
            (2.0, Critical, Monthly),
            (2.5, Important, Monthly),
            (3.0, Critical, Weekly),
            (1.5, Desirable, Quarterly),
            (3.5, Important, Weekly),
            (4.5, Important, Never),
            (4.0, Important, Monthly),
        ],
    ),
    (
        "Diego Rivas",
        "Data Steward",
        [
            (3.5, Important, Weekly),
            (4.0, Critical, Monthly),
            (1.0, Desirable, Quarterly),
            (2.0, Desirable, Monthly),
            (2.5, Important, Monthly),
            (3.0, Important, Weekly),
            (0.0, NotApplicable, Never),
            (1.0, NotApplicable, Never),
            (1.0, Desirable, Quarterly),
            (2.5, Critical, Daily),
            (1.5, Critical, Weekly),
            (4.0, Critical, Quarterly),
            (3.0, Important, Weekly),
            (2.0, Desirable, Monthly),
            (3.5, Important, Weekly),
        ],
    ),
];

/// Build the demo catalog and collaborators, with averages computed.
pub fn demo_dataset() -> Result<Dataset, EngineError> {
    let mut categories = Vec::with_capacity(CATALOG.len());
    let mut skills = Vec::new();

    for (idx, (name, short_label, skill_names)) in CATALOG.iter().enumerate() {
        let category_id = idx as u32 + 1;
        categories.push(Category {
            id: category_id,
            name: name.to_string(),
            short_label: short_label.to_string(),
            skill_count: skill_names.len(),
        });

        for skill_name in skill_names {
            skills.push(Skill {
                id: skills.len() as u32 + 1,
                name: skill_name.to_string(),
                category_id,
            });
        }
    }

    let collaborators = TEAM
        .iter()
        .enumerate()
        .map(|(idx, (name, role, rows))| Collaborator {
            id: idx as u32 + 1,
            name: name.to_string(),
            role: role.to_string(),
            is_demo: true,
            skills: skills
                .iter()
                .zip(rows.iter())
                .map(|(skill, (level, criticality, frequency))| {
                    (
                        skill.id,
                        SkillObservation::new(*level, *criticality, *frequency),
                    )
                })
                .collect(),
            category_averages: BTreeMap::new(),
        })
        .collect();

    let mut dataset = Dataset {
        categories,
        skills,
        collaborators,
        allow_reset_from_demo: true,
    };
    refresh_category_averages(&mut dataset)?;

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_collaborator, development_priorities, ensure_complete};
    use crate::models::is_valid_level;

    #[test]
    fn test_demo_catalog_is_dense_and_complete() {
        let dataset = demo_dataset().unwrap();
        let catalog = dataset.catalog();

        let ids: Vec<u32> = dataset.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(dataset.skills.len(), 15);
        assert!(dataset.categories.iter().all(|c| c.skill_count == 3));
        assert!(dataset.allow_reset_from_demo);

        for collaborator in &dataset.collaborators {
            assert!(collaborator.is_demo);
            assert!(ensure_complete(collaborator, &catalog).is_ok());
            assert!(collaborator.skills.values().all(|o| is_valid_level(o.level)));
            assert_eq!(collaborator.category_averages.len(), 5);
        }
    }

    #[test]
    fn test_demo_team_exercises_the_analysis() {
        let dataset = demo_dataset().unwrap();
        let catalog = dataset.catalog();

        let ana = analyze_collaborator(&dataset.collaborators[0], &catalog).unwrap();
        // Pipeline orchestration: critical, daily, level 2.5
        assert_eq!(ana.critical_gaps.len(), 1);
        assert_eq!(ana.critical_gaps[0].name, "Pipeline orchestration");

        let ranked = development_priorities(&dataset.collaborators, &catalog).unwrap();
        assert_eq!(ranked.len(), 5);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].priority >= pair[1].priority));
    }
}
