//! Report data assembly.
//!
//! Runs every analysis over a loaded dataset and collects the results in
//! one serializable structure shared by the Markdown and JSON outputs.

use crate::analysis::{
    analyze_collaborator, category_averages, development_priorities, ensure_complete,
    overall_average, summarize, team_averages, CategoryStanding, CategoryValue,
    CollaboratorInsights, ExecutiveSummary, RiskLevel, StatusBand, Thresholds,
};
use crate::error::EngineError;
use crate::models::{Collaborator, Dataset};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub data_file: String,
    pub collaborators: usize,
    pub categories: usize,
    pub skills: usize,
    pub gap_threshold: f64,
    pub strength_threshold: f64,
}

/// A ranked category with its status band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityRow {
    #[serde(flatten)]
    pub standing: CategoryStanding,
    pub status: StatusBand,
}

/// One line of the team roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub collaborator_id: u32,
    pub name: String,
    pub role: String,
    pub is_demo: bool,
    pub overall_average: f64,
    pub status: StatusBand,
    pub risk_level: RiskLevel,
    pub critical_gaps: usize,
}

/// Development profile of one collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorProfile {
    pub collaborator_id: u32,
    pub name: String,
    pub role: String,
    pub overall_average: f64,
    /// Averages in catalog order.
    pub category_averages: Vec<CategoryValue>,
    pub insights: CollaboratorInsights,
}

/// The complete team report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamReport {
    pub metadata: ReportMetadata,
    pub executive_summary: ExecutiveSummary,
    pub priorities: Vec<PriorityRow>,
    pub roster: Vec<TeamMember>,
    pub profiles: Vec<CollaboratorProfile>,
}

impl TeamReport {
    /// Returns true if any category is reported as a gap.
    pub fn has_gaps(&self) -> bool {
        !self.executive_summary.gaps.is_empty()
    }
}

/// Build the profile of a single collaborator.
pub fn build_profile(
    collaborator: &Collaborator,
    dataset: &Dataset,
) -> Result<CollaboratorProfile, EngineError> {
    let catalog = dataset.catalog();
    ensure_complete(collaborator, &catalog)?;

    let averages = category_averages(collaborator, &catalog)?;
    let insights = analyze_collaborator(collaborator, &catalog)?;

    Ok(CollaboratorProfile {
        collaborator_id: collaborator.id,
        name: collaborator.name.clone(),
        role: collaborator.role.clone(),
        overall_average: overall_average(&averages),
        category_averages: catalog
            .categories
            .iter()
            .map(|category| CategoryValue {
                category: category.name.clone(),
                value: averages.get(&category.id).copied().unwrap_or(0.0),
            })
            .collect(),
        insights,
    })
}

/// Run the team analysis and collect everything a report shows.
pub fn build_report(
    dataset: &Dataset,
    data_file: &Path,
    thresholds: &Thresholds,
) -> Result<TeamReport, EngineError> {
    let catalog = dataset.catalog();
    let collaborators = &dataset.collaborators;

    let team = team_averages(collaborators, &catalog)?;
    let executive_summary = summarize(&team, &catalog, thresholds);

    let priorities = development_priorities(collaborators, &catalog)?
        .into_iter()
        .map(|standing| PriorityRow {
            status: thresholds.status(standing.average),
            standing,
        })
        .collect();

    let mut roster = Vec::with_capacity(collaborators.len());
    let mut profiles = Vec::with_capacity(collaborators.len());

    for collaborator in collaborators {
        let profile = build_profile(collaborator, dataset)?;

        roster.push(TeamMember {
            collaborator_id: collaborator.id,
            name: collaborator.name.clone(),
            role: collaborator.role.clone(),
            is_demo: collaborator.is_demo,
            overall_average: profile.overall_average,
            status: thresholds.status(profile.overall_average),
            risk_level: profile.insights.risk_level,
            critical_gaps: profile.insights.critical_gaps.len(),
        });
        profiles.push(profile);
    }

    debug!(
        "Built report: {} gaps, {} strengths, {} profiles",
        executive_summary.gaps.len(),
        executive_summary.strengths.len(),
        profiles.len()
    );

    Ok(TeamReport {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            data_file: data_file.display().to_string(),
            collaborators: collaborators.len(),
            categories: catalog.categories.len(),
            skills: catalog.skills.len(),
            gap_threshold: thresholds.gap,
            strength_threshold: thresholds.strength,
        },
        executive_summary,
        priorities,
        roster,
        profiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::demo_dataset;

    #[test]
    fn test_build_report_from_demo() {
        let dataset = demo_dataset().unwrap();
        let report = build_report(
            &dataset,
            Path::new("data/database.json"),
            &Thresholds::default(),
        )
        .unwrap();

        assert_eq!(report.metadata.collaborators, 4);
        assert_eq!(report.metadata.categories, 5);
        assert_eq!(report.metadata.skills, 15);
        assert_eq!(report.metadata.data_file, "data/database.json");
        assert_eq!(report.priorities.len(), 5);
        assert_eq!(report.roster.len(), 4);
        assert_eq!(report.profiles.len(), 4);

        let ana = &report.roster[0];
        assert_eq!(ana.name, "Ana Torres");
        assert_eq!(ana.risk_level, RiskLevel::Critical);
        assert_eq!(ana.critical_gaps, 1);
        assert_eq!(report.profiles[0].category_averages.len(), 5);
    }

    #[test]
    fn test_empty_team_reports_every_category_as_gap() {
        let mut dataset = demo_dataset().unwrap();
        dataset.collaborators.clear();

        let report = build_report(&dataset, Path::new("db.json"), &Thresholds::default()).unwrap();

        assert!(report.roster.is_empty());
        assert!(report.has_gaps());
        assert_eq!(report.executive_summary.gaps.len(), 5);
        assert!(report
            .priorities
            .iter()
            .all(|row| row.standing.average == 0.0
                && row.status == StatusBand::NeedsAttention));
    }

    #[test]
    fn test_incomplete_collaborator_is_rejected() {
        let mut dataset = demo_dataset().unwrap();
        dataset.collaborators[1].skills.remove(&4);

        let err = build_profile(&dataset.collaborators[1], &dataset).unwrap_err();
        assert_eq!(
            err,
            EngineError::MissingObservation {
                collaborator_id: 2,
                skill_id: 4
            }
        );
        assert!(build_report(&dataset, Path::new("db.json"), &Thresholds::default()).is_err());
    }
}
