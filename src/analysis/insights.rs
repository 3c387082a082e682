//! Development insights for a single collaborator.
//!
//! Every catalog skill is classified, then the results are grouped into
//! the buckets a team lead acts on (critical gaps, improvement areas,
//! strengths, underused talent) together with maturity percentages and an
//! overall risk level.

use crate::analysis::aggregator::observation;
use crate::error::EngineError;
use crate::evaluation::{evaluate_observation, EvaluationResult, SkillState};
use crate::models::{Catalog, Collaborator, Criticality, SkillObservation};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// A catalog skill of one collaborator with its evaluation attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessedSkill {
    pub skill_id: u32,
    pub name: String,
    pub category_id: u32,
    pub observation: SkillObservation,
    pub evaluation: EvaluationResult,
}

impl AssessedSkill {
    pub fn level(&self) -> f64 {
        self.observation.level
    }
}

/// Share of critical and important skills at level 3 or above.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaturityMetrics {
    pub critical_total: usize,
    pub critical_met: usize,
    pub critical_maturity_pct: f64,
    pub important_total: usize,
    pub important_met: usize,
    pub important_maturity_pct: f64,
}

/// Overall development risk of a collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    LowModerate,
    Moderate,
    Critical,
}

impl RiskLevel {
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::LowModerate => "🟡",
            RiskLevel::Moderate => "🟠",
            RiskLevel::Critical => "🔴",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::LowModerate => write!(f, "LOW-MODERATE"),
            RiskLevel::Moderate => write!(f, "MODERATE"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Result of analyzing one collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorInsights {
    pub collaborator_id: u32,
    pub critical_gaps: Vec<AssessedSkill>,
    pub improvement_areas: Vec<AssessedSkill>,
    pub key_strengths: Vec<AssessedSkill>,
    pub underused_talent: Vec<AssessedSkill>,
    pub strengths: Vec<AssessedSkill>,
    pub maturity: MaturityMetrics,
    pub risk_level: RiskLevel,
}

/// Classify every catalog skill of the collaborator, in catalog order.
pub fn assess_skills(
    collaborator: &Collaborator,
    catalog: &Catalog,
) -> Result<Vec<AssessedSkill>, EngineError> {
    catalog
        .skills
        .iter()
        .map(|skill| {
            let obs = observation(collaborator, skill.id)?;
            Ok(AssessedSkill {
                skill_id: skill.id,
                name: skill.name.clone(),
                category_id: skill.category_id,
                observation: *obs,
                evaluation: evaluate_observation(obs),
            })
        })
        .collect()
}

/// Run the full insight analysis for one collaborator.
pub fn analyze_collaborator(
    collaborator: &Collaborator,
    catalog: &Catalog,
) -> Result<CollaboratorInsights, EngineError> {
    let assessed = assess_skills(collaborator, catalog)?;

    let critical_gaps = by_weight(bucket(&assessed, &[SkillState::CriticalGap]));
    let improvement_areas = by_weight(bucket(&assessed, &[SkillState::ImprovementArea]));
    let key_strengths = by_weight(bucket(&assessed, &[SkillState::KeyStrength]));
    let underused_talent = by_level(bucket(&assessed, &[SkillState::UnderusedTalent]));
    let strengths = by_level(bucket(
        &assessed,
        &[SkillState::Strength, SkillState::KeyStrength],
    ));

    let maturity = maturity_metrics(&assessed);
    let risk_level = risk_level(critical_gaps.len(), improvement_areas.len());

    debug!(
        "Collaborator {}: {} critical gaps, {} improvement areas, risk {}",
        collaborator.id,
        critical_gaps.len(),
        improvement_areas.len(),
        risk_level
    );

    Ok(CollaboratorInsights {
        collaborator_id: collaborator.id,
        critical_gaps,
        improvement_areas,
        key_strengths,
        underused_talent,
        strengths,
        maturity,
        risk_level,
    })
}

fn bucket(assessed: &[AssessedSkill], states: &[SkillState]) -> Vec<AssessedSkill> {
    assessed
        .iter()
        .filter(|s| states.contains(&s.evaluation.state))
        .cloned()
        .collect()
}

/// Stable sort by combined weight, highest first.
fn by_weight(mut skills: Vec<AssessedSkill>) -> Vec<AssessedSkill> {
    skills.sort_by(|a, b| {
        b.evaluation
            .combined_weight
            .partial_cmp(&a.evaluation.combined_weight)
            .unwrap_or(Ordering::Equal)
    });
    skills
}

/// Stable sort by level, highest first.
fn by_level(mut skills: Vec<AssessedSkill>) -> Vec<AssessedSkill> {
    skills.sort_by(|a, b| b.level().partial_cmp(&a.level()).unwrap_or(Ordering::Equal));
    skills
}

fn maturity_pct(met: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        met as f64 / total as f64 * 100.0
    }
}

/// Compute maturity of critical and important skills.
pub fn maturity_metrics(assessed: &[AssessedSkill]) -> MaturityMetrics {
    let count = |criticality: Criticality| {
        let relevant = assessed
            .iter()
            .filter(|s| s.observation.criticality == criticality);
        let total = relevant.clone().count();
        let met = relevant.filter(|s| s.level() >= 3.0).count();
        (total, met)
    };

    let (critical_total, critical_met) = count(Criticality::Critical);
    let (important_total, important_met) = count(Criticality::Important);

    MaturityMetrics {
        critical_total,
        critical_met,
        critical_maturity_pct: maturity_pct(critical_met, critical_total),
        important_total,
        important_met,
        important_maturity_pct: maturity_pct(important_met, important_total),
    }
}

/// Derive the risk level from the sizes of the gap buckets.
pub fn risk_level(critical_gaps: usize, improvement_areas: usize) -> RiskLevel {
    if critical_gaps > 0 {
        RiskLevel::Critical
    } else if improvement_areas > 2 {
        RiskLevel::Moderate
    } else if improvement_areas > 0 {
        RiskLevel::LowModerate
    } else {
        RiskLevel::Low
    }
}
