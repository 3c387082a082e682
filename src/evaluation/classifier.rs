//! Rule-based skill classifier.
//!
//! An observation (level, frequency, criticality) is matched against an
//! ordered table of rules; the first rule that applies decides the state.
//! Several predicates overlap, so the order of `RULES` is part of the
//! contract: a level-4 critical skill used quarterly is underused talent,
//! never a plain strength.

use crate::models::{Criticality, Frequency, SkillObservation};
use serde::Serialize;
use std::fmt;

/// Qualitative state of one skill observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillState {
    CriticalGap,
    ImprovementArea,
    KeyStrength,
    UnderusedTalent,
    Competent,
    Developing,
    Strength,
    Basic,
}

impl SkillState {
    /// Display label of the state.
    pub fn label(&self) -> &'static str {
        match self {
            SkillState::CriticalGap => "CRITICAL GAP",
            SkillState::ImprovementArea => "IMPROVEMENT AREA",
            SkillState::KeyStrength => "KEY STRENGTH",
            SkillState::UnderusedTalent => "UNDERUSED TALENT",
            SkillState::Competent => "COMPETENT",
            SkillState::Developing => "DEVELOPING",
            SkillState::Strength => "STRENGTH",
            SkillState::Basic => "BASIC",
        }
    }

    /// Returns an emoji marker for report output.
    pub fn emoji(&self) -> &'static str {
        match self {
            SkillState::CriticalGap => "🔴",
            SkillState::ImprovementArea => "🟠",
            SkillState::KeyStrength => "🟢",
            SkillState::UnderusedTalent => "🟣",
            SkillState::Competent => "🟡",
            SkillState::Developing => "⚪",
            SkillState::Strength => "🔵",
            SkillState::Basic => "⚫",
        }
    }
}

impl fmt::Display for SkillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of classifying one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub state: SkillState,
    /// Attention priority, 0-10 (10 is most urgent).
    pub priority_rank: u8,
    /// Criticality weight times frequency weight.
    pub combined_weight: f64,
    pub description: &'static str,
    pub action: &'static str,
}

/// One row of the decision table.
struct Rule {
    applies: fn(&SkillObservation) -> bool,
    state: SkillState,
    priority_rank: u8,
    description: &'static str,
    action: &'static str,
}

fn is_frequent(frequency: Frequency) -> bool {
    matches!(frequency, Frequency::Daily | Frequency::Weekly)
}

fn is_critical_or_important(criticality: Criticality) -> bool {
    matches!(criticality, Criticality::Critical | Criticality::Important)
}

fn critical_gap(o: &SkillObservation) -> bool {
    o.criticality == Criticality::Critical && is_frequent(o.frequency) && o.level < 3.0
}

fn improvement_area(o: &SkillObservation) -> bool {
    o.criticality == Criticality::Critical
        && matches!(o.frequency, Frequency::Monthly | Frequency::Quarterly)
        && o.level < 3.0
}

fn key_strength(o: &SkillObservation) -> bool {
    o.criticality == Criticality::Critical && is_frequent(o.frequency) && o.level >= 4.0
}

fn underused_talent(o: &SkillObservation) -> bool {
    o.level >= 4.0
        && matches!(o.frequency, Frequency::Never | Frequency::Quarterly)
        && o.criticality != Criticality::NotApplicable
}

fn competent(o: &SkillObservation) -> bool {
    is_critical_or_important(o.criticality) && o.level >= 3.0 && o.level < 4.0
}

fn developing(o: &SkillObservation) -> bool {
    matches!(o.criticality, Criticality::Important | Criticality::Desirable)
        && o.level >= 2.0
        && o.level < 3.0
}

fn strength(o: &SkillObservation) -> bool {
    is_critical_or_important(o.criticality) && o.level >= 4.0
}

fn basic(o: &SkillObservation) -> bool {
    o.level < 3.0
        && matches!(
            o.criticality,
            Criticality::Desirable | Criticality::NotApplicable
        )
}

/// Decision table, evaluated top to bottom.
const RULES: [Rule; 8] = [
    Rule {
        applies: critical_gap,
        state: SkillState::CriticalGap,
        priority_rank: 10,
        description: "Critical skill in frequent use with insufficient level",
        action: "Urgent training required",
    },
    Rule {
        applies: improvement_area,
        state: SkillState::ImprovementArea,
        priority_rank: 8,
        description: "Critical skill with low level",
        action: "Short-term development plan",
    },
    Rule {
        applies: key_strength,
        state: SkillState::KeyStrength,
        priority_rank: 2,
        description: "Critical skill mastered and used regularly",
        action: "Maintain and share knowledge",
    },
    Rule {
        applies: underused_talent,
        state: SkillState::UnderusedTalent,
        priority_rank: 6,
        description: "High proficiency without effective use",
        action: "Evaluate project reassignment",
    },
    Rule {
        applies: competent,
        state: SkillState::Competent,
        priority_rank: 4,
        description: "Adequate level for the role's needs",
        action: "Continue hands-on application",
    },
    Rule {
        applies: developing,
        state: SkillState::Developing,
        priority_rank: 5,
        description: "Skill being consolidated",
        action: "Continue practice and mentoring",
    },
    Rule {
        applies: strength,
        state: SkillState::Strength,
        priority_rank: 3,
        description: "High level in a relevant skill",
        action: "Promote as a go-to reference",
    },
    Rule {
        applies: basic,
        state: SkillState::Basic,
        priority_rank: 1,
        description: "Desirable skill at a basic level",
        action: "Optional, based on interest",
    },
];

/// Applied when no rule matches.
const FALLBACK: Rule = Rule {
    applies: |_| true,
    state: SkillState::Competent,
    priority_rank: 4,
    description: "Adequate level",
    action: "Maintain",
};

/// Combined weight of an observation: criticality weight x frequency weight.
pub fn combined_weight(criticality: Criticality, frequency: Frequency) -> f64 {
    criticality.weight() * frequency.weight()
}

/// Classify a skill from its level, frequency and criticality.
pub fn evaluate(level: f64, frequency: Frequency, criticality: Criticality) -> EvaluationResult {
    evaluate_observation(&SkillObservation::new(level, criticality, frequency))
}

/// Classify one observation. Total: always returns exactly one state.
pub fn evaluate_observation(observation: &SkillObservation) -> EvaluationResult {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(observation))
        .unwrap_or(&FALLBACK);

    EvaluationResult {
        state: rule.state,
        priority_rank: rule.priority_rank,
        combined_weight: combined_weight(observation.criticality, observation.frequency),
        description: rule.description,
        action: rule.action,
    }
}

/// One legend entry per state, in rule order.
pub fn legend() -> Vec<(SkillState, &'static str, &'static str)> {
    let mut entries: Vec<(SkillState, &'static str, &'static str)> = Vec::new();

    for rule in &RULES {
        if !entries.iter().any(|(state, _, _)| *state == rule.state) {
            entries.push((rule.state, rule.description, rule.action));
        }
    }

    entries
}
