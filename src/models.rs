//! Data models for the skills dashboard.
//!
//! This module contains the catalog (categories and skills), the
//! per-skill observations of each collaborator and the persisted dataset
//! document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How essential a skill is to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criticality {
    /// Critical - the role cannot be performed without it
    #[serde(rename = "C")]
    Critical,
    /// Important - expected for the role
    #[serde(rename = "I")]
    Important,
    /// Desirable - nice to have
    #[serde(rename = "D")]
    Desirable,
    /// Not applicable to the role
    #[serde(rename = "N")]
    NotApplicable,
}

impl Criticality {
    /// Weight used by the classifier's combined weight.
    pub fn weight(&self) -> f64 {
        match self {
            Criticality::Critical => 3.0,
            Criticality::Important => 2.0,
            Criticality::Desirable => 1.0,
            Criticality::NotApplicable => 0.0,
        }
    }

    /// Importance scale used only to compute category targets.
    pub fn target_weight(&self) -> f64 {
        match self {
            Criticality::Critical => 5.0,
            Criticality::Important => 4.0,
            Criticality::Desirable => 3.0,
            Criticality::NotApplicable => 0.0,
        }
    }

    /// Single-letter code as stored in the dataset.
    pub fn code(&self) -> &'static str {
        match self {
            Criticality::Critical => "C",
            Criticality::Important => "I",
            Criticality::Desirable => "D",
            Criticality::NotApplicable => "N",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criticality::Critical => write!(f, "Critical"),
            Criticality::Important => write!(f, "Important"),
            Criticality::Desirable => write!(f, "Desirable"),
            Criticality::NotApplicable => write!(f, "Not applicable"),
        }
    }
}

impl FromStr for Criticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "critical" => Ok(Criticality::Critical),
            "i" | "important" => Ok(Criticality::Important),
            "d" | "desirable" => Ok(Criticality::Desirable),
            "n" | "none" | "not-applicable" => Ok(Criticality::NotApplicable),
            other => Err(format!(
                "unknown criticality '{}' (expected one of C, I, D, N)",
                other
            )),
        }
    }
}

/// How often a skill is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "D")]
    Daily,
    #[serde(rename = "S")]
    Weekly,
    #[serde(rename = "M")]
    Monthly,
    #[serde(rename = "T")]
    Quarterly,
    #[serde(rename = "N")]
    Never,
}

impl Frequency {
    /// Weight used by the classifier's combined weight.
    pub fn weight(&self) -> f64 {
        match self {
            Frequency::Daily => 3.0,
            Frequency::Weekly => 2.0,
            Frequency::Monthly => 1.5,
            Frequency::Quarterly => 1.0,
            Frequency::Never => 0.0,
        }
    }

    /// Single-letter code as stored in the dataset.
    pub fn code(&self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "S",
            Frequency::Monthly => "M",
            Frequency::Quarterly => "T",
            Frequency::Never => "N",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "Daily"),
            Frequency::Weekly => write!(f, "Weekly"),
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Quarterly => write!(f, "Quarterly"),
            Frequency::Never => write!(f, "Never"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "daily" => Ok(Frequency::Daily),
            "s" | "weekly" => Ok(Frequency::Weekly),
            "m" | "monthly" => Ok(Frequency::Monthly),
            "t" | "quarterly" => Ok(Frequency::Quarterly),
            "n" | "never" => Ok(Frequency::Never),
            other => Err(format!(
                "unknown frequency '{}' (expected one of D, S, M, T, N)",
                other
            )),
        }
    }
}

/// A competency category of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// 1-based id, dense in catalog order.
    pub id: u32,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "abrev")]
    pub short_label: String,
    /// Number of catalog skills in this category.
    #[serde(default)]
    pub skill_count: usize,
}

impl Category {
    /// Key of this category in a collaborator's averages map.
    pub fn key(&self) -> String {
        category_key(self.id)
    }
}

/// Build the `"cat" + id` key used by category average maps.
pub fn category_key(id: u32) -> String {
    format!("cat{}", id)
}

/// A skill of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: u32,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "categoria")]
    pub category_id: u32,
}

/// One collaborator's state for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillObservation {
    /// Proficiency in [0, 5], half-point steps.
    #[serde(alias = "nivel")]
    pub level: f64,
    #[serde(alias = "criticidad")]
    pub criticality: Criticality,
    #[serde(alias = "frecuencia")]
    pub frequency: Frequency,
}

impl SkillObservation {
    pub fn new(level: f64, criticality: Criticality, frequency: Frequency) -> Self {
        Self {
            level,
            criticality,
            frequency,
        }
    }

    /// Observation assigned to skills not supplied when a collaborator is created.
    pub fn unassessed() -> Self {
        Self::new(0.0, Criticality::NotApplicable, Frequency::Never)
    }
}

/// Returns true if `level` is a finite value in [0, 5] on a half-point step.
pub fn is_valid_level(level: f64) -> bool {
    level.is_finite() && (0.0..=5.0).contains(&level) && (level * 2.0).fract() == 0.0
}

/// Descriptive label of a proficiency level.
pub fn level_label(level: f64) -> &'static str {
    if level >= 5.0 {
        "Expert"
    } else if level >= 4.0 {
        "Advanced"
    } else if level >= 3.0 {
        "Competent"
    } else if level >= 2.0 {
        "Basic"
    } else if level >= 1.0 {
        "Awareness"
    } else {
        "No knowledge"
    }
}

/// Level scale shown in the evaluation legend.
pub const LEVEL_SCALE: [(u8, &str, &str); 6] = [
    (5, "Expert", "Recognized reference. Trains and develops others."),
    (4, "Advanced", "Deep practical command. Solves complex problems."),
    (3, "Competent", "Applies it autonomously in usual situations."),
    (2, "Basic", "Theoretical knowledge. Needs supervision."),
    (1, "Awareness", "Basic awareness of the concept."),
    (0, "No knowledge", "No exposure to the competency."),
];

/// A team member and their skill matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: u32,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "rol")]
    pub role: String,
    #[serde(default, alias = "esDemo")]
    pub is_demo: bool,
    /// Observation per catalog skill id.
    pub skills: BTreeMap<u32, SkillObservation>,
    /// Cached per-category averages keyed by `"cat" + id`.
    ///
    /// Recomputed from `skills` on every load; engine computations never
    /// read it.
    #[serde(default, alias = "categorias")]
    pub category_averages: BTreeMap<String, f64>,
}

/// The category and skill catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub skills: Vec<Skill>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, skills: Vec<Skill>) -> Self {
        Self { categories, skills }
    }

    /// Skills of one category, in catalog order.
    pub fn skills_in(&self, category_id: u32) -> impl Iterator<Item = &Skill> {
        self.skills
            .iter()
            .filter(move |skill| skill.category_id == category_id)
    }

    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn skill(&self, id: u32) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }
}

/// The persisted document: catalog, roster and the demo-reset flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub categories: Vec<Category>,
    pub skills: Vec<Skill>,
    pub collaborators: Vec<Collaborator>,
    pub allow_reset_from_demo: bool,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            skills: Vec::new(),
            collaborators: Vec::new(),
            allow_reset_from_demo: true,
        }
    }
}

impl Dataset {
    /// Clone the catalog part of the document.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.categories.clone(), self.skills.clone())
    }

    pub fn collaborator(&self, id: u32) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.id == id)
    }

    /// Id for the next collaborator: max(existing) + 1, or 1 when empty.
    pub fn next_collaborator_id(&self) -> u32 {
        self.collaborators
            .iter()
            .map(|c| c.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn has_demo_collaborators(&self) -> bool {
        self.collaborators.iter().any(|c| c.is_demo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_tables() {
        assert_eq!(Criticality::Critical.weight(), 3.0);
        assert_eq!(Criticality::NotApplicable.weight(), 0.0);
        assert_eq!(Frequency::Monthly.weight(), 1.5);
        assert_eq!(Frequency::Quarterly.weight(), 1.0);
        assert_eq!(Criticality::Important.target_weight(), 4.0);
        assert_eq!(Criticality::Desirable.target_weight(), 3.0);
    }

    #[test]
    fn test_codes_from_str() {
        assert_eq!("C".parse::<Criticality>(), Ok(Criticality::Critical));
        assert_eq!("important".parse::<Criticality>(), Ok(Criticality::Important));
        assert_eq!("s".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert_eq!("T".parse::<Frequency>(), Ok(Frequency::Quarterly));
        assert!("X".parse::<Criticality>().is_err());
        assert!("weekly-ish".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_level_validation() {
        assert!(is_valid_level(0.0));
        assert!(is_valid_level(3.5));
        assert!(is_valid_level(5.0));
        assert!(!is_valid_level(5.5));
        assert!(!is_valid_level(-0.5));
        assert!(!is_valid_level(2.3));
        assert!(!is_valid_level(f64::NAN));
    }

    #[test]
    fn test_level_label() {
        assert_eq!(level_label(0.0), "No knowledge");
        assert_eq!(level_label(2.5), "Basic");
        assert_eq!(level_label(4.0), "Advanced");
        assert_eq!(level_label(5.0), "Expert");
    }

    #[test]
    fn test_next_collaborator_id() {
        let mut dataset = Dataset::default();
        assert_eq!(dataset.next_collaborator_id(), 1);

        for id in [3, 7, 5] {
            dataset.collaborators.push(Collaborator {
                id,
                name: format!("Person {}", id),
                role: "Analyst".to_string(),
                is_demo: false,
                skills: BTreeMap::new(),
                category_averages: BTreeMap::new(),
            });
        }
        assert_eq!(dataset.next_collaborator_id(), 8);
    }

    #[test]
    fn test_observation_serde_codes() {
        let obs = SkillObservation::new(3.5, Criticality::Critical, Frequency::Weekly);
        let json = serde_json::to_string(&obs).unwrap();
        assert_eq!(json, r#"{"level":3.5,"criticality":"C","frequency":"S"}"#);

        let legacy: SkillObservation =
            serde_json::from_str(r#"{"nivel":2,"criticidad":"I","frecuencia":"M"}"#).unwrap();
        assert_eq!(
            legacy,
            SkillObservation::new(2.0, Criticality::Important, Frequency::Monthly)
        );
    }
}
