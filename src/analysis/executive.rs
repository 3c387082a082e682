//! Headline view of team averages.
//!
//! Only the exceptions are reported: categories below the gap threshold
//! and categories at or above the strength threshold. Values in between
//! appear in neither list.

use crate::analysis::aggregator::CategoryAverages;
use crate::models::Catalog;
use serde::Serialize;
use std::fmt;

/// Team average below which a category is reported as a gap.
pub const GAP_THRESHOLD: f64 = 2.5;

/// Team average from which a category is reported as a strength.
pub const STRENGTH_THRESHOLD: f64 = 3.5;

/// Thresholds used for headline reporting and status bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub gap: f64,
    pub strength: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            gap: GAP_THRESHOLD,
            strength: STRENGTH_THRESHOLD,
        }
    }
}

impl Thresholds {
    /// Status band of an average.
    pub fn status(&self, average: f64) -> StatusBand {
        if average >= self.strength {
            StatusBand::Strength
        } else if average >= self.gap {
            StatusBand::Competent
        } else {
            StatusBand::NeedsAttention
        }
    }
}

/// Qualitative band of an average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusBand {
    Strength,
    Competent,
    NeedsAttention,
}

impl StatusBand {
    pub fn emoji(&self) -> &'static str {
        match self {
            StatusBand::Strength => "🔵",
            StatusBand::Competent => "🟡",
            StatusBand::NeedsAttention => "🟠",
        }
    }
}

impl fmt::Display for StatusBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusBand::Strength => write!(f, "Strength"),
            StatusBand::Competent => write!(f, "Competent"),
            StatusBand::NeedsAttention => write!(f, "Needs attention"),
        }
    }
}

/// A category name with its team average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
}

/// Categories that stand out from the team averages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub gaps: Vec<CategoryValue>,
    pub strengths: Vec<CategoryValue>,
}

/// Split team averages into gaps and strengths, in catalog order.
pub fn summarize(
    team_averages: &CategoryAverages,
    catalog: &Catalog,
    thresholds: &Thresholds,
) -> ExecutiveSummary {
    let mut summary = ExecutiveSummary::default();

    for category in &catalog.categories {
        let value = team_averages.get(&category.id).copied().unwrap_or(0.0);
        let entry = CategoryValue {
            category: category.name.clone(),
            value,
        };

        if value < thresholds.gap {
            summary.gaps.push(entry);
        } else if value >= thresholds.strength {
            summary.strengths.push(entry);
        }
    }

    summary
}
