//! Markdown report generation.
//!
//! This module renders the team report as Markdown or JSON.

use crate::analysis::{AssessedSkill, CategoryValue, ExecutiveSummary};
use crate::config::ReportConfig;
use crate::evaluation::legend;
use crate::models::{level_label, LEVEL_SCALE};
use crate::report::builder::{
    CollaboratorProfile, PriorityRow, ReportMetadata, TeamMember, TeamReport,
};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &TeamReport, options: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# SkillMatrix Team Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report, options));
    output.push_str(&generate_executive_section(&report.executive_summary, &report.metadata));
    output.push_str(&generate_priorities_section(&report.priorities));
    output.push_str(&generate_roster_section(&report.roster));
    output.push_str(&generate_profiles_section(
        &report.profiles,
        options.max_skills_per_bucket,
    ));

    if options.include_legend {
        output.push_str(&generate_legend_section());
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Data File:** `{}`\n", metadata.data_file));
    section.push_str(&format!("- **Collaborators:** {}\n", metadata.collaborators));
    section.push_str(&format!("- **Categories:** {}\n", metadata.categories));
    section.push_str(&format!("- **Skills:** {}\n", metadata.skills));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &TeamReport, options: &ReportConfig) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Executive Summary](#executive-summary)\n");
    toc.push_str("- [Development Priorities](#development-priorities)\n");
    toc.push_str("- [Team Roster](#team-roster)\n");
    toc.push_str("- [Development Profiles](#development-profiles)\n");

    for profile in &report.profiles {
        toc.push_str(&format!(
            "  - [{}](#{})\n",
            profile.name,
            profile_anchor(profile)
        ));
    }

    if options.include_legend {
        toc.push_str("- [Legend](#legend)\n");
    }

    toc.push('\n');

    toc
}

fn profile_anchor(profile: &CollaboratorProfile) -> String {
    format!("collaborator-{}", profile.collaborator_id)
}

/// Generate the executive summary section.
fn generate_executive_section(summary: &ExecutiveSummary, metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Executive Summary\n\n");
    section.push_str(&format!(
        "### 🟠 Gaps (team average below {:.1})\n\n",
        metadata.gap_threshold
    ));
    section.push_str(&generate_value_list(&summary.gaps, "No category is below the gap threshold."));

    section.push_str(&format!(
        "### 🔵 Strengths (team average {:.1} or above)\n\n",
        metadata.strength_threshold
    ));
    section.push_str(&generate_value_list(
        &summary.strengths,
        "No category reaches the strength threshold.",
    ));

    section
}

fn generate_value_list(values: &[CategoryValue], empty: &str) -> String {
    if values.is_empty() {
        return format!("{}\n\n", empty);
    }

    let mut list = String::new();
    for value in values {
        list.push_str(&format!("- **{}**: {:.1}\n", value.category, value.value));
    }
    list.push('\n');
    list
}

/// Generate the ranked category table.
fn generate_priorities_section(priorities: &[PriorityRow]) -> String {
    let mut section = String::new();

    section.push_str("## Development Priorities\n\n");

    if priorities.is_empty() {
        section.push_str("The catalog has no categories.\n\n");
        return section;
    }

    section.push_str("| # | Category | Average | Target | Gap | Priority | Status |\n");
    section.push_str("|:---:|:---|:---:|:---:|:---:|:---:|:---|\n");

    for (i, row) in priorities.iter().enumerate() {
        let standing = &row.standing;
        section.push_str(&format!(
            "| {} | {} ({}) | {:.1} | {:.1} | {:.1} | {:.1} | {} {} |\n",
            i + 1,
            standing.name,
            standing.short_label,
            standing.average,
            standing.target,
            standing.gap,
            standing.priority,
            row.status.emoji(),
            row.status
        ));
    }
    section.push('\n');

    section
}

/// Generate the collaborator roster table.
fn generate_roster_section(roster: &[TeamMember]) -> String {
    let mut section = String::new();

    section.push_str("## Team Roster\n\n");

    if roster.is_empty() {
        section.push_str("No collaborators yet.\n\n");
        return section;
    }

    section.push_str("| ID | Name | Role | Average | Status | Risk | Critical Gaps |\n");
    section.push_str("|:---:|:---|:---|:---:|:---|:---|:---:|\n");

    for member in roster {
        let demo = if member.is_demo { " *(demo)*" } else { "" };
        section.push_str(&format!(
            "| {} | {}{} | {} | {:.1} | {} {} | {} {} | {} |\n",
            member.collaborator_id,
            member.name,
            demo,
            member.role,
            member.overall_average,
            member.status.emoji(),
            member.status,
            member.risk_level.emoji(),
            member.risk_level,
            member.critical_gaps
        ));
    }
    section.push('\n');

    section
}

/// Generate one development profile per collaborator.
fn generate_profiles_section(profiles: &[CollaboratorProfile], max_skills: usize) -> String {
    let mut section = String::new();

    section.push_str("## Development Profiles\n\n");

    if profiles.is_empty() {
        section.push_str("No collaborators to profile.\n\n");
        return section;
    }

    for profile in profiles {
        section.push_str(&generate_profile_block(profile, max_skills));
    }

    section
}

/// Generate the block for a single collaborator.
fn generate_profile_block(profile: &CollaboratorProfile, max_skills: usize) -> String {
    let mut block = String::new();
    let insights = &profile.insights;
    let maturity = &insights.maturity;

    block.push_str(&format!(
        "### {} {{#{}}}\n\n",
        profile.name,
        profile_anchor(profile)
    ));
    block.push_str(&format!(
        "*{} | Overall average: {:.1} | Risk: {} {}*\n\n",
        profile.role,
        profile.overall_average,
        insights.risk_level.emoji(),
        insights.risk_level
    ));

    block.push_str(&format!(
        "**Maturity:** critical {:.0}% ({}/{}), important {:.0}% ({}/{})\n\n",
        maturity.critical_maturity_pct,
        maturity.critical_met,
        maturity.critical_total,
        maturity.important_maturity_pct,
        maturity.important_met,
        maturity.important_total
    ));

    if !profile.category_averages.is_empty() {
        let averages: Vec<String> = profile
            .category_averages
            .iter()
            .map(|value| format!("{} {:.1}", value.category, value.value))
            .collect();
        block.push_str(&format!("**Category averages:** {}\n\n", averages.join(" · ")));
    }

    block.push_str(&generate_bucket("🔴 Critical Gaps", &insights.critical_gaps, max_skills));
    block.push_str(&generate_bucket(
        "🟠 Improvement Areas",
        &insights.improvement_areas,
        max_skills,
    ));
    block.push_str(&generate_bucket("🟢 Key Strengths", &insights.key_strengths, max_skills));
    block.push_str(&generate_bucket(
        "🟣 Underused Talent",
        &insights.underused_talent,
        max_skills,
    ));

    block.push_str("---\n\n");

    block
}

/// Generate one insight bucket, truncated to `max_skills` entries.
fn generate_bucket(title: &str, skills: &[AssessedSkill], max_skills: usize) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut bucket = String::new();
    bucket.push_str(&format!("#### {} ({})\n\n", title, skills.len()));

    for skill in skills.iter().take(max_skills) {
        let obs = &skill.observation;
        bucket.push_str(&format!(
            "- **{}**: level {:.1} ({}), {} / {}, weight {:.1}\n  > 💡 {}\n",
            skill.name,
            obs.level,
            level_label(obs.level),
            obs.criticality,
            obs.frequency,
            skill.evaluation.combined_weight,
            skill.evaluation.action
        ));
    }

    if skills.len() > max_skills {
        bucket.push_str(&format!("- *... and {} more*\n", skills.len() - max_skills));
    }
    bucket.push('\n');

    bucket
}

/// Generate the evaluation legend and the level scale.
fn generate_legend_section() -> String {
    let mut section = String::new();

    section.push_str("## Legend\n\n");
    section.push_str("### Skill States\n\n");
    section.push_str("| State | Description | Action |\n");
    section.push_str("|:---|:---|:---|\n");

    for (state, description, action) in legend() {
        section.push_str(&format!(
            "| {} {} | {} | {} |\n",
            state.emoji(),
            state,
            description,
            action
        ));
    }
    section.push('\n');

    section.push_str("### Level Scale\n\n");
    section.push_str("| Level | Name | Meaning |\n");
    section.push_str("|:---:|:---|:---|\n");

    for (level, name, meaning) in LEVEL_SCALE {
        section.push_str(&format!("| {} | {} | {} |\n", level, name, meaning));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by SkillMatrix v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &TeamReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Thresholds;
    use crate::report::builder::build_report;
    use crate::store::demo_dataset;
    use std::path::Path;

    fn create_test_report() -> TeamReport {
        let dataset = demo_dataset().unwrap();
        build_report(&dataset, Path::new("data/database.json"), &Thresholds::default()).unwrap()
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# SkillMatrix Team Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Executive Summary"));
        assert!(markdown.contains("## Development Priorities"));
        assert!(markdown.contains("## Team Roster"));
        assert!(markdown.contains("### Ana Torres {#collaborator-1}"));
        assert!(markdown.contains("Pipeline orchestration"));
        assert!(markdown.contains("## Legend"));
        assert!(markdown.contains("UNDERUSED TALENT"));
        assert!(markdown.contains("| 5 | Expert |"));
    }

    #[test]
    fn test_legend_can_be_disabled() {
        let report = create_test_report();
        let options = ReportConfig {
            include_legend: false,
            ..ReportConfig::default()
        };

        let markdown = generate_markdown_report(&report, &options);
        assert!(!markdown.contains("## Legend"));
        assert!(!markdown.contains("[Legend](#legend)"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("`data/database.json`"));
        assert!(section.contains("- **Collaborators:** 4"));
        assert!(section.contains("- **Skills:** 15"));
    }

    #[test]
    fn test_bucket_is_truncated() {
        let report = create_test_report();
        let skills = &report.profiles[0].insights.strengths;
        assert!(skills.len() > 1);

        let bucket = generate_bucket("Strengths", skills, 1);
        assert_eq!(bucket.matches("- **").count(), 1);
        assert!(bucket.contains(&format!("... and {} more", skills.len() - 1)));

        assert!(generate_bucket("Empty", &[], 3).is_empty());
    }

    #[test]
    fn test_empty_sections() {
        assert!(generate_roster_section(&[]).contains("No collaborators yet."));
        assert!(generate_priorities_section(&[]).contains("no categories"));
        assert!(generate_value_list(&[], "Nothing here.").contains("Nothing here."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"executiveSummary\""));
        assert!(json.contains("\"priorities\""));
        assert!(json.contains("\"categoryId\""));
        assert!(json.contains("\"riskLevel\": \"CRITICAL\""));
        assert!(json.contains("\"state\": \"CRITICAL_GAP\""));
    }
}
