//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{is_valid_level, Criticality, Frequency, SkillObservation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SkillMatrix - team competency dashboard
///
/// Classifies every collaborator's skills by criticality, frequency of use
/// and proficiency, and ranks competency categories for development.
///
/// Examples:
///   skillmatrix init
///   skillmatrix summary
///   skillmatrix collaborator 2
///   skillmatrix add --name "Lena Ortiz" --role "Data Analyst" --skill 1=3.5:C:D
///   skillmatrix report --format json --output team.json
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the JSON dataset
    ///
    /// Defaults to data/database.json or the value in .skillmatrix.toml
    #[arg(long, global = true, value_name = "FILE", env = "SKILLMATRIX_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .skillmatrix.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the demo catalog and collaborators to the dataset
    Init {
        /// Overwrite an existing dataset
        #[arg(long)]
        force: bool,
    },

    /// Generate a default .skillmatrix.toml configuration file
    InitConfig,

    /// Classify a single skill observation
    Evaluate {
        /// Proficiency level (0-5, steps of 0.5)
        #[arg(long)]
        level: f64,

        /// Criticality: C, I, D or N
        #[arg(long, value_name = "CRIT")]
        criticality: Criticality,

        /// Frequency: D, S, M, T or N
        #[arg(long, value_name = "FREQ")]
        frequency: Frequency,
    },

    /// Show team averages, category priorities and the roster
    Summary {
        /// Exit with code 2 when any category is below the gap threshold
        #[arg(long)]
        fail_on_gaps: bool,
    },

    /// Show the development profile of one collaborator
    Collaborator {
        /// Collaborator id
        id: u32,
    },

    /// Show collaborator averages and skill breakdown of one category
    Category {
        /// Category id
        id: u32,
    },

    /// Add a collaborator
    ///
    /// Skills not given with --skill start at level 0, criticality N, frequency N.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        role: String,

        /// Skill observation, e.g. 12=3.5:C:D (repeatable)
        #[arg(long = "skill", value_name = "ID=LEVEL:CRIT:FREQ", value_parser = parse_skill_arg)]
        skills: Vec<(u32, SkillObservation)>,
    },

    /// Delete all demo collaborators (allowed once)
    ResetDemo {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },

    /// Write the full team report
    Report {
        /// Output format (markdown, json)
        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,

        /// Output file path (defaults to report.output from the config)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Parse an `ID=LEVEL:CRIT:FREQ` skill argument.
pub fn parse_skill_arg(value: &str) -> Result<(u32, SkillObservation), String> {
    let (id, rest) = value
        .split_once('=')
        .ok_or_else(|| format!("expected ID=LEVEL:CRIT:FREQ, got '{}'", value))?;

    let id: u32 = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid skill id '{}'", id))?;

    let parts: Vec<&str> = rest.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("expected LEVEL:CRIT:FREQ after '=', got '{}'", rest));
    }

    let level: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| format!("invalid level '{}'", parts[0]))?;
    if !is_valid_level(level) {
        return Err(format!(
            "level {} must be between 0 and 5 in steps of 0.5",
            level
        ));
    }

    let criticality: Criticality = parts[1].parse()?;
    let frequency: Frequency = parts[2].parse()?;

    Ok((id, SkillObservation::new(level, criticality, frequency)))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Evaluate { level, .. } if !is_valid_level(*level) => Err(format!(
                "Level {} must be between 0 and 5 in steps of 0.5",
                level
            )),
            Command::Add { name, role, .. } if name.trim().is_empty() || role.trim().is_empty() => {
                Err("Name and role must not be empty".to_string())
            }
            Command::ResetDemo { yes: false } => Err(
                "Resetting the demo deletes every collaborator and cannot be undone; pass --yes to confirm"
                    .to_string(),
            ),
            _ => Ok(()),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
