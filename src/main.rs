//! SkillMatrix - team competency dashboard
//!
//! A CLI tool that classifies collaborators' skills by criticality,
//! frequency of use and proficiency, ranks competency categories for
//! development and writes team reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable dataset, invalid input, config, etc.)
//!   2 - Gaps found with `summary --fail-on-gaps`

mod analysis;
mod cli;
mod config;
mod error;
mod evaluation;
mod models;
mod report;
mod store;

use analysis::{category_roster, skill_breakdown, AssessedSkill};
use anyhow::{anyhow, Context, Result};
use cli::{Args, Command, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use evaluation::evaluate;
use models::{level_label, Criticality, Frequency, SkillObservation};
use report::{build_profile, build_report, CollaboratorProfile};
use std::path::{Path, PathBuf};
use store::{demo_dataset, DataStore, NewCollaborator};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Where the active configuration came from.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    /// The default file exists but could not be used.
    Rejected(String),
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Load configuration before logging so `general.verbose` can apply
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);
    log_config_source(&source);

    info!("SkillMatrix v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args, &config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over the flags when set.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Rejected(format!("{:#}", e)))),
    }
}

fn log_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
        ConfigSource::Builtin => debug!("No config file found, using defaults"),
        ConfigSource::Rejected(reason) => {
            warn!("Failed to load config: {}. Using defaults", reason)
        }
    }
}

/// Dispatch the subcommand. Returns the process exit code.
fn run(args: &Args, config: &Config) -> Result<i32> {
    let store = DataStore::new(&config.general.data_file);
    debug!("Dataset: {}", store.path().display());

    match &args.command {
        Command::Init { force } => handle_init(&store, *force),
        Command::InitConfig => handle_init_config(),
        Command::Evaluate {
            level,
            criticality,
            frequency,
        } => handle_evaluate(*level, *criticality, *frequency),
        Command::Summary { fail_on_gaps } => handle_summary(&store, config, *fail_on_gaps),
        Command::Collaborator { id } => handle_collaborator(&store, config, *id),
        Command::Category { id } => handle_category(&store, config, *id),
        Command::Add { name, role, skills } => handle_add(&store, name, role, skills),
        Command::ResetDemo { .. } => handle_reset_demo(&store),
        Command::Report { format, output } => {
            handle_report(&store, config, *format, output.as_deref())
        }
    }
}

/// Handle `init-config`: generate a default .skillmatrix.toml.
fn handle_init_config() -> Result<i32> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        return Ok(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the data file, thresholds and report output.");
    Ok(0)
}

/// Handle `init`: write the demo catalog and collaborators.
fn handle_init(store: &DataStore, force: bool) -> Result<i32> {
    if !force && store.is_initialized()? {
        eprintln!(
            "⚠️  {} already contains a catalog. Use --force to overwrite it.",
            store.path().display()
        );
        return Ok(1);
    }

    let dataset = demo_dataset()?;
    store.save(&dataset)?;

    println!("✅ Demo dataset written to {}", store.path().display());
    println!(
        "   {} categories, {} skills, {} demo collaborators",
        dataset.categories.len(),
        dataset.skills.len(),
        dataset.collaborators.len()
    );
    println!("   Run `skillmatrix reset-demo --yes` to start from an empty team.");
    Ok(0)
}

/// Handle `evaluate`: classify a single observation.
fn handle_evaluate(level: f64, criticality: Criticality, frequency: Frequency) -> Result<i32> {
    let result = evaluate(level, frequency, criticality);

    println!("{} {}", result.state.emoji(), result.state);
    println!("   Level: {:.1} ({})", level, level_label(level));
    println!(
        "   Criticality: {} ({}) | Frequency: {} ({})",
        criticality,
        criticality.code(),
        frequency,
        frequency.code()
    );
    println!("   Combined weight: {:.1}", result.combined_weight);
    println!("   Priority: {}/10", result.priority_rank);
    println!("   Description: {}", result.description);
    println!("   Action: {}", result.action);
    Ok(0)
}

/// Handle `summary`: team overview in the terminal.
fn handle_summary(store: &DataStore, config: &Config, fail_on_gaps: bool) -> Result<i32> {
    let dataset = store.load()?;
    if dataset.categories.is_empty() {
        println!("ℹ️  The catalog is empty. Run `skillmatrix init` to load the demo data.");
        return Ok(0);
    }

    let report = build_report(&dataset, store.path(), &config.thresholds())?;

    println!("\n📊 Development Priorities:");
    for (i, row) in report.priorities.iter().enumerate() {
        let s = &row.standing;
        println!(
            "   {}. {} {:<24} avg {:.1} | target {:.1} | gap {:+.1}",
            i + 1,
            row.status.emoji(),
            s.name,
            s.average,
            s.target,
            s.gap
        );
    }

    let summary = &report.executive_summary;
    println!("\n🧭 Executive Summary:");
    if summary.gaps.is_empty() {
        println!("   No gaps below {:.1}", config.thresholds.gap);
    }
    for gap in &summary.gaps {
        println!("   🟠 Gap: {} ({:.1})", gap.category, gap.value);
    }
    for strength in &summary.strengths {
        println!("   🔵 Strength: {} ({:.1})", strength.category, strength.value);
    }

    println!("\n👥 Team ({} collaborators):", report.roster.len());
    if report.roster.is_empty() {
        println!("   No collaborators yet. Add one with `skillmatrix add`.");
    }
    for member in &report.roster {
        println!(
            "   #{:<3} {:<20} {:<18} avg {:.1} {} {:<15} risk {} {}",
            member.collaborator_id,
            member.name,
            member.role,
            member.overall_average,
            member.status.emoji(),
            member.status.to_string(),
            member.risk_level.emoji(),
            member.risk_level
        );
    }

    if fail_on_gaps && report.has_gaps() {
        eprintln!(
            "\n⛔ {} categories below the gap threshold. Failing (exit code 2).",
            summary.gaps.len()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Handle `collaborator`: print one development profile.
fn handle_collaborator(store: &DataStore, config: &Config, id: u32) -> Result<i32> {
    let dataset = store.load()?;
    let collaborator = dataset
        .collaborator(id)
        .ok_or_else(|| anyhow!("No collaborator with id {}", id))?;

    let profile = build_profile(collaborator, &dataset)?;
    print_profile(&profile, config.report.max_skills_per_bucket);
    Ok(0)
}

fn print_profile(profile: &CollaboratorProfile, max_skills: usize) {
    let insights = &profile.insights;
    let maturity = &insights.maturity;

    println!("\n👤 {} ({})", profile.name, profile.role);
    println!("   Overall average: {:.1}", profile.overall_average);
    println!(
        "   Risk: {} {}",
        insights.risk_level.emoji(),
        insights.risk_level
    );
    println!(
        "   Critical maturity: {:.0}% ({}/{}) | Important maturity: {:.0}% ({}/{})",
        maturity.critical_maturity_pct,
        maturity.critical_met,
        maturity.critical_total,
        maturity.important_maturity_pct,
        maturity.important_met,
        maturity.important_total
    );

    println!("\n📈 Category averages:");
    for value in &profile.category_averages {
        println!("   {:<24} {:.1}", value.category, value.value);
    }

    print_bucket("🔴 Critical gaps", &insights.critical_gaps, max_skills);
    print_bucket("🟠 Improvement areas", &insights.improvement_areas, max_skills);
    print_bucket("🟢 Key strengths", &insights.key_strengths, max_skills);
    print_bucket("🟣 Underused talent", &insights.underused_talent, max_skills);
    print_bucket("🔵 Strengths", &insights.strengths, max_skills);
}

fn print_bucket(title: &str, skills: &[AssessedSkill], max_skills: usize) {
    if skills.is_empty() {
        return;
    }

    println!("\n{} ({}):", title, skills.len());
    for skill in skills.iter().take(max_skills) {
        println!(
            "   - {} (level {:.1}, {}/{}, weight {:.1}): {}",
            skill.name,
            skill.level(),
            skill.observation.criticality.code(),
            skill.observation.frequency.code(),
            skill.evaluation.combined_weight,
            skill.evaluation.action
        );
    }
    if skills.len() > max_skills {
        println!("   ... and {} more", skills.len() - max_skills);
    }
}

/// Handle `category`: roster and skill breakdown of one category.
fn handle_category(store: &DataStore, config: &Config, id: u32) -> Result<i32> {
    let dataset = store.load()?;
    let catalog = dataset.catalog();
    let category = catalog
        .category(id)
        .ok_or_else(|| anyhow!("No category with id {}", id))?;

    let roster = category_roster(id, &dataset.collaborators, &catalog, &config.thresholds())?;
    let breakdown = skill_breakdown(id, &dataset.collaborators, &catalog)?;

    println!("\n📂 {} ({})", category.name, category.short_label);

    println!("\n👥 Collaborators:");
    if roster.is_empty() {
        println!("   No collaborators yet.");
    }
    for entry in &roster {
        println!(
            "   {:<20} {:<18} {:.1} {} {}",
            entry.name,
            entry.role,
            entry.average,
            entry.status.emoji(),
            entry.status
        );
    }

    println!("\n🧩 Skills:");
    for skill in &breakdown {
        println!("   {} (team average {:.1})", skill.name, skill.team_average);
        for holder in &skill.holders {
            println!(
                "      {} {:<20} level {:.1} {}/{} {}",
                holder.evaluation.state.emoji(),
                holder.name,
                holder.observation.level,
                holder.observation.criticality.code(),
                holder.observation.frequency.code(),
                holder.evaluation.state
            );
        }
    }

    Ok(0)
}

/// Handle `add`: create a collaborator from the given observations.
fn handle_add(
    store: &DataStore,
    name: &str,
    role: &str,
    skills: &[(u32, SkillObservation)],
) -> Result<i32> {
    let draft = NewCollaborator {
        name: name.to_string(),
        role: role.to_string(),
        observations: skills.iter().copied().collect(),
    };

    let (collaborator, catalog) = store
        .add_collaborator(draft)
        .context("Failed to add collaborator")?;

    println!(
        "✅ Added {} ({}) with id {}",
        collaborator.name, collaborator.role, collaborator.id
    );
    for category in &catalog.categories {
        let average = collaborator
            .category_averages
            .get(&category.key())
            .copied()
            .unwrap_or(0.0);
        println!("   {:<24} {:.1}", category.name, average);
    }
    Ok(0)
}

/// Handle `reset-demo`: delete every collaborator, once.
fn handle_reset_demo(store: &DataStore) -> Result<i32> {
    let dataset = store.load()?;
    if !dataset.has_demo_collaborators() {
        warn!(
            "No demo collaborators found; the reset still removes all {} collaborators",
            dataset.collaborators.len()
        );
    }

    let outcome = store.reset_demo()?;

    println!("🧹 Removed {} collaborators.", outcome.removed);
    println!("   The demo reset is now disabled for this dataset.");
    Ok(0)
}

/// Handle `report`: write the full team report.
fn handle_report(
    store: &DataStore,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<i32> {
    let dataset = store.load()?;
    let report = build_report(&dataset, store.path(), &config.thresholds())?;

    let path = match (output, format) {
        (Some(path), _) => path.to_path_buf(),
        (None, OutputFormat::Json) => config.report.output.with_extension("json"),
        (None, OutputFormat::Markdown) => config.report.output.clone(),
    };

    println!("📝 Generating report...");
    let content = match format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    std::fs::write(&path, &content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!("\n📊 Report Summary:");
    println!("   Collaborators: {}", report.metadata.collaborators);
    println!(
        "   Gaps: {} | Strengths: {}",
        report.executive_summary.gaps.len(),
        report.executive_summary.strengths.len()
    );
    println!("\n✅ Report saved to: {}", path.display());
    Ok(0)
}
