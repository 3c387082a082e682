//! JSON document store.
//!
//! The whole dataset lives in one JSON file that is read and written
//! wholesale. Loading normalizes the document shape and recomputes every
//! collaborator's cached category averages; saving goes through a
//! temporary file in the same directory that is renamed over the target.

use crate::analysis::{category_averages, to_cached_averages};
use crate::error::{EngineError, StoreError};
use crate::models::{
    is_valid_level, Catalog, Category, Collaborator, Dataset, Skill, SkillObservation,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Default location of the dataset document.
pub const DEFAULT_DATA_FILE: &str = "data/database.json";

/// Input of the add-collaborator operation.
#[derive(Debug, Clone, Default)]
pub struct NewCollaborator {
    pub name: String,
    pub role: String,
    /// Observations supplied by the user; other catalog skills start unassessed.
    pub observations: BTreeMap<u32, SkillObservation>,
}

/// Result of a successful demo reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub removed: usize,
    pub allow_reset_from_demo: bool,
}

/// File-backed dataset store.
#[derive(Debug, Clone)]
pub struct DataStore {
    path: PathBuf,
}

impl DataStore {
    /// Create a store for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the document with empty defaults if it doesn't exist.
    fn ensure_file(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }

        info!("Creating empty dataset at {}", self.path.display());
        self.save(&Dataset::default())
    }

    /// Load, normalize and refresh the dataset.
    pub fn load(&self) -> Result<Dataset, StoreError> {
        self.ensure_file()?;

        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        if raw.trim().is_empty() {
            debug!("{} is empty, using defaults", self.path.display());
            return Ok(Dataset::default());
        }

        let value: Value =
            serde_json::from_str(&raw).map_err(|e| StoreError::json(&self.path, e))?;
        let mut dataset = normalize(&value).map_err(|e| StoreError::json(&self.path, e))?;
        refresh_category_averages(&mut dataset)?;

        debug!(
            "Loaded {} categories, {} skills, {} collaborators from {}",
            dataset.categories.len(),
            dataset.skills.len(),
            dataset.collaborators.len(),
            self.path.display()
        );

        Ok(dataset)
    }

    /// Write the whole dataset atomically.
    pub fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        serde_json::to_writer_pretty(&mut tmp, dataset)
            .map_err(|e| StoreError::json(&self.path, e))?;
        tmp.write_all(b"\n")
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!("Saved dataset to {}", self.path.display());
        Ok(())
    }

    /// Returns true if the document exists and has a catalog.
    pub fn is_initialized(&self) -> Result<bool, StoreError> {
        if !self.path.exists() {
            return Ok(false);
        }
        Ok(!self.load()?.categories.is_empty())
    }

    /// Add a collaborator and persist it.
    ///
    /// Returns the stored record together with the catalog it was completed
    /// against.
    pub fn add_collaborator(
        &self,
        draft: NewCollaborator,
    ) -> Result<(Collaborator, Catalog), StoreError> {
        let mut dataset = self.load()?;
        let catalog = dataset.catalog();
        let id = dataset.next_collaborator_id();

        let collaborator = build_collaborator(id, draft, &catalog)?;
        dataset.collaborators.push(collaborator.clone());
        self.save(&dataset)?;

        info!(
            "Added collaborator {} ({}) with id {}",
            collaborator.name, collaborator.role, collaborator.id
        );
        Ok((collaborator, catalog))
    }

    /// Delete every collaborator, once.
    ///
    /// Allowed only while `allowResetFromDemo` is true; the flag is cleared
    /// by the reset itself, so a second call fails with `ResetNotAllowed`.
    pub fn reset_demo(&self) -> Result<ResetOutcome, StoreError> {
        let mut dataset = self.load()?;

        if !dataset.allow_reset_from_demo {
            warn!("Demo reset requested but it was already used");
            return Err(StoreError::ResetNotAllowed);
        }

        let removed = dataset.collaborators.len();
        dataset.collaborators.clear();
        dataset.allow_reset_from_demo = false;
        self.save(&dataset)?;

        info!("Demo reset removed {} collaborators", removed);
        Ok(ResetOutcome {
            removed,
            allow_reset_from_demo: dataset.allow_reset_from_demo,
        })
    }
}

fn array_field<T: DeserializeOwned>(value: &Value, key: &str) -> Result<Vec<T>, serde_json::Error> {
    match value.get(key) {
        Some(field @ Value::Array(_)) => serde_json::from_value(field.clone()),
        Some(_) => {
            warn!("Field '{}' is not an array, treating it as empty", key);
            Ok(Vec::new())
        }
        None => Ok(Vec::new()),
    }
}

/// Build a dataset from a raw document, applying shape defaults.
///
/// Non-array `categories`, `skills` or `collaborators` read as empty and a
/// non-boolean `allowResetFromDemo` reads as `true`.
pub fn normalize(value: &Value) -> Result<Dataset, serde_json::Error> {
    let mut categories: Vec<Category> = array_field(value, "categories")?;
    let skills: Vec<Skill> = array_field(value, "skills")?;
    let collaborators: Vec<Collaborator> = array_field(value, "collaborators")?;
    let allow_reset_from_demo = value
        .get("allowResetFromDemo")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    for category in &mut categories {
        let count = skills.iter().filter(|s| s.category_id == category.id).count();
        if category.skill_count != count {
            debug!(
                "Category {} lists {} skills, catalog has {}",
                category.id, category.skill_count, count
            );
            category.skill_count = count;
        }
    }

    Ok(Dataset {
        categories,
        skills,
        collaborators,
        allow_reset_from_demo,
    })
}

/// Recompute the cached category averages of every collaborator.
pub fn refresh_category_averages(dataset: &mut Dataset) -> Result<(), EngineError> {
    let catalog = dataset.catalog();

    for collaborator in &mut dataset.collaborators {
        let averages = category_averages(collaborator, &catalog)?;
        collaborator.category_averages = to_cached_averages(&averages);
    }

    Ok(())
}

/// Validate a draft and complete it into a catalog-complete record.
pub fn build_collaborator(
    id: u32,
    draft: NewCollaborator,
    catalog: &Catalog,
) -> Result<Collaborator, StoreError> {
    let name = draft.name.trim();
    let role = draft.role.trim();
    if name.is_empty() || role.is_empty() {
        return Err(StoreError::InvalidCollaborator(
            "name and role are required".to_string(),
        ));
    }

    let mut skills: BTreeMap<u32, SkillObservation> = catalog
        .skills
        .iter()
        .map(|skill| (skill.id, SkillObservation::unassessed()))
        .collect();

    for (skill_id, observation) in draft.observations {
        if catalog.skill(skill_id).is_none() {
            return Err(StoreError::UnknownSkill(skill_id));
        }
        if !is_valid_level(observation.level) {
            return Err(StoreError::InvalidCollaborator(format!(
                "level {} for skill {} must be between 0 and 5 in steps of 0.5",
                observation.level, skill_id
            )));
        }
        skills.insert(skill_id, observation);
    }

    let mut collaborator = Collaborator {
        id,
        name: name.to_string(),
        role: role.to_string(),
        is_demo: false,
        skills,
        category_averages: BTreeMap::new(),
    };
    collaborator.category_averages = to_cached_averages(&category_averages(&collaborator, catalog)?);

    Ok(collaborator)
}
