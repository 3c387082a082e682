//! Error types for the engine and the data store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Precondition failures of the evaluation and aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A catalog skill has no observation in the collaborator's matrix.
    #[error("collaborator {collaborator_id} has no observation for skill {skill_id}")]
    MissingObservation { collaborator_id: u32, skill_id: u32 },
}

/// Failures of the JSON data store and its write operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Shape check failed for a collaborator being added.
    #[error("invalid collaborator: {0}")]
    InvalidCollaborator(String),

    #[error("skill {0} is not in the catalog")]
    UnknownSkill(u32),

    /// The one-time demo reset was already used.
    #[error("the demo data was already reset; it cannot be reset again")]
    ResetNotAllowed,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::MissingObservation {
            collaborator_id: 4,
            skill_id: 12,
        };
        assert_eq!(
            err.to_string(),
            "collaborator 4 has no observation for skill 12"
        );

        let wrapped: StoreError = err.into();
        assert!(wrapped.to_string().contains("skill 12"));
        assert!(StoreError::ResetNotAllowed.to_string().contains("cannot be reset"));
    }
}
