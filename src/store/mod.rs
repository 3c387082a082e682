//! Persistence of the dataset document.

pub mod database;
pub mod seed;

pub use database::{DataStore, NewCollaborator, DEFAULT_DATA_FILE};
pub use seed::demo_dataset;
