/// Storage layer for persisting habit data
///
/// This module defines the two ports the rest of the crate persists through
/// (the habit collection and the theme preference) and their JSON file
/// implementations.

pub mod json_file;
pub mod migrations;
pub mod preferences;

// Re-export the main storage types
pub use json_file::*;
pub use preferences::*;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Habit;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for the habit collection
///
/// The whole collection is the unit of persistence: it is loaded in one go
/// and saved in one go, in display order.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Load every habit
    ///
    /// A missing, unreadable or corrupt store yields an empty collection.
    async fn load_all(&self) -> Vec<Habit>;

    /// Replace the stored collection with `habits`
    async fn save_all(&self, habits: &[Habit]) -> Result<(), StorageError>;
}

/// Trait defining the storage interface for the theme preference
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Current theme, light when nothing usable is stored
    async fn load_theme(&self) -> ThemeMode;

    async fn save_theme(&self, theme: ThemeMode) -> Result<(), StorageError>;
}
