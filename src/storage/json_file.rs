/// JSON file implementation of the habit repository
///
/// The whole collection lives in one document, `{"schemaVersion": 1,
/// "habits": [...]}`. Reads never fail outward: anything that goes wrong
/// degrades to an empty collection. Writes go to a sibling temp file that is
/// renamed over the real one, and their failures are reported.

use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::domain::Habit;
use crate::storage::{migrations, HabitRepository, StorageError};

/// File-backed habit repository
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read and migrate the stored document
    ///
    /// `Ok(None)` means there is nothing stored yet (missing or blank file).
    async fn read_document(&self) -> Result<Option<Value>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let mut doc: Value = serde_json::from_str(&raw)?;
        migrations::migrate_document(&mut doc)?;
        Ok(Some(doc))
    }

    /// Write the initial empty document so the file exists from first use
    async fn initialize(&self) {
        match write_atomic(&self.path, &migrations::empty_document()).await {
            Ok(()) => tracing::info!("Initialized habits file at {}", self.path.display()),
            Err(e) => tracing::warn!("Could not initialize habits file: {}", e),
        }
    }
}

#[async_trait]
impl HabitRepository for JsonFileRepository {
    async fn load_all(&self) -> Vec<Habit> {
        let doc = match self.read_document().await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                self.initialize().await;
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("Failed to load habits, starting empty: {}", e);
                return Vec::new();
            }
        };

        let now = Utc::now();
        let records = doc
            .get(migrations::HABITS_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let habits: Vec<Habit> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let habit = Habit::from_json(record, now);
                if habit.is_none() {
                    tracing::warn!("Skipping habit record #{} without a usable id", index);
                }
                habit
            })
            .collect();

        tracing::debug!("Loaded {} habits from {}", habits.len(), self.path.display());
        habits
    }

    async fn save_all(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let doc = migrations::build_document(habits.iter().map(Habit::to_json).collect());
        write_atomic(&self.path, &doc).await?;
        tracing::debug!("Saved {} habits to {}", habits.len(), self.path.display());
        Ok(())
    }
}

/// Atomic write: write to temp file in same dir, then rename.
///
/// The temp file gets a unique name and is removed if the rename fails, so a
/// failed save leaves neither a partial target nor a stray file behind.
pub(crate) async fn write_atomic(path: &Path, doc: &Value) -> Result<(), StorageError> {
    let data = serde_json::to_vec_pretty(doc)?;
    let target = path.to_path_buf();

    tokio::task::spawn_blocking(move || persist_bytes(&target, &data))
        .await
        .unwrap_or_else(|join| Err(io::Error::new(ErrorKind::Other, join)))
        .map_err(|source| StorageError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn persist_bytes(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
