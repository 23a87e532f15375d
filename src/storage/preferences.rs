/// Theme preference storage
///
/// Stored as `{"theme": "dark" | "light"}` in its own file.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::storage::json_file::write_atomic;
use crate::storage::{PreferenceStore, StorageError};

/// Light or dark appearance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("Invalid theme '{}'. Valid options: light, dark", other)),
        }
    }
}

/// File-backed theme preference
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn load_theme(&self) -> ThemeMode {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return ThemeMode::default(),
            Err(e) => {
                tracing::warn!("Failed to read preferences {}: {}", self.path.display(), e);
                return ThemeMode::default();
            }
        };

        let doc: Value = match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Ignoring malformed preferences file: {}", e);
                return ThemeMode::default();
            }
        };

        doc.get("theme")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    async fn save_theme(&self, theme: ThemeMode) -> Result<(), StorageError> {
        write_atomic(&self.path, &json!({ "theme": theme.as_str() })).await?;
        tracing::debug!("Saved theme preference: {}", theme);
        Ok(())
    }
}
