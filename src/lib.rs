/// Public library interface for the Habit Tracker
///
/// This module exports the habit model, the metrics engine, the storage
/// ports and the MCP server that drives them.

use thiserror::Error;

// Internal modules
pub mod analytics;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{DailySummary, MetricsEngine};
pub use config::{ConfigError, TrackerConfig};
pub use domain::*;
pub use mcp::McpServer;
pub use storage::{
    HabitRepository, JsonFileRepository, JsonPreferenceStore, PreferenceStore, StorageError,
    ThemeMode,
};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit tracker server state
///
/// Owns the in-memory habit collection for the life of the process. Tools
/// mutate it in place and the server writes the whole collection back
/// through the repository after each change.
pub struct HabitTrackerServer {
    config: TrackerConfig,
    engine: MetricsEngine,
    repository: Box<dyn HabitRepository>,
    preferences: Box<dyn PreferenceStore>,
    habits: Vec<Habit>,
}

impl HabitTrackerServer {
    /// Create a server backed by JSON files in the configured data directory
    pub async fn new(config: TrackerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Tracker with data directory: {:?}", config.data_dir);

        tokio::fs::create_dir_all(&config.data_dir).await?;

        let repository = JsonFileRepository::new(config.habits_path());
        let preferences = JsonPreferenceStore::new(config.preferences_path());

        Ok(Self::with_stores(config, Box::new(repository), Box::new(preferences)).await)
    }

    /// Create a server over arbitrary storage implementations
    pub async fn with_stores(
        config: TrackerConfig,
        repository: Box<dyn HabitRepository>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let habits = repository.load_all().await;
        tracing::info!("Loaded {} existing habits", habits.len());

        Self {
            engine: MetricsEngine::from_config(&config),
            config,
            repository,
            preferences,
            habits,
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "Serving {} habits from {} (day starts at {:02}:00)",
            self.habits.len(),
            self.config.data_dir.display(),
            self.config.start_of_day_hour
        );

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Write the current collection through the repository
    ///
    /// On failure the collection is reset to `snapshot`, the state before the
    /// change being saved, so memory never runs ahead of what is on disk.
    pub async fn save_or_restore(&mut self, snapshot: Vec<Habit>) -> Result<(), StorageError> {
        if let Err(e) = self.repository.save_all(&self.habits).await {
            tracing::warn!("Save failed, discarding unsaved change: {}", e);
            self.habits = snapshot;
            return Err(e);
        }
        Ok(())
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habits_mut(&mut self) -> &mut Vec<Habit> {
        &mut self.habits
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }
}
