/// Tools for reading and changing the theme preference
///
/// This module implements the theme_get and theme_set MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::{PreferenceStore, ThemeMode};
use crate::tools::ToolError;

/// Parameters for changing the theme
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetThemeParams {
    /// "light" or "dark"
    pub theme: String,
}

/// Response from the theme tools
#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: ThemeMode,
    pub message: String,
}

pub async fn get_theme<P: PreferenceStore + ?Sized>(store: &P) -> ThemeResponse {
    let theme = store.load_theme().await;
    ThemeResponse {
        theme,
        message: format!("🎨 Current theme: {}", theme),
    }
}

pub async fn set_theme<P: PreferenceStore + ?Sized>(
    store: &P,
    params: SetThemeParams,
) -> Result<ThemeResponse, ToolError> {
    let theme: ThemeMode = params.theme.parse().map_err(ToolError::InvalidInput)?;
    store.save_theme(theme).await?;
    Ok(ThemeResponse {
        theme,
        message: format!("🎨 Theme set to {}", theme),
    })
}
