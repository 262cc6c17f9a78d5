//! Theme preference persistence: JSON save/load across restarts.
//!
//! Filters and sort order are session-only; a restarted dashboard always
//! opens unfiltered in the configured default order.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::theme::ThemeName;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub theme: ThemeName,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        theme: app.theme_name,
    }
}

pub fn apply(app: &mut AppState, state: PersistedState) {
    app.theme_name = state.theme;
}
