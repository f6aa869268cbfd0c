use super::types::Settings;
use crate::error::SettingsError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Default settings location: `{config_dir}/scribe/settings.json`.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"))
        .join("scribe")
        .join("settings.json")
}

/// Persistent storage for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Stored values merged over defaults. Never fails: problems are logged
    /// and defaults used.
    fn load(&self) -> Settings;

    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Settings {
        if !self.path.exists() {
            return Settings::default();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("[Settings] Could not read {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&content) {
            Ok(settings) => settings.normalized(),
            Err(e) => {
                tracing::error!(
                    "[Settings] Corrupt settings {}: {}. Using defaults.",
                    self.path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        crate::fs::write_atomic(&self.path, &json).map_err(io_error)
    }
}

/// Holds the live settings and persists every change immediately.
pub struct SettingsManager {
    store: Arc<dyn SettingsStore>,
    current: Arc<RwLock<Settings>>,
}

impl SettingsManager {
    pub fn load(store: Arc<dyn SettingsStore>) -> Self {
        let current = store.load();
        Self {
            store,
            current: Arc::new(RwLock::new(current)),
        }
    }

    pub async fn get(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Apply `change` and persist. The in-memory value is only replaced once
    /// the change validated and the write succeeded.
    pub async fn update<F>(&self, change: F) -> Result<Settings, SettingsError>
    where
        F: FnOnce(&mut Settings) -> Result<(), SettingsError>,
    {
        let mut current = self.current.write().await;
        let mut updated = current.clone();
        change(&mut updated)?;
        self.store.save(&updated)?;
        *current = updated.clone();
        tracing::debug!("[Settings] Saved settings");
        Ok(updated)
    }

    pub async fn set_field(&self, key: &str, value: &str) -> Result<Settings, SettingsError> {
        self.update(|settings| settings.set_field(key, value)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::types::DEFAULT_MAX_BUDGET_TOKENS;

    fn temp_store() -> (tempfile::TempDir, JsonSettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("nested").join("settings.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let (_dir, store) = temp_store();

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_corrupt_file_loads_defaults() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"model": "opus", "maxBudgetTokens": 0}"#).unwrap();

        let settings = store.load();

        assert_eq!(settings.model, "opus");
        assert_eq!(settings.max_budget_tokens, DEFAULT_MAX_BUDGET_TOKENS);
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = temp_store();
        let settings = Settings {
            debug_mode: true,
            cli_path: "/usr/local/bin/claude".to_string(),
            ..Default::default()
        };

        store.save(&settings).unwrap();

        assert_eq!(store.load(), settings);
    }

    #[tokio::test]
    async fn test_manager_persists_each_change() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);
        let manager = SettingsManager::load(store.clone());

        manager.set_field("model", "haiku").await.unwrap();

        assert_eq!(manager.get().await.model, "haiku");
        assert_eq!(store.load().model, "haiku");
    }

    #[tokio::test]
    async fn test_manager_keeps_value_on_invalid_change() {
        let (_dir, store) = temp_store();
        let manager = SettingsManager::load(Arc::new(store));

        let result = manager.set_field("maxBudgetTokens", "-5").await;

        assert!(result.is_err());
        assert_eq!(manager.get().await, Settings::default());
    }
}
