pub mod store;
pub mod types;

pub use store::{default_settings_path, JsonSettingsStore, SettingsManager, SettingsStore};
pub use types::*;
