//! Persistent user preferences.

use crate::model::settings::Settings;
use crate::repo::kv_repo::KvRepository;
use crate::store::{load_json, save_json, StoreResult, SETTINGS_KEY};

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    pub fn load<R: KvRepository + ?Sized>(repo: &R) -> StoreResult<Self> {
        let settings = load_json(repo, SETTINGS_KEY)?.unwrap_or_default();
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn replace<R: KvRepository + ?Sized>(
        &mut self,
        repo: &R,
        settings: Settings,
    ) -> StoreResult<()> {
        save_json(repo, SETTINGS_KEY, &settings)?;
        self.settings = settings;
        Ok(())
    }
}
