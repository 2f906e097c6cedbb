use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::exercises::Category;
use crate::schedule::WorkWindow;

/// The persisted user configuration. One JSON document under a fixed path;
/// field names match the mobile app's stored settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    pub work_schedule: WorkWindow,
    /// 0 = Sunday .. 6 = Saturday.
    pub work_days: Vec<u8>,
    pub enabled_categories: Vec<Category>,
    pub sound_enabled: bool,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            work_schedule: WorkWindow::default(),
            work_days: vec![1, 2, 3, 4, 5],
            enabled_categories: Category::ALL.to_vec(),
            sound_enabled: true,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ReminderSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            ReminderSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> ReminderSettings {
        self.data.read().unwrap().clone()
    }

    pub fn work_window(&self) -> WorkWindow {
        self.data.read().unwrap().work_schedule
    }

    pub fn sound_enabled(&self) -> bool {
        self.data.read().unwrap().sound_enabled
    }

    pub fn enabled_categories(&self) -> Vec<Category> {
        self.data.read().unwrap().enabled_categories.clone()
    }

    pub fn update_work_window(&self, window: WorkWindow) -> Result<()> {
        if window.interval_minutes == 0 {
            bail!("reminder interval must be at least one minute");
        }
        let mut guard = self.data.write().unwrap();
        guard.work_schedule = window;
        self.persist(&guard)
    }

    pub fn set_reminders_enabled(&self, enabled: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.work_schedule.enabled = enabled;
        self.persist(&guard)
    }

    /// At least one exercise category stays enabled, matching the app UI
    /// which refuses to untick the last one.
    pub fn update_preferences(
        &self,
        work_days: Vec<u8>,
        enabled_categories: Vec<Category>,
        sound_enabled: bool,
    ) -> Result<()> {
        if enabled_categories.is_empty() {
            bail!("at least one exercise category must stay enabled");
        }
        if work_days.iter().any(|day| *day > 6) {
            bail!("work days must be in 0..=6");
        }
        let mut guard = self.data.write().unwrap();
        guard.work_days = work_days;
        guard.enabled_categories = enabled_categories;
        guard.sound_enabled = sound_enabled;
        self.persist(&guard)
    }

    fn persist(&self, data: &ReminderSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl SettingsStore {
    #[allow(dead_code)]
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: ReminderSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("pausa-settings-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(temp_path()).unwrap();
        let settings = store.settings();
        assert_eq!(settings, ReminderSettings::default());
        assert!(!settings.work_schedule.enabled);
        assert_eq!(settings.work_days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn persists_and_reloads() {
        let path = temp_path();
        let store = SettingsStore::new(path.clone()).unwrap();
        let window = WorkWindow::new("08:30", "16:30", 45, true).unwrap();
        store.update_work_window(window).unwrap();
        store
            .update_preferences(vec![1, 3, 5], vec![Category::Eye], false)
            .unwrap();

        let reopened = SettingsStore::new(path.clone()).unwrap();
        let settings = reopened.settings();
        assert_eq!(settings.work_schedule, window);
        assert_eq!(settings.work_days, vec![1, 3, 5]);
        assert_eq!(settings.enabled_categories, vec![Category::Eye]);
        assert!(!settings.sound_enabled);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn toggling_enablement_persists() {
        let path = temp_path();
        let store = SettingsStore::new(path.clone()).unwrap();
        store.set_reminders_enabled(true).unwrap();

        let reopened = SettingsStore::new(path.clone()).unwrap();
        assert!(reopened.work_window().enabled);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path();
        fs::write(&path, "{not json").unwrap();
        let store = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(store.settings(), ReminderSettings::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_empty_categories_and_bad_days() {
        let store = SettingsStore::new(temp_path()).unwrap();
        assert!(store.update_preferences(vec![1], vec![], true).is_err());
        assert!(store
            .update_preferences(vec![7], vec![Category::Eye], true)
            .is_err());
    }
}
