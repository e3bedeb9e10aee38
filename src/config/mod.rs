//! User preferences, their YAML persistence, and the shared settings context.

mod context;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    core::errors::Result,
    domain::Role,
    utils::paths::{write_atomic, PathResolver},
};

pub use context::{SettingsContext, SettingsSubscription};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Design {
    #[default]
    System,
    Light,
    Dark,
}

impl Design {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "system" => Some(Design::System),
            "light" => Some(Design::Light),
            "dark" => Some(Design::Dark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub time: NaiveTime,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// Overrides the role's default monthly goal when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_goal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pioneer_since: Option<NaiveDate>,
    #[serde(default)]
    pub design: Design,
    #[serde(default)]
    pub reminder: ReminderSettings,
}

impl Settings {
    pub fn effective_role_goal(&self) -> u32 {
        self.role_goal.unwrap_or_else(|| self.role.goal())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Handles persistence of [`Settings`] as `settings.yaml`.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    path: PathBuf,
}

impl SettingsManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: Option<PathBuf>) -> Self {
        let base = PathResolver::resolve_base(base);
        Self::new(PathResolver::settings_file_in(&base))
    }

    pub fn load(&self) -> Result<Settings> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Settings::from_yaml(&data)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let yaml = settings.to_yaml()?;
        write_atomic(&self.path, yaml.as_bytes())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
