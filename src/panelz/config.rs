use crate::error::{PanelzError, Result};
use crate::identity::DEFAULT_IDENTITY_URL;
use crate::model::Role;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DASHBOARD_DAYS: u32 = 7;

/// Configuration for panelz, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PanelzConfig {
    /// Endpoint of the identity check used by `login`
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// How many days back the dashboard looks by default
    #[serde(default = "default_dashboard_days")]
    pub dashboard_days: u32,

    /// Role preselected at login when none is given
    #[serde(default)]
    pub default_role: Role,
}

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.to_string()
}

fn default_dashboard_days() -> u32 {
    DEFAULT_DASHBOARD_DAYS
}

impl Default for PanelzConfig {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            dashboard_days: DEFAULT_DASHBOARD_DAYS,
            default_role: Role::default(),
        }
    }
}

impl PanelzConfig {
    pub const KEYS: &'static [&'static str] = &["identity-url", "dashboard-days", "default-role"];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PanelzError::Io)?;
        let config: PanelzConfig =
            serde_json::from_str(&content).map_err(PanelzError::Serialization)?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but an unreadable file yields defaults.
    pub fn load_or_default<P: AsRef<Path>>(config_dir: P) -> Self {
        Self::load(config_dir.as_ref()).unwrap_or_else(|e| {
            warn!(
                dir = %config_dir.as_ref().display(),
                error = %e,
                "unreadable config, using defaults"
            );
            Self::default()
        })
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PanelzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PanelzError::Serialization)?;
        fs::write(config_path, content).map_err(PanelzError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "identity-url" => Some(self.identity_url.clone()),
            "dashboard-days" => Some(self.dashboard_days.to_string()),
            "default-role" => Some(self.default_role.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "identity-url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(PanelzError::validation(
                        "config",
                        format!("identity-url must be an http(s) URL, got '{}'", value),
                    ));
                }
                self.identity_url = value.to_string();
            }
            "dashboard-days" => {
                self.dashboard_days = value.parse().map_err(|_| {
                    PanelzError::validation(
                        "config",
                        format!("dashboard-days must be a whole number, got '{}'", value),
                    )
                })?;
            }
            "default-role" => self.default_role = value.parse()?,
            other => {
                return Err(PanelzError::Api(format!("Unknown config key: {}", other)));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PanelzConfig::default();
        assert_eq!(config.identity_url, DEFAULT_IDENTITY_URL);
        assert_eq!(config.dashboard_days, 7);
        assert_eq!(config.default_role, Role::Panelist);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = PanelzConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, PanelzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = PanelzConfig::default();
        config.set("dashboard-days", "30").unwrap();
        config.set("default-role", "ta_member").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = PanelzConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.dashboard_days, 30);
        assert_eq!(loaded.default_role, Role::TaMember);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(PanelzConfig::load(dir.path()).is_err());
        assert_eq!(
            PanelzConfig::load_or_default(dir.path()),
            PanelzConfig::default()
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"dashboard_days": 14}"#).unwrap();
        let loaded = PanelzConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.dashboard_days, 14);
        assert_eq!(loaded.identity_url, DEFAULT_IDENTITY_URL);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = PanelzConfig::default();
        assert!(config.set("dashboard-days", "a week").is_err());
        assert!(config.set("identity-url", "ftp://x").is_err());
        assert!(config.set("default-role", "owner").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, PanelzConfig::default());
    }

    #[test]
    fn test_entries_lists_every_key() {
        let entries = PanelzConfig::default().entries();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, PanelzConfig::KEYS);
    }
}
