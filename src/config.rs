use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::domain::{TemplateEntry, seed_template};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML in {}: {source}", .path.display())]
    TomlDecode {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Which activity list the very first week starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateChoice {
    #[default]
    Empty,
    Seed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub template: TemplateChoice,
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,
    /// Replaces the built-in seed list when non-empty.
    #[serde(default)]
    pub seed: Vec<TemplateEntry>,
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: TemplateChoice::default(),
            autosave_delay_ms: default_autosave_delay_ms(),
            seed: Vec::new(),
        }
    }
}

impl Config {
    pub fn default_template(&self) -> Vec<TemplateEntry> {
        match self.template {
            TemplateChoice::Empty => Vec::new(),
            TemplateChoice::Seed if self.seed.is_empty() => seed_template(),
            TemplateChoice::Seed => self.seed.clone(),
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<ConfigError>,
}

/// Missing file means defaults; a broken file means defaults plus the error.
pub fn load_config_with_fallback(path: &Path) -> ConfigLoad {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => {
            warn!(%err, "falling back to default config");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::TomlDecode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{Config, TemplateChoice, load_config_with_fallback};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("weekplan-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_config_uses_defaults_without_error() {
        let result = load_config_with_fallback(&temp_path("missing.toml"));
        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
        assert!(result.config.default_template().is_empty());
        assert_eq!(result.config.autosave_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn invalid_config_reports_error() {
        let path = temp_path("invalid.toml");
        fs::write(&path, "template = [unclosed").unwrap();

        let result = load_config_with_fallback(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_some());
    }

    #[test]
    fn seed_template_from_file() {
        let path = temp_path("seed.toml");
        fs::write(
            &path,
            r#"
template = "seed"
autosave_delay_ms = 250

[[seed]]
name = "Deporte"
target_hours = 5.0
"#,
        )
        .unwrap();

        let result = load_config_with_fallback(&path);
        fs::remove_file(&path).ok();

        assert!(result.error.is_none());
        assert_eq!(result.config.template, TemplateChoice::Seed);
        assert_eq!(result.config.autosave_delay(), Duration::from_millis(250));
        let template = result.config.default_template();
        assert_eq!(template.len(), 1);
        assert_eq!(template[0].name, "Deporte");
    }

    #[test]
    fn seed_choice_without_list_uses_builtin_seed() {
        let config = Config {
            template: TemplateChoice::Seed,
            ..Config::default()
        };
        assert_eq!(config.default_template().len(), 12);
    }
}
