//! Configuration file handling.
//!
//! Controller settings are read from `<config_dir>/aci-netops/config.toml`
//! (or the file passed with `--config`). Values given on the command line or
//! through the environment win over the file; anything still missing is
//! prompted for.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::constants;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level `config.toml` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub apic: ApicConfig,
}

/// `[apic]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApicConfig {
    pub url: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    /// APICs usually ship self-signed certificates, so verification is off
    /// unless enabled here.
    pub verify_tls: bool,
    pub timeout_secs: u64,
}

impl Default for ApicConfig {
    fn default() -> Self {
        Self {
            url: None,
            login: None,
            password: None,
            verify_tls: false,
            timeout_secs: constants::HTTP_TIMEOUT_SECS,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
}

/// Controller settings after merging overrides with the file. Fields that are
/// still `None` need a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub url: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub verify_tls: bool,
    pub timeout: Duration,
}

impl Config {
    /// Apply command-line/environment overrides on top of the file values.
    pub fn merge(self, overrides: Overrides) -> ControllerSettings {
        let apic = self.apic;
        ControllerSettings {
            url: overrides
                .url
                .or(apic.url)
                .map(|u| u.trim().trim_end_matches('/').to_string()),
            login: overrides.login.or(apic.login),
            password: overrides.password.or(apic.password),
            verify_tls: apic.verify_tls && !overrides.insecure,
            timeout: Duration::from_secs(apic.timeout_secs.max(1)),
        }
    }
}

/// Default location of `config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(constants::APP_NAME).join(constants::CONFIG_FILE_NAME))
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path_str: &str) -> PathBuf {
    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path_str)
}

/// Load the configuration.
///
/// An explicit path must exist. A missing default file yields the defaults.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => load_from(path),
        None => match default_path() {
            Some(path) if path.is_file() => load_from(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

/// Read and parse one config file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            r#"
            [apic]
            url = "https://10.0.0.1/"
            login = "admin"
            password = "pw"
            verify_tls = true
            timeout_secs = 10
            "#,
        );
        let config = load_from(file.path()).unwrap();
        assert_eq!(config.apic.login.as_deref(), Some("admin"));
        assert!(config.apic.verify_tls);
        assert_eq!(config.apic.timeout_secs, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = write_config("[apic]\nurl = \"https://apic\"\n");
        let config = load_from(file.path()).unwrap();
        assert_eq!(config.apic.timeout_secs, constants::HTTP_TIMEOUT_SECS);
        assert!(!config.apic.verify_tls);
        assert_eq!(config.apic.password, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = write_config("");
        assert_eq!(load_from(file.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[apic\nurl = ");
        assert!(matches!(
            load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        assert!(matches!(
            load(Some(Path::new("/nonexistent/aci-netops.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config = Config {
            apic: ApicConfig {
                url: Some("https://file-apic/".to_string()),
                login: Some("file-user".to_string()),
                password: None,
                verify_tls: true,
                timeout_secs: 15,
            },
        };
        let settings = config.merge(Overrides {
            url: None,
            login: Some("cli-user".to_string()),
            password: Some("cli-pw".to_string()),
            insecure: false,
        });
        assert_eq!(settings.url.as_deref(), Some("https://file-apic"));
        assert_eq!(settings.login.as_deref(), Some("cli-user"));
        assert_eq!(settings.password.as_deref(), Some("cli-pw"));
        assert!(settings.verify_tls);
        assert_eq!(settings.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_insecure_disables_verification() {
        let config = Config {
            apic: ApicConfig {
                verify_tls: true,
                ..ApicConfig::default()
            },
        };
        let settings = config.merge(Overrides {
            insecure: true,
            ..Overrides::default()
        });
        assert!(!settings.verify_tls);
        assert_eq!(settings.url, None);
    }

    #[test]
    fn test_expand_home_plain_path() {
        assert_eq!(expand_home("vlans.csv"), PathBuf::from("vlans.csv"));
    }
}
