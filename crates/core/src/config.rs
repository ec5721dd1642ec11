//! Client settings
//!
//! Settings are plain serde data with defaults, loaded through the `config`
//! crate from an optional file and `WALLET_`-prefixed environment variables.

use crate::validation::{ValidateConfig, validators};
use crate::{CoreResult, PublicEndpoints};
use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound accepted for `timeout_secs`
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("wallet-client/", env!("CARGO_PKG_VERSION"));

const ENV_PREFIX: &str = "WALLET";

/// Settings shared by every front end of the wallet client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base location all API paths are appended to
    pub base_url: String,

    /// Per-request timeout in seconds, 0 disables it
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Share one in-flight session refresh between concurrent requests
    pub coalesce_refresh: bool,

    /// Extra public path fragments on top of the built-in set
    pub public_endpoints: Vec<String>,

    /// Directory holding the persisted auth flag
    pub state_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            coalesce_refresh: true,
            public_endpoints: Vec::new(),
            state_dir: None,
        }
    }
}

impl ClientSettings {
    /// Load settings from a file (any format the `config` crate detects
    /// from the extension) with environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let settings = Self::defaults_builder()?
            .add_source(::config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from defaults and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables cannot be parsed or the
    /// result does not validate
    pub fn from_env() -> CoreResult<Self> {
        Self::from_environment(Self::environment())
    }

    fn from_environment(environment: ::config::Environment) -> CoreResult<Self> {
        let settings = Self::defaults_builder()?
            .add_source(environment)
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Write these settings as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> CoreResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Request timeout, `None` when disabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Built-in public endpoints extended with the configured ones
    pub fn public_endpoints(&self) -> PublicEndpoints {
        PublicEndpoints::with_extra(self.public_endpoints.iter().cloned())
    }

    /// Directory for the persisted flag, falling back to the platform data
    /// directory and finally to `./.wallet`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn state_dir(&self) -> PathBuf {
        if let Some(dir) = &self.state_dir {
            return dir.clone();
        }

        directories::ProjectDirs::from("com", "DigitalWallet", "wallet").map_or_else(
            || {
                tracing::warn!("Failed to determine platform data directory, using ./.wallet");
                PathBuf::from(".wallet")
            },
            |dirs| dirs.data_dir().to_path_buf(),
        )
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        ::config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default("coalesce_refresh", defaults.coalesce_refresh)?
            .set_default("public_endpoints", Vec::<String>::new())
    }

    fn environment() -> ::config::Environment {
        // WALLET_BASE_URL, nested keys as WALLET_OUTER__INNER
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("public_endpoints")
            .try_parsing(true)
    }
}

impl ValidateConfig for ClientSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        validators::validate_not_empty(&self.base_url, "base_url")?;
        validators::validate_url(&self.base_url, "base_url")?;
        validators::validate_range(self.timeout_secs, 0, MAX_TIMEOUT_SECS, "timeout_secs")?;
        validators::validate_not_empty(&self.user_agent, "user_agent")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_validate() {
        let settings = ClientSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
        assert!(settings.coalesce_refresh);
    }

    #[test]
    fn test_zero_timeout_disables() {
        let settings = ClientSettings {
            timeout_secs: 0,
            ..ClientSettings::default()
        };
        assert_eq!(settings.timeout(), None);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_url = ClientSettings {
            base_url: "not a url".to_string(),
            ..ClientSettings::default()
        };
        assert!(bad_url.validate().is_err());

        let long_timeout = ClientSettings {
            timeout_secs: MAX_TIMEOUT_SECS + 1,
            ..ClientSettings::default()
        };
        assert!(long_timeout.validate().is_err());
    }

    #[test]
    fn test_from_file_merges_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.toml");
        std::fs::write(
            &path,
            "base_url = \"https://wallet.example.com\"\npublic_endpoints = [\"/health\"]\n",
        )
        .unwrap();

        let settings = ClientSettings::from_file(&path).unwrap();
        assert_eq!(settings.base_url, "https://wallet.example.com");
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.public_endpoints().is_public("/health"));
        assert!(settings.public_endpoints().is_public("/refresh"));
    }

    #[test]
    fn test_from_file_rejects_invalid_url() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wallet.toml");
        std::fs::write(&path, "base_url = \"wallet\"\n").unwrap();

        assert!(ClientSettings::from_file(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config").join("wallet.json");
        let settings = ClientSettings {
            base_url: "http://127.0.0.1:9000".to_string(),
            coalesce_refresh: false,
            ..ClientSettings::default()
        };

        settings.save(&path).unwrap();
        let loaded = ClientSettings::from_file(&path).unwrap();
        assert_eq!(loaded.base_url, settings.base_url);
        assert!(!loaded.coalesce_refresh);
    }

    fn environment_with(vars: &[(&str, &str)]) -> ::config::Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ClientSettings::environment().source(Some(vars))
    }

    #[test]
    fn test_environment_uses_single_underscore_prefix() {
        let settings = ClientSettings::from_environment(environment_with(&[
            ("WALLET_BASE_URL", "https://single.example.com"),
            ("WALLET_TIMEOUT_SECS", "7"),
            ("WALLET_COALESCE_REFRESH", "false"),
        ]))
        .unwrap();

        assert_eq!(settings.base_url, "https://single.example.com");
        assert_eq!(settings.timeout_secs, 7);
        assert!(!settings.coalesce_refresh);
    }

    #[test]
    fn test_environment_public_endpoints_list() {
        let settings = ClientSettings::from_environment(environment_with(&[(
            "WALLET_PUBLIC_ENDPOINTS",
            "/health,/version",
        )]))
        .unwrap();

        assert_eq!(settings.public_endpoints, vec!["/health", "/version"]);
        assert!(settings.public_endpoints().is_public("/version"));
    }

    #[test]
    fn test_environment_ignores_other_prefixes() {
        let settings = ClientSettings::from_environment(environment_with(&[(
            "OTHER_BASE_URL",
            "https://other.example.com",
        )]))
        .unwrap();

        assert_eq!(settings.base_url, ClientSettings::default().base_url);
    }

    #[test]
    fn test_environment_value_is_validated() {
        let result =
            ClientSettings::from_environment(environment_with(&[("WALLET_BASE_URL", "ftp://x")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_state_dir_wins() {
        let settings = ClientSettings {
            state_dir: Some(PathBuf::from("/tmp/wallet-state")),
            ..ClientSettings::default()
        };
        assert_eq!(settings.state_dir(), PathBuf::from("/tmp/wallet-state"));
    }
}
