//! CLI configuration utilities

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use wallet_core::{ClientSettings, ValidateConfig};

/// Settings file name inside the state directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Load settings from the given file, or from defaults and environment,
/// then apply command-line overrides
pub fn load_settings(
    path: Option<&Path>,
    base_url: Option<String>,
    state_dir: Option<PathBuf>,
) -> Result<ClientSettings> {
    let mut settings = match path {
        Some(path) => ClientSettings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ClientSettings::from_env().context("Failed to load settings from environment")?,
    };

    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    if let Some(state_dir) = state_dir {
        settings.state_dir = Some(state_dir);
    }

    settings.validate()?;
    Ok(settings)
}

/// Generate a default settings file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ClientSettings::default().save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        generate_default_config(&path).unwrap();

        let settings = load_settings(
            Some(&path),
            Some("https://wallet.example.com".to_string()),
            Some(dir.path().to_path_buf()),
        )
        .unwrap();

        assert_eq!(settings.base_url, "https://wallet.example.com");
        assert_eq!(settings.state_dir(), dir.path());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        generate_default_config(&path).unwrap();

        let result = load_settings(Some(&path), Some("ftp://nope".to_string()), None);
        assert!(result.is_err());
    }
}
