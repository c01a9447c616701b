//! First-run setup.
//!
//! Writes a commented default configuration file the first time siriwave runs,
//! so users have something to edit with `siriwave config`.

use std::path::Path;

/// Embedded default configuration template.
pub const DEFAULT_CONFIG: &str = include_str!("../../environments/siriwave.toml");

/// Writes the default config to `config_path` if no file exists there yet.
///
/// Returns whether a file was written.
///
/// # Errors
/// Returns an error if the parent directory or the file cannot be written.
pub fn ensure_config(config_path: &Path) -> anyhow::Result<bool> {
    if config_path.exists() {
        tracing::debug!("Config file present: {}", config_path.display());
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;

    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiriwaveConfig;

    #[test]
    fn test_template_matches_defaults() {
        let config = SiriwaveConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, SiriwaveConfig::default());
    }

    #[test]
    fn test_ensure_config_writes_once() {
        let dir = std::env::temp_dir().join(format!("siriwave-setup-{}", std::process::id()));
        let path = dir.join("nested").join("siriwave.toml");
        let _ = std::fs::remove_dir_all(&dir);

        assert!(ensure_config(&path).unwrap());
        std::fs::write(&path, "[display]\nfps = 24\n").unwrap();
        assert!(!ensure_config(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[display]\nfps = 24\n"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
