//! Project configuration file.
//!
//! A project can keep its palette and rule tile directories in a JSON file so
//! they need not be repeated on every invocation:
//!
//! ```json
//! {
//!   "palette_dir": "Assets/Palettes/Grass",
//!   "rule_dir": "Assets/Tiles/Rules",
//!   "extension": ".asset",
//!   "strict": false
//! }
//! ```
//!
//! Relative directories are resolved against the directory holding the
//! config file. Command-line flags always win over config values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiledup_asset::ASSET_EXTENSION;

/// Settings loaded from a `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding the sprite sheet's tile assets.
    pub palette_dir: Option<PathBuf>,
    /// Directory holding rule tile assets.
    pub rule_dir: Option<PathBuf>,
    /// Asset file extension (default: `.asset`).
    pub extension: Option<String>,
    /// Fail on unresolved sprites instead of skipping them.
    pub strict: Option<bool>,
}

impl ProjectConfig {
    /// Parse a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.palette_dir = config.palette_dir.map(|p| rebase(base, p));
            config.rule_dir = config.rule_dir.map(|p| rebase(base, p));
        }
        Ok(config)
    }

    /// Loads the config at `path`, or the empty config when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::default()),
        }
    }

    /// The asset extension, always with a leading dot.
    pub fn extension(&self) -> String {
        match self.extension.as_deref() {
            None | Some("") => ASSET_EXTENSION.to_string(),
            Some(ext) if ext.starts_with('.') => ext.to_string(),
            Some(ext) => format!(".{}", ext),
        }
    }
}

fn rebase(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::load(None).unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.extension(), ".asset");
    }

    #[test]
    fn test_relative_dirs_follow_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tiledup.json");
        fs::write(
            &path,
            r#"{"palette_dir": "Palettes", "rule_dir": "/abs/Rules", "extension": "asset"}"#,
        )
        .unwrap();

        let config = ProjectConfig::from_file(&path).unwrap();
        assert_eq!(
            config,
            ProjectConfig {
                palette_dir: Some(tmp.path().join("Palettes")),
                rule_dir: Some(PathBuf::from("/abs/Rules")),
                extension: Some("asset".to_string()),
                strict: None,
            }
        );
        assert_eq!(config.extension(), ".asset");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tiledup.json");
        fs::write(&path, r#"{"palete_dir": "typo"}"#).unwrap();
        assert!(ProjectConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ProjectConfig::load(Some("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
