//! Merging command-line flags with the project config.

use std::fmt;
use std::path::PathBuf;

use tiledup_asset::MappingPolicy;

use crate::config::ProjectConfig;

/// A command input that could not be established.
#[derive(Debug)]
pub enum InputError {
    /// The config file could not be loaded.
    Config(anyhow::Error),
    /// A directory was given neither as a flag nor in the config.
    Missing {
        flag: &'static str,
        key: &'static str,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Config(e) => write!(f, "{:#}", e),
            InputError::Missing { flag, key } => write!(
                f,
                "missing required argument {} (or \"{}\" in the config file)",
                flag, key
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// Directories and settings a command runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub palette_dir: PathBuf,
    pub rule_dir: PathBuf,
    pub extension: String,
    pub policy: MappingPolicy,
}

impl Inputs {
    /// Flags win over config values; `strict` is on if either side asks for it.
    pub fn resolve(
        palette: Option<&str>,
        rule: Option<&str>,
        strict: bool,
        config_path: Option<&str>,
    ) -> Result<Self, InputError> {
        let config = ProjectConfig::load(config_path).map_err(InputError::Config)?;

        let palette_dir = palette
            .map(PathBuf::from)
            .or_else(|| config.palette_dir.clone())
            .ok_or(InputError::Missing {
                flag: "--palette",
                key: "palette_dir",
            })?;
        let rule_dir = rule
            .map(PathBuf::from)
            .or_else(|| config.rule_dir.clone())
            .ok_or(InputError::Missing {
                flag: "--rule",
                key: "rule_dir",
            })?;

        let policy = if strict || config.strict.unwrap_or(false) {
            MappingPolicy::Strict
        } else {
            MappingPolicy::Skip
        };

        Ok(Self {
            palette_dir,
            rule_dir,
            extension: config.extension(),
            policy,
        })
    }
}
