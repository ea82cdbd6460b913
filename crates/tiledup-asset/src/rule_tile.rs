//! Rule tile reading.
//!
//! A rule tile lists its tiling rules under `MonoBehaviour.m_TilingRules`.
//! Each rule carries an `m_Id` and a list of sprites; only the first sprite
//! matters for remapping.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Value;

use crate::document::{scalar_to_i64, SpriteRef, UnityDocument};
use crate::error::{Result, TiledupError};
use crate::sprite::ASSET_EXTENSION;

/// One entry of a rule tile's rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileRule {
    /// Declared `m_Id`. Not necessarily contiguous.
    pub rule_id: i64,
    /// `fileID` of the rule's first sprite.
    pub reference_id: String,
    /// `guid` of the rule's first sprite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

/// A rule tile loaded from disk.
#[derive(Debug, Clone)]
pub struct RuleTileAsset {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Raw document text, exactly as read.
    pub text: String,
    /// Parsed document.
    pub document: UnityDocument,
    /// Rules in document order.
    pub rules: Vec<TileRule>,
}

impl RuleTileAsset {
    /// Parses an in-memory document. `path` is only used for error reporting.
    pub fn from_text(path: impl Into<PathBuf>, text: String) -> Result<Self> {
        let path = path.into();
        let document = UnityDocument::parse(&text).map_err(|source| {
            TiledupError::MalformedDocument {
                path: path.clone(),
                source,
            }
        })?;
        if document.is_empty() {
            return Err(TiledupError::EmptyDocument { path });
        }
        let rules = extract_rules(&document);
        Ok(Self {
            path,
            text,
            document,
            rules,
        })
    }

    /// The tile's declared `m_Name`.
    pub fn declared_name(&self) -> Option<String> {
        self.document.declared_name()
    }

    /// Directory holding the document.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Loads rule tile documents from a directory.
#[derive(Debug, Clone)]
pub struct RuleTileReader {
    extension: String,
}

impl Default for RuleTileReader {
    fn default() -> Self {
        Self::new(ASSET_EXTENSION)
    }
}

impl RuleTileReader {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Joins `directory` and `asset_file_name`, appending the asset extension
    /// when the name as given does not exist and carries no extension.
    pub fn resolve_path(&self, directory: &Path, asset_file_name: &str) -> PathBuf {
        let path = directory.join(asset_file_name);
        if path.is_file() || Path::new(asset_file_name).extension().is_some() {
            return path;
        }
        directory.join(format!("{}{}", asset_file_name, self.extension))
    }

    /// Reads and parses a rule tile.
    pub fn load(&self, directory: &Path, asset_file_name: &str) -> Result<RuleTileAsset> {
        let path = self.resolve_path(directory, asset_file_name);
        if !path.is_file() {
            return Err(TiledupError::DocumentNotFound { path });
        }
        let text = fs::read_to_string(&path).map_err(|e| TiledupError::io(&path, e))?;
        RuleTileAsset::from_text(path, text)
    }

    /// Reads a rule tile's rules in document order.
    pub fn read(&self, directory: &Path, asset_file_name: &str) -> Result<Vec<TileRule>> {
        Ok(self.load(directory, asset_file_name)?.rules)
    }
}

/// Extracts `MonoBehaviour.m_TilingRules`, skipping rules without an `m_Id`
/// or without a first sprite reference.
pub fn extract_rules(document: &UnityDocument) -> Vec<TileRule> {
    let Some(rules) = document
        .get_path(&["MonoBehaviour", "m_TilingRules"])
        .and_then(Value::as_sequence)
    else {
        return Vec::new();
    };

    rules
        .iter()
        .filter_map(|rule| {
            let rule_id = rule.get("m_Id").and_then(scalar_to_i64)?;
            let sprite = rule
                .get("m_Sprites")
                .and_then(Value::as_sequence)
                .and_then(|sprites| sprites.first())
                .and_then(SpriteRef::from_value)?;
            Some(TileRule {
                rule_id,
                reference_id: sprite.file_id,
                guid: sprite.guid,
            })
        })
        .collect()
}
