//! Error types for sprite indexing, rule tile reading, and remapping.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TiledupError>;

/// Top-level error type for tiledup operations.
///
/// Every variant is terminal for a run: callers report it and stop.
#[derive(Debug, Error)]
pub enum TiledupError {
    /// A sprite file name carries no decimal sequence number.
    #[error("sprite file name '{name}' contains no sequence number")]
    MalformedName { name: String },

    /// The rule tile document does not exist.
    #[error("rule tile not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    /// The rule tile document parsed to nothing.
    #[error("rule tile is empty: {}", path.display())]
    EmptyDocument { path: PathBuf },

    /// The YAML parser could not make sense of the document.
    #[error("failed to parse {}: {source}", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The rule tile declares no `m_Name`, so no output name can be derived.
    #[error("rule tile declares no m_Name: {}", path.display())]
    MissingName { path: PathBuf },

    /// No rule could be mapped onto a sprite.
    #[error("no tiling rule resolved to a sprite; nothing to remap")]
    EmptyRuleSet,

    /// A rule references a sprite that is not in the sheet (strict policy).
    #[error("rule {rule_id} references sprite {reference_id}, which is not in the sheet")]
    UnresolvedReference { rule_id: i64, reference_id: String },

    /// A remapped sequence number has no sprite in the destination sheet (strict policy).
    #[error(
        "no destination sprite with sequence number {sequence_number} (remapped from '{original}')"
    )]
    MissingDestination {
        original: String,
        sequence_number: i64,
    },

    /// The output file already exists.
    #[error("output already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    /// The collision search ran out of attempts.
    #[error("no free output name after {attempts} attempts starting from '{base}'")]
    NameSpaceExhausted { base: String, attempts: usize },

    /// I/O error.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TiledupError {
    /// Returns a stable error code (e.g., "TD_001").
    pub fn code(&self) -> &'static str {
        match self {
            TiledupError::MalformedName { .. } => "TD_001",
            TiledupError::DocumentNotFound { .. } => "TD_002",
            TiledupError::EmptyDocument { .. } => "TD_003",
            TiledupError::MalformedDocument { .. } => "TD_004",
            TiledupError::MissingName { .. } => "TD_005",
            TiledupError::EmptyRuleSet => "TD_006",
            TiledupError::UnresolvedReference { .. } => "TD_007",
            TiledupError::MissingDestination { .. } => "TD_008",
            TiledupError::OutputExists { .. } => "TD_009",
            TiledupError::NameSpaceExhausted { .. } => "TD_010",
            TiledupError::Io { .. } => "TD_011",
        }
    }

    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        TiledupError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
