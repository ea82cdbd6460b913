//! tiledup asset library
//!
//! This crate duplicates Unity rule tiles onto a different range of sprites.
//! It reads sprite sheets laid out as one tile asset per sprite, recovers the
//! order in which a rule tile uses those sprites, shifts that order onto a
//! new starting sprite, and writes a renamed copy of the rule tile.
//!
//! # Modules
//!
//! - [`document`]: Unity YAML document model shared by every reader
//! - [`sprite`]: sprite sheet indexing
//! - [`rule_tile`]: rule tile reading
//! - [`resolve`]: joining rules against a sprite sheet
//! - [`remap`]: shifting, rewriting and writing the copy
//! - [`naming`]: collision-free output names
//! - [`error`]: error taxonomy

pub mod document;
pub mod error;
pub mod naming;
pub mod remap;
pub mod resolve;
pub mod rule_tile;
pub mod sprite;

// Re-export commonly used types at the crate root
pub use document::{SpriteRef, UnityDocument};
pub use error::{Result, TiledupError};
pub use naming::{derive_output_name, increment_name, MAX_NAME_ATTEMPTS};
pub use remap::{
    RemapEngine, RemapOptions, RemapPlan, RemapReport, SkippedEntry, Substitution,
};
pub use resolve::{
    resolve, resolve_ordered, MappingPolicy, Resolution, ResolvedOrder, RuleResolution,
    SkippedRule, UnresolvedReason,
};
pub use rule_tile::{RuleTileAsset, RuleTileReader, TileRule};
pub use sprite::{sequence_number, SkippedFile, Sprite, SpriteIndex, ASSET_EXTENSION};
