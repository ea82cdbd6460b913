//! Remapping a rule tile onto another range of sprites.
//!
//! The engine shifts every sprite the tile uses by a constant offset in
//! sequence-number space, rewrites the tile's sprite references to the
//! shifted sprites, renames the copy and writes it next to the original.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tiledup_asset::{
//!     resolve_ordered, MappingPolicy, RemapEngine, RemapOptions, RuleTileReader, SpriteIndex,
//!     ASSET_EXTENSION,
//! };
//!
//! let palette = Path::new("Assets/Palettes/Grass");
//! let rules_dir = Path::new("Assets/Tiles/Rules");
//!
//! let sheet = SpriteIndex::build(palette, "Grass_", ASSET_EXTENSION)?;
//! let asset = RuleTileReader::default().load(rules_dir, "Grass_1.asset")?;
//! let order = resolve_ordered(&sheet, &asset.rules, MappingPolicy::Skip)?;
//!
//! let engine = RemapEngine::new(RemapOptions::new(MappingPolicy::Skip));
//! let report = engine.remap(&asset, &order.sprites, &sheet, 48, None)?;
//! println!("wrote {}", report.output.display());
//! # Ok::<(), tiledup_asset::TiledupError>(())
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::{Result, TiledupError};
use crate::naming::{check_explicit_name, create_exclusive, derive_output_name, output_path};
use crate::resolve::{MappingPolicy, Resolution, UnresolvedReason};
use crate::rule_tile::{RuleTileAsset, RuleTileReader};
use crate::sprite::{Sprite, SpriteIndex, ASSET_EXTENSION};

/// Matches `{fileID: <id>` optionally followed by `, guid: <guid>`. The
/// mapping may wrap onto the next line between its entries.
const REFERENCE_PATTERN: &str = r"(?P<head>\{\s*fileID:[ \t]*)(?P<id>-?[0-9]+)(?:(?P<sep>\s*,\s*guid:[ \t]*)(?P<guid>[0-9A-Za-z]+))?";

static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn reference_regex() -> &'static Regex {
    REFERENCE_REGEX.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("invalid regex pattern"))
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct RemapOptions {
    /// Extension of asset files, including the dot.
    pub extension: String,
    /// Policy for original sprites without a shifted counterpart.
    pub policy: MappingPolicy,
    /// Also rewrite the guid of every rewritten reference to the destination sprite's guid.
    pub swap_guid: bool,
    /// Plan and report without writing anything.
    pub dry_run: bool,
}

impl RemapOptions {
    pub fn new(policy: MappingPolicy) -> Self {
        Self {
            extension: ASSET_EXTENSION.to_string(),
            policy,
            swap_guid: false,
            dry_run: false,
        }
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn swap_guid(mut self, swap_guid: bool) -> Self {
        self.swap_guid = swap_guid;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// One original sprite and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Position in the ordered original sprite list.
    pub position: usize,
    pub original: Sprite,
    pub resolution: Resolution,
}

/// The shift and the per-sprite destinations it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapPlan {
    /// `target_start - original[0].sequence_number`.
    pub shift: i64,
    pub entries: Vec<PlannedEntry>,
}

impl RemapPlan {
    /// Shifts every original sprite and looks the result up in `destination`.
    ///
    /// Fails with [`TiledupError::EmptyRuleSet`] when `original` is empty.
    pub fn build(original: &[Sprite], destination: &SpriteIndex, target_start: i64) -> Result<Self> {
        let first = original.first().ok_or(TiledupError::EmptyRuleSet)?;
        let shift = target_start.saturating_sub(first.sequence_number);

        let entries = original
            .iter()
            .enumerate()
            .map(|(position, sprite)| {
                let target = sprite.sequence_number.checked_add(shift);
                let resolution = match target.and_then(|n| destination.by_sequence(n)) {
                    Some(found) => Resolution::Resolved(found.clone()),
                    None => Resolution::Unresolved(UnresolvedReason::MissingSequence {
                        sequence_number: target.unwrap_or(i64::MAX),
                    }),
                };
                PlannedEntry {
                    position,
                    original: sprite.clone(),
                    resolution,
                }
            })
            .collect();

        Ok(Self { shift, entries })
    }

    /// Destination sprites in original order, skipping unresolved positions.
    pub fn destinations(&self) -> impl Iterator<Item = &Sprite> {
        self.entries.iter().filter_map(|e| e.resolution.sprite())
    }

    /// Number of entries with a destination.
    pub fn resolved_count(&self) -> usize {
        self.destinations().count()
    }
}

/// A reference rewrite, as applied to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub position: usize,
    pub original: String,
    pub destination: String,
    pub from_reference: String,
    pub to_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_guid: Option<String>,
    /// How many references in the document were rewritten.
    pub occurrences: usize,
}

/// An original sprite left out of the rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub position: usize,
    pub original: String,
    pub reason: UnresolvedReason,
}

/// Outcome of a remap.
#[derive(Debug, Clone, Serialize)]
pub struct RemapReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub old_name: String,
    pub new_name: String,
    pub shift: i64,
    pub substitutions: Vec<Substitution>,
    pub skipped: Vec<SkippedEntry>,
    pub guid_swapped: bool,
    pub written: bool,
}

/// Rewrites and writes remapped rule tiles.
#[derive(Debug, Clone)]
pub struct RemapEngine {
    options: RemapOptions,
}

impl RemapEngine {
    pub fn new(options: RemapOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RemapOptions {
        &self.options
    }

    /// Loads `asset_name` from `rule_directory` and remaps it.
    pub fn remap_file(
        &self,
        rule_directory: &Path,
        asset_name: &str,
        original: &[Sprite],
        destination: &SpriteIndex,
        target_start: i64,
        output_name: Option<&str>,
    ) -> Result<RemapReport> {
        let asset = RuleTileReader::new(self.options.extension.clone())
            .load(rule_directory, asset_name)?;
        self.remap(&asset, original, destination, target_start, output_name)
    }

    /// Remaps an already loaded rule tile.
    ///
    /// The output is written to the tile's directory under `output_name`, or
    /// under the first free name after the tile's declared name when none is
    /// given. Nothing is written when the call fails.
    pub fn remap(
        &self,
        asset: &RuleTileAsset,
        original: &[Sprite],
        destination: &SpriteIndex,
        target_start: i64,
        output_name: Option<&str>,
    ) -> Result<RemapReport> {
        let plan = RemapPlan::build(original, destination, target_start)?;

        let mut skipped = Vec::new();
        for entry in &plan.entries {
            if let Resolution::Unresolved(reason) = &entry.resolution {
                if self.options.policy == MappingPolicy::Strict {
                    let sequence_number = match reason {
                        UnresolvedReason::MissingSequence { sequence_number } => *sequence_number,
                        UnresolvedReason::UnknownReference { .. } => entry.original.sequence_number,
                    };
                    return Err(TiledupError::MissingDestination {
                        original: entry.original.name.clone(),
                        sequence_number,
                    });
                }
                skipped.push(SkippedEntry {
                    position: entry.position,
                    original: entry.original.name.clone(),
                    reason: reason.clone(),
                });
            }
        }
        if plan.resolved_count() == 0 {
            return Err(TiledupError::EmptyRuleSet);
        }

        let old_name = asset
            .declared_name()
            .ok_or_else(|| TiledupError::MissingName {
                path: asset.path.clone(),
            })?;

        let directory = asset.directory();
        let extension = &self.options.extension;
        let (new_name, output) = match output_name {
            Some(name) => (
                name.to_string(),
                check_explicit_name(directory, name, extension)?,
            ),
            None => {
                let name = derive_output_name(directory, &old_name, extension)?;
                let path = output_path(directory, &name, extension);
                (name, path)
            }
        };

        let (text, substitutions) =
            rewrite_references(&asset.text, &plan, self.options.swap_guid);
        let text = rename_declared(&text, &old_name, &new_name).ok_or_else(|| {
            TiledupError::MissingName {
                path: asset.path.clone(),
            }
        })?;

        let guid_swapped = self.options.swap_guid
            && substitutions
                .iter()
                .any(|s| s.occurrences > 0 && s.from_guid != s.to_guid);

        if !self.options.dry_run {
            create_exclusive(&output, &text)?;
        }

        Ok(RemapReport {
            source: asset.path.clone(),
            output,
            old_name,
            new_name,
            shift: plan.shift,
            substitutions,
            skipped,
            guid_swapped,
            written: !self.options.dry_run,
        })
    }
}

/// Rewrites every `{fileID: ..., guid: ...}` reference to an original sprite
/// in a single pass.
///
/// A reference matches an original when the `fileID` is equal and, if both
/// sides declare one, the guid is equal too. Rewritten text is never scanned
/// again, so overlapping source and destination ranges cannot chain.
pub fn rewrite_references(
    text: &str,
    plan: &RemapPlan,
    swap_guid: bool,
) -> (String, Vec<Substitution>) {
    let mut substitutions: Vec<Substitution> = Vec::new();
    let mut by_reference: HashMap<&str, usize> = HashMap::new();

    for entry in &plan.entries {
        let Some(destination) = entry.resolution.sprite() else {
            continue;
        };
        if by_reference.contains_key(entry.original.reference_id.as_str()) {
            continue;
        }
        by_reference.insert(&entry.original.reference_id, substitutions.len());
        let to_guid = if swap_guid && destination.guid.is_some() {
            destination.guid.clone()
        } else {
            entry.original.guid.clone()
        };
        substitutions.push(Substitution {
            position: entry.position,
            original: entry.original.name.clone(),
            destination: destination.name.clone(),
            from_reference: entry.original.reference_id.clone(),
            to_reference: destination.reference_id.clone(),
            from_guid: entry.original.guid.clone(),
            to_guid,
            occurrences: 0,
        });
    }

    let mut counts = vec![0usize; substitutions.len()];
    let rewritten = reference_regex().replace_all(text, |caps: &Captures| {
        let whole = caps[0].to_string();
        let Some(&slot) = by_reference.get(&caps["id"]) else {
            return whole;
        };
        let substitution = &substitutions[slot];
        let found_guid = caps.name("guid").map(|m| m.as_str());
        if let (Some(found), Some(expected)) = (found_guid, substitution.from_guid.as_deref()) {
            if found != expected {
                return whole;
            }
        }
        counts[slot] += 1;

        let mut out = String::with_capacity(whole.len());
        out.push_str(&caps["head"]);
        out.push_str(&substitution.to_reference);
        if let (Some(sep), Some(found)) = (caps.name("sep"), found_guid) {
            out.push_str(sep.as_str());
            out.push_str(substitution.to_guid.as_deref().unwrap_or(found));
        }
        out
    });

    let rewritten = rewritten.into_owned();
    for (substitution, count) in substitutions.iter_mut().zip(counts) {
        substitution.occurrences = count;
    }
    (rewritten, substitutions)
}

/// Replaces the value of the first `m_Name:` field whose scalar equals `old`
/// with `new`.
///
/// The scalar is read the way YAML reads it: quotes are removed and a plain
/// value ends at a ` #` comment. The replacement keeps the original quoting
/// style and anything after the scalar.
pub fn rename_declared(text: &str, old: &str, new: &str) -> Option<String> {
    const KEY: &str = "m_Name:";
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(KEY) {
            let value = rest.trim_start();
            if let Some(scalar) = NameScalar::parse(value).filter(|s| s.text == old) {
                let base = offset
                    + (line.len() - trimmed.len())
                    + KEY.len()
                    + (rest.len() - value.len());
                let mut out = String::with_capacity(text.len() + new.len());
                out.push_str(&text[..base + scalar.start]);
                out.push_str(&scalar.style.escape(new));
                out.push_str(&text[base + scalar.end..]);
                return Some(out);
            }
        }
        offset += line.len();
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
}

impl ScalarStyle {
    fn escape(self, text: &str) -> String {
        match self {
            ScalarStyle::Plain => text.to_string(),
            ScalarStyle::SingleQuoted => text.replace('\'', "''"),
            ScalarStyle::DoubleQuoted => text.replace('\\', "\\\\").replace('"', "\\\""),
        }
    }
}

/// A scalar at the start of a field value. `start..end` is the byte range of
/// its content, inside the quotes when it is quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameScalar {
    start: usize,
    end: usize,
    style: ScalarStyle,
    text: String,
}

impl NameScalar {
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim_end_matches(['\r', '\n']);
        if let Some(body) = value.strip_prefix('"') {
            let mut text = String::new();
            let mut chars = body.char_indices();
            while let Some((i, c)) = chars.next() {
                match c {
                    '"' => return Some(Self::quoted(i, ScalarStyle::DoubleQuoted, text)),
                    '\\' => text.push(chars.next()?.1),
                    _ => text.push(c),
                }
            }
            None
        } else if let Some(body) = value.strip_prefix('\'') {
            let mut text = String::new();
            let mut chars = body.char_indices().peekable();
            while let Some((i, c)) = chars.next() {
                if c != '\'' {
                    text.push(c);
                } else if chars.next_if(|&(_, next)| next == '\'').is_some() {
                    text.push('\'');
                } else {
                    return Some(Self::quoted(i, ScalarStyle::SingleQuoted, text));
                }
            }
            None
        } else {
            let end = value
                .match_indices('#')
                .find(|&(i, _)| value[..i].ends_with([' ', '\t']))
                .map_or(value.len(), |(i, _)| i);
            let text = value[..end].trim_end();
            Some(Self {
                start: 0,
                end: text.len(),
                style: ScalarStyle::Plain,
                text: text.to_string(),
            })
        }
    }

    /// `close` is the offset of the closing quote within the body after the opening one.
    fn quoted(close: usize, style: ScalarStyle, text: String) -> Self {
        Self {
            start: 1,
            end: 1 + close,
            style,
            text,
        }
    }
}
