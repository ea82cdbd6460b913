//! Sprite sheet indexing.
//!
//! A sprite sheet is laid out on disk as one tile asset per sprite, named
//! `<sheet prefix><sequence number>.asset`. Each file declares the sprite it
//! draws through an `m_Sprite: {fileID: ..., guid: ...}` reference.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::document::{SpriteRef, UnityDocument};
use crate::error::{Result, TiledupError};

/// File extension of Unity asset documents.
pub const ASSET_EXTENSION: &str = ".asset";

/// One entry in a sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sprite {
    /// File name of the tile asset that declares the sprite.
    pub name: String,
    /// Reference token (`fileID`) other documents use to point at the sprite.
    pub reference_id: String,
    /// Guid of the texture owning the sprite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// First run of digits in `name`.
    pub sequence_number: i64,
}

impl Sprite {
    /// Creates a sprite, parsing the sequence number from `name`.
    pub fn new(
        name: impl Into<String>,
        reference_id: impl Into<String>,
        guid: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        let sequence_number = sequence_number(&name)?;
        Ok(Self {
            name,
            reference_id: reference_id.into(),
            guid,
            sequence_number,
        })
    }
}

/// Parses the first run of ASCII digits in `name` as a base-10 integer.
pub fn sequence_number(name: &str) -> Result<i64> {
    first_digit_run(name)
        .and_then(|(start, end)| name[start..end].parse().ok())
        .ok_or_else(|| TiledupError::MalformedName {
            name: name.to_string(),
        })
}

/// Byte range of the first run of ASCII digits in `s`.
pub(crate) fn first_digit_run(s: &str) -> Option<(usize, usize)> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let len = s[start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len() - start);
    Some((start, start + len))
}

/// A candidate file that did not contribute a sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// Sprites of one sheet, queryable by reference and by sequence number.
#[derive(Debug, Clone, Default)]
pub struct SpriteIndex {
    sprites: Vec<Sprite>,
    by_reference: HashMap<String, usize>,
    by_sequence: HashMap<i64, usize>,
    skipped: Vec<SkippedFile>,
}

impl SpriteIndex {
    /// Scans `directory` for `<sheet_prefix>*<extension>` files.
    ///
    /// Files are visited in file-name order. A file without an `m_Sprite`
    /// reference is not a sprite and is skipped, as is a file the YAML parser
    /// rejects; both are listed in [`SpriteIndex::skipped`]. A sprite file
    /// whose name carries no digits is an error.
    pub fn build(directory: &Path, sheet_prefix: &str, extension: &str) -> Result<Self> {
        if !directory.is_dir() {
            return Err(TiledupError::io(
                directory,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }

        let mut index = SpriteIndex::default();

        for entry in WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(sheet_prefix) || !name.ends_with(extension) {
                continue;
            }

            let content = fs::read_to_string(entry.path())
                .map_err(|e| TiledupError::io(entry.path(), e))?;

            let document = match UnityDocument::parse(&content) {
                Ok(document) => document,
                Err(e) => {
                    index.skipped.push(SkippedFile {
                        name,
                        reason: format!("unparseable: {}", e),
                    });
                    continue;
                }
            };

            match document
                .find_key("m_Sprite")
                .and_then(SpriteRef::from_value)
                .filter(|r| !r.is_null())
            {
                Some(reference) => {
                    let sprite = Sprite::new(name, reference.file_id, reference.guid)?;
                    index.insert(sprite);
                }
                None => index.skipped.push(SkippedFile {
                    name,
                    reason: "no m_Sprite reference".to_string(),
                }),
            }
        }

        Ok(index)
    }

    /// Builds an index from sprites that are already in memory.
    pub fn from_sprites(sprites: impl IntoIterator<Item = Sprite>) -> Self {
        let mut index = SpriteIndex::default();
        for sprite in sprites {
            index.insert(sprite);
        }
        index
    }

    /// First-seen wins for both lookups.
    fn insert(&mut self, sprite: Sprite) {
        let position = self.sprites.len();
        self.by_reference
            .entry(sprite.reference_id.clone())
            .or_insert(position);
        self.by_sequence
            .entry(sprite.sequence_number)
            .or_insert(position);
        self.sprites.push(sprite);
    }

    pub fn by_reference(&self, reference_id: &str) -> Option<&Sprite> {
        self.by_reference
            .get(reference_id)
            .map(|&i| &self.sprites[i])
    }

    pub fn by_sequence(&self, sequence_number: i64) -> Option<&Sprite> {
        self.by_sequence
            .get(&sequence_number)
            .map(|&i| &self.sprites[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Guid of the sheet, taken from the first sprite that declares one.
    pub fn guid(&self) -> Option<&str> {
        self.sprites.iter().find_map(|s| s.guid.as_deref())
    }

    /// Candidate files that did not yield a sprite.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_sprite(dir: &Path, name: &str, file_id: &str, guid: &str) {
        let content = format!(
            "%YAML 1.1\n%TAG !u! tag:unity3d.com,2011:\n--- !u!114 &11400000\nMonoBehaviour:\n  m_Name: {}\n  m_Sprite: {{fileID: {}, guid: {}, type: 3}}\n  m_Color: {{r: 1, g: 1, b: 1, a: 1}}\n",
            name.trim_end_matches(ASSET_EXTENSION),
            file_id,
            guid
        );
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_sequence_number_first_digit_run() {
        assert_eq!(sequence_number("Grass_12.asset").unwrap(), 12);
        assert_eq!(sequence_number("a7b88").unwrap(), 7);
        assert_eq!(sequence_number("007").unwrap(), 7);
    }

    #[test]
    fn test_sequence_number_without_digits_fails() {
        let err = sequence_number("Grass.asset").unwrap_err();
        assert!(matches!(err, TiledupError::MalformedName { ref name } if name == "Grass.asset"));
    }

    #[test]
    fn test_build_filters_by_prefix_and_extension() {
        let tmp = TempDir::new().unwrap();
        write_sprite(tmp.path(), "Grass_1.asset", "101", "aaaa");
        write_sprite(tmp.path(), "Grass_2.asset", "102", "aaaa");
        write_sprite(tmp.path(), "Stone_1.asset", "201", "bbbb");
        fs::write(tmp.path().join("Grass_1.asset.meta"), "guid: x\n").unwrap();

        let index = SpriteIndex::build(tmp.path(), "Grass", ASSET_EXTENSION).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.by_reference("101").unwrap().sequence_number, 1);
        assert_eq!(index.by_sequence(2).unwrap().reference_id, "102");
        assert_eq!(index.guid(), Some("aaaa"));
        assert!(index.by_reference("201").is_none());
    }

    #[test]
    fn test_build_skips_files_without_sprite() {
        let tmp = TempDir::new().unwrap();
        write_sprite(tmp.path(), "Grass_1.asset", "101", "aaaa");
        fs::write(
            tmp.path().join("Grass_Rule.asset"),
            "MonoBehaviour:\n  m_Name: Grass_Rule\n",
        )
        .unwrap();

        let index = SpriteIndex::build(tmp.path(), "Grass", ASSET_EXTENSION).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped().len(), 1);
        assert_eq!(index.skipped()[0].name, "Grass_Rule.asset");
    }

    #[test]
    fn test_build_rejects_sprite_without_number() {
        let tmp = TempDir::new().unwrap();
        write_sprite(tmp.path(), "Grass.asset", "101", "aaaa");

        let err = SpriteIndex::build(tmp.path(), "Grass", ASSET_EXTENSION).unwrap_err();
        assert_eq!(err.code(), "TD_001");
    }

    #[test]
    fn test_build_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = SpriteIndex::build(&tmp.path().join("nope"), "Grass", ASSET_EXTENSION)
            .unwrap_err();
        assert!(matches!(err, TiledupError::Io { .. }));
    }

    #[test]
    fn test_first_seen_wins() {
        let index = SpriteIndex::from_sprites(vec![
            Sprite::new("a_1", "10", None).unwrap(),
            Sprite::new("b_1", "11", None).unwrap(),
        ]);
        assert_eq!(index.by_sequence(1).unwrap().name, "a_1");
        assert_eq!(index.guid(), None);
    }
}
