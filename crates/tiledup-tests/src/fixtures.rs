//! Test fixture utilities for creating synthetic Unity tile projects.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tiledup_cli::commands::duplicate::DuplicateArgs;
use tiledup_cli::commands::inspect::InspectArgs;

/// Script guid Unity writes into every RuleTile asset.
pub const RULE_TILE_SCRIPT_GUID: &str = "9d1514134bc4fbd41bb739b1b9a49231";

/// Sprite `fileID` for sprite number `n` of a sliced sheet.
pub fn sprite_file_id(n: i64) -> String {
    (21300000 + 2 * n).to_string()
}

/// A test fixture representing a Unity project with a palette and rule tiles.
pub struct TileProjectFixture {
    pub root: TempDir,
    pub palette_dir: PathBuf,
    pub rule_dir: PathBuf,
}

impl TileProjectFixture {
    /// Create a new project with empty `Palettes/` and `Rules/` directories.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let palette_dir = root.path().join("Assets").join("Palettes");
        let rule_dir = root.path().join("Assets").join("Rules");
        fs::create_dir_all(&palette_dir).expect("Failed to create palette dir");
        fs::create_dir_all(&rule_dir).expect("Failed to create rule dir");
        Self {
            root,
            palette_dir,
            rule_dir,
        }
    }

    /// Get the project root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Add one palette tile asset referencing a sprite.
    pub fn add_sprite(&self, name: &str, file_id: &str, guid: &str) -> PathBuf {
        let content = format!(
            r#"%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!114 &11400000
MonoBehaviour:
  m_ObjectHideFlags: 0
  m_CorrespondingSourceObject: {{fileID: 0}}
  m_PrefabInstance: {{fileID: 0}}
  m_PrefabAsset: {{fileID: 0}}
  m_GameObject: {{fileID: 0}}
  m_Enabled: 1
  m_EditorHideFlags: 0
  m_Script: {{fileID: 13312, guid: 0000000000000000e000000000000000, type: 0}}
  m_Name: {name}
  m_EditorClassIdentifier:
  m_Sprite: {{fileID: {file_id}, guid: {guid}, type: 3}}
  m_Color: {{r: 1, g: 1, b: 1, a: 1}}
  m_Transform:
    e00: 1
    e01: 0
    e02: 0
    e03: 0
  m_InstancedGameObject: {{fileID: 0}}
  m_Flags: 1
  m_ColliderType: 1
"#
        );
        let path = self.palette_dir.join(format!("{}.asset", name));
        fs::write(&path, content).expect("Failed to write sprite asset");
        path
    }

    /// Add `<prefix><n>` sprites for every `n` in `numbers`, all from the
    /// sheet texture `guid`.
    pub fn add_sheet(&self, prefix: &str, numbers: RangeInclusive<i64>, guid: &str) {
        for n in numbers {
            self.add_sprite(&format!("{}{}", prefix, n), &sprite_file_id(n), guid);
        }
    }

    /// Add a rule tile whose rules reference the given sprite `fileID`s, in order.
    pub fn add_rule_tile(&self, name: &str, references: &[String], guid: &str) -> PathBuf {
        let mut content = format!(
            r#"%YAML 1.1
%TAG !u! tag:unity3d.com,2011:
--- !u!114 &11400000
MonoBehaviour:
  m_ObjectHideFlags: 0
  m_CorrespondingSourceObject: {{fileID: 0}}
  m_PrefabInstance: {{fileID: 0}}
  m_PrefabAsset: {{fileID: 0}}
  m_GameObject: {{fileID: 0}}
  m_Enabled: 1
  m_EditorHideFlags: 0
  m_Script: {{fileID: 11500000, guid: {RULE_TILE_SCRIPT_GUID}, type: 3}}
  m_Name: {name}
  m_EditorClassIdentifier:
  m_DefaultSprite: {{fileID: {first}, guid: {guid}, type: 3}}
  m_DefaultGameObject: {{fileID: 0}}
  m_DefaultColliderType: 1
  m_TilingRules:
"#,
            first = references.first().map(String::as_str).unwrap_or("0"),
        );
        for (id, reference) in references.iter().enumerate() {
            content.push_str(&format!(
                r#"  - m_Id: {id}
    m_Sprites:
    - {{fileID: {reference}, guid: {guid}, type: 3}}
    m_GameObject: {{fileID: 0}}
    m_MinAnimationSpeed: 1
    m_MaxAnimationSpeed: 1
    m_PerlinScale: 0.5
    m_Output: 0
    m_ColliderType: 1
    m_RandomTransform: 0
    m_Neighbors: 0100000002000000
    m_NeighborPositions:
    - {{x: -1, y: 1, z: 0}}
    - {{x: 0, y: 1, z: 0}}
    m_RuleTransform: 0
"#
            ));
        }
        self.add_rule_file(&format!("{}.asset", name), &content)
    }

    /// Write an arbitrary file into the rule directory.
    pub fn add_rule_file(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.rule_dir.join(file_name);
        fs::write(&path, content).expect("Failed to write rule tile");
        path
    }

    /// Read a file from the rule directory.
    pub fn read_rule_file(&self, file_name: &str) -> String {
        fs::read_to_string(self.rule_dir.join(file_name)).expect("Failed to read rule tile")
    }

    /// `duplicate` arguments pointing at this project's directories.
    pub fn duplicate_args(&self, sheet: &str, tile: &str, begin: i64) -> DuplicateArgs {
        DuplicateArgs {
            palette: Some(self.palette_dir.to_string_lossy().into_owned()),
            rule: Some(self.rule_dir.to_string_lossy().into_owned()),
            sheet: sheet.to_string(),
            tile: tile.to_string(),
            begin,
            ..Default::default()
        }
    }

    /// `inspect` arguments pointing at this project's directories.
    pub fn inspect_args(&self, sheet: &str, tile: &str) -> InspectArgs {
        InspectArgs {
            palette: Some(self.palette_dir.to_string_lossy().into_owned()),
            rule: Some(self.rule_dir.to_string_lossy().into_owned()),
            sheet: sheet.to_string(),
            tile: tile.to_string(),
            ..Default::default()
        }
    }
}

impl Default for TileProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
