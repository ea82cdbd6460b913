//! Unity YAML document model.
//!
//! Unity serializes assets as YAML 1.1 streams whose documents carry class
//! tags (`--- !u!114 &11400000`). Those tags mean nothing to this crate, so
//! they are treated as transparent wrappers: document-start lines are
//! normalised before parsing and any tag that survives is unwrapped.
//!
//! Reference tokens (`fileID`) and sheet identifiers (`guid`) are opaque
//! strings. They are quoted before parsing so that numeric-looking values
//! never pass through a float.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;

/// Matches a document-start line together with its tag, anchor and `stripped` marker.
const DOCUMENT_START_PATTERN: &str = r"(?m)^---[ \t]+[^\r\n]*";

/// Matches an unquoted `fileID`/`guid` scalar inside a flow or block mapping.
const REFERENCE_SCALAR_PATTERN: &str = r#"(?P<key>\b(?:fileID|guid):[ \t]*)(?P<value>[^,}\s"'][^,}\s]*)"#;

static DOCUMENT_START_REGEX: OnceLock<Regex> = OnceLock::new();
static REFERENCE_SCALAR_REGEX: OnceLock<Regex> = OnceLock::new();

fn document_start_regex() -> &'static Regex {
    DOCUMENT_START_REGEX
        .get_or_init(|| Regex::new(DOCUMENT_START_PATTERN).expect("invalid regex pattern"))
}

fn reference_scalar_regex() -> &'static Regex {
    REFERENCE_SCALAR_REGEX
        .get_or_init(|| Regex::new(REFERENCE_SCALAR_PATTERN).expect("invalid regex pattern"))
}

/// Rewrites Unity-specific syntax into plain YAML.
///
/// The returned text is only ever fed to the parser; output documents are
/// always produced from the original text.
pub fn normalize(text: &str) -> String {
    let text = document_start_regex().replace_all(text, "---");
    reference_scalar_regex()
        .replace_all(&text, "${key}\"${value}\"")
        .into_owned()
}

/// A parsed Unity asset: one YAML value per document in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct UnityDocument {
    documents: Vec<Value>,
}

impl UnityDocument {
    /// Parses a Unity YAML stream.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        let normalized = normalize(text);
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(&normalized) {
            let value = Value::deserialize(document)?;
            documents.push(strip_tags(value));
        }
        Ok(Self { documents })
    }

    /// Returns true when the stream holds no document with content.
    pub fn is_empty(&self) -> bool {
        self.documents.iter().all(is_blank)
    }

    /// Returns all documents in stream order.
    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    /// The first document whose root is a non-empty mapping.
    pub fn primary(&self) -> Option<&Value> {
        self.documents
            .iter()
            .find(|doc| doc.as_mapping().is_some_and(|m| !m.is_empty()))
    }

    /// Follows a chain of mapping keys from the primary document's root.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let mut current = self.primary()?;
        for key in path {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }

    /// Finds the first value stored under `key`, searching depth-first in document order.
    pub fn find_key(&self, key: &str) -> Option<&Value> {
        self.documents.iter().find_map(|doc| find_key_in(doc, key))
    }

    /// The asset's declared `m_Name`.
    pub fn declared_name(&self) -> Option<String> {
        self.get_path(&["MonoBehaviour", "m_Name"])
            .or_else(|| self.find_key("m_Name"))
            .and_then(scalar_to_string)
            .filter(|name| !name.is_empty())
    }
}

/// A `{fileID: ..., guid: ...}` object reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteRef {
    pub file_id: String,
    pub guid: Option<String>,
}

impl SpriteRef {
    /// Reads a reference from a mapping value. Returns `None` when `fileID` is absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let mapping = value.as_mapping()?;
        let file_id = mapping.get("fileID").and_then(scalar_to_string)?;
        let guid = mapping
            .get("guid")
            .and_then(scalar_to_string)
            .filter(|g| !g.is_empty());
        Some(Self { file_id, guid })
    }

    /// Unity writes `{fileID: 0}` for an unset reference.
    pub fn is_null(&self) -> bool {
        self.file_id.is_empty() || self.file_id == "0"
    }
}

/// Renders a scalar as the string it was written as.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads an integer scalar, accepting quoted digits.
pub fn scalar_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn strip_tags(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => strip_tags(tagged.value),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| (strip_tags(k), strip_tags(v)))
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(strip_tags).collect()),
        other => other,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(m) => m.is_empty(),
        Value::Sequence(s) => s.is_empty(),
        _ => false,
    }
}

fn find_key_in<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Mapping(mapping) => {
            for (k, v) in mapping {
                if k.as_str() == Some(key) {
                    return Some(v);
                }
                if let Some(found) = find_key_in(v, key) {
                    return Some(found);
                }
            }
            None
        }
        Value::Sequence(seq) => seq.iter().find_map(|v| find_key_in(v, key)),
        _ => None,
    }
}
