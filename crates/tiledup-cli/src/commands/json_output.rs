//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag on `duplicate` and `inspect`, so that
//! editor scripts and other tools can consume results programmatically.

use serde::Serialize;
use tiledup_asset::{RemapReport, SkippedEntry, SkippedFile, SkippedRule, Sprite, TiledupError};

use super::inputs::InputError;

/// Error codes for CLI-level failures. Library failures pass their own `TD_xxx` code through.
pub mod error_codes {
    /// Config file could not be read or parsed
    pub const CONFIG: &str = "CLI_001";
    /// A required directory was given neither as a flag nor in the config
    pub const MISSING_ARGUMENT: &str = "CLI_002";
    /// Any other failure
    pub const OTHER: &str = "CLI_003";
}

/// Warning codes for CLI output.
pub mod warning_codes {
    /// A tiling rule references a sprite that is not in the sheet
    pub const UNRESOLVED_RULE: &str = "CLI_W001";
    /// A shifted sprite has no counterpart in the destination sheet
    pub const MISSING_DESTINATION: &str = "CLI_W002";
    /// A candidate sheet file did not yield a sprite
    pub const SKIPPED_FILE: &str = "CLI_W003";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "TD_006")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JsonWarning {
    pub code: String,
    pub message: String,
}

impl JsonWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Maps a command failure to a JSON error, keeping library error codes.
pub fn error_to_json(error: &anyhow::Error) -> JsonError {
    let message = format!("{:#}", error);
    if let Some(e) = error.downcast_ref::<TiledupError>() {
        return JsonError::new(e.code(), message);
    }
    match error.downcast_ref::<InputError>() {
        Some(InputError::Config(_)) => JsonError::new(error_codes::CONFIG, message),
        Some(InputError::Missing { .. }) => JsonError::new(error_codes::MISSING_ARGUMENT, message),
        None => JsonError::new(error_codes::OTHER, message),
    }
}

pub fn skipped_rule_to_json(skipped: &SkippedRule) -> JsonWarning {
    JsonWarning::new(
        warning_codes::UNRESOLVED_RULE,
        format!("rule {}: {}", skipped.rule_id, skipped.reason),
    )
}

pub fn skipped_entry_to_json(skipped: &SkippedEntry) -> JsonWarning {
    JsonWarning::new(
        warning_codes::MISSING_DESTINATION,
        format!("{}: {}", skipped.original, skipped.reason),
    )
}

pub fn skipped_file_to_json(skipped: &SkippedFile) -> JsonWarning {
    JsonWarning::new(
        warning_codes::SKIPPED_FILE,
        format!("{}: {}", skipped.name, skipped.reason),
    )
}

/// JSON output for the `duplicate` command.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RemapReport>,
}

impl DuplicateOutput {
    pub fn success(report: RemapReport, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(report),
        }
    }

    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            result: None,
        }
    }
}

/// One rule as shown by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectedRule {
    pub rule_id: i64,
    pub reference_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<Sprite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<String>,
}

/// JSON output for the `inspect` command.
#[derive(Debug, Clone, Serialize)]
pub struct InspectOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub warnings: Vec<JsonWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sprites: Vec<Sprite>,
    pub rules: Vec<InspectedRule>,
}

impl InspectOutput {
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            name: None,
            sprites: Vec::new(),
            rules: Vec::new(),
        }
    }
}

/// Prints a JSON output value to stdout.
pub fn print_json<T: Serialize>(output: &T) {
    let json =
        serde_json::to_string_pretty(output).expect("JSON output serialization should not fail");
    println!("{}", json);
}
