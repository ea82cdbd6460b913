//! Duplicate command implementation
//!
//! Copies a rule tile onto another range of sprites, from the same sheet or
//! from a different one.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use tiledup_asset::{
    resolve_ordered, RemapEngine, RemapOptions, RemapReport, RuleTileReader, SkippedRule,
    SpriteIndex,
};

use super::inputs::Inputs;
use super::json_output::{
    error_to_json, print_json, skipped_entry_to_json, skipped_file_to_json, skipped_rule_to_json,
    DuplicateOutput,
};
use super::reporting;

/// Arguments of the duplicate command.
#[derive(Debug, Clone, Default)]
pub struct DuplicateArgs {
    /// Directory holding the sprite sheet's tile assets
    pub palette: Option<String>,
    /// Directory holding the rule tile
    pub rule: Option<String>,
    /// File name prefix of the source sheet
    pub sheet: String,
    /// Rule tile file name
    pub tile: String,
    /// Sequence number of the sprite the copy starts at
    pub begin: i64,
    /// File name prefix of the destination sheet (default: the source sheet)
    pub dest_sheet: Option<String>,
    /// Name of the copy (default: declared name with its number incremented)
    pub filename: Option<String>,
    pub strict: bool,
    pub dry_run: bool,
    pub json: bool,
    pub config: Option<String>,
}

/// Everything a successful duplication produced.
#[derive(Debug)]
pub struct Duplication {
    pub source_sheet: SpriteIndex,
    pub destination_sheet: Option<SpriteIndex>,
    pub skipped_rules: Vec<SkippedRule>,
    pub report: RemapReport,
}

/// Run the duplicate command
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(args: &DuplicateArgs) -> Result<ExitCode> {
    if args.json {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Scans the sheets, resolves the tile's sprite order and writes the copy.
pub fn execute(args: &DuplicateArgs) -> Result<Duplication> {
    let inputs = Inputs::resolve(
        args.palette.as_deref(),
        args.rule.as_deref(),
        args.strict,
        args.config.as_deref(),
    )?;

    let source_sheet = SpriteIndex::build(&inputs.palette_dir, &args.sheet, &inputs.extension)
        .with_context(|| {
            format!(
                "Failed to scan sprite sheet '{}' in {}",
                args.sheet,
                inputs.palette_dir.display()
            )
        })?;

    let asset = RuleTileReader::new(inputs.extension.clone())
        .load(&inputs.rule_dir, &args.tile)
        .with_context(|| format!("Failed to read rule tile: {}", args.tile))?;

    let order = resolve_ordered(&source_sheet, &asset.rules, inputs.policy)
        .with_context(|| format!("Failed to resolve sprites of {}", args.tile))?;

    let destination_sheet = match args.dest_sheet.as_deref() {
        Some(prefix) if prefix != args.sheet => Some(
            SpriteIndex::build(&inputs.palette_dir, prefix, &inputs.extension).with_context(
                || {
                    format!(
                        "Failed to scan destination sheet '{}' in {}",
                        prefix,
                        inputs.palette_dir.display()
                    )
                },
            )?,
        ),
        _ => None,
    };
    let destination = destination_sheet.as_ref().unwrap_or(&source_sheet);

    let options = RemapOptions::new(inputs.policy)
        .extension(inputs.extension.clone())
        .swap_guid(destination_sheet.is_some())
        .dry_run(args.dry_run);

    let report = RemapEngine::new(options)
        .remap(
            &asset,
            &order.sprites,
            destination,
            args.begin,
            args.filename.as_deref(),
        )
        .with_context(|| format!("Failed to duplicate {}", asset.path.display()))?;

    Ok(Duplication {
        source_sheet,
        destination_sheet,
        skipped_rules: order.skipped,
        report,
    })
}

/// Run duplicate with human-readable (colored) output
fn run_human(args: &DuplicateArgs) -> Result<ExitCode> {
    println!("{} {}", "Duplicating:".cyan().bold(), args.tile);

    let duplication = execute(args)?;

    reporting::print_sheet("Sheet:", &args.sheet, &duplication.source_sheet);
    reporting::print_skipped_files(duplication.source_sheet.skipped());
    if let (Some(sheet), Some(prefix)) = (&duplication.destination_sheet, &args.dest_sheet) {
        reporting::print_sheet("Destination:", prefix, sheet);
        reporting::print_skipped_files(sheet.skipped());
    }

    if !duplication.skipped_rules.is_empty() {
        println!(
            "{} {} rule(s) reference sprites outside the sheet and were left as they are:",
            "WARNING:".yellow().bold(),
            duplication.skipped_rules.len()
        );
        reporting::print_skipped_rules(&duplication.skipped_rules);
    }

    reporting::print_report(&duplication.report);

    Ok(ExitCode::SUCCESS)
}

/// Run duplicate with machine-readable JSON output
fn run_json(args: &DuplicateArgs) -> Result<ExitCode> {
    let duplication = match execute(args) {
        Ok(duplication) => duplication,
        Err(e) => {
            print_json(&DuplicateOutput::failure(vec![error_to_json(&e)]));
            return Ok(ExitCode::from(1));
        }
    };

    let mut warnings: Vec<_> = duplication
        .source_sheet
        .skipped()
        .iter()
        .map(skipped_file_to_json)
        .collect();
    if let Some(sheet) = &duplication.destination_sheet {
        warnings.extend(sheet.skipped().iter().map(skipped_file_to_json));
    }
    warnings.extend(duplication.skipped_rules.iter().map(skipped_rule_to_json));
    warnings.extend(duplication.report.skipped.iter().map(skipped_entry_to_json));

    print_json(&DuplicateOutput::success(duplication.report, warnings));
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_sprite(dir: &Path, name: &str, file_id: &str, guid: &str) {
        fs::write(
            dir.join(format!("{}.asset", name)),
            format!(
                "--- !u!114 &11400000\nMonoBehaviour:\n  m_Name: {}\n  m_Sprite: {{fileID: {}, guid: {}, type: 3}}\n",
                name, file_id, guid
            ),
        )
        .unwrap();
    }

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let palette = tmp.path().join("palette");
        let rules = tmp.path().join("rules");
        fs::create_dir_all(&palette).unwrap();
        fs::create_dir_all(&rules).unwrap();
        for n in 1..=6 {
            write_sprite(&palette, &format!("Dirt_{}", n), &format!("{}00", n), "d1");
        }
        fs::write(
            rules.join("Dirt_1.asset"),
            "--- !u!114 &11400000\nMonoBehaviour:\n  m_Name: Dirt_1\n  m_TilingRules:\n  - m_Id: 1\n    m_Sprites:\n    - {fileID: 200, guid: d1, type: 3}\n  - m_Id: 2\n    m_Sprites:\n    - {fileID: 100, guid: d1, type: 3}\n",
        )
        .unwrap();
        tmp
    }

    fn args(tmp: &TempDir) -> DuplicateArgs {
        DuplicateArgs {
            palette: Some(tmp.path().join("palette").to_string_lossy().into_owned()),
            rule: Some(tmp.path().join("rules").to_string_lossy().into_owned()),
            sheet: "Dirt_".to_string(),
            tile: "Dirt_1.asset".to_string(),
            begin: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_execute_writes_copy() {
        let tmp = project();
        let duplication = execute(&args(&tmp)).unwrap();

        assert_eq!(duplication.report.shift, 3);
        let written = fs::read_to_string(tmp.path().join("rules").join("Dirt_2.asset")).unwrap();
        assert!(written.contains("m_Name: Dirt_2\n"));
        assert!(written.contains("{fileID: 500, guid: d1, type: 3}"));
        assert!(written.contains("{fileID: 400, guid: d1, type: 3}"));
    }

    #[test]
    fn test_execute_missing_rule_dir() {
        let tmp = project();
        let mut args = args(&tmp);
        args.rule = None;
        let err = execute(&args).unwrap_err();
        assert!(err.to_string().contains("--rule"));
    }

    #[test]
    fn test_run_json_reports_failure_with_exit_code() {
        let tmp = project();
        let mut args = args(&tmp);
        args.json = true;
        args.begin = 60;
        let code = run(&args).unwrap();
        assert_eq!(code, ExitCode::from(1));
        assert!(!tmp.path().join("rules").join("Dirt_2.asset").exists());
    }
}
