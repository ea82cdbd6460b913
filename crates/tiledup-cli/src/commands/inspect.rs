//! Inspect command implementation
//!
//! Shows which sheet sprite each rule of a rule tile points at, without
//! writing anything.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::ExitCode;
use tiledup_asset::{resolve, Resolution, RuleResolution, RuleTileReader, SpriteIndex};

use super::inputs::Inputs;
use super::json_output::{
    error_to_json, print_json, skipped_file_to_json, warning_codes, InspectOutput, InspectedRule,
    JsonWarning,
};
use super::reporting;

/// Arguments of the inspect command.
#[derive(Debug, Clone, Default)]
pub struct InspectArgs {
    pub palette: Option<String>,
    pub rule: Option<String>,
    /// File name prefix of the sheet
    pub sheet: String,
    /// Rule tile file name
    pub tile: String,
    pub json: bool,
    pub config: Option<String>,
}

/// A rule tile joined against its sheet.
#[derive(Debug)]
pub struct Inspection {
    pub name: Option<String>,
    pub sheet: SpriteIndex,
    pub rules: Vec<RuleResolution>,
}

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 when every rule resolves, 1 otherwise
pub fn run(args: &InspectArgs) -> Result<ExitCode> {
    if args.json {
        run_json(args)
    } else {
        run_human(args)
    }
}

pub fn execute(args: &InspectArgs) -> Result<Inspection> {
    let inputs = Inputs::resolve(
        args.palette.as_deref(),
        args.rule.as_deref(),
        false,
        args.config.as_deref(),
    )?;

    let sheet = SpriteIndex::build(&inputs.palette_dir, &args.sheet, &inputs.extension)
        .with_context(|| {
            format!(
                "Failed to scan sprite sheet '{}' in {}",
                args.sheet,
                inputs.palette_dir.display()
            )
        })?;
    let asset = RuleTileReader::new(inputs.extension)
        .load(&inputs.rule_dir, &args.tile)
        .with_context(|| format!("Failed to read rule tile: {}", args.tile))?;

    let rules = resolve(&sheet, &asset.rules);
    Ok(Inspection {
        name: asset.declared_name(),
        sheet,
        rules,
    })
}

fn unresolved_count(inspection: &Inspection) -> usize {
    inspection
        .rules
        .iter()
        .filter(|r| r.resolution.sprite().is_none())
        .count()
}

fn exit_code(unresolved: usize) -> ExitCode {
    if unresolved == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

/// Run inspect with human-readable (colored) output
fn run_human(args: &InspectArgs) -> Result<ExitCode> {
    println!("{} {}", "Inspecting:".cyan().bold(), args.tile);

    let inspection = execute(args)?;
    if let Some(name) = &inspection.name {
        println!("{} {}", "Name:".cyan(), name);
    }
    reporting::print_sheet("Sheet:", &args.sheet, &inspection.sheet);
    reporting::print_skipped_files(inspection.sheet.skipped());

    println!("{} {}", "Rules:".cyan(), inspection.rules.len());
    for RuleResolution { rule, resolution } in &inspection.rules {
        match resolution.sprite() {
            Some(sprite) => println!(
                "  {} rule {}: fileID {} -> {} (#{})",
                "+".green(),
                rule.rule_id,
                rule.reference_id,
                sprite.name,
                sprite.sequence_number
            ),
            None => println!(
                "  {} rule {}: fileID {} {}",
                "!".yellow(),
                rule.rule_id,
                rule.reference_id,
                "(not in sheet)".yellow()
            ),
        }
    }

    let unresolved = unresolved_count(&inspection);
    if unresolved == 0 {
        println!("{} every rule resolves", "OK".green().bold());
    } else {
        println!(
            "{} {} rule(s) do not resolve against {}",
            "WARNING:".yellow().bold(),
            unresolved,
            args.sheet
        );
    }
    Ok(exit_code(unresolved))
}

/// Run inspect with machine-readable JSON output
fn run_json(args: &InspectArgs) -> Result<ExitCode> {
    let inspection = match execute(args) {
        Ok(inspection) => inspection,
        Err(e) => {
            print_json(&InspectOutput::failure(vec![error_to_json(&e)]));
            return Ok(ExitCode::from(1));
        }
    };

    let mut warnings: Vec<JsonWarning> = inspection
        .sheet
        .skipped()
        .iter()
        .map(skipped_file_to_json)
        .collect();

    let rules: Vec<InspectedRule> = inspection
        .rules
        .iter()
        .map(|RuleResolution { rule, resolution }| {
            let unresolved = match resolution {
                Resolution::Resolved(_) => None,
                Resolution::Unresolved(reason) => {
                    warnings.push(JsonWarning::new(
                        warning_codes::UNRESOLVED_RULE,
                        format!("rule {}: {}", rule.rule_id, reason),
                    ));
                    Some(reason.to_string())
                }
            };
            InspectedRule {
                rule_id: rule.rule_id,
                reference_id: rule.reference_id.clone(),
                sprite: resolution.sprite().cloned(),
                unresolved,
            }
        })
        .collect();

    let unresolved = unresolved_count(&inspection);
    print_json(&InspectOutput {
        success: unresolved == 0,
        errors: Vec::new(),
        warnings,
        name: inspection.name,
        sprites: inspection.sheet.iter().cloned().collect(),
        rules,
    });
    Ok(exit_code(unresolved))
}
