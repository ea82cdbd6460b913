//! Human-readable console output shared by commands.

use colored::Colorize;
use tiledup_asset::{RemapReport, SkippedEntry, SkippedFile, SkippedRule, SpriteIndex};

/// Prints a one-line summary of a scanned sheet.
pub(super) fn print_sheet(label: &str, prefix: &str, index: &SpriteIndex) {
    let guid = index.guid().unwrap_or("-");
    println!(
        "{} {} ({} sprites, guid {})",
        label.cyan(),
        prefix,
        index.len(),
        guid.dimmed()
    );
}

pub(super) fn print_skipped_files(skipped: &[SkippedFile]) {
    for file in skipped {
        println!("  {} {}: {}", "-".dimmed(), file.name, file.reason.dimmed());
    }
}

pub(super) fn print_skipped_rules(skipped: &[SkippedRule]) {
    for rule in skipped {
        println!(
            "  {} rule {}: {}",
            "!".yellow(),
            rule.rule_id,
            rule.reason
        );
    }
}

pub(super) fn print_skipped_entries(skipped: &[SkippedEntry]) {
    for entry in skipped {
        println!(
            "  {} {} (#{}): {}",
            "!".yellow(),
            entry.original,
            entry.position,
            entry.reason
        );
    }
}

pub(super) fn print_report(report: &RemapReport) {
    println!("{} {:+}", "Shift:".cyan(), report.shift);
    for sub in &report.substitutions {
        let guid_note = match (&sub.from_guid, &sub.to_guid) {
            (Some(from), Some(to)) if from != to => format!(" (guid {} -> {})", from, to),
            _ => String::new(),
        };
        let line = format!(
            "  {} -> {}  fileID {} -> {}{}",
            sub.original, sub.destination, sub.from_reference, sub.to_reference, guid_note
        );
        if sub.occurrences == 0 {
            println!("{} {}", line, "(no references in document)".yellow());
        } else {
            println!("{}", line);
        }
    }

    if !report.skipped.is_empty() {
        println!(
            "{} {} sprite(s) have no counterpart in the destination sheet:",
            "WARNING:".yellow().bold(),
            report.skipped.len()
        );
        print_skipped_entries(&report.skipped);
    }

    if report.written {
        println!(
            "{} {} -> {}",
            "SUCCESS".green().bold(),
            report.old_name,
            report.output.display()
        );
    } else {
        println!(
            "{} would write {} as {}",
            "DRY RUN".yellow().bold(),
            report.new_name,
            report.output.display()
        );
    }
}
