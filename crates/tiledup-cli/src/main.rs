//! tiledup CLI - Duplicates Unity rule tiles onto other sprites
//!
//! A rule tile made for one run of sprites in a sheet can be copied onto
//! another run (or another sheet laid out the same way) with every sprite
//! reference shifted accordingly.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use tiledup_cli::commands;
use tiledup_cli::commands::duplicate::DuplicateArgs;
use tiledup_cli::commands::inspect::InspectArgs;

/// tiledup - Unity rule tile duplicator
#[derive(Parser)]
#[command(name = "tiledup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a rule tile onto another range of sprites
    Duplicate {
        /// Directory holding the sprite sheet's tile assets
        #[arg(short, long)]
        palette: Option<String>,

        /// Directory holding the rule tile
        #[arg(short, long)]
        rule: Option<String>,

        /// File name prefix of the source sprite sheet (e.g. "Grass_")
        #[arg(short, long)]
        sheet: String,

        /// Rule tile file name (extension optional)
        #[arg(short, long)]
        tile: String,

        /// Sequence number of the sprite the copy starts at
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..))]
        begin: i64,

        /// File name prefix of the destination sheet (default: the source sheet)
        #[arg(short, long)]
        dest_sheet: Option<String>,

        /// Name of the copy (default: the tile's name with its number incremented)
        #[arg(short, long)]
        filename: Option<String>,

        /// Fail when a sprite cannot be mapped instead of leaving it out
        #[arg(long)]
        strict: bool,

        /// Show what would be written without writing it
        #[arg(long)]
        dry_run: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Project config file (JSON)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Show which sprite each rule of a rule tile points at
    Inspect {
        /// Directory holding the sprite sheet's tile assets
        #[arg(short, long)]
        palette: Option<String>,

        /// Directory holding the rule tile
        #[arg(short, long)]
        rule: Option<String>,

        /// File name prefix of the sprite sheet
        #[arg(short, long)]
        sheet: String,

        /// Rule tile file name (extension optional)
        #[arg(short, long)]
        tile: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Project config file (JSON)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Duplicate {
            palette,
            rule,
            sheet,
            tile,
            begin,
            dest_sheet,
            filename,
            strict,
            dry_run,
            json,
            config,
        } => commands::duplicate::run(&DuplicateArgs {
            palette,
            rule,
            sheet,
            tile,
            begin,
            dest_sheet,
            filename,
            strict,
            dry_run,
            json,
            config,
        }),
        Commands::Inspect {
            palette,
            rule,
            sheet,
            tile,
            json,
            config,
        } => commands::inspect::run(&InspectArgs {
            palette,
            rule,
            sheet,
            tile,
            json,
            config,
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
