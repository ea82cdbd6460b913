//! Output naming and exclusive file creation.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, TiledupError};
use crate::sprite::first_digit_run;

/// Upper bound on the collision search.
///
/// Each attempt strictly increases the numeric suffix, so the search never
/// revisits a name; the bound only limits how long it walks.
pub const MAX_NAME_ATTEMPTS: usize = 10_000;

/// Increments the first run of digits in `name`, or appends `_1` when there is none.
///
/// The run is rewritten as a plain decimal, so leading zeros are dropped:
/// `Tile_007` becomes `Tile_8` and `Tile_99` becomes `Tile_100`.
pub fn increment_name(name: &str) -> String {
    match first_digit_run(name) {
        Some((start, end)) => format!(
            "{}{}{}",
            &name[..start],
            increment_digits(strip_leading_zeros(&name[start..end])),
            &name[end..]
        ),
        None => format!("{}_1", name),
    }
}

fn strip_leading_zeros(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

/// Adds one to a string of ASCII digits without going through a fixed-width integer.
fn increment_digits(digits: &str) -> String {
    let mut bytes = digits.as_bytes().to_vec();
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            return String::from_utf8_lossy(&bytes).into_owned();
        }
    }
    format!("1{}", String::from_utf8_lossy(&bytes))
}

/// Path of the asset file called `name` in `directory`.
pub fn output_path(directory: &Path, name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{}{}", name, extension))
}

/// Derives the first free name after `declared_name`.
pub fn derive_output_name(directory: &Path, declared_name: &str, extension: &str) -> Result<String> {
    derive_output_name_within(directory, declared_name, extension, MAX_NAME_ATTEMPTS)
}

fn derive_output_name_within(
    directory: &Path,
    declared_name: &str,
    extension: &str,
    max_attempts: usize,
) -> Result<String> {
    let mut candidate = increment_name(declared_name);
    for _ in 0..max_attempts {
        if !output_path(directory, &candidate, extension).exists() {
            return Ok(candidate);
        }
        candidate = increment_name(&candidate);
    }
    Err(TiledupError::NameSpaceExhausted {
        base: declared_name.to_string(),
        attempts: max_attempts,
    })
}

/// Checks that a caller-chosen name is free. Existing files are never replaced.
pub fn check_explicit_name(directory: &Path, name: &str, extension: &str) -> Result<PathBuf> {
    let path = output_path(directory, name, extension);
    if path.exists() {
        return Err(TiledupError::OutputExists { path });
    }
    Ok(path)
}

/// Creates `path` and writes `contents`, failing if the file already exists.
pub fn create_exclusive(path: &Path, contents: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => TiledupError::OutputExists {
                path: path.to_path_buf(),
            },
            _ => TiledupError::io(path, e),
        })?;
    file.write_all(contents.as_bytes())
        .map_err(|e| TiledupError::io(path, e))
}
