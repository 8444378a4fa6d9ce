//! Encode command implementation
//!
//! Encodes an IR JSON file (as written by `build`) into an SF2 container.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::reporting;

/// Run the encode command
///
/// # Arguments
/// * `input` - Path to the IR JSON file
/// * `output` - SF2 output path (default: derived from `input`)
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(input: &str, output: Option<&str>) -> Result<ExitCode> {
    println!("{} {}", "Encoding:".cyan().bold(), input);

    let text =
        fs::read_to_string(input).with_context(|| format!("Failed to read IR file: {}", input))?;
    let result = wordfont_sf2::encode_json(&text)
        .with_context(|| format!("Failed to encode IR file: {}", input))?;
    reporting::print_diagnostics(&result.diagnostics);

    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(Path::new(input)));
    fs::write(&output_path, &result.data)
        .with_context(|| format!("Failed to write SF2: {}", output_path.display()))?;

    println!(
        "{} {} bytes, blake3 {}",
        "Encoded:".dimmed(),
        result.data.len(),
        &result.hash[..16]
    );
    println!(
        "\n{} Wrote {}{}",
        "SUCCESS".green().bold(),
        output_path.display(),
        if result.diagnostics.is_empty() {
            String::new()
        } else {
            format!(" with {} warning(s)", result.diagnostics.len())
        }
    );

    Ok(ExitCode::SUCCESS)
}

/// `Bank.sf2.json` becomes `Bank.sf2`; anything else gets `.sf2` appended.
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_json = input
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let stripped = input.with_extension("");
        if stripped
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("sf2"))
        {
            return stripped;
        }
    }

    let mut name = input.as_os_str().to_owned();
    name.push(".sf2");
    PathBuf::from(name)
}
