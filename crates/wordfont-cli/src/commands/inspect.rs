//! Inspect command implementation
//!
//! Prints the chunk structure of an SF2 file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;

use wordfont_sf2::inspect::ChunkNode;
use wordfont_sf2::ContainerReport;

/// Run the inspect command
///
/// # Arguments
/// * `path` - Path to the SF2 file
/// * `json_output` - Print the report as JSON instead of a tree
///
/// # Returns
/// Exit code: 0 success, 1 error
pub fn run(path: &str, json_output: bool) -> Result<ExitCode> {
    let data = fs::read(path).with_context(|| format!("Failed to read file: {}", path))?;
    let report = wordfont_sf2::inspect(&data)
        .with_context(|| format!("Failed to inspect: {}", path))?;

    if json_output {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{} {}", "Inspecting:".cyan().bold(), path);
        print!("{}", render(&report));
    }

    Ok(ExitCode::SUCCESS)
}

/// Human-readable report.
pub fn render(report: &ContainerReport) -> String {
    let mut out = String::new();
    render_node(&report.root, 0, &mut out);

    if !report.info.is_empty() {
        out.push_str("\nINFO\n");
        for entry in &report.info {
            out.push_str(&format!("  {}  {}\n", entry.tag, entry.value));
        }
    }

    if !report.tables.is_empty() {
        out.push_str("\nTables\n");
        for table in &report.tables {
            out.push_str(&format!("  {}  {} record(s)\n", table.tag, table.records));
        }
    }

    if !report.samples.is_empty() {
        out.push_str("\nSamples\n");
        for sample in &report.samples {
            out.push_str(&format!(
                "  {:<20} {:>8}..{:<8} {:>6} Hz  key {}\n",
                sample.name, sample.start, sample.end, sample.sample_rate, sample.original_pitch
            ));
        }
    }

    out
}

fn render_node(node: &ChunkNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match &node.form_type {
        Some(form) => out.push_str(&format!("{}{} '{}' ({} bytes)\n", indent, node.id, form, node.size)),
        None => out.push_str(&format!("{}{} ({} bytes)\n", indent, node.id, node.size)),
    }
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}
