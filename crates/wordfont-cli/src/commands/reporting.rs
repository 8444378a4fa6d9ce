//! Shared console reporting for commands.

use colored::Colorize;
use wordfont_bank::ValidationReport;
use wordfont_sf2::Diagnostic;

/// Print encoder diagnostics as warnings.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        let location = diagnostic
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "!".yellow(),
            diagnostic.code,
            location.dimmed(),
            diagnostic.message
        );
    }
}

/// Print bank validation warnings, or a clean marker.
pub fn print_validation(report: &ValidationReport) {
    if report.is_clean() {
        println!("{} no bank warnings", "Validated:".dimmed());
        return;
    }
    println!(
        "{} {} warning(s)",
        "Validated:".yellow().bold(),
        report.warnings.len()
    );
    for warning in &report.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
}
