//! Locating the WAV files that make up a bank.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::BankError;

/// How discovered samples are ordered onto the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleOrder {
    /// Lexicographic by file name.
    #[default]
    Name,
    /// Oldest modification time first (slicer output order); ties by name.
    Modified,
}

/// List the `.wav` files directly inside `dir`, in the requested order.
///
/// # Errors
/// - [`BankError::NotADirectory`] if `dir` is not a directory
/// - [`BankError::NoSamples`] if no WAV file is present
pub fn discover_wav_files(dir: &Path, order: SampleOrder) -> Result<Vec<PathBuf>, BankError> {
    if !dir.is_dir() {
        return Err(BankError::NotADirectory(dir.to_path_buf()));
    }

    let mut found: Vec<(PathBuf, SystemTime)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| BankError::Io(e.into()))?;
        if !entry.file_type().is_file() || !is_wav(entry.path()) {
            continue;
        }
        let modified = entry
            .metadata()
            .map_err(|e| BankError::Io(e.into()))?
            .modified()?;
        found.push((entry.into_path(), modified));
    }

    if found.is_empty() {
        return Err(BankError::NoSamples(dir.to_path_buf()));
    }

    match order {
        SampleOrder::Name => found.sort_by(|a, b| a.0.cmp(&b.0)),
        SampleOrder::Modified => found.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0))),
    }

    log::debug!("found {} WAV file(s) in {}", found.len(), dir.display());
    Ok(found.into_iter().map(|(path, _)| path).collect())
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}
